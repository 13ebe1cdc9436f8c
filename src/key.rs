//! Session key namespacing.

use md5::{Digest, Md5};
use std::fmt;

/// Number of hex characters kept from the application id digest.
const DERIVED_PREFIX_LEN: usize = 5;

/// A namespace prepended to every session id before it reaches the table.
///
/// Two applications sharing one table must use distinct prefixes, otherwise
/// they read each other's sessions.
///
/// # Example
///
/// ```rust
/// use sessiontable::KeyPrefix;
///
/// let prefix = KeyPrefix::new("ab12c");
/// assert_eq!(prefix.key_for("sess123"), "ab12csess123");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct KeyPrefix(String);

impl KeyPrefix {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self(prefix.into())
    }

    /// Derives a short prefix from an application identifier.
    ///
    /// The prefix is the first five lowercase hex characters of the MD5
    /// digest of `app_id`, so the same application always lands in the same
    /// namespace.
    pub fn derive(app_id: &str) -> Self {
        let digest = Md5::digest(app_id.as_bytes());
        let mut hex = format!("{digest:x}");
        hex.truncate(DERIVED_PREFIX_LEN);
        Self(hex)
    }

    /// Returns the table key for `session_id`.
    #[inline]
    pub fn key_for(&self, session_id: &str) -> String {
        let mut key = String::with_capacity(self.0.len() + session_id.len());
        key.push_str(&self.0);
        key.push_str(session_id);
        key
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for KeyPrefix {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
