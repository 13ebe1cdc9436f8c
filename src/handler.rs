//! The session-handler capability a host framework drives.

use std::future::Future;

/// The result of reading a session.
///
/// Unlike a plain string, a failed read is never confused with a session
/// that simply has no data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The session has a non-empty payload.
    Data(String),
    /// No record exists, or it carries no payload.
    Empty,
    /// The store could not be reached or rejected the request.
    Failed,
}

impl ReadOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, ReadOutcome::Failed)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ReadOutcome::Empty)
    }

    /// The payload, with `Empty` as `""`. Returns `None` for a failed read.
    pub fn into_payload(self) -> Option<String> {
        match self {
            ReadOutcome::Data(data) => Some(data),
            ReadOutcome::Empty => Some(String::new()),
            ReadOutcome::Failed => None,
        }
    }

    /// The payload, treating a failed read like an empty session.
    pub fn unwrap_or_empty(self) -> String {
        self.into_payload().unwrap_or_default()
    }
}

impl From<Option<String>> for ReadOutcome {
    fn from(payload: Option<String>) -> Self {
        match payload {
            Some(data) if !data.is_empty() => ReadOutcome::Data(data),
            _ => ReadOutcome::Empty,
        }
    }
}

/// Lifecycle hooks a host framework invokes to persist sessions.
///
/// Implementations never return errors: failures are reported through
/// [`ReadOutcome::Failed`] or `false`.
pub trait SessionHandler: Send + Sync {
    /// Called before the first operation of a request.
    fn open(&self) -> impl Future<Output = bool> + Send {
        async { true }
    }

    /// Called after the last operation of a request.
    fn close(&self) -> impl Future<Output = bool> + Send {
        async { true }
    }

    /// Loads the payload of `session_id`.
    fn read(&self, session_id: &str) -> impl Future<Output = ReadOutcome> + Send;

    /// Persists `data` as the full payload of `session_id`.
    fn write(&self, session_id: &str, data: &str) -> impl Future<Output = bool> + Send;

    /// Removes `session_id`. Removing an unknown session succeeds.
    fn destroy(&self, session_id: &str) -> impl Future<Output = bool> + Send;

    /// Whether the framework should bypass its built-in storage.
    fn uses_custom_storage(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_outcome_collapsing() {
        assert_eq!(
            ReadOutcome::Data("a=1".into()).into_payload(),
            Some("a=1".to_string())
        );
        assert_eq!(ReadOutcome::Empty.into_payload(), Some(String::new()));
        assert_eq!(ReadOutcome::Failed.into_payload(), None);
        assert_eq!(ReadOutcome::Failed.unwrap_or_empty(), "");
        assert!(ReadOutcome::Failed.is_failed());
        assert!(ReadOutcome::Empty.is_empty());
    }

    #[test]
    fn test_from_option() {
        assert_eq!(ReadOutcome::from(None), ReadOutcome::Empty);
        assert_eq!(ReadOutcome::from(Some(String::new())), ReadOutcome::Empty);
        assert_eq!(
            ReadOutcome::from(Some("x".to_string())),
            ReadOutcome::Data("x".to_string())
        );
    }
}
