use serde::Deserialize;

use crate::KeyPrefix;

/// Attribute holding the session key when none is configured.
pub const DEFAULT_ID_COLUMN: &str = "ID";

/// Attribute holding the session payload when none is configured.
pub const DEFAULT_DATA_COLUMN: &str = "Data";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("table name must not be empty")]
    EmptyTableName,

    #[error("{0} column name must not be empty")]
    EmptyColumn(&'static str),

    #[error("id and data columns must differ, both are `{0}`")]
    SameColumns(String),

    #[error("either a key prefix or an application id must be set")]
    MissingPrefix,
}

/// Validated settings of a [`TableSessionStore`](crate::TableSessionStore).
///
/// A `SessionConfig` can only be obtained through [`SessionConfigBuilder::build`]
/// or by deserializing it, which runs the same validation.
///
/// # Example
///
/// ```rust
/// use sessiontable::SessionConfig;
///
/// let config = SessionConfig::builder("sessions")
///     .app_id("storefront")
///     .build()
///     .unwrap();
///
/// assert_eq!(config.id_column(), "ID");
/// assert_eq!(config.data_column(), "Data");
/// assert_eq!(config.key_prefix().as_str().len(), 5);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "SessionConfigBuilder")]
pub struct SessionConfig {
    table_name: String,
    id_column: String,
    data_column: String,
    key_prefix: KeyPrefix,
}

impl SessionConfig {
    /// Starts a builder targeting `table_name`.
    pub fn builder(table_name: impl Into<String>) -> SessionConfigBuilder {
        SessionConfigBuilder::new(table_name)
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    pub fn data_column(&self) -> &str {
        &self.data_column
    }

    /// The effective prefix, either configured or derived from the app id.
    pub fn key_prefix(&self) -> &KeyPrefix {
        &self.key_prefix
    }
}

/// A builder for [`SessionConfig`].
///
/// The key prefix defaults to one derived from the application id. Setting
/// both makes the explicit prefix win.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfigBuilder {
    table_name: String,
    id_column: String,
    data_column: String,
    key_prefix: Option<String>,
    app_id: Option<String>,
}

impl Default for SessionConfigBuilder {
    fn default() -> Self {
        Self {
            table_name: String::new(),
            id_column: DEFAULT_ID_COLUMN.to_string(),
            data_column: DEFAULT_DATA_COLUMN.to_string(),
            key_prefix: None,
            app_id: None,
        }
    }
}

impl SessionConfigBuilder {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            ..Self::default()
        }
    }

    /// Sets the attribute holding the session key. Defaults to `ID`.
    pub fn id_column(mut self, id_column: impl Into<String>) -> Self {
        self.id_column = id_column.into();
        self
    }

    /// Sets the attribute holding the session payload. Defaults to `Data`.
    pub fn data_column(mut self, data_column: impl Into<String>) -> Self {
        self.data_column = data_column.into();
        self
    }

    /// Sets an explicit key prefix. An empty prefix is allowed.
    pub fn key_prefix(mut self, key_prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(key_prefix.into());
        self
    }

    /// Sets the application id the default key prefix is derived from.
    pub fn app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    pub fn build(self) -> Result<SessionConfig, ConfigError> {
        if self.table_name.trim().is_empty() {
            return Err(ConfigError::EmptyTableName);
        }
        if self.id_column.is_empty() {
            return Err(ConfigError::EmptyColumn("id"));
        }
        if self.data_column.is_empty() {
            return Err(ConfigError::EmptyColumn("data"));
        }
        if self.id_column == self.data_column {
            return Err(ConfigError::SameColumns(self.id_column));
        }

        let key_prefix = match (self.key_prefix, self.app_id) {
            (Some(prefix), _) => KeyPrefix::new(prefix),
            (None, Some(app_id)) => KeyPrefix::derive(&app_id),
            (None, None) => return Err(ConfigError::MissingPrefix),
        };

        Ok(SessionConfig {
            table_name: self.table_name,
            id_column: self.id_column,
            data_column: self.data_column,
            key_prefix,
        })
    }
}

impl TryFrom<SessionConfigBuilder> for SessionConfig {
    type Error = ConfigError;

    fn try_from(builder: SessionConfigBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}
