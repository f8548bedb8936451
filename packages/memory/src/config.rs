//! Configuration for [`crate::MemoryDatabase`].

use serde::Deserialize;
use thiserror::Error;

use pathdb_core::ClientError;

/// Retry budget used by realtime database transactions.
pub const DEFAULT_MAX_TRANSACTION_RETRIES: u32 = 25;

/// Errors building a database from configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid initial data: {0}")]
    InitialData(#[from] ClientError),
}

/// Settings for an in-memory database.
///
/// Every field has a default, so `{}` is a valid configuration:
///
/// ```rust
/// use pathdb_memory::MemoryConfig;
///
/// let config = MemoryConfig::from_json_str(r#"{ "max_transaction_retries": 5 }"#).unwrap();
/// assert_eq!(config.max_transaction_retries, 5);
/// assert!(config.initial_data.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MemoryConfig {
    /// How many times a transaction's update function may run before the
    /// transaction fails with [`ClientError::MaxRetries`]. Zero is treated
    /// as one.
    pub max_transaction_retries: u32,

    /// Tree to seed the database with. Integers must fit in an `i64`.
    pub initial_data: Option<serde_json::Value>,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_transaction_retries: DEFAULT_MAX_TRANSACTION_RETRIES,
            initial_data: None,
        }
    }
}

impl MemoryConfig {
    /// Parse a JSON configuration document.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// The retry budget, never less than one attempt.
    pub fn attempts(&self) -> u32 {
        self.max_transaction_retries.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = MemoryConfig::from_json_str("{}").unwrap();
        assert_eq!(config, MemoryConfig::default());
        assert_eq!(config.attempts(), DEFAULT_MAX_TRANSACTION_RETRIES);
    }

    #[test]
    fn initial_data_is_kept_verbatim() {
        let config =
            MemoryConfig::from_json_str(r#"{ "initial_data": { "foo": "data" } }"#).unwrap();
        assert_eq!(
            config.initial_data,
            Some(serde_json::json!({ "foo": "data" }))
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = MemoryConfig::from_json_str(r#"{ "max_retries": 3 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_retries_still_allows_one_attempt() {
        let config = MemoryConfig {
            max_transaction_retries: 0,
            ..MemoryConfig::default()
        };
        assert_eq!(config.attempts(), 1);
    }
}
