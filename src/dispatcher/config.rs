//! Dispatcher configuration

use serde::{Deserialize, Serialize};

use crate::error::DispatchError;

/// Dispatcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Max concurrently running worker invocations
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    1
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self { limit: 1 }
    }
}

impl DispatcherConfig {
    /// Create a config with the given concurrency limit
    pub fn with_limit(limit: usize) -> Self {
        Self { limit }
    }

    /// Reject invalid configurations at the construction boundary
    pub fn validate(&self) -> Result<(), DispatchError> {
        if self.limit == 0 {
            return Err(DispatchError::InvalidLimit(self.limit));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DispatcherConfig::default();
        assert_eq!(config.limit, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_limit_rejected() {
        let config = DispatcherConfig::with_limit(0);
        assert!(matches!(config.validate(), Err(DispatchError::InvalidLimit(0))));
    }

    #[test]
    fn test_limit_defaults_when_missing() {
        let config: DispatcherConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.limit, 1);
    }

    #[test]
    fn test_limit_deserialized() {
        let config: DispatcherConfig = serde_json::from_str(r#"{"limit": 4}"#).unwrap();
        assert_eq!(config.limit, 4);
    }
}
