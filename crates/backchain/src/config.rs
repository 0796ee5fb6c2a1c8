//! Engine configuration types.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default ceiling on nested proof frames
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// Configuration for the proof engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of nested proof frames allowed. A goal entered at depth
    /// `max_depth` or deeper fails with a depth-exceeded trace entry.
    pub max_depth: usize,
    /// Drop solutions whose query-variable bindings repeat an earlier one
    pub deduplicate: bool,
    /// Record the human-readable search trace
    pub record_trace: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            deduplicate: true,
            record_trace: true,
        }
    }
}

impl EngineConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_deduplicate(mut self, deduplicate: bool) -> Self {
        self.deduplicate = deduplicate;
        self
    }

    pub fn with_record_trace(mut self, record_trace: bool) -> Self {
        self.record_trace = record_trace;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(Error::InvalidConfig(
                "max_depth must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_depth, 1000);
        assert!(config.deduplicate);
        assert!(config.record_trace);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config = EngineConfig::from_json_str(r#"{ "max_depth": 25 }"#).unwrap();
        assert_eq!(config.max_depth, 25);
        assert!(config.deduplicate);
    }

    #[test]
    fn test_zero_depth_rejected() {
        assert!(matches!(
            EngineConfig::from_json_str(r#"{ "max_depth": 0 }"#),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            EngineConfig::from_json_str("{ max_depth"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            EngineConfig::from_file("/nonexistent/backchain.json"),
            Err(Error::Io(_))
        ));
    }
}
