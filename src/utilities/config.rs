//! Top-level configuration, loadable from YAML.
//!
//! ```yaml
//! detector:
//!   min_frequency: 1
//! adaptation:
//!   temporal_adaptation_factor: 0.2
//!   max_history_len: 500
//! ```
//!
//! Missing sections and keys fall back to their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::patterns::PatternDetectorConfig;
use crate::personality::AdaptationConfig;
use crate::utilities::errors::AffectResult;

/// Configuration for the detector and the adaptation engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodaConfig {
    pub detector: PatternDetectorConfig,
    pub adaptation: AdaptationConfig,
}

impl CodaConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml(yaml: &str) -> AffectResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> AffectResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn validate(&self) -> AffectResult<()> {
        self.detector.validate()?;
        self.adaptation.validate()
    }

    pub fn to_yaml(&self) -> AffectResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utilities::errors::AffectError;
    use std::io::Write;

    #[test]
    fn test_empty_document_gives_defaults() {
        let c = CodaConfig::from_yaml("{}").unwrap();
        assert_eq!(c, CodaConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let c = CodaConfig::from_yaml(
            "detector:\n  min_frequency: 1\nadaptation:\n  max_history_len: 500\n",
        )
        .unwrap();
        assert_eq!(c.detector.min_frequency, 1);
        assert_eq!(c.detector.min_sequence_length, 3);
        assert_eq!(c.adaptation.max_history_len, Some(500));
        assert_eq!(c.adaptation.temporal_adaptation_factor, 0.1);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = CodaConfig::from_yaml("detector:\n  min_frequency: 0\n").unwrap_err();
        assert!(matches!(err, AffectError::InvalidConfig(_)));
    }

    #[test]
    fn test_malformed_yaml() {
        let err = CodaConfig::from_yaml("detector: [unclosed").unwrap_err();
        assert!(matches!(err, AffectError::Yaml(_)));
    }

    #[test]
    fn test_from_file_roundtrip() {
        let mut config = CodaConfig::default();
        config.adaptation.dynamic_evolution = false;
        config.detector.analysis_window_ms = 60_000;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(config.to_yaml().unwrap().as_bytes()).unwrap();

        let loaded = CodaConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = CodaConfig::from_yaml_file("/nonexistent/coda.yaml").unwrap_err();
        assert!(matches!(err, AffectError::Io(_)));
    }
}
