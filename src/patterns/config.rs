//! Pattern detector configuration.

use serde::{Deserialize, Serialize};

use crate::utilities::errors::{AffectError, AffectResult};

/// Tuning knobs for [`EmotionalPatternDetector`](super::EmotionalPatternDetector).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternDetectorConfig {
    /// Shorter histories yield an empty result. Also the minimum plateau run.
    #[serde(default = "default_min_sequence_length")]
    pub min_sequence_length: usize,

    /// Splits emitted patterns into validated / rejected in the statistics.
    /// Does not filter the returned list.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,

    /// Span (ms) used by `analyze_log` to select the recent part of a log.
    #[serde(default = "default_analysis_window_ms")]
    pub analysis_window_ms: u64,

    /// Minimum match count before a pattern is reported.
    #[serde(default = "default_min_frequency")]
    pub min_frequency: usize,
}

fn default_min_sequence_length() -> usize {
    3
}

fn default_min_confidence() -> f64 {
    0.6
}

fn default_analysis_window_ms() -> u64 {
    300_000
}

fn default_min_frequency() -> usize {
    2
}

impl Default for PatternDetectorConfig {
    fn default() -> Self {
        Self {
            min_sequence_length: default_min_sequence_length(),
            min_confidence: default_min_confidence(),
            analysis_window_ms: default_analysis_window_ms(),
            min_frequency: default_min_frequency(),
        }
    }
}

impl PatternDetectorConfig {
    /// Reject configurations the detector cannot run with.
    pub fn validate(&self) -> AffectResult<()> {
        if self.min_sequence_length == 0 {
            return Err(AffectError::config("min_sequence_length must be >= 1"));
        }
        if self.min_frequency == 0 {
            return Err(AffectError::config("min_frequency must be >= 1"));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(AffectError::config(format!(
                "min_confidence must be in [0, 1], got {}",
                self.min_confidence
            )));
        }
        if self.analysis_window_ms == 0 {
            return Err(AffectError::config("analysis_window_ms must be > 0"));
        }
        Ok(())
    }

    /// `analysis_window_ms` as a chrono duration.
    pub fn analysis_window(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(i64::try_from(self.analysis_window_ms).unwrap_or(i64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let c = PatternDetectorConfig::default();
        assert_eq!(c.min_sequence_length, 3);
        assert_eq!(c.min_frequency, 2);
        assert!((c.min_confidence - 0.6).abs() < f64::EPSILON);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_zero_min_frequency_rejected() {
        let c = PatternDetectorConfig {
            min_frequency: 0,
            ..Default::default()
        };
        assert!(matches!(c.validate(), Err(AffectError::InvalidConfig(_))));
    }

    #[test]
    fn test_out_of_range_confidence_rejected() {
        let c = PatternDetectorConfig {
            min_confidence: 1.5,
            ..Default::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let c: PatternDetectorConfig = serde_yaml::from_str("min_frequency: 1\n").unwrap();
        assert_eq!(c.min_frequency, 1);
        assert_eq!(c.min_sequence_length, 3);
        assert_eq!(c.analysis_window_ms, 300_000);
    }
}
