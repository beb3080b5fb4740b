//! Adaptation engine configuration.

use serde::{Deserialize, Serialize};

use crate::utilities::errors::{AffectError, AffectResult};

/// Settings for [`PersonalityAdaptationEngine`](super::PersonalityAdaptationEngine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptationConfig {
    /// When false, `analyze_personality` returns the profile untouched.
    #[serde(default = "default_true")]
    pub dynamic_evolution: bool,

    /// Scale applied to every trait drift term.
    #[serde(default = "default_temporal_adaptation_factor")]
    pub temporal_adaptation_factor: f64,

    /// Interaction count at which the profile counts as fully calibrated.
    #[serde(default = "default_calibration_interactions")]
    pub calibration_interactions: u64,

    /// Trait deltas above this are reported as changes.
    #[serde(default = "default_change_threshold")]
    pub change_threshold: f64,

    /// Cap on the retained interaction history per subject. `None` keeps everything.
    #[serde(default)]
    pub max_history_len: Option<usize>,
}

fn default_true() -> bool {
    true
}

fn default_temporal_adaptation_factor() -> f64 {
    0.1
}

fn default_calibration_interactions() -> u64 {
    20
}

fn default_change_threshold() -> f64 {
    0.05
}

impl Default for AdaptationConfig {
    fn default() -> Self {
        Self {
            dynamic_evolution: true,
            temporal_adaptation_factor: default_temporal_adaptation_factor(),
            calibration_interactions: default_calibration_interactions(),
            change_threshold: default_change_threshold(),
            max_history_len: None,
        }
    }
}

impl AdaptationConfig {
    pub fn validate(&self) -> AffectResult<()> {
        if !(0.0..=1.0).contains(&self.temporal_adaptation_factor) {
            return Err(AffectError::config(format!(
                "temporal_adaptation_factor must be in [0, 1], got {}",
                self.temporal_adaptation_factor
            )));
        }
        if self.calibration_interactions == 0 {
            return Err(AffectError::config("calibration_interactions must be >= 1"));
        }
        if self.change_threshold.is_nan() || self.change_threshold < 0.0 {
            return Err(AffectError::config(format!(
                "change_threshold must be >= 0, got {}",
                self.change_threshold
            )));
        }
        if self.max_history_len == Some(0) {
            return Err(AffectError::config("max_history_len must be >= 1 when set"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = AdaptationConfig::default();
        assert!(c.dynamic_evolution);
        assert_eq!(c.temporal_adaptation_factor, 0.1);
        assert_eq!(c.calibration_interactions, 20);
        assert!(c.max_history_len.is_none());
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_invalid_values() {
        let bad = [
            AdaptationConfig {
                temporal_adaptation_factor: -0.1,
                ..Default::default()
            },
            AdaptationConfig {
                calibration_interactions: 0,
                ..Default::default()
            },
            AdaptationConfig {
                change_threshold: f64::NAN,
                ..Default::default()
            },
            AdaptationConfig {
                max_history_len: Some(0),
                ..Default::default()
            },
        ];
        for c in bad {
            assert!(c.validate().is_err(), "{:?}", c);
        }
    }

    #[test]
    fn test_yaml_defaults_dynamic_evolution() {
        let c: AdaptationConfig = serde_yaml::from_str("temporal_adaptation_factor: 0.2\n").unwrap();
        assert!(c.dynamic_evolution);
        assert_eq!(c.temporal_adaptation_factor, 0.2);
    }
}
