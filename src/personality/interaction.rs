//! Interaction records and their aggregate statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::profile::clamp_unit;

/// One recorded learning interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionData {
    pub performance: f64,
    #[serde(rename = "timeSpent")]
    pub time_spent_ms: u64,
    pub frustration_level: f64,
    pub engagement_level: f64,
    #[serde(default)]
    pub expressed_preferences: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl InteractionData {
    /// Create a record, clamping the `[0, 1]` fields.
    pub fn new(
        performance: f64,
        time_spent_ms: u64,
        frustration_level: f64,
        engagement_level: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            performance: clamp_unit(performance),
            time_spent_ms,
            frustration_level: clamp_unit(frustration_level),
            engagement_level: clamp_unit(engagement_level),
            expressed_preferences: Vec::new(),
            timestamp,
        }
    }

    pub fn with_preferences<I, S>(mut self, prefs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expressed_preferences = prefs.into_iter().map(Into::into).collect();
        self
    }
}

/// Aggregates over a subject's full interaction history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionPatterns {
    pub sample_count: usize,
    pub mean_performance: f64,
    pub mean_frustration: f64,
    pub mean_engagement: f64,
    pub mean_time_spent_ms: f64,
    /// `1 - stddev(performance)`, floored at 0.
    pub performance_stability: f64,
}

impl InteractionPatterns {
    /// Aggregate a history. `None` when it is empty.
    pub fn from_history(history: &[InteractionData]) -> Option<Self> {
        if history.is_empty() {
            return None;
        }
        let n = history.len() as f64;
        let mean = |f: fn(&InteractionData) -> f64| history.iter().map(f).sum::<f64>() / n;

        let mean_performance = mean(|i| i.performance);
        let variance = history
            .iter()
            .map(|i| (i.performance - mean_performance).powi(2))
            .sum::<f64>()
            / n;

        Some(Self {
            sample_count: history.len(),
            mean_performance,
            mean_frustration: mean(|i| i.frustration_level),
            mean_engagement: mean(|i| i.engagement_level),
            mean_time_spent_ms: mean(|i| i.time_spent_ms as f64),
            performance_stability: (1.0 - variance.sqrt()).max(0.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        performance: f64,
        time_spent_ms: u64,
        frustration: f64,
        engagement: f64,
    ) -> InteractionData {
        InteractionData::new(
            performance,
            time_spent_ms,
            frustration,
            engagement,
            Utc::now(),
        )
    }

    #[test]
    fn test_empty_history_has_no_patterns() {
        assert!(InteractionPatterns::from_history(&[]).is_none());
    }

    #[test]
    fn test_means_and_stability() {
        let history = vec![
            record(0.2, 100_000, 0.8, 0.4),
            record(0.6, 200_000, 0.6, 0.6),
        ];
        let p = InteractionPatterns::from_history(&history).unwrap();
        assert_eq!(p.sample_count, 2);
        assert!((p.mean_performance - 0.4).abs() < 1e-12);
        assert!((p.mean_frustration - 0.7).abs() < 1e-12);
        assert!((p.mean_engagement - 0.5).abs() < 1e-12);
        assert!((p.mean_time_spent_ms - 150_000.0).abs() < 1e-9);
        // stddev 0.2
        assert!((p.performance_stability - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_constant_performance_is_fully_stable() {
        let history = vec![record(0.5, 0, 0.5, 0.5); 5];
        let p = InteractionPatterns::from_history(&history).unwrap();
        assert_eq!(p.performance_stability, 1.0);
    }

    #[test]
    fn test_new_clamps_fields() {
        let r = record(1.3, 10, -0.5, 2.0);
        assert_eq!(r.performance, 1.0);
        assert_eq!(r.frustration_level, 0.0);
        assert_eq!(r.engagement_level, 1.0);
    }

    #[test]
    fn test_json_field_names() {
        let r = record(0.5, 42, 0.1, 0.9).with_preferences(["videos", "pairs"]);
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["timeSpent"], 42);
        assert_eq!(v["frustrationLevel"], 0.1);
        assert_eq!(v["expressedPreferences"][1], "pairs");
    }
}
