//! Pattern analysis output types.

use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::affect::Emotion;

/// Families of recurring emotional trajectories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    /// Confusion resolved into success: negative start, positive end.
    LearningCycle,
    /// Escalating negative emotions with rising intensity.
    FrustrationSpiral,
    /// Negative-to-positive sequences with a clear valence gain.
    ConfidenceBuild,
    /// Surprise immediately followed by intense joy.
    Breakthrough,
    /// Long runs of low-intensity neutral states.
    PlateauStagnation,
    /// Deep negative valence recovering to strongly positive.
    RecoveryBounce,
}

impl PatternType {
    pub const ALL: [PatternType; 6] = [
        Self::LearningCycle,
        Self::FrustrationSpiral,
        Self::ConfidenceBuild,
        Self::Breakthrough,
        Self::PlateauStagnation,
        Self::RecoveryBounce,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LearningCycle => "learning_cycle",
            Self::FrustrationSpiral => "frustration_spiral",
            Self::ConfidenceBuild => "confidence_build",
            Self::Breakthrough => "breakthrough",
            Self::PlateauStagnation => "plateau_stagnation",
            Self::RecoveryBounce => "recovery_bounce",
        }
    }
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A regularity found in one analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalPattern {
    #[serde(rename = "type")]
    pub pattern_type: PatternType,
    /// Emotion sequence defining the matched template (or plateau run).
    pub sequence: Vec<Emotion>,
    /// Number of matches found.
    pub frequency: usize,
    /// Triggers collected from the matching windows.
    pub triggers: BTreeSet<String>,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
}

/// Descriptive counters; they never affect which patterns are returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternStatistics {
    pub total_states: usize,
    /// Distinct emotion sequences among the emitted patterns.
    pub distinct_sequences: usize,
    /// Patterns with confidence >= `min_confidence`.
    pub validated_patterns: usize,
    pub rejected_patterns: usize,
}

/// Output of [`EmotionalPatternDetector::analyze_patterns`](super::EmotionalPatternDetector::analyze_patterns).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternAnalysisResult {
    pub patterns: Vec<EmotionalPattern>,
    /// Mean confidence of all emitted patterns, 0 when none.
    pub overall_confidence: f64,
    pub analysis_time: Duration,
    pub statistics: PatternStatistics,
}

impl PatternAnalysisResult {
    /// Empty result for histories too short to analyse.
    pub fn empty(total_states: usize) -> Self {
        Self {
            statistics: PatternStatistics {
                total_states,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Patterns of one family.
    pub fn of_type(&self, pattern_type: PatternType) -> impl Iterator<Item = &EmotionalPattern> {
        self.patterns
            .iter()
            .filter(move |p| p.pattern_type == pattern_type)
    }
}
