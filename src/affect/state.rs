//! Emotion vocabulary (Plutchik's eight primaries) and single observations.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Emotion
// ============================================================================

/// The eight primary emotions of Plutchik's wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Joy,
    Sadness,
    Anger,
    Fear,
    Surprise,
    Disgust,
    Trust,
    Anticipation,
}

impl Emotion {
    /// All eight emotions in canonical order.
    pub const ALL: [Emotion; 8] = [
        Self::Joy,
        Self::Sadness,
        Self::Anger,
        Self::Fear,
        Self::Surprise,
        Self::Disgust,
        Self::Trust,
        Self::Anticipation,
    ];

    /// Lowercase label, identical to the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Joy => "joy",
            Self::Sadness => "sadness",
            Self::Anger => "anger",
            Self::Fear => "fear",
            Self::Surprise => "surprise",
            Self::Disgust => "disgust",
            Self::Trust => "trust",
            Self::Anticipation => "anticipation",
        }
    }

    /// Whether the emotion sits on the positive side of the wheel.
    pub fn is_positive(&self) -> bool {
        matches!(self, Self::Joy | Self::Trust | Self::Anticipation)
    }

    /// Low-activation emotions that, at low intensity, indicate a plateau.
    pub fn is_neutral(&self) -> bool {
        matches!(self, Self::Anticipation | Self::Trust)
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// EmotionalState
// ============================================================================

/// One observation of a student's emotional state.
///
/// Numeric fields are clamped on construction:
/// - `intensity` and `arousal` to `[0, 1]`
/// - `valence` to `[-1, 1]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionalState {
    pub primary_emotion: Emotion,
    pub intensity: f64,
    pub valence: f64,
    pub arousal: f64,
    /// Opaque identifier of whatever caused the state (exercise id, event name...).
    pub trigger: String,
    pub timestamp: DateTime<Utc>,
}

impl EmotionalState {
    /// Create a state, clamping every numeric field to its range.
    pub fn new(
        primary_emotion: Emotion,
        intensity: f64,
        valence: f64,
        arousal: f64,
        trigger: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            primary_emotion,
            intensity: clamp_unit(intensity),
            valence: clamp_signed(valence),
            arousal: clamp_unit(arousal),
            trigger: trigger.into(),
            timestamp,
        }
    }

    /// Re-apply range clamping, e.g. after deserialising untrusted input.
    pub fn clamped(self) -> Self {
        Self::new(
            self.primary_emotion,
            self.intensity,
            self.valence,
            self.arousal,
            self.trigger,
            self.timestamp,
        )
    }
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

fn clamp_signed(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(-1.0, 1.0)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_ranges() {
        let s = EmotionalState::new(Emotion::Joy, 1.7, -3.0, -0.2, "quiz-1", Utc::now());
        assert_eq!(s.intensity, 1.0);
        assert_eq!(s.valence, -1.0);
        assert_eq!(s.arousal, 0.0);
    }

    #[test]
    fn test_nan_is_clamped_to_zero() {
        let s = EmotionalState::new(Emotion::Fear, f64::NAN, f64::NAN, 0.5, "t", Utc::now());
        assert_eq!(s.intensity, 0.0);
        assert_eq!(s.valence, 0.0);
    }

    #[test]
    fn test_emotion_serde_snake_case() {
        let json = serde_json::to_string(&Emotion::Anticipation).unwrap();
        assert_eq!(json, "\"anticipation\"");
        let e: Emotion = serde_json::from_str("\"disgust\"").unwrap();
        assert_eq!(e, Emotion::Disgust);
    }

    #[test]
    fn test_state_json_uses_camel_case() {
        let s = EmotionalState::new(Emotion::Trust, 0.4, 0.2, 0.3, "greeting", Utc::now());
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["primaryEmotion"], "trust");
        assert!(v.get("trigger").is_some());
    }

    #[test]
    fn test_neutral_and_positive_sets() {
        let neutral: Vec<_> = Emotion::ALL.iter().filter(|e| e.is_neutral()).collect();
        assert_eq!(neutral, vec![&Emotion::Trust, &Emotion::Anticipation]);
        assert!(Emotion::Joy.is_positive());
        assert!(!Emotion::Disgust.is_positive());
    }

    #[test]
    fn test_clamped_repairs_deserialized_values() {
        let raw = r#"{"primaryEmotion":"joy","intensity":4.0,"valence":2.0,"arousal":0.5,
                     "trigger":"x","timestamp":"2024-01-01T00:00:00Z"}"#;
        let s: EmotionalState = serde_json::from_str(raw).unwrap();
        let s = s.clamped();
        assert_eq!(s.intensity, 1.0);
        assert_eq!(s.valence, 1.0);
    }
}
