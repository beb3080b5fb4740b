//! Personality profile: Big Five traits plus learning preferences.
//!
//! One profile exists per subject. It is created from fixed defaults merged
//! with optional overrides and afterwards only mutated by the
//! [`PersonalityAdaptationEngine`](super::PersonalityAdaptationEngine).

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Traits
// ============================================================================

/// The five Big Five dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trait {
    Openness,
    Conscientiousness,
    Extraversion,
    Agreeableness,
    Neuroticism,
}

impl Trait {
    pub const ALL: [Trait; 5] = [
        Self::Openness,
        Self::Conscientiousness,
        Self::Extraversion,
        Self::Agreeableness,
        Self::Neuroticism,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Openness => "openness",
            Self::Conscientiousness => "conscientiousness",
            Self::Extraversion => "extraversion",
            Self::Agreeableness => "agreeableness",
            Self::Neuroticism => "neuroticism",
        }
    }
}

impl fmt::Display for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Big Five trait vector, every value in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BigFiveTraits {
    pub openness: f64,
    pub conscientiousness: f64,
    pub extraversion: f64,
    pub agreeableness: f64,
    pub neuroticism: f64,
}

impl Default for BigFiveTraits {
    fn default() -> Self {
        Self {
            openness: 0.6,
            conscientiousness: 0.5,
            extraversion: 0.5,
            agreeableness: 0.7,
            neuroticism: 0.4,
        }
    }
}

impl BigFiveTraits {
    pub fn get(&self, t: Trait) -> f64 {
        match t {
            Trait::Openness => self.openness,
            Trait::Conscientiousness => self.conscientiousness,
            Trait::Extraversion => self.extraversion,
            Trait::Agreeableness => self.agreeableness,
            Trait::Neuroticism => self.neuroticism,
        }
    }

    /// Set a trait, clamping to `[0, 1]`.
    pub fn set(&mut self, t: Trait, value: f64) {
        let value = clamp_unit(value);
        match t {
            Trait::Openness => self.openness = value,
            Trait::Conscientiousness => self.conscientiousness = value,
            Trait::Extraversion => self.extraversion = value,
            Trait::Agreeableness => self.agreeableness = value,
            Trait::Neuroticism => self.neuroticism = value,
        }
    }

    /// Add `delta` to a trait, clamping the result.
    pub fn shift(&mut self, t: Trait, delta: f64) {
        self.set(t, self.get(t) + delta);
    }

    /// Values in [`Trait::ALL`] order.
    pub fn values(&self) -> [f64; 5] {
        Trait::ALL.map(|t| self.get(t))
    }

    pub fn is_finite(&self) -> bool {
        self.values().iter().all(|v| v.is_finite())
    }
}

// ============================================================================
// Closed vocabularies
// ============================================================================

/// Preferred way of taking in new material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningStyle {
    Visual,
    Kinesthetic,
    Spatial,
    Analytical,
    Intuitive,
    Social,
    Independent,
}

impl LearningStyle {
    pub const ALL: [LearningStyle; 7] = [
        Self::Visual,
        Self::Kinesthetic,
        Self::Spatial,
        Self::Analytical,
        Self::Intuitive,
        Self::Social,
        Self::Independent,
    ];

    /// Style to switch to when the current one is clearly not working.
    pub fn substitute(&self) -> LearningStyle {
        match self {
            Self::Visual => Self::Kinesthetic,
            Self::Kinesthetic => Self::Visual,
            Self::Spatial => Self::Analytical,
            Self::Analytical => Self::Intuitive,
            Self::Intuitive => Self::Social,
            Self::Social => Self::Independent,
            Self::Independent => Self::Social,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Visual => "visual",
            Self::Kinesthetic => "kinesthetic",
            Self::Spatial => "spatial",
            Self::Analytical => "analytical",
            Self::Intuitive => "intuitive",
            Self::Social => "social",
            Self::Independent => "independent",
        }
    }
}

impl fmt::Display for LearningStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What keeps a learner going.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotivationFactor {
    Achievement,
    Mastery,
    SocialRecognition,
    Autonomy,
    Curiosity,
    Competition,
    Collaboration,
    CulturalConnection,
    PersonalGrowth,
    HelpingOthers,
}

/// Family and community context of the learner relative to LSF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CulturalBackground {
    HearingFamily,
    DeafFamily,
    MixedFamily,
    DeafCommunity,
    HearingCommunity,
    International,
}

/// Tone the learner responds best to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackStyle {
    Encouraging,
    Direct,
    Detailed,
    Visual,
    Gentle,
    Challenging,
    Collaborative,
}

// ============================================================================
// Profile
// ============================================================================

/// Bookkeeping updated on every adaptation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileMetadata {
    /// Confidence in the profile, `[0, 1]`. Grows by 0.1 per adaptation.
    pub confidence: f64,
    pub interaction_count: u64,
    pub last_update: DateTime<Utc>,
}

/// Personality of one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalityProfile {
    pub id: String,
    pub subject_id: String,
    pub traits: BigFiveTraits,
    pub learning_style: LearningStyle,
    pub motivation_factors: BTreeSet<MotivationFactor>,
    pub stress_threshold: f64,
    pub adaptability_score: f64,
    pub cultural_background: CulturalBackground,
    pub preferred_feedback_style: FeedbackStyle,
    pub metadata: ProfileMetadata,
}

/// Optional field overrides for [`PersonalityProfile::initial`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileOverrides {
    pub openness: Option<f64>,
    pub conscientiousness: Option<f64>,
    pub extraversion: Option<f64>,
    pub agreeableness: Option<f64>,
    pub neuroticism: Option<f64>,
    pub learning_style: Option<LearningStyle>,
    pub motivation_factors: Option<BTreeSet<MotivationFactor>>,
    pub stress_threshold: Option<f64>,
    pub adaptability_score: Option<f64>,
    pub cultural_background: Option<CulturalBackground>,
    pub preferred_feedback_style: Option<FeedbackStyle>,
}

impl ProfileOverrides {
    fn trait_override(&self, t: Trait) -> Option<f64> {
        match t {
            Trait::Openness => self.openness,
            Trait::Conscientiousness => self.conscientiousness,
            Trait::Extraversion => self.extraversion,
            Trait::Agreeableness => self.agreeableness,
            Trait::Neuroticism => self.neuroticism,
        }
    }
}

impl PersonalityProfile {
    /// Build the starting profile for a subject: defaults merged with `overrides`.
    ///
    /// Numeric overrides are clamped to `[0, 1]`.
    pub fn initial(subject_id: &str, overrides: Option<&ProfileOverrides>) -> Self {
        let mut profile = Self {
            id: profile_id(subject_id),
            subject_id: subject_id.to_string(),
            traits: BigFiveTraits::default(),
            learning_style: LearningStyle::Visual,
            motivation_factors: [MotivationFactor::Achievement, MotivationFactor::Mastery]
                .into_iter()
                .collect(),
            stress_threshold: 0.7,
            adaptability_score: 0.6,
            cultural_background: CulturalBackground::HearingFamily,
            preferred_feedback_style: FeedbackStyle::Encouraging,
            metadata: ProfileMetadata {
                confidence: 0.5,
                interaction_count: 0,
                last_update: Utc::now(),
            },
        };

        let Some(o) = overrides else {
            return profile;
        };
        for t in Trait::ALL {
            if let Some(v) = o.trait_override(t) {
                profile.traits.set(t, v);
            }
        }
        if let Some(style) = o.learning_style {
            profile.learning_style = style;
        }
        if let Some(factors) = &o.motivation_factors {
            profile.motivation_factors = factors.clone();
        }
        if let Some(v) = o.stress_threshold {
            profile.stress_threshold = clamp_unit(v);
        }
        if let Some(v) = o.adaptability_score {
            profile.adaptability_score = clamp_unit(v);
        }
        if let Some(bg) = o.cultural_background {
            profile.cultural_background = bg;
        }
        if let Some(fb) = o.preferred_feedback_style {
            profile.preferred_feedback_style = fb;
        }
        profile
    }

    /// Key under which the profile and its interaction history are stored.
    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }
}

/// Identifier of the profile belonging to `subject_id`.
pub fn profile_id(subject_id: &str) -> String {
    format!("personality_{}", subject_id)
}

pub(crate) fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_defaults() {
        let p = PersonalityProfile::initial("student-7", None);
        assert_eq!(p.id, "personality_student-7");
        assert_eq!(p.subject_id(), "student-7");
        assert_eq!(p.traits.values(), [0.6, 0.5, 0.5, 0.7, 0.4]);
        assert_eq!(p.learning_style, LearningStyle::Visual);
        assert!(p.motivation_factors.contains(&MotivationFactor::Achievement));
        assert!(p.motivation_factors.contains(&MotivationFactor::Mastery));
        assert_eq!(p.motivation_factors.len(), 2);
        assert_eq!(p.stress_threshold, 0.7);
        assert_eq!(p.metadata.confidence, 0.5);
        assert_eq!(p.metadata.interaction_count, 0);
    }

    #[test]
    fn test_overrides_merge_and_clamp() {
        let overrides = ProfileOverrides {
            neuroticism: Some(1.4),
            extraversion: Some(0.2),
            learning_style: Some(LearningStyle::Spatial),
            cultural_background: Some(CulturalBackground::DeafFamily),
            ..Default::default()
        };
        let p = PersonalityProfile::initial("s", Some(&overrides));
        assert_eq!(p.traits.neuroticism, 1.0);
        assert_eq!(p.traits.extraversion, 0.2);
        assert_eq!(p.traits.openness, 0.6);
        assert_eq!(p.learning_style, LearningStyle::Spatial);
        assert_eq!(p.cultural_background, CulturalBackground::DeafFamily);
    }

    #[test]
    fn test_substitution_table() {
        use LearningStyle::*;
        assert_eq!(Visual.substitute(), Kinesthetic);
        assert_eq!(Kinesthetic.substitute(), Visual);
        assert_eq!(Spatial.substitute(), Analytical);
        assert_eq!(Analytical.substitute(), Intuitive);
        assert_eq!(Intuitive.substitute(), Social);
        assert_eq!(Social.substitute(), Independent);
        assert_eq!(Independent.substitute(), Social);
        for style in LearningStyle::ALL {
            assert_ne!(style.substitute(), style);
        }
    }

    #[test]
    fn test_shift_clamps() {
        let mut t = BigFiveTraits::default();
        t.shift(Trait::Neuroticism, 5.0);
        t.shift(Trait::Openness, -5.0);
        assert_eq!(t.neuroticism, 1.0);
        assert_eq!(t.openness, 0.0);
    }

    #[test]
    fn test_profile_yaml_roundtrip() {
        let p = PersonalityProfile::initial("s-1", None);
        let yaml = serde_yaml::to_string(&p).unwrap();
        assert!(yaml.contains("learning_style: visual"));
        let back: PersonalityProfile = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn test_overrides_from_partial_yaml() {
        let o: ProfileOverrides =
            serde_yaml::from_str("openness: 0.9\nmotivation_factors: [curiosity]\n").unwrap();
        let p = PersonalityProfile::initial("s", Some(&o));
        assert_eq!(p.traits.openness, 0.9);
        assert_eq!(
            p.motivation_factors.into_iter().collect::<Vec<_>>(),
            vec![MotivationFactor::Curiosity]
        );
    }
}
