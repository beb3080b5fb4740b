//! Personality adaptation engine: evolve a subject's profile from
//! aggregated interaction statistics.
//!
//! One call to [`PersonalityAdaptationEngine::analyze_personality`]:
//!
//! 1. aggregates the stored history plus the new batch ([`InteractionPatterns`])
//! 2. drifts neuroticism, conscientiousness and openness by
//!    `temporal_adaptation_factor`
//! 3. proposes a learning-style switch on low performance + high frustration
//! 4. commits the updated profile and the batch through the store
//! 5. reports changes, recommendations and an analysis confidence
//!
//! Nothing is written before step 4, so a failed call leaves the store as it was.
//!
//! Calls for the same subject are serialised through the store's
//! per-subject lock; different subjects proceed in parallel.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::config::AdaptationConfig;
use super::interaction::{InteractionData, InteractionPatterns};
use super::profile::{clamp_unit, LearningStyle, PersonalityProfile, ProfileOverrides, Trait};
use super::store::{InMemoryProfileStore, ProfileStore};
use crate::utilities::errors::{AffectError, AffectResult};

/// Time per interaction (ms) treated as full persistence.
const PERSISTENCE_REFERENCE_MS: f64 = 300_000.0;

/// Profile confidence gained per adaptation.
const CONFIDENCE_STEP: f64 = 0.1;

const STYLE_CHANGE_MAX_PERFORMANCE: f64 = 0.4;
const STYLE_CHANGE_MIN_FRUSTRATION: f64 = 0.7;

const HIGH_NEUROTICISM: f64 = 0.7;
const LOW_PERFORMANCE: f64 = 0.5;
const LOW_ENGAGEMENT: f64 = 0.4;
/// More changes than this in one call mark an adaptation period.
const ADAPTATION_PERIOD_CHANGES: usize = 2;

// ============================================================================
// Output types
// ============================================================================

/// Which part of the profile changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "trait")]
pub enum ProfileAspect {
    Trait(Trait),
    LearningStyle,
}

impl fmt::Display for ProfileAspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trait(t) => write!(f, "{}", t),
            Self::LearningStyle => f.write_str("learning_style"),
        }
    }
}

/// A significant change detected in one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalityChange {
    pub aspect: ProfileAspect,
    /// Previous value, rendered (`"0.400"`, `"visual"`).
    pub from: String,
    pub to: String,
    /// Absolute trait delta, or 1 for a learning-style switch.
    pub magnitude: f64,
    pub rationale: String,
}

/// Category of an adaptation recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    ReduceStress,
    ReduceDifficulty,
    IntroduceGamification,
    AdaptationPeriod,
    ProfileStable,
    EvolutionDisabled,
    NoNewData,
}

/// Pedagogical suggestion derived from the analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub message: String,
}

impl Recommendation {
    fn new(kind: RecommendationKind) -> Self {
        let message = match kind {
            RecommendationKind::ReduceStress => {
                "Favour low-pressure exercises and shorter sessions to reduce stress"
            }
            RecommendationKind::ReduceDifficulty => {
                "Reduce exercise difficulty until performance recovers"
            }
            RecommendationKind::IntroduceGamification => {
                "Introduce gamified activities to raise engagement"
            }
            RecommendationKind::AdaptationPeriod => {
                "Profile is in an adaptation period; keep the pedagogical approach consistent"
            }
            RecommendationKind::ProfileStable => "Profile is stable; continue the current approach",
            RecommendationKind::EvolutionDisabled => {
                "Dynamic personality evolution is disabled; profile left unchanged"
            }
            RecommendationKind::NoNewData => "No new interactions to analyse; profile left unchanged",
        };
        Self {
            kind,
            message: message.to_string(),
        }
    }
}

/// Result of [`PersonalityAdaptationEngine::analyze_personality`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalityAnalysis {
    pub updated_profile: PersonalityProfile,
    pub detected_changes: Vec<PersonalityChange>,
    pub adaptation_recommendations: Vec<Recommendation>,
    /// `[0.1, 1]` for real analyses.
    pub analysis_confidence: f64,
}

impl PersonalityAnalysis {
    fn unchanged(profile: &PersonalityProfile, kind: RecommendationKind, confidence: f64) -> Self {
        Self {
            updated_profile: profile.clone(),
            detected_changes: Vec::new(),
            adaptation_recommendations: vec![Recommendation::new(kind)],
            analysis_confidence: confidence,
        }
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Owns per-subject profiles (through a [`ProfileStore`]) and adapts them.
#[derive(Debug, Clone)]
pub struct PersonalityAdaptationEngine {
    config: AdaptationConfig,
    store: Arc<dyn ProfileStore>,
}

impl PersonalityAdaptationEngine {
    /// Engine with an in-memory store honouring `config.max_history_len`.
    pub fn new(config: AdaptationConfig) -> AffectResult<Self> {
        let store = Arc::new(InMemoryProfileStore::with_history_limit(
            config.max_history_len,
        ));
        Self::with_store(config, store)
    }

    /// Engine over a caller-supplied store.
    pub fn with_store(config: AdaptationConfig, store: Arc<dyn ProfileStore>) -> AffectResult<Self> {
        config.validate()?;
        Ok(Self { config, store })
    }

    pub fn config(&self) -> &AdaptationConfig {
        &self.config
    }

    /// Create and store the starting profile for `subject_id`.
    pub fn create_initial_profile(
        &self,
        subject_id: &str,
        overrides: Option<&ProfileOverrides>,
    ) -> AffectResult<PersonalityProfile> {
        let profile = PersonalityProfile::initial(subject_id, overrides);
        self.store.save_profile(&profile).map_err(store_error)?;
        log::debug!("Created personality profile {}", profile.id);
        Ok(profile)
    }

    /// Stored profile of a subject.
    pub fn profile(&self, subject_id: &str) -> AffectResult<Option<PersonalityProfile>> {
        self.store.load_profile(subject_id).map_err(store_error)
    }

    /// Retained interaction history of a subject, oldest first.
    pub fn interaction_history(&self, subject_id: &str) -> AffectResult<Vec<InteractionData>> {
        self.store.interactions(subject_id).map_err(store_error)
    }

    /// Fold `new_interactions` into the subject's profile.
    ///
    /// If the store already holds a more advanced profile for the subject
    /// (higher `interaction_count`) that one is used as the base, so
    /// concurrent callers holding stale copies do not lose updates.
    pub fn analyze_personality(
        &self,
        profile: &PersonalityProfile,
        new_interactions: &[InteractionData],
    ) -> AffectResult<PersonalityAnalysis> {
        if !self.config.dynamic_evolution {
            return Ok(PersonalityAnalysis::unchanged(
                profile,
                RecommendationKind::EvolutionDisabled,
                1.0,
            ));
        }

        let subject_id = profile.subject_id();
        let lock = self.store.subject_lock(subject_id);
        let _guard = lock.lock();

        let current = match self.store.load_profile(subject_id).map_err(store_error)? {
            Some(stored)
                if stored.metadata.interaction_count > profile.metadata.interaction_count =>
            {
                stored
            }
            _ => profile.clone(),
        };

        if new_interactions.is_empty() {
            let confidence = current.metadata.confidence;
            return Ok(PersonalityAnalysis::unchanged(
                &current,
                RecommendationKind::NoNewData,
                confidence,
            ));
        }

        let mut history = self.store.interactions(subject_id).map_err(store_error)?;
        history.extend_from_slice(new_interactions);
        if let Some(max) = self.config.max_history_len {
            let excess = history.len().saturating_sub(max);
            history.drain(..excess);
        }
        let Some(patterns) = InteractionPatterns::from_history(&history) else {
            let confidence = current.metadata.confidence;
            return Ok(PersonalityAnalysis::unchanged(
                &current,
                RecommendationKind::NoNewData,
                confidence,
            ));
        };

        let updated = self.evolve(&current, &patterns, new_interactions.len());
        let changes = self.detect_changes(&current, &updated);
        let recommendations = recommendations(&updated, &patterns, changes.len());
        let analysis_confidence = self.analysis_confidence(&updated, &patterns, changes.len());

        self.store
            .commit_adaptation(&updated, new_interactions)
            .map_err(store_error)?;

        log::debug!(
            "Adapted {} over {} interactions: {} changes, confidence {:.3}",
            updated.id,
            patterns.sample_count,
            changes.len(),
            analysis_confidence
        );

        Ok(PersonalityAnalysis {
            updated_profile: updated,
            detected_changes: changes,
            adaptation_recommendations: recommendations,
            analysis_confidence,
        })
    }

    /// Apply trait drift and the optional style switch.
    fn evolve(
        &self,
        profile: &PersonalityProfile,
        patterns: &InteractionPatterns,
        batch_len: usize,
    ) -> PersonalityProfile {
        let factor = self.config.temporal_adaptation_factor;
        let persistence = (patterns.mean_time_spent_ms / PERSISTENCE_REFERENCE_MS).min(1.0);

        let mut updated = profile.clone();
        updated
            .traits
            .shift(Trait::Neuroticism, (patterns.mean_frustration - 0.5) * factor);
        updated
            .traits
            .shift(Trait::Conscientiousness, (persistence - 0.5) * factor);
        updated.traits.shift(
            Trait::Openness,
            (1.0 - patterns.performance_stability) * factor * 0.5,
        );

        if let Some(style) = learning_style_change(profile.learning_style, patterns) {
            log::info!(
                "Switching learning style of {} from {} to {}",
                profile.id,
                profile.learning_style,
                style
            );
            updated.learning_style = style;
        }

        updated.metadata.interaction_count = profile
            .metadata
            .interaction_count
            .saturating_add(batch_len as u64);
        updated.metadata.confidence = clamp_unit(profile.metadata.confidence + CONFIDENCE_STEP);
        updated.metadata.last_update = Utc::now();
        updated
    }

    fn detect_changes(
        &self,
        before: &PersonalityProfile,
        after: &PersonalityProfile,
    ) -> Vec<PersonalityChange> {
        let mut changes: Vec<PersonalityChange> = Trait::ALL
            .iter()
            .filter_map(|&t| {
                let old = before.traits.get(t);
                let new = after.traits.get(t);
                let magnitude = (new - old).abs();
                (magnitude > self.config.change_threshold).then(|| PersonalityChange {
                    aspect: ProfileAspect::Trait(t),
                    from: format!("{:.3}", old),
                    to: format!("{:.3}", new),
                    magnitude,
                    rationale: trait_rationale(t).to_string(),
                })
            })
            .collect();

        if before.learning_style != after.learning_style {
            changes.push(PersonalityChange {
                aspect: ProfileAspect::LearningStyle,
                from: before.learning_style.to_string(),
                to: after.learning_style.to_string(),
                magnitude: 1.0,
                rationale: "Sustained low performance with high frustration under the current style"
                    .to_string(),
            });
        }
        changes
    }

    /// Calibration and stability, minus 0.1 per change beyond two; clamped to `[0.1, 1]`.
    fn analysis_confidence(
        &self,
        profile: &PersonalityProfile,
        patterns: &InteractionPatterns,
        change_count: usize,
    ) -> f64 {
        let calibration = (profile.metadata.interaction_count as f64
            / self.config.calibration_interactions as f64)
            .min(1.0);
        let base = calibration * 0.5 + patterns.performance_stability * 0.5;
        let penalty = (change_count.saturating_sub(ADAPTATION_PERIOD_CHANGES)) as f64 * 0.1;
        (base - penalty).clamp(0.1, 1.0)
    }
}

fn learning_style_change(
    current: LearningStyle,
    patterns: &InteractionPatterns,
) -> Option<LearningStyle> {
    (patterns.mean_performance < STYLE_CHANGE_MAX_PERFORMANCE
        && patterns.mean_frustration > STYLE_CHANGE_MIN_FRUSTRATION)
        .then(|| current.substitute())
}

fn recommendations(
    profile: &PersonalityProfile,
    patterns: &InteractionPatterns,
    change_count: usize,
) -> Vec<Recommendation> {
    let mut out = Vec::new();
    if profile.traits.neuroticism > HIGH_NEUROTICISM {
        out.push(Recommendation::new(RecommendationKind::ReduceStress));
    }
    if patterns.mean_performance < LOW_PERFORMANCE {
        out.push(Recommendation::new(RecommendationKind::ReduceDifficulty));
    }
    if patterns.mean_engagement < LOW_ENGAGEMENT {
        out.push(Recommendation::new(RecommendationKind::IntroduceGamification));
    }
    if change_count > ADAPTATION_PERIOD_CHANGES {
        out.push(Recommendation::new(RecommendationKind::AdaptationPeriod));
    }
    if out.is_empty() {
        out.push(Recommendation::new(RecommendationKind::ProfileStable));
    }
    out
}

fn trait_rationale(t: Trait) -> &'static str {
    match t {
        Trait::Openness => "Performance variability suggests exploration of new approaches",
        Trait::Conscientiousness => "Persistence reflected in time spent per interaction",
        Trait::Extraversion => "Observed social engagement during interactions",
        Trait::Agreeableness => "Observed cooperation during interactions",
        Trait::Neuroticism => "Frustration levels observed across interactions",
    }
}

fn store_error(err: anyhow::Error) -> AffectError {
    log::warn!("Profile store failure: {}", err);
    AffectError::Store(err)
}

// ============================================================================
// Tests
// ============================================================================
