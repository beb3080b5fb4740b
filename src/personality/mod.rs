//! Personality profiles, their adaptation from interaction statistics, and
//! pairwise compatibility.
//!
//! # Architecture
//!
//! ```text
//! InteractionData batch
//!   ↓  append (ProfileStore, per-subject lock)
//! cumulative history
//!   ↓  aggregate
//! InteractionPatterns
//!   ↓  drift + style switch
//! PersonalityProfile (stored)  →  changes, recommendations, confidence
//!
//! PersonalityProfile × PersonalityProfile  →  calculate_compatibility  →  [0, 1]
//! ```

pub mod compatibility;
pub mod config;
pub mod engine;
pub mod interaction;
pub mod profile;
pub mod store;

pub use compatibility::{calculate_compatibility, try_calculate_compatibility, NEUTRAL_COMPATIBILITY};
pub use config::AdaptationConfig;
pub use engine::{
    PersonalityAdaptationEngine, PersonalityAnalysis, PersonalityChange, ProfileAspect,
    Recommendation, RecommendationKind,
};
pub use interaction::{InteractionData, InteractionPatterns};
pub use profile::{
    BigFiveTraits, CulturalBackground, FeedbackStyle, LearningStyle, MotivationFactor,
    PersonalityProfile, ProfileMetadata, ProfileOverrides, Trait,
};
pub use store::{InMemoryProfileStore, ProfileStore};
