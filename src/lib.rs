//! # coda-affect
//!
//! Affective-trajectory core of an LSF (French Sign Language) tutoring
//! simulator with artificial "student" agents.
//!
//! - [`affect`]: Plutchik emotion vocabulary and the append-only state log
//! - [`patterns`]: detector for recurring emotional patterns in a state history
//! - [`personality`]: Big Five profiles, their adaptation from interaction
//!   statistics, and pairwise compatibility scoring
//! - [`utilities`]: errors, YAML configuration, logging setup
//!
//! Everything here is synchronous and computation-only. Shared mutable state
//! is limited to the per-subject profile store used by the adaptation engine.

pub mod affect;
pub mod patterns;
pub mod personality;
pub mod utilities;

pub use affect::{Emotion, EmotionalState, EmotionalStateLog};
pub use patterns::{
    EmotionalPattern, EmotionalPatternDetector, PatternAnalysisResult, PatternDetectorConfig,
    PatternType,
};
pub use personality::{
    calculate_compatibility, AdaptationConfig, InteractionData, PersonalityAdaptationEngine,
    PersonalityAnalysis, PersonalityProfile,
};
pub use utilities::config::CodaConfig;
pub use utilities::errors::{AffectError, AffectResult};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
