//! Affect primitives: the categorical emotion vocabulary and the
//! append-only emotional state log of one simulated student.
//!
//! The log is filled by an external state-generation service; this crate
//! only reads snapshots of it (see [`crate::patterns`]).

pub mod state_log;
pub mod state;

pub use state_log::EmotionalStateLog;
pub use state::{Emotion, EmotionalState};
