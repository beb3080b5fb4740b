//! Append-only emotional state log for one subject.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::state::EmotionalState;
use crate::utilities::errors::{AffectError, AffectResult};

/// Ordered, append-only sequence of [`EmotionalState`]s.
///
/// Timestamps are non-decreasing; [`push`](Self::push) rejects anything
/// older than the current last entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmotionalStateLog {
    subject_id: String,
    states: Vec<EmotionalState>,
}

impl EmotionalStateLog {
    /// Create an empty log for a subject.
    pub fn new(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            states: Vec::new(),
        }
    }

    /// Subject this log belongs to.
    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    /// Append a state.
    ///
    /// # Errors
    ///
    /// [`AffectError::NonMonotonicTimestamp`] if `state` is older than the
    /// last logged state.
    pub fn push(&mut self, state: EmotionalState) -> AffectResult<()> {
        if let Some(last) = self.states.last() {
            if state.timestamp < last.timestamp {
                return Err(AffectError::NonMonotonicTimestamp {
                    previous: last.timestamp,
                    attempted: state.timestamp,
                });
            }
        }
        self.states.push(state);
        Ok(())
    }

    /// Append many states, stopping at the first out-of-order one.
    pub fn extend<I>(&mut self, states: I) -> AffectResult<()>
    where
        I: IntoIterator<Item = EmotionalState>,
    {
        for state in states {
            self.push(state)?;
        }
        Ok(())
    }

    /// Parse a JSON array of states (oldest first) into a log.
    ///
    /// Every state is clamped on the way in; ordering is enforced as by
    /// [`push`](Self::push).
    pub fn from_json(subject_id: impl Into<String>, json: &str) -> AffectResult<Self> {
        let states: Vec<EmotionalState> = serde_json::from_str(json)?;
        let mut log = Self::new(subject_id);
        log.extend(states.into_iter().map(EmotionalState::clamped))?;
        Ok(log)
    }

    /// Full snapshot, oldest first.
    pub fn states(&self) -> &[EmotionalState] {
        &self.states
    }

    /// Suffix of the log whose timestamps fall within `window` of the latest state.
    ///
    /// A window reaching past the earliest representable time covers the whole log.
    pub fn recent(&self, window: Duration) -> &[EmotionalState] {
        let Some(last) = self.states.last() else {
            return &self.states;
        };
        let Some(cutoff) = last.timestamp.checked_sub_signed(window) else {
            return &self.states;
        };
        let start = self.states.partition_point(|s| s.timestamp < cutoff);
        &self.states[start..]
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
