//! Per-subject profile and interaction-history storage.
//!
//! The engine never touches a map directly; it goes through
//! [`ProfileStore`], so persistence, eviction and locking can be swapped.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;

use super::interaction::InteractionData;
use super::profile::PersonalityProfile;

/// Storage for profiles and interaction histories, keyed by subject id.
///
/// Backends report failures as `anyhow::Error`; the engine wraps them.
#[async_trait]
pub trait ProfileStore: Send + Sync + std::fmt::Debug {
    /// Current profile of a subject, if any.
    fn load_profile(&self, subject_id: &str) -> Result<Option<PersonalityProfile>, anyhow::Error>;

    /// Replace the stored profile for `profile.subject_id`.
    fn save_profile(&self, profile: &PersonalityProfile) -> Result<(), anyhow::Error>;

    /// Append a batch to the subject's history.
    fn append_interactions(
        &self,
        subject_id: &str,
        batch: &[InteractionData],
    ) -> Result<(), anyhow::Error>;

    /// Full retained history, oldest first.
    fn interactions(&self, subject_id: &str) -> Result<Vec<InteractionData>, anyhow::Error>;

    /// Mutex serialising read-modify-write cycles for one subject.
    ///
    /// The same subject id must always yield the same mutex.
    fn subject_lock(&self, subject_id: &str) -> Arc<Mutex<()>>;

    /// Persist one adaptation: the updated profile and the batch it consumed.
    ///
    /// The batch is appended only after the profile was saved, so a failed
    /// save leaves the history untouched. Backends with transactions should
    /// override this and commit both writes at once.
    fn commit_adaptation(
        &self,
        profile: &PersonalityProfile,
        batch: &[InteractionData],
    ) -> Result<(), anyhow::Error> {
        self.save_profile(profile)?;
        self.append_interactions(&profile.subject_id, batch)
    }

    /// Async variant of [`load_profile`](Self::load_profile).
    async fn aload_profile(
        &self,
        subject_id: &str,
    ) -> Result<Option<PersonalityProfile>, anyhow::Error> {
        self.load_profile(subject_id)
    }

    /// Async variant of [`save_profile`](Self::save_profile).
    async fn asave_profile(&self, profile: &PersonalityProfile) -> Result<(), anyhow::Error> {
        self.save_profile(profile)
    }
}

/// In-memory store backed by concurrent maps.
///
/// Per-subject lock entries are created on first use and live as long as
/// the store. `max_history_len` bounds histories only, not the lock map.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: DashMap<String, PersonalityProfile>,
    histories: DashMap<String, Vec<InteractionData>>,
    locks: DashMap<String, Arc<Mutex<()>>>,
    /// Oldest interactions beyond this many are dropped.
    max_history_len: Option<usize>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that keeps at most `max_history_len` interactions per subject.
    pub fn with_history_limit(max_history_len: Option<usize>) -> Self {
        Self {
            max_history_len,
            ..Self::default()
        }
    }

    /// Number of subjects with a stored profile.
    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    fn load_profile(&self, subject_id: &str) -> Result<Option<PersonalityProfile>, anyhow::Error> {
        Ok(self.profiles.get(subject_id).map(|p| p.clone()))
    }

    fn save_profile(&self, profile: &PersonalityProfile) -> Result<(), anyhow::Error> {
        self.profiles
            .insert(profile.subject_id.clone(), profile.clone());
        Ok(())
    }

    fn append_interactions(
        &self,
        subject_id: &str,
        batch: &[InteractionData],
    ) -> Result<(), anyhow::Error> {
        let mut history = self.histories.entry(subject_id.to_string()).or_default();
        history.extend_from_slice(batch);
        if let Some(max) = self.max_history_len {
            if history.len() > max {
                let excess = history.len() - max;
                history.drain(..excess);
            }
        }
        Ok(())
    }

    fn interactions(&self, subject_id: &str) -> Result<Vec<InteractionData>, anyhow::Error> {
        Ok(self
            .histories
            .get(subject_id)
            .map(|h| h.clone())
            .unwrap_or_default())
    }

    fn subject_lock(&self, subject_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(subject_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

// ============================================================================
// Tests
// ============================================================================
