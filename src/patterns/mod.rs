//! Emotional pattern detection over state-log snapshots.
//!
//! ```
//! use chrono::{Duration, Utc};
//! use coda_affect::affect::{Emotion, EmotionalState};
//! use coda_affect::patterns::{EmotionalPatternDetector, PatternType};
//!
//! let t0 = Utc::now();
//! let history: Vec<_> = [Emotion::Surprise, Emotion::Joy, Emotion::Surprise, Emotion::Joy]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, e)| EmotionalState::new(*e, 0.9, 0.5, 0.6, "drill", t0 + Duration::seconds(i as i64)))
//!     .collect();
//!
//! let result = EmotionalPatternDetector::default().analyze_patterns(&history);
//! assert_eq!(result.patterns[0].pattern_type, PatternType::Breakthrough);
//! ```

pub mod config;
pub mod detector;
pub mod templates;
pub mod types;

pub use config::PatternDetectorConfig;
pub use detector::{EmotionalPatternDetector, BREAKTHROUGH_CONFIDENCE};
pub use types::{EmotionalPattern, PatternAnalysisResult, PatternStatistics, PatternType};
