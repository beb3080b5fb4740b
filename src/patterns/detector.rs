//! Emotional pattern detector: recognise recurring trajectories in a
//! student's state history.
//!
//! The detector is pure and stateless: it takes a slice of history (oldest
//! first) and returns every pattern it can find. Each family is checked
//! independently and the results are concatenated in a fixed order:
//!
//! 1. learning cycles (one pattern per matching template)
//! 2. frustration spiral
//! 3. confidence building (one pattern per matching template)
//! 4. breakthrough
//! 5. plateau stagnation (one pattern per qualifying run)
//! 6. recovery bounce
//!
//! Cost is O(n·k) for n states and k templates.

use std::collections::{BTreeSet, HashSet};
use std::time::Instant;

use super::config::PatternDetectorConfig;
use super::templates::{
    BREAKTHROUGH_PAIR, CONFIDENCE_BUILD_TEMPLATES, FRUSTRATION_SPIRAL_TEMPLATE,
    LEARNING_CYCLE_TEMPLATES, RECOVERY_BOUNCE_TEMPLATE,
};
use super::types::{EmotionalPattern, PatternAnalysisResult, PatternStatistics, PatternType};
use crate::affect::{Emotion, EmotionalState, EmotionalStateLog};
use crate::utilities::errors::AffectResult;

/// Fixed confidence of a breakthrough.
pub const BREAKTHROUGH_CONFIDENCE: f64 = 0.9;

/// Joy intensity a breakthrough requires.
const BREAKTHROUGH_JOY_INTENSITY: f64 = 0.8;

/// Plateau states stay below this intensity.
const PLATEAU_MAX_INTENSITY: f64 = 0.5;

/// Minimum valence gain across a confidence-building window.
const CONFIDENCE_VALENCE_GAIN: f64 = 0.3;

const RECOVERY_START_VALENCE: f64 = -0.5;
const RECOVERY_END_VALENCE: f64 = 0.5;

// =============================================================================
// DETECTOR
// =============================================================================

/// Stateless analyser over emotional state snapshots.
#[derive(Debug, Clone, Default)]
pub struct EmotionalPatternDetector {
    config: PatternDetectorConfig,
}

impl EmotionalPatternDetector {
    /// Create a detector, rejecting invalid configuration.
    pub fn new(config: PatternDetectorConfig) -> AffectResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PatternDetectorConfig {
        &self.config
    }

    /// Analyse a full history snapshot.
    ///
    /// Histories shorter than `min_sequence_length` give an empty result
    /// with confidence 0.
    pub fn analyze_patterns(&self, history: &[EmotionalState]) -> PatternAnalysisResult {
        let started = Instant::now();

        if history.len() < self.config.min_sequence_length {
            log::debug!(
                "Skipping pattern analysis: {} states < min_sequence_length {}",
                history.len(),
                self.config.min_sequence_length
            );
            let mut result = PatternAnalysisResult::empty(history.len());
            result.analysis_time = started.elapsed();
            return result;
        }

        let mut patterns = Vec::new();
        patterns.extend(self.detect_learning_cycles(history));
        patterns.extend(self.detect_frustration_spiral(history));
        patterns.extend(self.detect_confidence_building(history));
        patterns.extend(self.detect_breakthrough(history));
        patterns.extend(self.detect_plateaus(history));
        patterns.extend(self.detect_recovery_bounce(history));

        let overall_confidence = if patterns.is_empty() {
            0.0
        } else {
            patterns.iter().map(|p| p.confidence).sum::<f64>() / patterns.len() as f64
        };

        let statistics = self.statistics(history.len(), &patterns);

        log::debug!(
            "Analysed {} states: {} patterns ({} validated), overall confidence {:.3}",
            history.len(),
            patterns.len(),
            statistics.validated_patterns,
            overall_confidence
        );

        PatternAnalysisResult {
            patterns,
            overall_confidence,
            analysis_time: started.elapsed(),
            statistics,
        }
    }

    /// Analyse the part of `log` that falls inside the configured analysis window.
    pub fn analyze_log(&self, log: &EmotionalStateLog) -> PatternAnalysisResult {
        self.analyze_patterns(log.recent(self.config.analysis_window()))
    }

    // =========================================================================
    // INDIVIDUAL FAMILIES
    // =========================================================================

    fn detect_learning_cycles(&self, history: &[EmotionalState]) -> Vec<EmotionalPattern> {
        LEARNING_CYCLE_TEMPLATES
            .iter()
            .filter_map(|template| {
                let matches: Vec<_> = matching_windows(history, template).collect();
                self.template_pattern(PatternType::LearningCycle, template, &matches)
            })
            .collect()
    }

    /// The first window whose intensities rise strictly defines the spiral;
    /// its frequency counts every window with the same emotion sequence.
    fn detect_frustration_spiral(&self, history: &[EmotionalState]) -> Option<EmotionalPattern> {
        let first = matching_windows(history, FRUSTRATION_SPIRAL_TEMPLATE)
            .find(|w| strictly_increasing_intensity(w))?;
        let sequence: Vec<Emotion> = first.iter().map(|s| s.primary_emotion).collect();
        let matches: Vec<_> = matching_windows(history, &sequence).collect();
        self.template_pattern(PatternType::FrustrationSpiral, &sequence, &matches)
    }

    fn detect_confidence_building(&self, history: &[EmotionalState]) -> Vec<EmotionalPattern> {
        CONFIDENCE_BUILD_TEMPLATES
            .iter()
            .filter_map(|template| {
                let matches: Vec<_> = matching_windows(history, template)
                    .filter(|w| valence_gain(w) > CONFIDENCE_VALENCE_GAIN)
                    .collect();
                self.template_pattern(PatternType::ConfidenceBuild, template, &matches)
            })
            .collect()
    }

    fn detect_breakthrough(&self, history: &[EmotionalState]) -> Option<EmotionalPattern> {
        let pairs: Vec<_> = history
            .windows(2)
            .filter(|w| {
                w[0].primary_emotion == BREAKTHROUGH_PAIR[0]
                    && w[1].primary_emotion == BREAKTHROUGH_PAIR[1]
                    && w[1].intensity > BREAKTHROUGH_JOY_INTENSITY
            })
            .collect();

        // Both states of a pair count towards the threshold.
        if pairs.len() * 2 < self.config.min_frequency * 2 {
            return None;
        }

        Some(EmotionalPattern {
            pattern_type: PatternType::Breakthrough,
            sequence: BREAKTHROUGH_PAIR.to_vec(),
            frequency: pairs.len(),
            triggers: collect_triggers(&pairs),
            confidence: BREAKTHROUGH_CONFIDENCE,
        })
    }

    /// One pattern per maximal run of low-intensity neutral states.
    fn detect_plateaus(&self, history: &[EmotionalState]) -> Vec<EmotionalPattern> {
        let min_run = self.config.min_sequence_length.max(self.config.min_frequency);
        let mut patterns = Vec::new();
        let mut start = 0;

        while start < history.len() {
            if !is_plateau_state(&history[start]) {
                start += 1;
                continue;
            }
            let run_len = history[start..]
                .iter()
                .take_while(|s| is_plateau_state(s))
                .count();
            let run = &history[start..start + run_len];

            if run_len >= min_run {
                patterns.push(EmotionalPattern {
                    pattern_type: PatternType::PlateauStagnation,
                    sequence: run.iter().map(|s| s.primary_emotion).collect(),
                    frequency: run_len,
                    triggers: run.iter().map(|s| s.trigger.clone()).collect(),
                    confidence: (run_len as f64 / 10.0).min(1.0),
                });
            }
            start += run_len;
        }

        patterns
    }

    fn detect_recovery_bounce(&self, history: &[EmotionalState]) -> Option<EmotionalPattern> {
        let matches: Vec<_> = matching_windows(history, RECOVERY_BOUNCE_TEMPLATE)
            .filter(|w| {
                let first = w[0].valence;
                let last = w[w.len() - 1].valence;
                first < RECOVERY_START_VALENCE && last > RECOVERY_END_VALENCE
            })
            .collect();
        self.template_pattern(PatternType::RecoveryBounce, RECOVERY_BOUNCE_TEMPLATE, &matches)
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    /// Build a template-matched pattern if enough windows matched.
    fn template_pattern(
        &self,
        pattern_type: PatternType,
        template: &[Emotion],
        matches: &[&[EmotionalState]],
    ) -> Option<EmotionalPattern> {
        if matches.len() < self.config.min_frequency {
            return None;
        }
        Some(EmotionalPattern {
            pattern_type,
            sequence: template.to_vec(),
            frequency: matches.len(),
            triggers: collect_triggers(matches),
            confidence: self.template_confidence(matches.len(), template.len()),
        })
    }

    /// `min(count / min_frequency, 1) + min(len / 5, 0.2)`, capped at 1.
    fn template_confidence(&self, count: usize, template_len: usize) -> f64 {
        let frequency_score = (count as f64 / self.config.min_frequency as f64).min(1.0);
        let length_score = (template_len as f64 / 5.0).min(0.2);
        (frequency_score + length_score).min(1.0)
    }

    fn statistics(&self, total_states: usize, patterns: &[EmotionalPattern]) -> PatternStatistics {
        let distinct: HashSet<&[Emotion]> = patterns.iter().map(|p| p.sequence.as_slice()).collect();
        let validated = patterns
            .iter()
            .filter(|p| p.confidence >= self.config.min_confidence)
            .count();
        PatternStatistics {
            total_states,
            distinct_sequences: distinct.len(),
            validated_patterns: validated,
            rejected_patterns: patterns.len() - validated,
        }
    }
}

fn matching_windows<'a>(
    history: &'a [EmotionalState],
    template: &'a [Emotion],
) -> impl Iterator<Item = &'a [EmotionalState]> + 'a {
    history.windows(template.len()).filter(move |w| {
        w.iter()
            .zip(template)
            .all(|(state, emotion)| state.primary_emotion == *emotion)
    })
}

fn strictly_increasing_intensity(window: &[EmotionalState]) -> bool {
    window.windows(2).all(|p| p[1].intensity > p[0].intensity)
}

fn valence_gain(window: &[EmotionalState]) -> f64 {
    match (window.first(), window.last()) {
        (Some(first), Some(last)) => last.valence - first.valence,
        _ => 0.0,
    }
}

fn is_plateau_state(state: &EmotionalState) -> bool {
    state.primary_emotion.is_neutral() && state.intensity < PLATEAU_MAX_INTENSITY
}

fn collect_triggers(windows: &[&[EmotionalState]]) -> BTreeSet<String> {
    windows
        .iter()
        .flat_map(|w| w.iter().map(|s| s.trigger.clone()))
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    /// Build a history from (emotion, intensity, valence) triples, one second apart.
    fn history(states: &[(Emotion, f64, f64)]) -> Vec<EmotionalState> {
        let t0 = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        states
            .iter()
            .enumerate()
            .map(|(i, (e, intensity, valence))| {
                EmotionalState::new(
                    *e,
                    *intensity,
                    *valence,
                    0.5,
                    format!("trigger-{}", i),
                    t0 + Duration::seconds(i as i64),
                )
            })
            .collect()
    }

    fn detector(min_frequency: usize) -> EmotionalPatternDetector {
        EmotionalPatternDetector::new(PatternDetectorConfig {
            min_frequency,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_short_history_is_empty() {
        let h = history(&[(Emotion::Joy, 0.9, 0.8), (Emotion::Joy, 0.9, 0.8)]);
        let r = EmotionalPatternDetector::default().analyze_patterns(&h);
        assert!(r.patterns.is_empty());
        assert_eq!(r.overall_confidence, 0.0);
        assert_eq!(r.statistics.total_states, 2);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = EmotionalPatternDetector::new(PatternDetectorConfig {
            min_frequency: 0,
            ..Default::default()
        });
        assert!(err.is_err());
    }

    #[test]
    fn test_single_learning_cycle() {
        let h = history(&[
            (Emotion::Sadness, 0.3, 0.0),
            (Emotion::Anger, 0.5, 0.0),
            (Emotion::Anticipation, 0.4, 0.0),
            (Emotion::Joy, 0.8, 0.0),
        ]);
        let r = detector(1).analyze_patterns(&h);

        let cycles: Vec<_> = r.of_type(PatternType::LearningCycle).collect();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].frequency, 1);
        assert_eq!(cycles[0].confidence, 1.0);
        assert_eq!(
            cycles[0].sequence,
            vec![Emotion::Sadness, Emotion::Anger, Emotion::Anticipation, Emotion::Joy]
        );
        // valences are flat, so the recovery template does not qualify
        assert_eq!(r.of_type(PatternType::RecoveryBounce).count(), 0);
    }

    #[test]
    fn test_surprise_led_learning_cycle() {
        let h = history(&[
            (Emotion::Surprise, 0.6, 0.0),
            (Emotion::Fear, 0.4, 0.0),
            (Emotion::Trust, 0.6, 0.0),
            (Emotion::Joy, 0.8, 0.0),
        ]);
        let r = detector(1).analyze_patterns(&h);

        let cycles: Vec<_> = r.of_type(PatternType::LearningCycle).collect();
        assert_eq!(cycles.len(), 1);
        assert_eq!(
            cycles[0].sequence,
            vec![Emotion::Surprise, Emotion::Fear, Emotion::Trust, Emotion::Joy]
        );
        assert_eq!(cycles[0].confidence, 1.0);
        // no valence gain across fear, trust, joy
        assert_eq!(r.of_type(PatternType::ConfidenceBuild).count(), 0);
    }

    #[test]
    fn test_learning_cycle_below_min_frequency() {
        let h = history(&[
            (Emotion::Fear, 0.3, 0.0),
            (Emotion::Anger, 0.5, 0.0),
            (Emotion::Anticipation, 0.4, 0.0),
            (Emotion::Joy, 0.8, 0.0),
        ]);
        let r = detector(2).analyze_patterns(&h);
        assert_eq!(r.of_type(PatternType::LearningCycle).count(), 0);
    }

    #[test]
    fn test_breakthrough_pairs() {
        let h = history(&[
            (Emotion::Surprise, 0.5, 0.2),
            (Emotion::Joy, 0.9, 0.8),
            (Emotion::Surprise, 0.5, 0.2),
            (Emotion::Joy, 0.9, 0.8),
        ]);
        let r = detector(2).analyze_patterns(&h);
        assert_eq!(r.patterns.len(), 1);
        let p = &r.patterns[0];
        assert_eq!(p.pattern_type, PatternType::Breakthrough);
        assert_eq!(p.confidence, BREAKTHROUGH_CONFIDENCE);
        assert_eq!(p.frequency, 2);
        assert!((r.overall_confidence - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_breakthrough_requires_intense_joy() {
        let h = history(&[
            (Emotion::Surprise, 0.5, 0.2),
            (Emotion::Joy, 0.8, 0.8),
            (Emotion::Surprise, 0.5, 0.2),
            (Emotion::Joy, 0.95, 0.8),
        ]);
        let r = detector(2).analyze_patterns(&h);
        assert_eq!(r.of_type(PatternType::Breakthrough).count(), 0);
    }

    fn spiral(intensities: [f64; 4]) -> Vec<(Emotion, f64, f64)> {
        let emotions = [Emotion::Anger, Emotion::Fear, Emotion::Anger, Emotion::Disgust];
        emotions
            .iter()
            .zip(intensities)
            .map(|(e, i)| (*e, i, -0.5))
            .collect()
    }

    #[test]
    fn test_frustration_spiral_detected() {
        let mut states = spiral([0.2, 0.4, 0.6, 0.8]);
        states.extend(spiral([0.3, 0.5, 0.7, 0.9]));
        let r = detector(2).analyze_patterns(&history(&states));

        let spirals: Vec<_> = r.of_type(PatternType::FrustrationSpiral).collect();
        assert_eq!(spirals.len(), 1);
        assert_eq!(spirals[0].frequency, 2);
        assert_eq!(spirals[0].sequence, FRUSTRATION_SPIRAL_TEMPLATE.to_vec());
        // min(2/2, 1) + min(4/5, 0.2) capped
        assert_eq!(spirals[0].confidence, 1.0);
    }

    #[test]
    fn test_frustration_spiral_needs_rising_intensity() {
        let mut states = spiral([0.8, 0.4, 0.6, 0.2]);
        states.extend(spiral([0.9, 0.5, 0.7, 0.3]));
        let r = detector(2).analyze_patterns(&history(&states));
        assert_eq!(r.of_type(PatternType::FrustrationSpiral).count(), 0);
    }

    #[test]
    fn test_frustration_frequency_counts_all_equal_windows() {
        // one escalating window is enough to define the spiral
        let mut states = spiral([0.2, 0.4, 0.6, 0.8]);
        states.extend(spiral([0.9, 0.5, 0.7, 0.3]));
        let r = detector(2).analyze_patterns(&history(&states));
        let spirals: Vec<_> = r.of_type(PatternType::FrustrationSpiral).collect();
        assert_eq!(spirals.len(), 1);
        assert_eq!(spirals[0].frequency, 2);
    }

    #[test]
    fn test_confidence_building_needs_valence_gain() {
        let gaining = [
            (Emotion::Fear, 0.5, -0.4),
            (Emotion::Trust, 0.5, 0.0),
            (Emotion::Joy, 0.5, 0.6),
        ];
        let flat = [
            (Emotion::Fear, 0.5, 0.1),
            (Emotion::Trust, 0.5, 0.2),
            (Emotion::Joy, 0.5, 0.3),
        ];

        let mut states = gaining.to_vec();
        states.extend(gaining);
        let r = detector(2).analyze_patterns(&history(&states));
        let built: Vec<_> = r.of_type(PatternType::ConfidenceBuild).collect();
        assert_eq!(built.len(), 1);
        assert_eq!(built[0].frequency, 2);

        let mut states = gaining.to_vec();
        states.extend(flat);
        let r = detector(2).analyze_patterns(&history(&states));
        assert_eq!(r.of_type(PatternType::ConfidenceBuild).count(), 0);
    }

    #[test]
    fn test_confidence_building_from_sadness() {
        let rising = [
            (Emotion::Sadness, 0.6, -0.5),
            (Emotion::Anticipation, 0.6, 0.0),
            (Emotion::Trust, 0.6, 0.2),
        ];
        let mut states = rising.to_vec();
        states.extend(rising);
        let r = detector(2).analyze_patterns(&history(&states));

        let built: Vec<_> = r.of_type(PatternType::ConfidenceBuild).collect();
        assert_eq!(built.len(), 1);
        assert_eq!(
            built[0].sequence,
            vec![Emotion::Sadness, Emotion::Anticipation, Emotion::Trust]
        );
        assert_eq!(built[0].frequency, 2);
        assert_eq!(built[0].triggers.len(), 6);
    }

    #[test]
    fn test_plateau_runs() {
        let mut states = vec![(Emotion::Trust, 0.3, 0.1); 4];
        states.push((Emotion::Anger, 0.7, -0.4));
        states.extend(vec![(Emotion::Anticipation, 0.2, 0.0); 12]);
        states.push((Emotion::Joy, 0.9, 0.9));
        states.extend(vec![(Emotion::Trust, 0.2, 0.0); 2]);

        let r = detector(2).analyze_patterns(&history(&states));
        let plateaus: Vec<_> = r.of_type(PatternType::PlateauStagnation).collect();
        assert_eq!(plateaus.len(), 2);
        assert_eq!(plateaus[0].frequency, 4);
        assert!((plateaus[0].confidence - 0.4).abs() < 1e-12);
        assert_eq!(plateaus[1].frequency, 12);
        assert_eq!(plateaus[1].confidence, 1.0);
    }

    #[test]
    fn test_plateau_ignores_intense_neutral_states() {
        let states = vec![(Emotion::Trust, 0.5, 0.1); 6];
        let r = detector(2).analyze_patterns(&history(&states));
        assert_eq!(r.of_type(PatternType::PlateauStagnation).count(), 0);
    }

    #[test]
    fn test_recovery_bounce() {
        let bounce = [
            (Emotion::Sadness, 0.6, -0.8),
            (Emotion::Anger, 0.5, -0.3),
            (Emotion::Anticipation, 0.6, 0.2),
            (Emotion::Joy, 0.7, 0.9),
        ];
        let mut states = bounce.to_vec();
        states.extend(bounce);
        let r = detector(2).analyze_patterns(&history(&states));

        let bounces: Vec<_> = r.of_type(PatternType::RecoveryBounce).collect();
        assert_eq!(bounces.len(), 1);
        assert_eq!(bounces[0].frequency, 2);
        // same emotions also complete a learning cycle
        assert_eq!(r.of_type(PatternType::LearningCycle).count(), 1);
        assert_eq!(r.statistics.distinct_sequences, 1);
    }

    #[test]
    fn test_properties_hold_on_mixed_history() {
        let mut states = Vec::new();
        for i in 0..60 {
            let e = Emotion::ALL[(i * 7 + i / 3) % 8];
            let intensity = ((i * 37) % 100) as f64 / 100.0;
            let valence = ((i * 53) % 200) as f64 / 100.0 - 1.0;
            states.push((e, intensity, valence));
        }
        for min_frequency in 1..4 {
            let r = detector(min_frequency).analyze_patterns(&history(&states));
            for p in &r.patterns {
                assert!((0.0..=1.0).contains(&p.confidence), "{:?}", p);
                assert!(p.frequency >= min_frequency, "{:?}", p);
            }
            assert_eq!(
                r.statistics.validated_patterns + r.statistics.rejected_patterns,
                r.patterns.len()
            );
        }
    }

    #[test]
    fn test_statistics_split_on_min_confidence() {
        // plateau of 4 -> confidence 0.4 (rejected); breakthrough -> 0.9 (validated)
        let mut states = vec![(Emotion::Trust, 0.3, 0.1); 4];
        states.extend([
            (Emotion::Surprise, 0.5, 0.2),
            (Emotion::Joy, 0.9, 0.8),
            (Emotion::Surprise, 0.5, 0.2),
            (Emotion::Joy, 0.9, 0.8),
        ]);
        let r = detector(2).analyze_patterns(&history(&states));
        assert_eq!(r.patterns.len(), 2);
        assert_eq!(r.statistics.validated_patterns, 1);
        assert_eq!(r.statistics.rejected_patterns, 1);
        assert!((r.overall_confidence - 0.65).abs() < 1e-12);
    }

    #[test]
    fn test_analyze_log_uses_window() {
        let t0 = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let mut log = EmotionalStateLog::new("s");
        // old breakthroughs, far outside a one-minute window
        for i in 0..4 {
            let emotion = if i % 2 == 0 { Emotion::Surprise } else { Emotion::Joy };
            let ts = t0 + Duration::seconds(i);
            log.push(EmotionalState::new(emotion, 0.9, 0.5, 0.5, "old", ts))
                .unwrap();
        }
        for i in 0..3 {
            log.push(EmotionalState::new(
                Emotion::Anger,
                0.5,
                -0.2,
                0.5,
                "recent",
                t0 + Duration::hours(1) + Duration::seconds(i),
            ))
            .unwrap();
        }

        let d = EmotionalPatternDetector::new(PatternDetectorConfig {
            analysis_window_ms: 60_000,
            ..Default::default()
        })
        .unwrap();
        let r = d.analyze_log(&log);
        assert_eq!(r.statistics.total_states, 3);
        assert!(r.patterns.is_empty());
        assert_eq!(d.analyze_patterns(log.states()).of_type(PatternType::Breakthrough).count(), 1);
    }

    #[test]
    fn test_analyze_log_with_maximal_window() {
        let d = EmotionalPatternDetector::new(PatternDetectorConfig {
            analysis_window_ms: u64::MAX,
            ..Default::default()
        })
        .unwrap();
        let mut log = EmotionalStateLog::new("s");
        log.push(EmotionalState::new(Emotion::Joy, 0.5, 0.5, 0.5, "t", Utc::now()))
            .unwrap();
        let r = d.analyze_log(&log);
        assert_eq!(r.statistics.total_states, 1);
        assert!(r.patterns.is_empty());
    }
}
