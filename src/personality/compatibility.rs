//! Profile compatibility scoring for grouping and pairing decisions.
//!
//! Score = 0.4·traits + 0.2·learning style + 0.2·culture + 0.2·motivation,
//! always in `[0, 1]` and symmetric in its arguments.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::profile::{CulturalBackground, PersonalityProfile};
use crate::utilities::errors::{AffectError, AffectResult};

const TRAIT_WEIGHT: f64 = 0.4;
const STYLE_WEIGHT: f64 = 0.2;
const CULTURE_WEIGHT: f64 = 0.2;
const MOTIVATION_WEIGHT: f64 = 0.2;

/// Returned when scoring fails.
pub const NEUTRAL_COMPATIBILITY: f64 = 0.5;

const DIFFERENT_STYLE_SCORE: f64 = 0.5;
const UNLISTED_CULTURE_SCORE: f64 = 0.5;

/// Known cross-background affinities. Looked up in both orders.
static CULTURAL_AFFINITY: Lazy<HashMap<(CulturalBackground, CulturalBackground), f64>> =
    Lazy::new(|| {
        use CulturalBackground::*;
        HashMap::from([
            ((DeafFamily, DeafCommunity), 0.8),
            ((HearingFamily, HearingCommunity), 0.8),
            ((MixedFamily, DeafFamily), 0.7),
            ((MixedFamily, HearingFamily), 0.7),
            ((MixedFamily, DeafCommunity), 0.6),
            ((International, MixedFamily), 0.6),
        ])
    });

/// Compatibility of two profiles in `[0, 1]`; degrades to 0.5 on error.
pub fn calculate_compatibility(a: &PersonalityProfile, b: &PersonalityProfile) -> f64 {
    match try_calculate_compatibility(a, b) {
        Ok(score) => score,
        Err(e) => {
            log::warn!(
                "Compatibility of {} and {} fell back to neutral: {}",
                a.id,
                b.id,
                e
            );
            NEUTRAL_COMPATIBILITY
        }
    }
}

/// Compatibility of two profiles, or an error for unusable input.
///
/// # Errors
///
/// [`AffectError::InvalidProfile`] when either trait vector holds a
/// non-finite value.
pub fn try_calculate_compatibility(
    a: &PersonalityProfile,
    b: &PersonalityProfile,
) -> AffectResult<f64> {
    for p in [a, b] {
        if !p.traits.is_finite() {
            return Err(AffectError::InvalidProfile(format!(
                "{} has non-finite trait values",
                p.id
            )));
        }
    }

    let score = TRAIT_WEIGHT * trait_similarity(a, b)
        + STYLE_WEIGHT * learning_style_match(a, b)
        + CULTURE_WEIGHT * cultural_compatibility(a.cultural_background, b.cultural_background)
        + MOTIVATION_WEIGHT * motivation_overlap(a, b);

    Ok(score.clamp(0.0, 1.0))
}

/// `1 - mean |a_i - b_i|` over the Big Five.
pub fn trait_similarity(a: &PersonalityProfile, b: &PersonalityProfile) -> f64 {
    let (av, bv) = (a.traits.values(), b.traits.values());
    let mean_diff = av
        .iter()
        .zip(bv.iter())
        .map(|(x, y)| (x - y).abs())
        .sum::<f64>()
        / av.len() as f64;
    1.0 - mean_diff
}

fn learning_style_match(a: &PersonalityProfile, b: &PersonalityProfile) -> f64 {
    if a.learning_style == b.learning_style {
        1.0
    } else {
        DIFFERENT_STYLE_SCORE
    }
}

/// 1 for identical backgrounds, table value for known pairs, 0.5 otherwise.
pub fn cultural_compatibility(a: CulturalBackground, b: CulturalBackground) -> f64 {
    if a == b {
        return 1.0;
    }
    CULTURAL_AFFINITY
        .get(&(a, b))
        .or_else(|| CULTURAL_AFFINITY.get(&(b, a)))
        .copied()
        .unwrap_or(UNLISTED_CULTURE_SCORE)
}

/// Jaccard index of the motivation sets. Two empty sets count as fully compatible.
pub fn motivation_overlap(a: &PersonalityProfile, b: &PersonalityProfile) -> f64 {
    let union = a.motivation_factors.union(&b.motivation_factors).count();
    if union == 0 {
        return 1.0;
    }
    let intersection = a
        .motivation_factors
        .intersection(&b.motivation_factors)
        .count();
    intersection as f64 / union as f64
}

// ============================================================================
// Tests
// ============================================================================
