//! Emotion sequence templates for the template-matched pattern families.

use crate::affect::Emotion;
use crate::affect::Emotion::*;

/// Negative-to-positive cycles that mark a concept being worked through.
pub const LEARNING_CYCLE_TEMPLATES: &[&[Emotion]] = &[
    &[Fear, Anger, Anticipation, Joy],
    &[Sadness, Anger, Anticipation, Joy],
    &[Surprise, Fear, Trust, Joy],
];

/// Escalation template; windows must also rise strictly in intensity.
pub const FRUSTRATION_SPIRAL_TEMPLATE: &[Emotion] = &[Anger, Fear, Anger, Disgust];

/// Sequences ending in positive emotions; windows must also gain valence.
pub const CONFIDENCE_BUILD_TEMPLATES: &[&[Emotion]] = &[
    &[Fear, Trust, Joy],
    &[Sadness, Anticipation, Trust],
    &[Anticipation, Trust, Joy],
];

/// Recovery template; windows must also swing from deep negative to positive valence.
pub const RECOVERY_BOUNCE_TEMPLATE: &[Emotion] = &[Sadness, Anger, Anticipation, Joy];

/// The adjacent pair a breakthrough consists of.
pub const BREAKTHROUGH_PAIR: [Emotion; 2] = [Surprise, Joy];
