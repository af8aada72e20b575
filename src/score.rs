//! Score normalization: per-backend threshold tables mapping a raw score
//! into one of five ordered emotion buckets, plus rescaling of signed
//! scores onto the shared `[0, 1]` interval used for cross-backend
//! comparisons.
//!
//! Bucket bounds are inclusive towards the lower bucket: a score equal to
//! `negative` labels as `Negative`, not `Neutral`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The five ordered emotion buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Label {
    #[serde(rename = "Very Negative")]
    VeryNegative,
    #[serde(rename = "Negative")]
    Negative,
    #[serde(rename = "Neutral")]
    Neutral,
    #[serde(rename = "Positive")]
    Positive,
    #[serde(rename = "Very Positive")]
    VeryPositive,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::VeryNegative => "Very Negative",
            Label::Negative => "Negative",
            Label::Neutral => "Neutral",
            Label::Positive => "Positive",
            Label::VeryPositive => "Very Positive",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Native output scale of a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreRange {
    /// Scores already live in `[0, 1]`.
    Unit,
    /// Scores live in `[-1, 1]`.
    Signed,
}

impl ScoreRange {
    /// Rescale a raw score onto `[0, 1]` for cross-backend comparisons.
    pub fn to_unit_interval(self, score: f32) -> f32 {
        match self {
            ScoreRange::Unit => score.clamp(0.0, 1.0),
            ScoreRange::Signed => ((score + 1.0) / 2.0).clamp(0.0, 1.0),
        }
    }

    /// The neutral point on the native scale.
    pub fn neutral(self) -> f32 {
        match self {
            ScoreRange::Unit => 0.5,
            ScoreRange::Signed => 0.0,
        }
    }
}

/// Ordered cutoffs partitioning a backend's native range into five buckets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTable {
    pub very_negative: f32,
    pub negative: f32,
    pub neutral: f32,
    pub positive: f32,
}

impl ThresholdTable {
    /// Baseline table for unit-interval backends.
    pub fn unit_default() -> Self {
        Self {
            very_negative: 0.2,
            negative: 0.4,
            neutral: 0.6,
            positive: 0.8,
        }
    }

    pub fn is_strictly_increasing(&self) -> bool {
        self.very_negative < self.negative
            && self.negative < self.neutral
            && self.neutral < self.positive
    }

    /// Bucket a raw score. Bounds belong to the lower bucket.
    pub fn label(&self, score: f32) -> Label {
        if score <= self.very_negative {
            Label::VeryNegative
        } else if score <= self.negative {
            Label::Negative
        } else if score <= self.neutral {
            Label::Neutral
        } else if score <= self.positive {
            Label::Positive
        } else {
            Label::VeryPositive
        }
    }
}
