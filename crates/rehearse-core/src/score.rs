//! Score aggregation and tier classification.
//!
//! Folds a sequence of evaluation results into one aggregate score and maps
//! the percentage onto a qualitative tier.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::EvaluationResult;

/// Points available per scored question (four sub-scores of up to 10 each).
pub const POINTS_PER_QUESTION: u32 = 40;

/// The summed score across all evaluated answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateScore {
    /// Sum of the four sub-scores over all scored answers.
    pub total_points: f64,
    /// 40 points per scored answer. Failed evaluations contribute nothing
    /// here either: excluded, not counted as zero.
    pub max_points: u32,
    /// `100 * total_points / max_points`, or 0 when nothing was scored.
    pub percent: f64,
}

impl AggregateScore {
    /// Classify this score into a qualitative tier.
    pub fn tier(&self) -> Tier {
        Tier::from_percent(self.percent)
    }
}

/// Qualitative bucket for an overall interview score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Strong,
    Moderate,
    Weak,
}

impl Tier {
    /// Non-strict thresholds: 80 and above is strong, 50 and above is
    /// moderate, anything below is weak.
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 80.0 {
            Tier::Strong
        } else if percent >= 50.0 {
            Tier::Moderate
        } else {
            Tier::Weak
        }
    }

    /// The closing advice line shown to the candidate.
    pub fn advice(&self) -> &'static str {
        match self {
            Tier::Strong => "Great job! You're well prepared.",
            Tier::Moderate => "Decent attempt. Review the suggestions above to improve.",
            Tier::Weak => "You need more preparation. Focus on clarity and relevance.",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Strong => write!(f, "strong"),
            Tier::Moderate => write!(f, "moderate"),
            Tier::Weak => write!(f, "weak"),
        }
    }
}

/// Fold evaluation results into one aggregate score.
///
/// Each `Scored` result adds its four sub-scores to the numerator and 40 to
/// the denominator; `Failed` results are skipped entirely. Pure, with no
/// error conditions; an empty input yields percent 0.
pub fn aggregate<'a, I>(results: I) -> AggregateScore
where
    I: IntoIterator<Item = &'a EvaluationResult>,
{
    let mut total_points = 0.0;
    let mut max_points = 0u32;

    for result in results {
        if let EvaluationResult::Scored(card) = result {
            total_points += card.total();
            max_points += POINTS_PER_QUESTION;
        }
    }

    let percent = if max_points == 0 {
        0.0
    } else {
        100.0 * total_points / f64::from(max_points)
    };

    AggregateScore {
        total_points,
        max_points,
        percent,
    }
}
