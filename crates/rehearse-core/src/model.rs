//! Core data model types for rehearse.
//!
//! These are the fundamental types that the entire rehearse system uses to
//! represent question banks, recorded answers, and evaluation outcomes.

use serde::{Deserialize, Serialize};

/// A single interview question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier within the bank.
    pub id: String,
    /// The question text presented to the candidate.
    pub text: String,
}

/// An ordered collection of questions for one professional role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBank {
    /// Unique identifier for this bank.
    pub id: String,
    /// The role this bank practices (e.g. "Software Engineer").
    pub role: String,
    /// Description of this bank.
    #[serde(default)]
    pub description: String,
    /// The questions, in presentation order.
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// A question together with the answer the candidate gave for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRecord {
    /// The question text, verbatim.
    pub question: String,
    /// The candidate's answer, already whitespace-trimmed and non-empty.
    pub answer: String,
}

/// The structured verdict the model must return for one answer.
///
/// The four sub-scores are nominally integers in 1..=10, but they are kept
/// as `f64` and passed through exactly as the model produced them: no
/// clamping, no integer check. An out-of-range value flows into the
/// aggregate unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    /// How on-topic the answer was.
    pub relevance: f64,
    /// How clearly the answer was expressed.
    pub clarity: f64,
    /// How confident the answer sounded.
    pub confidence: f64,
    /// Grammatical quality of the answer.
    pub grammar: f64,
    /// Short free-form feedback (2-3 lines).
    pub overall_feedback: String,
}

impl ScoreCard {
    /// Sum of the four sub-scores, out of a nominal 40.
    pub fn total(&self) -> f64 {
        self.relevance + self.clarity + self.confidence + self.grammar
    }
}

/// Outcome of evaluating one (question, answer) pair.
///
/// Exactly one variant is ever produced per evaluation: either the model's
/// verdict parsed into a [`ScoreCard`], or a typed failure record. The
/// evaluator never raises; every error becomes `Failed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum EvaluationResult {
    /// The model returned a parseable five-key verdict.
    Scored(ScoreCard),
    /// The generation call or the parse failed.
    Failed {
        /// What went wrong, in one line.
        reason: String,
        /// Best-effort capture of the model's raw text; empty if no
        /// response was ever received.
        raw_output: String,
    },
}

impl EvaluationResult {
    /// Returns the score card if this result is `Scored`.
    pub fn score_card(&self) -> Option<&ScoreCard> {
        match self {
            EvaluationResult::Scored(card) => Some(card),
            EvaluationResult::Failed { .. } => None,
        }
    }

    /// Returns `true` if this result is a failure record.
    pub fn is_failed(&self) -> bool {
        matches!(self, EvaluationResult::Failed { .. })
    }
}
