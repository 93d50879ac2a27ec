//! Interview session state machine.
//!
//! A session walks one question bank front to back, accumulating trimmed,
//! non-empty answers, and finally reviews them all in question order.

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::evaluator::Evaluator;
use crate::model::{AnswerRecord, Question, QuestionBank};
use crate::report::{ReviewEntry, SessionReport};
use crate::score;

/// Errors from driving a session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The submitted answer was empty after trimming.
    #[error("answer is empty")]
    EmptyAnswer,
    /// Every question has already been answered.
    #[error("interview is already complete")]
    AlreadyComplete,
}

/// Linear interview state: current question index plus accumulated answers.
#[derive(Debug, Clone)]
pub struct InterviewSession {
    bank: QuestionBank,
    index: usize,
    answers: Vec<AnswerRecord>,
}

impl InterviewSession {
    /// Start a fresh session over a bank.
    pub fn new(bank: QuestionBank) -> Self {
        Self {
            bank,
            index: 0,
            answers: Vec::new(),
        }
    }

    /// The role being practiced.
    pub fn role(&self) -> &str {
        &self.bank.role
    }

    /// The bank this session walks.
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// The question awaiting an answer, or `None` once complete.
    pub fn current_question(&self) -> Option<&Question> {
        self.bank.questions.get(self.index)
    }

    /// Zero-based index of the current question.
    pub fn position(&self) -> usize {
        self.index
    }

    /// Fraction of the interview completed, in 0.0..=1.0.
    pub fn progress(&self) -> f64 {
        if self.bank.questions.is_empty() {
            1.0
        } else {
            self.index as f64 / self.bank.questions.len() as f64
        }
    }

    /// `true` once every question has an answer.
    pub fn is_complete(&self) -> bool {
        self.index >= self.bank.questions.len()
    }

    /// The answers recorded so far, in question order.
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    /// Record an answer for the current question and advance.
    ///
    /// The answer is whitespace-trimmed first; an empty result is rejected
    /// without advancing. This is the upstream guard the evaluator relies
    /// on: it is only ever called with non-empty answers.
    pub fn submit_answer(&mut self, raw: &str) -> Result<(), SessionError> {
        let question = self
            .current_question()
            .ok_or(SessionError::AlreadyComplete)?;

        let answer = raw.trim();
        if answer.is_empty() {
            return Err(SessionError::EmptyAnswer);
        }

        self.answers.push(AnswerRecord {
            question: question.text.clone(),
            answer: answer.to_string(),
        });
        self.index += 1;
        Ok(())
    }

    /// Discard all answers and return to the first question.
    pub fn restart(&mut self) {
        self.index = 0;
        self.answers.clear();
    }

    /// Evaluate every recorded answer in question order and build the
    /// session report.
    ///
    /// Evaluation is strictly sequential: each generation call completes
    /// before the next begins. A failed evaluation is recorded in its entry
    /// and the loop continues; one failure never aborts the rest.
    pub async fn review(&self, evaluator: &mut Evaluator) -> SessionReport {
        let mut entries = Vec::with_capacity(self.answers.len());

        for record in &self.answers {
            let result = evaluator.evaluate(&record.question, &record.answer).await;
            if result.is_failed() {
                tracing::warn!(question = %record.question, "evaluation failed; continuing");
            }
            entries.push(ReviewEntry {
                question: record.question.clone(),
                answer: record.answer.clone(),
                result,
            });
        }

        let aggregate = score::aggregate(entries.iter().map(|e| &e.result));
        let tier = aggregate.tier();

        SessionReport {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            role: self.bank.role.clone(),
            bank_id: self.bank.id.clone(),
            model: evaluator.model().to_string(),
            entries,
            aggregate,
            tier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::model::EvaluationResult;
    use crate::score::Tier;
    use crate::traits::{GenerateRequest, GenerateResponse, TextGenerator, TokenUsage};

    fn two_question_bank() -> QuestionBank {
        QuestionBank {
            id: "mini".into(),
            role: "Software Engineer".into(),
            description: String::new(),
            questions: vec![
                Question {
                    id: "q1".into(),
                    text: "Tell me about a coding project you're proud of.".into(),
                },
                Question {
                    id: "q2".into(),
                    text: "How do you approach debugging complex code?".into(),
                },
            ],
        }
    }

    #[test]
    fn walks_questions_in_order() {
        let mut session = InterviewSession::new(two_question_bank());
        assert_eq!(session.progress(), 0.0);
        assert_eq!(session.current_question().unwrap().id, "q1");

        session.submit_answer("I built a linker.").unwrap();
        assert_eq!(session.progress(), 0.5);
        assert_eq!(session.current_question().unwrap().id, "q2");

        session.submit_answer("Bisect and log.").unwrap();
        assert!(session.is_complete());
        assert!(session.current_question().is_none());
        assert_eq!(session.answers().len(), 2);
    }

    #[test]
    fn empty_answer_is_rejected_without_advancing() {
        let mut session = InterviewSession::new(two_question_bank());
        assert_eq!(session.submit_answer("   \t "), Err(SessionError::EmptyAnswer));
        assert_eq!(session.position(), 0);
        assert!(session.answers().is_empty());
    }

    #[test]
    fn answers_are_trimmed() {
        let mut session = InterviewSession::new(two_question_bank());
        session.submit_answer("  I built a linker.  \n").unwrap();
        assert_eq!(session.answers()[0].answer, "I built a linker.");
    }

    #[test]
    fn submit_after_complete_errors() {
        let mut session = InterviewSession::new(two_question_bank());
        session.submit_answer("one").unwrap();
        session.submit_answer("two").unwrap();
        assert_eq!(
            session.submit_answer("three"),
            Err(SessionError::AlreadyComplete)
        );
    }

    #[test]
    fn restart_discards_answers() {
        let mut session = InterviewSession::new(two_question_bank());
        session.submit_answer("one").unwrap();
        session.restart();
        assert_eq!(session.position(), 0);
        assert!(session.answers().is_empty());
        assert_eq!(session.current_question().unwrap().id, "q1");
    }

    /// Scores the first question, refuses JSON for the second.
    struct SplitGenerator;

    #[async_trait]
    impl TextGenerator for SplitGenerator {
        fn name(&self) -> &str {
            "split"
        }

        async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
            let content = if request.prompt.contains("proud of") {
                r#"{"relevance": 10, "clarity": 10, "confidence": 10, "grammar": 10, "overall_feedback": "Excellent."}"#
            } else {
                "No structured verdict from me."
            };
            Ok(GenerateResponse {
                content: content.into(),
                model: request.model.clone(),
                token_usage: TokenUsage::default(),
                latency_ms: 1,
            })
        }
    }

    #[tokio::test]
    async fn review_continues_past_failures_and_excludes_them() {
        let mut session = InterviewSession::new(two_question_bank());
        session.submit_answer("I built a linker.").unwrap();
        session.submit_answer("Bisect and log.").unwrap();

        let mut evaluator = Evaluator::new(Arc::new(SplitGenerator), "llama3:8b");
        let report = session.review(&mut evaluator).await;

        assert_eq!(report.entries.len(), 2);
        assert!(matches!(
            report.entries[0].result,
            EvaluationResult::Scored(_)
        ));
        assert!(report.entries[1].result.is_failed());

        // The failed entry is excluded from both sides of the ratio.
        assert_eq!(report.aggregate.total_points, 40.0);
        assert_eq!(report.aggregate.max_points, 40);
        assert_eq!(report.aggregate.percent, 100.0);
        assert_eq!(report.tier, Tier::Strong);
        assert_eq!(report.model, "llama3:8b");
        assert_eq!(report.role, "Software Engineer");
    }

    #[tokio::test]
    async fn review_of_unanswered_session_is_empty_and_weak() {
        let session = InterviewSession::new(two_question_bank());
        let mut evaluator = Evaluator::new(Arc::new(SplitGenerator), "llama3:8b");
        let report = session.review(&mut evaluator).await;

        assert!(report.entries.is_empty());
        assert_eq!(report.aggregate.percent, 0.0);
        assert_eq!(report.tier, Tier::Weak);
    }
}
