//! The answer evaluator.
//!
//! Turns one (question, answer) pair into a structured score or a structured
//! failure, using a single text-generation call as the sole source of
//! judgment. Every failure mode is absorbed into
//! [`EvaluationResult::Failed`]; no error ever escapes to the caller.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::model::{EvaluationResult, ScoreCard};
use crate::traits::{GenerateRequest, TextGenerator};

/// Prompt sent to the model for each answer. `{question}` and `{answer}`
/// are replaced verbatim; the JSON shape in the body is the contract the
/// parser expects back.
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"You are an AI Interview Evaluator. Evaluate the candidate's answer to the interview question below.

Question: {question}
Answer: {answer}

Return only a JSON object with these fields:
{
  "relevance": Integer score from 1 to 10,
  "clarity": Integer score from 1 to 10,
  "confidence": Integer score from 1 to 10,
  "grammar": Integer score from 1 to 10,
  "overall_feedback": Short feedback (2-3 lines)
}
"#;

/// Build the evaluation prompt for one (question, answer) pair.
pub fn build_prompt(question: &str, answer: &str) -> String {
    EVALUATION_PROMPT_TEMPLATE
        .replacen("{question}", question, 1)
        .replacen("{answer}", answer, 1)
}

/// Why an evaluation produced no score.
///
/// The `Display` strings become the `reason` field of
/// [`EvaluationResult::Failed`].
#[derive(Debug, Error)]
pub enum EvaluationError {
    /// The generation call itself failed (network/service/model error).
    #[error("generation request failed: {0}")]
    Generation(String),

    /// The model's text contained no `{...}` span.
    #[error("no JSON object found in model output")]
    NoJsonObject,

    /// A `{...}` span was found but did not parse as a score card.
    #[error("model output did not parse as a score card: {0}")]
    Malformed(String),
}

/// Locate the JSON-like span in free-form model output.
///
/// Deliberately lenient: the span runs from the *first* `{` to the *last*
/// `}` in the text. This is not a balanced-brace parse. A stray closing
/// brace after the object drags trailing garbage into the span, and the
/// structural parse then rejects it; that failure mode is part of the
/// documented policy. Do not upgrade this to a real scanner.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Strip end-of-line `//...` comment fragments from a JSON span.
///
/// Some local models annotate their JSON ("\"grammar\": 8 // solid").
/// Everything from `//` to the end of each line is removed, even inside
/// string values, so a URL in the feedback text gets truncated.
pub fn strip_line_comments(span: &str) -> String {
    span.lines()
        .map(|line| match line.find("//") {
            Some(pos) => &line[..pos],
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Evaluates answers by prompting a text-generation backend and parsing its
/// JSON verdict.
///
/// Results are memoized by the exact (question, answer) pair in a map owned
/// by this struct: a repeated call returns the cached result without
/// spending another generation call. The cache is unbounded and never
/// invalidated. It exists so that re-rendering a review does not re-invoke
/// the model, not as a performance cache under load.
pub struct Evaluator {
    generator: Arc<dyn TextGenerator>,
    model: String,
    temperature: f64,
    cache: HashMap<(String, String), EvaluationResult>,
}

impl Evaluator {
    /// Create an evaluator for the given backend and model.
    pub fn new(generator: Arc<dyn TextGenerator>, model: impl Into<String>) -> Self {
        Self {
            generator,
            model: model.into(),
            temperature: 0.0,
            cache: HashMap::new(),
        }
    }

    /// Override the sampling temperature (default 0.0).
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// The model this evaluator prompts.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Number of memoized (question, answer) pairs.
    pub fn cached_evaluations(&self) -> usize {
        self.cache.len()
    }

    /// Evaluate one (question, answer) pair.
    ///
    /// Exactly one generation call is made per distinct pair; identical
    /// pairs are served from the cache. This method is infallible by
    /// design: every error is converted into [`EvaluationResult::Failed`].
    pub async fn evaluate(&mut self, question: &str, answer: &str) -> EvaluationResult {
        let key = (question.to_string(), answer.to_string());
        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(question = %key.0, "evaluation cache hit");
            return hit.clone();
        }

        let result = self.evaluate_uncached(question, answer).await;
        self.cache.insert(key, result.clone());
        result
    }

    async fn evaluate_uncached(&self, question: &str, answer: &str) -> EvaluationResult {
        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: build_prompt(question, answer),
            system_prompt: None,
            temperature: self.temperature,
        };

        let raw = match self.generator.generate(&request).await {
            Ok(response) => response.content,
            Err(e) => {
                let reason = EvaluationError::Generation(format!("{e:#}")).to_string();
                tracing::warn!(%reason, "evaluation failed before any response was received");
                return EvaluationResult::Failed {
                    reason,
                    raw_output: String::new(),
                };
            }
        };

        let span = match extract_json_object(&raw) {
            Some(span) => span,
            None => {
                let reason = EvaluationError::NoJsonObject.to_string();
                tracing::warn!(%reason, "model output had no structured content");
                return EvaluationResult::Failed {
                    reason,
                    raw_output: raw,
                };
            }
        };

        let cleaned = strip_line_comments(span);
        match serde_json::from_str::<ScoreCard>(&cleaned) {
            Ok(card) => EvaluationResult::Scored(card),
            Err(e) => {
                let reason = EvaluationError::Malformed(e.to_string()).to_string();
                tracing::warn!(%reason, "structured span did not parse");
                EvaluationResult::Failed {
                    reason,
                    raw_output: raw,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    use crate::traits::{GenerateResponse, TokenUsage};

    /// Test backend returning a canned response and counting calls.
    struct CannedGenerator {
        content: String,
        calls: AtomicU32,
    }

    impl CannedGenerator {
        fn new(content: &str) -> Self {
            Self {
                content: content.to_string(),
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::Relaxed)
        }
    }

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        fn name(&self) -> &str {
            "canned"
        }

        async fn generate(&self, _: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Ok(GenerateResponse {
                content: self.content.clone(),
                model: "canned".into(),
                token_usage: TokenUsage::default(),
                latency_ms: 1,
            })
        }
    }

    /// Test backend whose every call errors.
    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        fn name(&self) -> &str {
            "failing"
        }

        async fn generate(&self, _: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
            anyhow::bail!("connection refused")
        }
    }

    const GOOD_VERDICT: &str = r#"{
  "relevance": 8,
  "clarity": 7,
  "confidence": 9,
  "grammar": 10,
  "overall_feedback": "Concrete and well structured."
}"#;

    #[test]
    fn prompt_embeds_question_and_answer_verbatim() {
        let prompt = build_prompt("Why Rust?", "Because of the borrow checker.");
        assert!(prompt.contains("Question: Why Rust?"));
        assert!(prompt.contains("Answer: Because of the borrow checker."));
        assert!(prompt.contains("\"overall_feedback\""));
    }

    #[test]
    fn extract_spans_first_to_last_brace() {
        assert_eq!(extract_json_object("ab {1} cd {2} ef"), Some("{1} cd {2}"));
        assert_eq!(extract_json_object("{\"a\": 1}"), Some("{\"a\": 1}"));
        assert_eq!(extract_json_object("no braces here"), None);
        assert_eq!(extract_json_object("open { only"), None);
        assert_eq!(extract_json_object("} reversed {"), None);
    }

    #[test]
    fn strip_comments_truncates_to_end_of_line() {
        let span = "{\n  \"grammar\": 8, // solid\n  \"clarity\": 7\n}";
        let cleaned = strip_line_comments(span);
        assert!(!cleaned.contains("solid"));
        assert!(cleaned.contains("\"clarity\": 7"));
    }

    #[test]
    fn strip_comments_also_mangles_urls() {
        // Intentional: the heuristic does not understand string context.
        let cleaned = strip_line_comments("{\"overall_feedback\": \"see https://example.com\"}");
        assert_eq!(cleaned, "{\"overall_feedback\": \"see https:");
    }

    #[tokio::test]
    async fn well_formed_verdict_scores() {
        let generator = Arc::new(CannedGenerator::new(GOOD_VERDICT));
        let mut evaluator = Evaluator::new(generator, "llama3:8b");

        let result = evaluator.evaluate("Why Rust?", "Memory safety.").await;
        let card = result.score_card().expect("should be scored");
        assert_eq!(card.relevance, 8.0);
        assert_eq!(card.clarity, 7.0);
        assert_eq!(card.confidence, 9.0);
        assert_eq!(card.grammar, 10.0);
        assert_eq!(card.overall_feedback, "Concrete and well structured.");
    }

    #[tokio::test]
    async fn verdict_embedded_in_prose_still_parses() {
        let content = format!("Here is my assessment:\n\n{GOOD_VERDICT}\n\nGood luck!");
        // Prose after the object has no brace, so the span is exactly the object.
        let generator = Arc::new(CannedGenerator::new(&content));
        let mut evaluator = Evaluator::new(generator, "llama3:8b");

        let result = evaluator.evaluate("Q", "A").await;
        assert!(result.score_card().is_some());
    }

    #[tokio::test]
    async fn identical_pair_is_memoized() {
        let generator = Arc::new(CannedGenerator::new(GOOD_VERDICT));
        let mut evaluator = Evaluator::new(Arc::clone(&generator) as Arc<dyn TextGenerator>, "m");

        let first = evaluator.evaluate("Q", "A").await;
        let second = evaluator.evaluate("Q", "A").await;
        assert_eq!(first, second);
        assert_eq!(generator.calls(), 1, "identical pair must not re-invoke");
        assert_eq!(evaluator.cached_evaluations(), 1);
    }

    #[tokio::test]
    async fn distinct_pairs_each_invoke_once() {
        let generator = Arc::new(CannedGenerator::new(GOOD_VERDICT));
        let mut evaluator = Evaluator::new(Arc::clone(&generator) as Arc<dyn TextGenerator>, "m");

        evaluator.evaluate("Q", "first answer").await;
        evaluator.evaluate("Q", "second answer").await;
        evaluator.evaluate("Q", "first answer").await;
        assert_eq!(generator.calls(), 2);
        assert_eq!(evaluator.cached_evaluations(), 2);
    }

    #[tokio::test]
    async fn failures_are_memoized_too() {
        let generator = Arc::new(CannedGenerator::new("I will not answer in JSON."));
        let mut evaluator = Evaluator::new(Arc::clone(&generator) as Arc<dyn TextGenerator>, "m");

        let first = evaluator.evaluate("Q", "A").await;
        let second = evaluator.evaluate("Q", "A").await;
        assert!(first.is_failed());
        assert_eq!(first, second);
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn no_brace_captures_full_raw_output() {
        let text = "Sorry, I can only give verbal feedback.";
        let generator = Arc::new(CannedGenerator::new(text));
        let mut evaluator = Evaluator::new(generator, "m");

        match evaluator.evaluate("Q", "A").await {
            EvaluationResult::Failed { reason, raw_output } => {
                assert!(reason.contains("no JSON object"));
                assert_eq!(raw_output, text);
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn trailing_comment_inside_span_is_stripped() {
        let content = r#"{
  "relevance": 8, // on topic
  "clarity": 7,
  "confidence": 9,
  "grammar": 10,
  "overall_feedback": "Good."
}"#;
        let generator = Arc::new(CannedGenerator::new(content));
        let mut evaluator = Evaluator::new(generator, "m");

        let result = evaluator.evaluate("Q", "A").await;
        let card = result.score_card().expect("comment should be stripped");
        assert_eq!(card.relevance, 8.0);
    }

    #[tokio::test]
    async fn malformed_span_captures_full_raw_output() {
        let text = "Verdict: {relevance: high, clarity: fine}";
        let generator = Arc::new(CannedGenerator::new(text));
        let mut evaluator = Evaluator::new(generator, "m");

        match evaluator.evaluate("Q", "A").await {
            EvaluationResult::Failed { reason, raw_output } => {
                assert!(reason.contains("did not parse"));
                assert_eq!(raw_output, text);
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_key_is_malformed() {
        // Four keys only; the contract requires all five.
        let content = r#"{"relevance": 8, "clarity": 7, "confidence": 9, "grammar": 10}"#;
        let generator = Arc::new(CannedGenerator::new(content));
        let mut evaluator = Evaluator::new(generator, "m");

        assert!(evaluator.evaluate("Q", "A").await.is_failed());
    }

    #[tokio::test]
    async fn generation_error_yields_empty_raw_output() {
        let mut evaluator = Evaluator::new(Arc::new(FailingGenerator), "m");

        match evaluator.evaluate("Q", "A").await {
            EvaluationResult::Failed { reason, raw_output } => {
                assert!(reason.contains("generation request failed"));
                assert!(reason.contains("connection refused"));
                assert_eq!(raw_output, "");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }
}
