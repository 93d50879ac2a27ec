//! Markdown transcript generator.

use std::path::Path;

use anyhow::Result;

use rehearse_core::model::EvaluationResult;
use rehearse_core::report::SessionReport;

/// Render a session report as a Markdown transcript.
pub fn generate_markdown(report: &SessionReport) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Interview Review: {}\n\n", report.role));
    md.push_str(&format!(
        "_Reviewed by `{}` on {}_\n\n",
        report.model,
        report.created_at.format("%Y-%m-%d %H:%M UTC")
    ));

    for (i, entry) in report.entries.iter().enumerate() {
        let n = i + 1;
        md.push_str(&format!("**Q{n}:** {}\n\n", entry.question));
        md.push_str(&format!("**A{n}:** {}\n\n", entry.answer));

        match &entry.result {
            EvaluationResult::Scored(card) => {
                md.push_str(&format!(
                    "- Scores: Relevance: {}, Clarity: {}, Confidence: {}, Grammar: {}\n",
                    card.relevance, card.clarity, card.confidence, card.grammar
                ));
                md.push_str(&format!("- Feedback: _{}_\n", card.overall_feedback));
            }
            EvaluationResult::Failed { reason, raw_output } => {
                md.push_str(&format!("Evaluation failed: {reason}\n"));
                if !raw_output.is_empty() {
                    md.push_str(&format!("\n```\n{raw_output}\n```\n"));
                }
            }
        }
        md.push_str("\n---\n\n");
    }

    md.push_str(&format!(
        "## Overall Interview Score: **{:.1}%**\n\n",
        report.aggregate.percent
    ));
    md.push_str(&format!(
        "{} points of {} across {} scored answers",
        report.aggregate.total_points,
        report.aggregate.max_points,
        report.entries.len() - report.failed_count()
    ));
    if report.failed_count() > 0 {
        md.push_str(&format!(
            " ({} evaluations failed and were excluded)",
            report.failed_count()
        ));
    }
    md.push_str(".\n\n");
    md.push_str(report.tier.advice());
    md.push('\n');

    md
}

/// Write a Markdown transcript to a file.
pub fn write_markdown_report(report: &SessionReport, path: &Path) -> Result<()> {
    let md = generate_markdown(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, md)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    use rehearse_core::model::ScoreCard;
    use rehearse_core::report::ReviewEntry;
    use rehearse_core::score;

    fn make_report() -> SessionReport {
        let entries = vec![
            ReviewEntry {
                question: "Tell me about a coding project you're proud of.".into(),
                answer: "I wrote a toy database.".into(),
                result: EvaluationResult::Scored(ScoreCard {
                    relevance: 9.0,
                    clarity: 8.0,
                    confidence: 8.0,
                    grammar: 9.0,
                    overall_feedback: "Specific and enthusiastic.".into(),
                }),
            },
            ReviewEntry {
                question: "How do you keep up with new technologies?".into(),
                answer: "Newsletters, mostly.".into(),
                result: EvaluationResult::Failed {
                    reason: "no JSON object found in model output".into(),
                    raw_output: "This answer is too short to rate.".into(),
                },
            },
        ];
        let aggregate = score::aggregate(entries.iter().map(|e| &e.result));
        let tier = aggregate.tier();

        SessionReport {
            id: Uuid::nil(),
            created_at: Utc::now(),
            role: "Software Engineer".into(),
            bank_id: "software-engineer".into(),
            model: "llama3:8b".into(),
            entries,
            aggregate,
            tier,
        }
    }

    #[test]
    fn transcript_contains_questions_scores_and_tier_advice() {
        let md = generate_markdown(&make_report());

        assert!(md.contains("# Interview Review: Software Engineer"));
        assert!(md.contains("**Q1:** Tell me about a coding project"));
        assert!(md.contains("Relevance: 9, Clarity: 8, Confidence: 8, Grammar: 9"));
        assert!(md.contains("_Specific and enthusiastic._"));
        assert!(md.contains("Evaluation failed: no JSON object"));
        assert!(md.contains("This answer is too short to rate."));
        assert!(md.contains("Overall Interview Score: **85.0%**"));
        assert!(md.contains("Great job! You're well prepared."));
        assert!(md.contains("1 evaluations failed"));
    }

    #[test]
    fn write_to_file() {
        let report = make_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("review.md");

        write_markdown_report(&report, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Interview Review"));
    }
}
