//! HTML transcript generator.
//!
//! Produces a self-contained HTML file with all CSS inlined.

use anyhow::Result;
use std::path::Path;

use rehearse_core::model::EvaluationResult;
use rehearse_core::report::SessionReport;
use rehearse_core::score::Tier;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn tier_class(tier: Tier) -> &'static str {
    match tier {
        Tier::Strong => "strong",
        Tier::Moderate => "moderate",
        Tier::Weak => "weak",
    }
}

/// Generate an HTML page from a session report.
pub fn generate_html(report: &SessionReport) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>Interview review — {}</title>\n",
        html_escape(&report.role)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str(&format!(
        "<h1>{} interview review</h1>\n",
        html_escape(&report.role)
    ));
    html.push_str(&format!(
        "<p class=\"meta\">{} questions | reviewed by <strong>{}</strong> | {}</p>\n",
        report.entries.len(),
        html_escape(&report.model),
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Overall score banner
    html.push_str(&format!(
        "<section class=\"overall {}\">\n<h2>Overall score: {:.1}%</h2>\n<p>{}</p>\n</section>\n",
        tier_class(report.tier),
        report.aggregate.percent,
        html_escape(report.tier.advice())
    ));

    // Score table
    html.push_str("<section class=\"summary\">\n");
    html.push_str("<table>\n");
    html.push_str("<thead><tr><th>#</th><th>Question</th><th>Relevance</th><th>Clarity</th><th>Confidence</th><th>Grammar</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for (i, entry) in report.entries.iter().enumerate() {
        match &entry.result {
            EvaluationResult::Scored(card) => {
                html.push_str(&format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                    i + 1,
                    html_escape(&entry.question),
                    card.relevance,
                    card.clarity,
                    card.confidence,
                    card.grammar,
                ));
            }
            EvaluationResult::Failed { .. } => {
                html.push_str(&format!(
                    "<tr class=\"failed\"><td>{}</td><td>{}</td><td colspan=\"4\">evaluation failed</td></tr>\n",
                    i + 1,
                    html_escape(&entry.question),
                ));
            }
        }
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Per-question detail
    html.push_str("<section class=\"answers\">\n");
    for (i, entry) in report.entries.iter().enumerate() {
        html.push_str("<article>\n");
        html.push_str(&format!(
            "<h3>Q{}: {}</h3>\n",
            i + 1,
            html_escape(&entry.question)
        ));
        html.push_str(&format!(
            "<p class=\"answer\">{}</p>\n",
            html_escape(&entry.answer)
        ));
        match &entry.result {
            EvaluationResult::Scored(card) => {
                html.push_str(&format!(
                    "<p class=\"feedback\">{}</p>\n",
                    html_escape(&card.overall_feedback)
                ));
            }
            EvaluationResult::Failed { reason, raw_output } => {
                html.push_str(&format!(
                    "<p class=\"failure\">Evaluation failed: {}</p>\n",
                    html_escape(reason)
                ));
                if !raw_output.is_empty() {
                    html.push_str(&format!(
                        "<pre><code>{}</code></pre>\n",
                        html_escape(raw_output)
                    ));
                }
            }
        }
        html.push_str("</article>\n");
    }
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(report)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &SessionReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --strong: #dcfce7; --moderate: #fef9c3; --weak: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --strong: #064e3b; --moderate: #713f12; --weak: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0 auto; max-width: 56rem; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2, h3 { margin-top: 1.5rem; }
.meta { color: #6b7280; }
.overall { padding: 0.5rem 1.5rem; border-radius: 8px; margin: 1rem 0; }
.overall.strong { background: var(--strong); }
.overall.moderate { background: var(--moderate); }
.overall.weak { background: var(--weak); }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
tr.failed { background: var(--weak); }
.answer { font-style: italic; }
.feedback { border-left: 3px solid var(--border); padding-left: 1rem; }
.failure { color: #b91c1c; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
"#;

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
                question: "What tools do you use for data visualization?".into(),
                answer: "Mostly <charts> & dashboards.".into(),
                result: EvaluationResult::Scored(ScoreCard {
                    relevance: 6.0,
                    clarity: 5.0,
                    confidence: 5.0,
                    grammar: 6.0,
                    overall_feedback: "Name concrete tools.".into(),
                }),
            },
            ReviewEntry {
                question: "How do you validate the accuracy of your results?".into(),
                answer: "Cross-checks.".into(),
                result: EvaluationResult::Failed {
                    reason: "generation request failed: connection refused".into(),
                    raw_output: String::new(),
                },
            },
        ];
        let aggregate = score::aggregate(entries.iter().map(|e| &e.result));
        let tier = aggregate.tier();

        SessionReport {
            id: Uuid::nil(),
            created_at: Utc::now(),
            role: "Data Analyst".into(),
            bank_id: "data-analyst".into(),
            model: "llama3:8b".into(),
            entries,
            aggregate,
            tier,
        }
    }

    #[test]
    fn html_report_contains_required_elements() {
        let html = generate_html(&make_report());

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("Data Analyst"));
        assert!(html.contains("Overall score: 55.0%"));
        assert!(html.contains("evaluation failed"));
        // 22/40 = 55% is moderate
        assert!(html.contains("class=\"overall moderate\""));
    }

    #[test]
    fn html_escapes_user_content() {
        let html = generate_html(&make_report());
        assert!(html.contains("Mostly &lt;charts&gt; &amp; dashboards."));
        assert!(!html.contains("Mostly <charts>"));
    }

    #[test]
    fn html_report_write_to_file() {
        let report = make_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("review.html");

        write_html_report(&report, &path).unwrap();
        assert!(path.exists());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }
}
