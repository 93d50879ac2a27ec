//! The `rehearse practice` command.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use rehearse_core::bank;
use rehearse_core::evaluator::Evaluator;
use rehearse_core::model::EvaluationResult;
use rehearse_core::report::SessionReport;
use rehearse_core::session::{InterviewSession, SessionError};
use rehearse_core::traits::TextGenerator;
use rehearse_providers::config::load_config_from;
use rehearse_providers::create_provider;
use rehearse_report::html::write_html_report;
use rehearse_report::markdown::{generate_markdown, write_markdown_report};

pub async fn execute(
    role: Option<String>,
    bank_path: Option<PathBuf>,
    model: Option<String>,
    output: PathBuf,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    // Resolve the question bank
    let bank = match (&bank_path, &role) {
        (Some(path), _) => bank::parse_bank(path)?,
        (None, Some(role)) => bank::find_builtin(role).with_context(|| {
            let available: Vec<String> =
                bank::builtin_banks().iter().map(|b| b.role.clone()).collect();
            format!("unknown role '{role}'. Built-in roles: {}", available.join(", "))
        })?,
        (None, None) => {
            anyhow::bail!("pass --role <built-in role> or --bank <file.toml>; see `rehearse roles`")
        }
    };
    anyhow::ensure!(
        !bank.questions.is_empty(),
        "bank '{}' has no questions",
        bank.id
    );

    let provider_config = config
        .providers
        .get(&config.default_provider)
        .with_context(|| format!("provider '{}' not found in config", config.default_provider))?;
    let model = model.unwrap_or_else(|| config.default_model.clone());

    let mut session = InterviewSession::new(bank);
    run_interview_loop(&mut session)?;

    eprintln!("\nEvaluating your answers with {model}. This may take a while...");

    let generator: Arc<dyn TextGenerator> = Arc::from(create_provider(provider_config)?);
    let mut evaluator =
        Evaluator::new(generator, model).with_temperature(config.default_temperature);

    // One model call per answer, strictly in order. The report built below
    // by `review` is then served entirely from the evaluator's cache.
    let total = session.answers().len();
    for (i, record) in session.answers().iter().enumerate() {
        eprintln!("  Evaluating answer {}/{total}", i + 1);
        let result = evaluator.evaluate(&record.question, &record.answer).await;
        if let EvaluationResult::Failed { reason, .. } = &result {
            eprintln!("  Evaluation failed for answer {}: {reason}", i + 1);
        }
    }
    let report = session.review(&mut evaluator).await;

    println!("\n{}", generate_markdown(&report));
    print_summary(&report);

    save_reports(&report, &output, &format)?;

    Ok(())
}

/// Present each question on stdout and read answers from stdin.
fn run_interview_loop(session: &mut InterviewSession) -> Result<()> {
    let total = session.bank().questions.len();
    println!(
        "{} interview practice: {total} questions. Type each answer and press Enter.",
        session.role()
    );

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    while !session.is_complete() {
        let question = session
            .current_question()
            .expect("incomplete session has a current question")
            .clone();
        println!("\nQuestion {} of {total}: {}", session.position() + 1, question.text);
        print!("> ");
        std::io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line.context("failed to read answer")?,
            None => anyhow::bail!("stdin closed before the interview finished"),
        };

        match session.submit_answer(&line) {
            Ok(()) => {}
            Err(SessionError::EmptyAnswer) => {
                println!("Please provide an answer before proceeding.");
            }
            Err(e) => return Err(e.into()),
        }
    }

    println!("\nYou have completed the interview!");
    Ok(())
}

fn print_summary(report: &SessionReport) {
    let mut table = Table::new();
    table.set_header(vec!["#", "Relevance", "Clarity", "Confidence", "Grammar"]);

    for (i, entry) in report.entries.iter().enumerate() {
        match &entry.result {
            EvaluationResult::Scored(card) => {
                table.add_row(vec![
                    Cell::new(i + 1),
                    Cell::new(card.relevance),
                    Cell::new(card.clarity),
                    Cell::new(card.confidence),
                    Cell::new(card.grammar),
                ]);
            }
            EvaluationResult::Failed { .. } => {
                table.add_row(vec![
                    Cell::new(i + 1),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new("-"),
                ]);
            }
        }
    }

    eprintln!("\n{table}");
    eprintln!(
        "\nOverall interview score: {:.1}% ({})",
        report.aggregate.percent, report.tier
    );
    eprintln!("{}", report.tier.advice());
}

fn save_reports(report: &SessionReport, output: &PathBuf, format: &str) -> Result<()> {
    std::fs::create_dir_all(output)?;
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");

    let formats: Vec<&str> = if format == "all" {
        vec!["json", "markdown", "html"]
    } else {
        format.split(',').map(|s| s.trim()).collect()
    };

    for fmt in &formats {
        match *fmt {
            "json" => {
                let path = output.join(format!("review-{timestamp}.json"));
                report.save_json(&path)?;
                eprintln!("Report saved to: {}", path.display());
            }
            "markdown" => {
                let path = output.join(format!("review-{timestamp}.md"));
                write_markdown_report(report, &path)?;
                eprintln!("Markdown transcript: {}", path.display());
            }
            "html" => {
                let path = output.join(format!("review-{timestamp}.html"));
                write_html_report(report, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            _ => {
                eprintln!("Unknown format: {fmt}");
            }
        }
    }

    Ok(())
}
