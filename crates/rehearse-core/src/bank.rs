//! Question bank loading.
//!
//! Ships the built-in role banks and loads custom banks from TOML files and
//! directories, with validation.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Question, QuestionBank};

/// Intermediate TOML structure for parsing bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    bank: TomlBankHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlBankHeader {
    id: String,
    role: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    text: String,
}

/// Parse a single TOML file into a `QuestionBank`.
pub fn parse_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read bank file: {}", path.display()))?;

    parse_bank_str(&content, path)
}

/// Parse a TOML string into a `QuestionBank` (useful for testing).
pub fn parse_bank_str(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| Question {
            id: q.id,
            text: q.text,
        })
        .collect();

    Ok(QuestionBank {
        id: parsed.bank.id,
        role: parsed.bank.role,
        description: parsed.bank.description,
        questions,
    })
}

/// Recursively load all `.toml` bank files from a directory.
pub fn load_bank_directory(dir: &Path) -> Result<Vec<QuestionBank>> {
    let mut banks = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            banks.extend(load_bank_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_bank(&path) {
                Ok(bank) => banks.push(bank),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(banks)
}

/// A warning from bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a question bank for common issues.
pub fn validate_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if bank.questions.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "bank has no questions".into(),
        });
    }

    if bank.role.trim().is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "role is empty".into(),
        });
    }

    // Check for duplicate question IDs
    let mut seen_ids = std::collections::HashSet::new();
    for question in &bank.questions {
        if !seen_ids.insert(&question.id) {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: format!("duplicate question ID: {}", question.id),
            });
        }
    }

    // Check for empty question text
    for question in &bank.questions {
        if question.text.trim().is_empty() {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: "question text is empty".into(),
            });
        }
    }

    warnings
}

/// The built-in role banks, available without any files on disk.
pub fn builtin_banks() -> Vec<QuestionBank> {
    fn bank(id: &str, role: &str, questions: &[(&str, &str)]) -> QuestionBank {
        QuestionBank {
            id: id.into(),
            role: role.into(),
            description: format!("Built-in {role} interview practice"),
            questions: questions
                .iter()
                .map(|(qid, text)| Question {
                    id: (*qid).into(),
                    text: (*text).into(),
                })
                .collect(),
        }
    }

    vec![
        bank(
            "software-engineer",
            "Software Engineer",
            &[
                ("project", "Tell me about a coding project you're proud of."),
                ("debugging", "How do you approach debugging complex code?"),
                (
                    "languages",
                    "What programming languages are you most comfortable with?",
                ),
                (
                    "optimization",
                    "Explain a time you had to optimize a piece of code.",
                ),
                (
                    "learning",
                    "How do you keep up with new technologies?",
                ),
            ],
        ),
        bank(
            "product-manager",
            "Product Manager",
            &[
                (
                    "prioritization",
                    "How do you prioritize features in a product roadmap?",
                ),
                (
                    "success",
                    "Tell me about a successful product you managed.",
                ),
                (
                    "conflicts",
                    "How do you handle conflicts between stakeholders?",
                ),
                (
                    "research",
                    "Describe your process for user research.",
                ),
                (
                    "kpis",
                    "What KPIs do you typically track for a new product?",
                ),
            ],
        ),
        bank(
            "data-analyst",
            "Data Analyst",
            &[
                (
                    "insights",
                    "Tell me about a time you turned data into actionable insights.",
                ),
                (
                    "visualization",
                    "What tools do you use for data visualization?",
                ),
                (
                    "missing-data",
                    "How do you handle missing or inconsistent data?",
                ),
                (
                    "analysis",
                    "Explain a complex analysis you've conducted.",
                ),
                (
                    "validation",
                    "How do you validate the accuracy of your results?",
                ),
            ],
        ),
    ]
}

/// Find a built-in bank by role title or bank id, case-insensitively.
pub fn find_builtin(role: &str) -> Option<QuestionBank> {
    let wanted = role.trim().to_lowercase();
    builtin_banks()
        .into_iter()
        .find(|b| b.role.to_lowercase() == wanted || b.id == wanted)
}
