//! The `rehearse render` command.

use std::path::PathBuf;

use anyhow::Result;

use rehearse_core::report::SessionReport;
use rehearse_report::{generate_html, generate_markdown};

pub fn execute(report_path: PathBuf, format: String, output: Option<PathBuf>) -> Result<()> {
    let report = SessionReport::load_json(&report_path)?;

    let rendered = match format.as_str() {
        "markdown" => generate_markdown(&report),
        "html" => generate_html(&report),
        other => anyhow::bail!("unknown format '{other}' (expected markdown or html)"),
    };

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, rendered)?;
            eprintln!("Rendered report: {}", path.display());
        }
        None => {
            println!("{rendered}");
        }
    }

    Ok(())
}
