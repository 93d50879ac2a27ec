//! The `rehearse validate` command.

use std::path::PathBuf;

use anyhow::Result;

use rehearse_core::bank;

pub fn execute(bank_path: PathBuf) -> Result<()> {
    let banks = if bank_path.is_dir() {
        bank::load_bank_directory(&bank_path)?
    } else {
        vec![bank::parse_bank(&bank_path)?]
    };

    anyhow::ensure!(!banks.is_empty(), "no bank files found in {}", bank_path.display());

    let mut warning_count = 0usize;
    for bank in &banks {
        println!("{} ({}): {} questions", bank.role, bank.id, bank.questions.len());
        for warning in bank::validate_bank(bank) {
            warning_count += 1;
            match warning.question_id {
                Some(id) => println!("  warning [{id}]: {}", warning.message),
                None => println!("  warning: {}", warning.message),
            }
        }
    }

    if warning_count == 0 {
        println!("All banks valid.");
    } else {
        println!("{warning_count} warning(s) found.");
    }

    Ok(())
}
