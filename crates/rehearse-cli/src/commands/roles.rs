//! The `rehearse roles` command.

use std::path::PathBuf;

use anyhow::Result;

use rehearse_core::bank;

pub fn execute(banks_dir: Option<PathBuf>) -> Result<()> {
    println!("Built-in roles:");
    for bank in bank::builtin_banks() {
        println!(
            "  {} ({}) - {} questions",
            bank.role,
            bank.id,
            bank.questions.len()
        );
    }

    if let Some(dir) = banks_dir {
        let custom = bank::load_bank_directory(&dir)?;
        if custom.is_empty() {
            println!("\nNo custom banks found in {}", dir.display());
        } else {
            println!("\nCustom banks in {}:", dir.display());
            for bank in custom {
                println!(
                    "  {} ({}) - {} questions",
                    bank.role,
                    bank.id,
                    bank.questions.len()
                );
            }
        }
    }

    Ok(())
}
