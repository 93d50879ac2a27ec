//! The `rehearse init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create rehearse.toml
    if std::path::Path::new("rehearse.toml").exists() {
        println!("rehearse.toml already exists, skipping.");
    } else {
        std::fs::write("rehearse.toml", SAMPLE_CONFIG)?;
        println!("Created rehearse.toml");
    }

    // Create example question bank
    std::fs::create_dir_all("banks")?;
    let example_path = std::path::Path::new("banks/example.toml");
    if example_path.exists() {
        println!("banks/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_BANK)?;
        println!("Created banks/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Start Ollama and pull a model: ollama pull llama3:8b");
    println!("  2. Run: rehearse validate --bank banks/example.toml");
    println!("  3. Run: rehearse practice --bank banks/example.toml");
    println!("     or pick a built-in role: rehearse practice --role \"Software Engineer\"");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# rehearse configuration

default_provider = "ollama"
default_model = "llama3:8b"
default_temperature = 0.0
output_dir = "./rehearse-reports"

[providers.ollama]
type = "ollama"
base_url = "http://localhost:11434"
"#;

const EXAMPLE_BANK: &str = r#"[bank]
id = "example"
role = "Example Role"
description = "A simple example bank to get started"

[[questions]]
id = "intro"
text = "Tell me a little about yourself."

[[questions]]
id = "strength"
text = "What is your greatest professional strength?"

[[questions]]
id = "challenge"
text = "Describe a challenge you faced recently and how you handled it."
"#;
