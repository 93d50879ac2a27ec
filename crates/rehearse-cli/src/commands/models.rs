//! The `rehearse models` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use rehearse_providers::config::{load_config_from, ProviderConfig};
use rehearse_providers::ollama::OllamaGenerator;

pub async fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let ProviderConfig::Ollama { base_url } = config
        .providers
        .get("ollama")
        .context("no ollama provider configured")?;

    let generator = OllamaGenerator::new(base_url);
    let models = generator.list_models_async().await?;

    if models.is_empty() {
        println!("No models installed. Pull one with: ollama pull {}", config.default_model);
        return Ok(());
    }

    println!("Models available at {base_url}:");
    for model in models {
        let marker = if model.id == config.default_model {
            " (default)"
        } else {
            ""
        };
        println!("  {}{marker}", model.id);
    }

    Ok(())
}
