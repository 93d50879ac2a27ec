//! rehearse CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "rehearse", version, about = "Interview practice with LLM-scored feedback")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interview and get scored feedback at the end
    Practice {
        /// Built-in role to practice (see `rehearse roles`)
        #[arg(long)]
        role: Option<String>,

        /// Path to a custom .toml question bank (overrides --role)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Model to judge the answers (default from config)
        #[arg(long)]
        model: Option<String>,

        /// Output directory for the session report
        #[arg(long, default_value = "./rehearse-reports")]
        output: PathBuf,

        /// Report format: json, markdown, html, all
        #[arg(long, default_value = "json")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List available roles
    Roles {
        /// Also scan a directory of custom bank files
        #[arg(long)]
        banks: Option<PathBuf>,
    },

    /// Validate question bank TOML files
    Validate {
        /// Path to a bank file or directory
        #[arg(long)]
        bank: PathBuf,
    },

    /// List models available on the local Ollama instance
    Models {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Re-render a saved session report
    Render {
        /// Path to a report JSON file
        #[arg(long)]
        report: PathBuf,

        /// Output format: markdown, html
        #[arg(long, default_value = "markdown")]
        format: String,

        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Create starter config and an example question bank
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rehearse=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Practice {
            role,
            bank,
            model,
            output,
            format,
            config,
        } => commands::practice::execute(role, bank, model, output, format, config).await,
        Commands::Roles { banks } => commands::roles::execute(banks),
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Models { config } => commands::models::execute(config).await,
        Commands::Render {
            report,
            format,
            output,
        } => commands::render::execute(report, format, output),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
