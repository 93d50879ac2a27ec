//! rehearse-providers — text-generation backend integrations.
//!
//! Implements the `TextGenerator` trait for a local Ollama instance, plus a
//! mock backend for testing the evaluation pipeline without a model.

pub mod config;
pub mod error;
pub mod mock;
pub mod ollama;

pub use config::{create_provider, load_config, ProviderConfig, RehearseConfig};
pub use error::ProviderError;
