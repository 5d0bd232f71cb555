//! Chat relay to the external completion API.
//!
//! Provides the [`CompletionProvider`] trait and an OpenAI-compatible
//! implementation. The provider is created via [`create_provider`] from
//! configuration; a missing API key fails there, at startup, rather than on
//! the first chat message.

pub mod openai;

use anyhow::Result;
use async_trait::async_trait;

use crate::error::BotError;

/// Trait for turning a user's free-form message into a model completion.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send one prompt and return the trimmed first candidate text.
    async fn complete(&self, prompt: &str) -> Result<String, BotError>;
}

/// Create a completion provider from config.
///
/// Requires `OPENAI_API_KEY` to have been resolved into the config; bails
/// otherwise so a misconfigured process never starts polling.
pub fn create_provider(
    config: &crate::config::CompletionConfig,
) -> Result<Box<dyn CompletionProvider>> {
    let api_key = match config.api_key.as_deref() {
        Some(key) if !key.is_empty() => key.to_string(),
        _ => anyhow::bail!("OPENAI_API_KEY is not set"),
    };
    let provider = openai::OpenAiCompletions::new(config, api_key);
    Ok(Box::new(provider))
}
