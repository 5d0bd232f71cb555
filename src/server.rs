//! Bot startup wiring.
//!
//! Provides the [`run`] entry point that resolves secrets, opens the profile
//! store, builds the completion relay and dispatcher, and drives the Telegram
//! poll loop. Everything that can be misconfigured fails here, before the
//! first update is fetched.

use std::sync::Arc;

use anyhow::Result;

use crate::config::MingleConfig;
use crate::dispatch::Dispatcher;
use crate::relay;
use crate::store::sqlite::SqliteProfileStore;
use crate::store::ProfileStore;
use crate::telegram::{self, TelegramClient};

/// Start the bot and poll until the process is stopped.
pub async fn run(config: MingleConfig) -> Result<()> {
    let token = match config.telegram.token.as_deref() {
        Some(token) if !token.is_empty() => token,
        _ => anyhow::bail!("TELEGRAM_TOKEN is not set"),
    };

    let db_path = config.resolved_db_path();
    let store: Arc<dyn ProfileStore> = Arc::new(SqliteProfileStore::open(&db_path)?);
    tracing::info!(db = %db_path.display(), "profile store ready");

    let provider = relay::create_provider(&config.completion)?;
    let relay: Arc<dyn relay::CompletionProvider> = Arc::from(provider);
    tracing::info!(model = %config.completion.model, "completion relay ready");

    let dispatcher = Dispatcher::new(store, relay);
    let client = TelegramClient::new(token, &config.telegram.api_url, config.telegram.poll_timeout)?;

    tokio::select! {
        result = telegram::run_polling(client, dispatcher) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutting down");
            Ok(())
        }
    }
}
