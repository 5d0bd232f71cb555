//! Telegram Bot API transport.
//!
//! [`TelegramClient`] wraps the two Bot API methods the bot needs, long-poll
//! `getUpdates` and `sendMessage`. [`run_polling`] drives the receive loop:
//! one spawned task per update, with a per-user gate so one user's commands
//! never interleave while different users proceed concurrently.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::dispatch::{Dispatcher, InboundMessage, Sender};

const RETRY_DELAY: Duration = Duration::from_secs(3);

// ── Wire types ──────────────────────────────────────────────────────────────

/// One long-poll update. Fields beyond what the bot consumes are ignored.
#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub from: Option<User>,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
}

/// Telegram's standard response envelope.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Serialize)]
struct GetUpdatesRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    timeout: u64,
    allowed_updates: &'a [&'a str],
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
}

fn into_result<T>(response: ApiResponse<T>) -> Result<T> {
    if !response.ok {
        bail!(
            "telegram API error: {}",
            response.description.as_deref().unwrap_or("no description")
        );
    }
    response
        .result
        .context("telegram API returned ok without a result")
}

// ── Client ──────────────────────────────────────────────────────────────────

/// Thin client for the two Bot API calls the bot uses.
#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
    poll_timeout: u64,
}

impl TelegramClient {
    /// Build a client for the given bot token.
    ///
    /// The HTTP timeout is set above the long-poll timeout so an idle
    /// `getUpdates` can return empty instead of erroring.
    pub fn new(token: &str, api_url: &str, poll_timeout: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(poll_timeout + 10))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
            poll_timeout,
        })
    }

    /// Long-poll for updates past `offset`. Returns empty on an idle timeout.
    pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>> {
        let request = GetUpdatesRequest {
            offset,
            timeout: self.poll_timeout,
            allowed_updates: &["message"],
        };
        let response: ApiResponse<Vec<Update>> = self
            .http
            .post(format!("{}/getUpdates", self.base_url))
            .json(&request)
            .send()
            .await
            .context("getUpdates request failed")?
            .json()
            .await
            .context("getUpdates response undecodable")?;
        into_result(response)
    }

    /// Send one text reply to a chat.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let request = SendMessageRequest { chat_id, text };
        let response: ApiResponse<serde_json::Value> = self
            .http
            .post(format!("{}/sendMessage", self.base_url))
            .json(&request)
            .send()
            .await
            .context("sendMessage request failed")?
            .json()
            .await
            .context("sendMessage response undecodable")?;
        into_result(response).map(|_| ())
    }
}

// ── Poll loop ───────────────────────────────────────────────────────────────

/// Map one update to the chat to answer and the message to dispatch.
/// Updates without a text message or a sender carry nothing to handle.
fn inbound_from_update(update: Update) -> Option<(i64, InboundMessage)> {
    let message = update.message?;
    let chat_id = message.chat.id;
    let (Some(from), Some(text)) = (message.from, message.text) else {
        return None;
    };
    let inbound = InboundMessage {
        sender: Sender {
            user_id: from.id,
            username: from.username,
            first_name: from.first_name,
        },
        text,
    };
    Some((chat_id, inbound))
}

/// Per-user serialization gates. Holding a user's gate across dispatch and
/// reply keeps that user's operations atomic relative to each other.
#[derive(Clone, Default)]
struct UserGates {
    inner: Arc<Mutex<HashMap<i64, Arc<tokio::sync::Mutex<()>>>>>,
}

impl UserGates {
    fn for_user(&self, user_id: i64) -> Arc<tokio::sync::Mutex<()>> {
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        map.entry(user_id).or_default().clone()
    }

    /// Drop gates no task holds. A dispatch task keeps a clone of its gate
    /// alive until it finishes, so live entries carry extra references.
    fn sweep(&self) {
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        map.retain(|_, gate| Arc::strong_count(gate) > 1);
    }
}

/// Drive the receive loop forever.
///
/// `getUpdates` failures log a warning and back off; they never kill the
/// loop. Each update is handled on its own task so a slow completion call
/// for one user does not stall the poll. Gates left idle by finished tasks
/// are reclaimed between batches.
pub async fn run_polling(client: TelegramClient, dispatcher: Dispatcher) -> Result<()> {
    let gates = UserGates::default();
    let mut offset: Option<i64> = None;

    tracing::info!("bot started, waiting for messages");
    loop {
        let updates = match client.get_updates(offset).await {
            Ok(updates) => updates,
            Err(err) => {
                tracing::warn!(error = %err, "getUpdates failed, backing off");
                tokio::time::sleep(RETRY_DELAY).await;
                continue;
            }
        };
        gates.sweep();

        for update in updates {
            let next = update.update_id + 1;
            offset = Some(offset.map_or(next, |current| current.max(next)));

            let Some((chat_id, inbound)) = inbound_from_update(update) else {
                continue;
            };
            let gate = gates.for_user(inbound.sender.user_id);
            let client = client.clone();
            let dispatcher = dispatcher.clone();

            tokio::spawn(async move {
                let _guard = gate.lock().await;
                if let Some(reply) = dispatcher.handle(&inbound).await {
                    if let Err(err) = client.send_message(chat_id, &reply).await {
                        tracing::error!(chat_id, error = %err, "sendMessage failed");
                    }
                }
            });
        }
    }
}
