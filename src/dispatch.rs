//! Command routing and reply rendering.
//!
//! [`Dispatcher`] is the application context: it owns the profile store and
//! the completion relay, and routes each inbound message to a handler. Every
//! [`BotError`] becomes a user-facing reply at this boundary. Collaborator
//! faults are logged here with operator detail; users only see a short retry
//! suggestion.

use std::sync::Arc;

use crate::error::BotError;
use crate::matching;
use crate::profile::{parse_interests, UserProfile};
use crate::relay::CompletionProvider;
use crate::store::ProfileStore;

const USAGE_SET_INTERESTS: &str = "Usage: /set_interests interest1, interest2, ...";
const INTERESTS_SAVED: &str = "Your interests have been saved!";
const PROFILE_REQUIRED: &str = "Please set your interests first with /set_interests.";
const NO_MATCHES: &str = "No users share your interests yet.";
const MATCHES_HEADER: &str = "These users share interests with you:";
const NO_RECOMMENDATIONS: &str = "Sorry, no activity suggestions for your interests yet.";
const RECOMMENDATIONS_HEADER: &str = "Based on your interests, you might enjoy:";
const STORE_READ_FAILED: &str = "Reading your profile failed. Please try again later.";
const STORE_WRITE_FAILED: &str = "Saving your interests failed. Please try again later.";
const RELAY_FAILED: &str = "The assistant could not answer right now. Please try again later.";

const HELP_TEXT: &str = "Help:\n\
    /set_interests interest1, interest2, ... - set your interests (comma separated)\n\
    /match - find users who share your interests\n\
    /recommend - get activity suggestions for your interests\n\
    Any other message is answered by the assistant.";

/// Who sent a message, as reported by the transport.
#[derive(Debug, Clone)]
pub struct Sender {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

/// One inbound text message, already stripped of transport framing.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub sender: Sender,
    pub text: String,
}

/// Where a raw message text routes.
#[derive(Debug, PartialEq)]
enum Route<'a> {
    Start,
    Help,
    SetInterests(Option<&'a str>),
    Match,
    Recommend,
    Unknown,
    Chat(&'a str),
}

/// Classify a raw message text.
///
/// A command is a message starting with `/` (no leading-whitespace trim, so
/// `"  /start"` is chat text). The command word is case-insensitive and a
/// `@botname` suffix is stripped. Anything after the first whitespace run is
/// the argument, trimmed; a whitespace-only argument counts as absent.
fn route(text: &str) -> Route<'_> {
    let Some(rest) = text.strip_prefix('/') else {
        return Route::Chat(text);
    };
    let (head, args) = match rest.split_once(char::is_whitespace) {
        Some((head, args)) => (head, args.trim()),
        None => (rest, ""),
    };
    let command = head.split('@').next().unwrap_or(head).to_ascii_lowercase();

    match command.as_str() {
        "start" => Route::Start,
        "help" => Route::Help,
        "set_interests" => Route::SetInterests((!args.is_empty()).then_some(args)),
        "match" => Route::Match,
        "recommend" => Route::Recommend,
        _ => Route::Unknown,
    }
}

/// Routes inbound messages to handlers and renders their replies.
#[derive(Clone)]
pub struct Dispatcher {
    store: Arc<dyn ProfileStore>,
    relay: Arc<dyn CompletionProvider>,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn ProfileStore>, relay: Arc<dyn CompletionProvider>) -> Self {
        Self { store, relay }
    }

    /// Handle one message. Returns the reply text, or `None` when no reply
    /// is warranted (unrecognized commands are ignored).
    pub async fn handle(&self, message: &InboundMessage) -> Option<String> {
        let result = match route(&message.text) {
            Route::Start => Ok(welcome(&message.sender)),
            Route::Help => Ok(HELP_TEXT.to_string()),
            Route::SetInterests(args) => self.set_interests(&message.sender, args).await,
            Route::Match => self.find_matches(message.sender.user_id).await,
            Route::Recommend => self.recommend(message.sender.user_id).await,
            Route::Chat(text) => self.chat(text).await,
            Route::Unknown => {
                tracing::debug!(
                    user_id = message.sender.user_id,
                    "ignoring unrecognized command"
                );
                return None;
            }
        };
        Some(result.unwrap_or_else(render_error))
    }

    /// `/set_interests`: normalize the argument and fully overwrite the
    /// sender's stored profile. An argument that normalizes to zero tokens
    /// still writes (as an empty list) and confirms.
    async fn set_interests(
        &self,
        sender: &Sender,
        args: Option<&str>,
    ) -> Result<String, BotError> {
        let raw = args.ok_or_else(|| BotError::Usage(USAGE_SET_INTERESTS.to_string()))?;
        let profile = UserProfile {
            user_id: sender.user_id,
            username: sender.username.clone(),
            first_name: sender.first_name.clone(),
            interests: parse_interests(raw),
        };
        self.store.put(&profile).await?;
        tracing::info!(
            user_id = sender.user_id,
            count = profile.interests.len(),
            "interests updated"
        );
        Ok(INTERESTS_SAVED.to_string())
    }

    /// `/match`: list users sharing interests with the sender.
    async fn find_matches(&self, user_id: i64) -> Result<String, BotError> {
        let matches = matching::find_matches(self.store.as_ref(), user_id).await?;
        if matches.is_empty() {
            return Ok(NO_MATCHES.to_string());
        }
        let mut reply = MATCHES_HEADER.to_string();
        for entry in &matches {
            reply.push('\n');
            reply.push_str(&entry.display_name);
            reply.push_str(": shared interests - ");
            reply.push_str(&entry.common.join(", "));
        }
        Ok(reply)
    }

    /// `/recommend`: suggest activities for the sender's stored interests.
    async fn recommend(&self, user_id: i64) -> Result<String, BotError> {
        let recommendations =
            matching::recommend::recommend_activities(self.store.as_ref(), user_id).await?;
        if recommendations.is_empty() {
            return Ok(NO_RECOMMENDATIONS.to_string());
        }
        let mut reply = RECOMMENDATIONS_HEADER.to_string();
        for recommendation in &recommendations {
            reply.push('\n');
            reply.push_str(&recommendation.interest);
            reply.push_str(": ");
            reply.push_str(&recommendation.activity);
        }
        Ok(reply)
    }

    /// Free-form text: relay to the completion API as-is.
    async fn chat(&self, text: &str) -> Result<String, BotError> {
        self.relay.complete(text).await
    }
}

/// Welcome message for `/start`, greeting by first name when known.
fn welcome(sender: &Sender) -> String {
    let greeting = match sender.first_name.as_deref() {
        Some(name) if !name.is_empty() => format!("Welcome, {name}!"),
        _ => "Welcome!".to_string(),
    };
    format!(
        "{greeting} I am your companion bot.\n\
         Send me any message and I will answer through the assistant.\n\
         You can also use these commands:\n\
         1. /set_interests to declare your interests (e.g. /set_interests gaming, music)\n\
         2. /match to find users who share your interests\n\
         3. /recommend to get activity suggestions\n\
         Use /help for more."
    )
}

/// Convert a handler error into reply text. Collaborator faults are logged
/// here with full detail; expected outcomes pass through silently.
fn render_error(err: BotError) -> String {
    if !err.is_user_error() {
        tracing::error!(error = %err, "command handler fault");
    }
    match err {
        BotError::ProfileRequired => PROFILE_REQUIRED.to_string(),
        BotError::Usage(text) => text,
        BotError::StoreRead(_) => STORE_READ_FAILED.to_string(),
        BotError::StoreWrite(_) => STORE_WRITE_FAILED.to_string(),
        BotError::Relay(_) => RELAY_FAILED.to_string(),
    }
}
