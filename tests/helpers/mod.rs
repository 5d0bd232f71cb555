#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mingle::dispatch::{InboundMessage, Sender};
use mingle::error::BotError;
use mingle::profile::UserProfile;
use mingle::relay::CompletionProvider;
use mingle::store::sqlite::SqliteProfileStore;
use mingle::store::ProfileStore;

/// Open a fresh in-memory profile store.
pub fn test_store() -> Arc<SqliteProfileStore> {
    Arc::new(SqliteProfileStore::open_in_memory().unwrap())
}

/// Build a profile with a username and the given interests.
pub fn profile(user_id: i64, name: &str, interests: &[&str]) -> UserProfile {
    UserProfile {
        user_id,
        username: Some(name.to_string()),
        first_name: None,
        interests: interests.iter().map(|s| s.to_string()).collect(),
    }
}

/// Build an inbound message from a fixed test sender.
pub fn message(user_id: i64, text: &str) -> InboundMessage {
    InboundMessage {
        sender: Sender {
            user_id,
            username: Some(format!("user{user_id}")),
            first_name: Some("Test".into()),
        },
        text: text.to_string(),
    }
}

/// Relay double that records prompts and returns a canned outcome.
pub struct FakeRelay {
    pub prompts: Mutex<Vec<String>>,
    outcome: Result<String, String>,
}

impl FakeRelay {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            prompts: Mutex::new(Vec::new()),
            outcome: Ok(reply.to_string()),
        })
    }

    pub fn failing(detail: &str) -> Arc<Self> {
        Arc::new(Self {
            prompts: Mutex::new(Vec::new()),
            outcome: Err(detail.to_string()),
        })
    }
}

#[async_trait]
impl CompletionProvider for FakeRelay {
    async fn complete(&self, prompt: &str) -> Result<String, BotError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.outcome {
            Ok(reply) => Ok(reply.clone()),
            Err(detail) => Err(BotError::Relay(detail.clone())),
        }
    }
}

/// Store double whose every operation fails.
pub struct FailingStore;

#[async_trait]
impl ProfileStore for FailingStore {
    async fn put(&self, _profile: &UserProfile) -> Result<(), BotError> {
        Err(BotError::StoreWrite("injected failure".into()))
    }

    async fn get(&self, _user_id: i64) -> Result<Option<UserProfile>, BotError> {
        Err(BotError::StoreRead("injected failure".into()))
    }

    async fn list_all(&self) -> Result<Vec<UserProfile>, BotError> {
        Err(BotError::StoreRead("injected failure".into()))
    }
}
