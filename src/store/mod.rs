//! Profile persistence.
//!
//! [`ProfileStore`] is the seam between command handlers and the document
//! database. Handlers only see `put` / `get` / `list_all`; the bundled
//! [`sqlite::SqliteProfileStore`] keeps flat JSON documents keyed by the
//! stringified user id. Tests substitute in-memory or failing stores.

pub mod sqlite;

use async_trait::async_trait;

use crate::error::BotError;
use crate::profile::UserProfile;

/// Async access to stored user profiles.
///
/// Absence is a normal state: `get` returns `Ok(None)` for users who never
/// set interests, and every error is a real collaborator fault.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Write a profile, fully replacing any existing document for the user.
    async fn put(&self, profile: &UserProfile) -> Result<(), BotError>;

    /// Fetch one profile by user id.
    async fn get(&self, user_id: i64) -> Result<Option<UserProfile>, BotError>;

    /// Fetch every stored profile. No ordering guarantee.
    async fn list_all(&self) -> Result<Vec<UserProfile>, BotError>;
}

/// Decode a stored document body, tolerating malformed or partial JSON.
///
/// The row key is authoritative for identity: whatever `user_id` the body
/// claims is overwritten with the key. A body that does not parse at all
/// decodes to an empty profile and is logged, so one bad row never poisons
/// a full scan.
pub(crate) fn decode_document(user_id: i64, raw: &str) -> UserProfile {
    let mut profile = match serde_json::from_str::<UserProfile>(raw) {
        Ok(profile) => profile,
        Err(err) => {
            tracing::warn!(user_id, %err, "malformed profile document, using defaults");
            UserProfile {
                user_id,
                username: None,
                first_name: None,
                interests: Vec::new(),
            }
        }
    };
    profile.user_id = user_id;
    profile
}
