//! User profile record and interest normalization.
//!
//! Defines [`UserProfile`] (the stored document shape) and
//! [`parse_interests`], the single normalization path for everything a user
//! submits via `/set_interests`.

use serde::{Deserialize, Serialize};

/// A stored user profile, matching the document shape in the `users` table.
///
/// All fields except `user_id` are optional in stored documents; decoding is
/// lenient so a document written by an older build still loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Telegram user id, also the store key.
    #[serde(default)]
    pub user_id: i64,
    /// Public handle, if the user has one.
    #[serde(default)]
    pub username: Option<String>,
    /// Display name fallback when no handle is set.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Normalized interest tokens in submission order. Duplicates are kept.
    #[serde(default)]
    pub interests: Vec<String>,
}

impl UserProfile {
    /// Name shown to other users: handle first, then first name, then a
    /// fixed placeholder. Empty strings count as absent.
    pub fn display_name(&self) -> &str {
        if let Some(username) = self.username.as_deref() {
            if !username.is_empty() {
                return username;
            }
        }
        if let Some(first_name) = self.first_name.as_deref() {
            if !first_name.is_empty() {
                return first_name;
            }
        }
        "unknown user"
    }
}

/// Normalize a raw comma-separated interest submission.
///
/// Splits on commas, trims whitespace, lower-cases, and drops empty tokens.
/// Order and duplicates are preserved: `"Gaming,  , Music ,music"` becomes
/// `["gaming", "music", "music"]`.
pub fn parse_interests(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}
