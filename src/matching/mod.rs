//! Interest matching between stored profiles.
//!
//! [`find_matches`] scans every stored profile and reports the users who
//! share at least one interest with the requester. Results are deterministic:
//! entries sort by display name, and each entry lists the shared interests in
//! the requester's declared order.

pub mod recommend;

use std::collections::HashSet;

use crate::error::BotError;
use crate::profile::UserProfile;
use crate::store::ProfileStore;

/// One user who shares interests with the requester.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchEntry {
    /// Name the match is shown under (handle, first name, or placeholder).
    pub display_name: String,
    /// Interests both users declared, in the requester's order, deduplicated.
    pub common: Vec<String>,
}

/// Find all users sharing at least one interest with `user_id`.
///
/// Requires a stored profile for the requester; absence is
/// [`BotError::ProfileRequired`]. An empty result is the normal no-matches
/// outcome, not an error. The requester never matches themself.
pub async fn find_matches(
    store: &dyn ProfileStore,
    user_id: i64,
) -> Result<Vec<MatchEntry>, BotError> {
    let requester = store.get(user_id).await?.ok_or(BotError::ProfileRequired)?;

    if requester.interests.is_empty() {
        return Ok(Vec::new());
    }

    let mut matches = Vec::new();
    for other in store.list_all().await? {
        if other.user_id == user_id {
            continue;
        }
        let common = common_interests(&requester, &other);
        if !common.is_empty() {
            matches.push(MatchEntry {
                display_name: other.display_name().to_string(),
                common,
            });
        }
    }

    matches.sort_by(|a, b| a.display_name.cmp(&b.display_name));
    Ok(matches)
}

/// Shared interests in the requester's declared order, first occurrence only.
fn common_interests(requester: &UserProfile, other: &UserProfile) -> Vec<String> {
    let theirs: HashSet<&str> = other.interests.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    requester
        .interests
        .iter()
        .filter(|interest| theirs.contains(interest.as_str()) && seen.insert(interest.as_str()))
        .cloned()
        .collect()
}
