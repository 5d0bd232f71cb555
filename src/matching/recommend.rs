//! Activity recommendations from a fixed interest table.
//!
//! [`recommend_activities`] walks a user's stored interests against
//! [`ACTIVITIES`], a small hand-curated map. Interests without a table entry
//! are skipped silently; the table is product copy, not user data.

use crate::error::BotError;
use crate::store::ProfileStore;

/// Curated interest-to-activity suggestions.
pub const ACTIVITIES: &[(&str, &str)] = &[
    ("gaming", "online esports tournaments or game streaming nights"),
    ("music", "virtual concerts or online listening parties"),
    ("movies", "online film premieres or movie discussion clubs"),
    ("tech", "online tech talks or hackathon events"),
    ("art", "virtual art exhibitions or creative workshops"),
];

/// A single activity suggestion tied to one declared interest.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub interest: String,
    pub activity: String,
}

/// Suggest activities for every stored interest with a table entry.
///
/// Requires a stored profile; absence is [`BotError::ProfileRequired`].
/// Suggestions follow the stored interest order, one per stored token, so a
/// duplicated interest produces a duplicated suggestion. An empty result is
/// the normal nothing-to-suggest outcome.
pub async fn recommend_activities(
    store: &dyn ProfileStore,
    user_id: i64,
) -> Result<Vec<Recommendation>, BotError> {
    let profile = store.get(user_id).await?.ok_or(BotError::ProfileRequired)?;

    let recommendations = profile
        .interests
        .iter()
        .filter_map(|interest| {
            lookup_activity(interest).map(|activity| Recommendation {
                interest: interest.clone(),
                activity: activity.to_string(),
            })
        })
        .collect();
    Ok(recommendations)
}

fn lookup_activity(interest: &str) -> Option<&'static str> {
    ACTIVITIES
        .iter()
        .find(|(key, _)| *key == interest)
        .map(|(_, activity)| *activity)
}
