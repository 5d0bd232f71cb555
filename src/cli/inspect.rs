//! CLI `inspect` command, display one stored profile in full.

use anyhow::Result;

use crate::config::MingleConfig;
use crate::store::sqlite::SqliteProfileStore;
use crate::store::ProfileStore;

/// Look up a single profile by user id and display its fields.
pub async fn inspect(config: &MingleConfig, user_id: i64) -> Result<()> {
    let db_path = config.resolved_db_path();
    let store = SqliteProfileStore::open(&db_path)?;

    let Some(profile) = store.get(user_id).await? else {
        println!("No profile stored for user {user_id}.");
        return Ok(());
    };

    println!("Profile: {}", profile.user_id);
    println!("{}", "=".repeat(40));
    println!("  Display name:   {}", profile.display_name());
    println!(
        "  Username:       {}",
        profile.username.as_deref().unwrap_or("-")
    );
    println!(
        "  First name:     {}",
        profile.first_name.as_deref().unwrap_or("-")
    );
    if profile.interests.is_empty() {
        println!("  Interests:      (none)");
    } else {
        println!("  Interests:      {}", profile.interests.join(", "));
    }

    Ok(())
}
