use std::collections::{HashMap, HashSet};

use anyhow::Result;

use crate::config::MingleConfig;
use crate::store::sqlite::SqliteProfileStore;
use crate::store::ProfileStore;

/// Display profile store statistics in the terminal.
pub async fn stats(config: &MingleConfig) -> Result<()> {
    let db_path = config.resolved_db_path();
    let store = SqliteProfileStore::open(&db_path)?;

    let profiles = store.list_all().await?;
    let with_interests = profiles.iter().filter(|p| !p.interests.is_empty()).count();

    println!("Profile Statistics");
    println!("{}", "=".repeat(40));
    println!("  Stored profiles:     {}", profiles.len());
    println!("  With interests:      {with_interests}");
    println!();

    // Count each interest once per user so one enthusiast cannot dominate
    let mut counts: HashMap<String, usize> = HashMap::new();
    for profile in &profiles {
        let unique: HashSet<&str> = profile.interests.iter().map(String::as_str).collect();
        for interest in unique {
            *counts.entry(interest.to_string()).or_default() += 1;
        }
    }
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    if !ranked.is_empty() {
        println!("Top Interests:");
        for (interest, count) in ranked.iter().take(10) {
            println!("  {interest:<16} {count}");
        }
    }

    Ok(())
}
