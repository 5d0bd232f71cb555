//! SQLite-backed profile store.
//!
//! Profiles live as flat JSON documents in a single `users` table keyed by
//! the stringified user id, so the table reads like a document collection.
//! All SQL runs on the blocking pool; the async trait methods never hold the
//! connection lock across an await.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::BotError;
use crate::profile::UserProfile;
use crate::store::{decode_document, ProfileStore};

const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS users (
    user_id TEXT PRIMARY KEY,
    doc     TEXT NOT NULL
)";

/// Profile store backed by a local SQLite database.
#[derive(Clone)]
pub struct SqliteProfileStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteProfileStore {
    /// Open (or create) the profile database at the given path.
    ///
    /// Failures here are startup-fatal, so they surface as `anyhow` errors
    /// rather than the command-level taxonomy.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {}", path.display()))?;

        // WAL keeps concurrent readers cheap
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.execute(SCHEMA_SQL, [])
            .context("failed to initialize users table")?;

        tracing::info!(path = %path.display(), "profile database ready");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an ephemeral in-memory store for tests.
    #[allow(dead_code)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
        conn.execute(SCHEMA_SQL, [])
            .context("failed to initialize users table")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

#[async_trait]
impl ProfileStore for SqliteProfileStore {
    async fn put(&self, profile: &UserProfile) -> Result<(), BotError> {
        let conn = Arc::clone(&self.conn);
        let key = profile.user_id.to_string();
        let doc = serde_json::to_string(profile)
            .map_err(|err| BotError::StoreWrite(err.to_string()))?;

        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|err| BotError::StoreWrite(format!("db lock poisoned: {err}")))?;
            conn.execute(
                "INSERT OR REPLACE INTO users (user_id, doc) VALUES (?1, ?2)",
                params![key, doc],
            )
            .map_err(|err| BotError::StoreWrite(err.to_string()))?;
            Ok(())
        })
        .await
        .map_err(|err| BotError::StoreWrite(err.to_string()))?
    }

    async fn get(&self, user_id: i64) -> Result<Option<UserProfile>, BotError> {
        let conn = Arc::clone(&self.conn);
        let key = user_id.to_string();

        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|err| BotError::StoreRead(format!("db lock poisoned: {err}")))?;
            let doc: Option<String> = conn
                .query_row(
                    "SELECT doc FROM users WHERE user_id = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()
                .map_err(|err| BotError::StoreRead(err.to_string()))?;
            Ok(doc.map(|raw| decode_document(user_id, &raw)))
        })
        .await
        .map_err(|err| BotError::StoreRead(err.to_string()))?
    }

    async fn list_all(&self) -> Result<Vec<UserProfile>, BotError> {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|err| BotError::StoreRead(format!("db lock poisoned: {err}")))?;
            let mut stmt = conn
                .prepare("SELECT user_id, doc FROM users")
                .map_err(|err| BotError::StoreRead(err.to_string()))?;

            let rows: Vec<(String, String)> = stmt
                .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
                .map_err(|err| BotError::StoreRead(err.to_string()))?
                .collect::<Result<Vec<_>, _>>()
                .map_err(|err| BotError::StoreRead(err.to_string()))?;

            let profiles = rows
                .into_iter()
                .filter_map(|(key, raw)| match key.parse::<i64>() {
                    Ok(user_id) => Some(decode_document(user_id, &raw)),
                    Err(_) => {
                        tracing::warn!(key = %key, "skipping row with non-numeric user id");
                        None
                    }
                })
                .collect();
            Ok(profiles)
        })
        .await
        .map_err(|err| BotError::StoreRead(err.to_string()))?
    }
}
