mod helpers;

use helpers::profile;
use mingle::store::sqlite::SqliteProfileStore;
use mingle::store::ProfileStore;
use rusqlite::{params, Connection};

#[tokio::test]
async fn profiles_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profiles.db");

    {
        let store = SqliteProfileStore::open(&path).unwrap();
        store.put(&profile(1, "ada", &["gaming", "music"])).await.unwrap();
    }

    let store = SqliteProfileStore::open(&path).unwrap();
    let loaded = store.get(1).await.unwrap().unwrap();
    assert_eq!(loaded.username.as_deref(), Some("ada"));
    assert_eq!(loaded.interests, vec!["gaming", "music"]);
}

#[tokio::test]
async fn open_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("profiles.db");

    let store = SqliteProfileStore::open(&path).unwrap();
    store.put(&profile(1, "ada", &[])).await.unwrap();
    assert!(path.exists());
}

#[tokio::test]
async fn put_replaces_the_whole_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profiles.db");
    let store = SqliteProfileStore::open(&path).unwrap();

    store.put(&profile(1, "ada", &["gaming", "music"])).await.unwrap();
    store.put(&profile(1, "ada", &["art"])).await.unwrap();

    let loaded = store.get(1).await.unwrap().unwrap();
    assert_eq!(loaded.interests, vec!["art"]);

    let count: i64 = {
        let conn = Connection::open(&path).unwrap();
        conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap()
    };
    assert_eq!(count, 1);
}

#[tokio::test]
async fn list_all_scans_every_row() {
    let store = SqliteProfileStore::open_in_memory().unwrap();
    store.put(&profile(1, "ada", &["gaming"])).await.unwrap();
    store.put(&profile(2, "bea", &["music"])).await.unwrap();
    store.put(&profile(3, "cal", &[])).await.unwrap();

    let mut all = store.list_all().await.unwrap();
    all.sort_by_key(|p| p.user_id);
    assert_eq!(all.len(), 3);
    assert_eq!(all[1].username.as_deref(), Some("bea"));
}

#[tokio::test]
async fn malformed_document_decodes_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profiles.db");

    {
        let store = SqliteProfileStore::open(&path).unwrap();
        store.put(&profile(1, "ada", &["gaming"])).await.unwrap();
    }
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute(
            "INSERT INTO users (user_id, doc) VALUES (?1, ?2)",
            params!["7", "{not json"],
        )
        .unwrap();
    }

    let store = SqliteProfileStore::open(&path).unwrap();

    let broken = store.get(7).await.unwrap().unwrap();
    assert_eq!(broken.user_id, 7);
    assert!(broken.username.is_none());
    assert!(broken.interests.is_empty());

    // The bad row never poisons a full scan
    let all = store.list_all().await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn row_key_wins_over_document_body() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profiles.db");

    {
        let conn = Connection::open(&path).unwrap();
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (user_id TEXT PRIMARY KEY, doc TEXT NOT NULL)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO users (user_id, doc) VALUES (?1, ?2)",
            params!["7", r#"{"user_id": 99, "username": "ada"}"#],
        )
        .unwrap();
    }

    let store = SqliteProfileStore::open(&path).unwrap();
    let loaded = store.get(7).await.unwrap().unwrap();
    assert_eq!(loaded.user_id, 7);
    assert_eq!(loaded.username.as_deref(), Some("ada"));
}

#[tokio::test]
async fn rows_with_non_numeric_keys_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profiles.db");

    {
        let store = SqliteProfileStore::open(&path).unwrap();
        store.put(&profile(1, "ada", &["gaming"])).await.unwrap();
    }
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute(
            "INSERT INTO users (user_id, doc) VALUES (?1, ?2)",
            params!["stray", "{}"],
        )
        .unwrap();
    }

    let store = SqliteProfileStore::open(&path).unwrap();
    let all = store.list_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].user_id, 1);
}
