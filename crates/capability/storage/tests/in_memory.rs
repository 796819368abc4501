use bridge_storage::{InMemoryTables, ProfileStore, StorageError, TableStore};
use domain::{HistoryRecord, MessageRecord, TableKind, TableRecord, UserProfile};

fn sample_profile(id: &str, email: &str) -> UserProfile {
    UserProfile {
        id: id.to_string(),
        name: "Alice".to_string(),
        email: email.to_string(),
    }
}

#[tokio::test]
async fn insert_lands_in_exactly_one_table() {
    let store = InMemoryTables::new();
    let record = TableRecord::History(HistoryRecord {
        performer: None,
        value: 5.0,
        date: "2026-01-01T00:00:00+00:00".to_string(),
    });
    let saved = store.insert(&record).await.expect("insert");

    assert_eq!(saved["value"], 5.0);
    assert!(saved.get("id").is_some());
    assert_eq!(store.rows(TableKind::History).len(), 1);
    assert_eq!(store.total_rows(), 1);
}

#[tokio::test]
async fn insert_assigns_incrementing_ids() {
    let store = InMemoryTables::new();
    let record = TableRecord::Messages(MessageRecord {
        topic: "t1".to_string(),
        payload: "x".to_string(),
        value: None,
    });
    let first = store.insert(&record).await.expect("insert");
    let second = store.insert(&record).await.expect("insert");
    assert_ne!(first["id"], second["id"]);
}

#[tokio::test]
async fn profile_roundtrip() {
    let store = InMemoryTables::new();
    let created = store
        .create(&sample_profile("u1", "a@b.com"))
        .await
        .expect("create");
    assert_eq!(created.id, "u1");

    let by_id = store.find_by_id("u1").await.expect("find");
    assert_eq!(by_id.map(|p| p.email), Some("a@b.com".to_string()));

    let by_email = store.find_by_email("a@b.com").await.expect("find");
    assert_eq!(by_email.map(|p| p.id), Some("u1".to_string()));

    let missing = store.find_by_id("u2").await.expect("find");
    assert!(missing.is_none());
}

#[tokio::test]
async fn duplicate_profile_id_is_rejected() {
    let store = InMemoryTables::new();
    store
        .create(&sample_profile("u1", "a@b.com"))
        .await
        .expect("create");
    let err: StorageError = store
        .create(&sample_profile("u1", "other@b.com"))
        .await
        .expect_err("duplicate");
    assert!(err.to_string().contains("duplicate key"));
    assert_eq!(store.rows(TableKind::Users).len(), 1);
}
