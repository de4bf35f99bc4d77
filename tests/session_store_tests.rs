// Integration tests for the upload session store
//
// These tests verify the chunk-slot protocol: lazy creation, fixed slot
// counts, idempotent overwrites, completeness, and TTL-based sweeping.

use anyhow::Result;
use chrono::Utc;
use medscribe::{DecodingConfig, SessionStore, TranscribeError};
use std::time::Duration;

fn linear16() -> DecodingConfig {
    DecodingConfig {
        encoding: "LINEAR16".to_string(),
        sample_rate_hertz: None,
        language_code: None,
    }
}

#[tokio::test]
async fn test_ensure_creates_once_and_reuses() -> Result<()> {
    let store = SessionStore::new();

    store.ensure("s1", 3).await?;
    // A second declaration with a different count must not resize.
    store.ensure("s1", 7).await?;

    let session = store.get("s1").await.unwrap();
    assert_eq!(session.chunks.len(), 3);
    assert_eq!(store.len().await, 1);

    Ok(())
}

#[tokio::test]
async fn test_ensure_rejects_zero_chunks() {
    let store = SessionStore::new();

    let err = store.ensure("s1", 0).await.unwrap_err();
    assert!(matches!(err, TranscribeError::InvalidRequest(_)));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_put_chunk_lazily_creates_session() -> Result<()> {
    let store = SessionStore::new();

    let complete = store.put_chunk("s1", 0, 2, "QQ==".to_string()).await?;

    assert!(!complete);
    assert!(store.contains("s1").await);

    Ok(())
}

#[tokio::test]
async fn test_put_chunk_overwrites_slot() -> Result<()> {
    let store = SessionStore::new();

    store.put_chunk("s1", 0, 1, "old".to_string()).await?;
    let complete = store.put_chunk("s1", 0, 1, "new".to_string()).await?;

    // The re-send replaced the slot and completeness is unaffected.
    assert!(complete);
    assert_eq!(store.assemble("s1", &linear16()).await?, "new");

    Ok(())
}

#[tokio::test]
async fn test_completeness_tracks_every_slot() -> Result<()> {
    let store = SessionStore::new();

    assert!(!store.put_chunk("s1", 0, 3, "a".to_string()).await?);
    assert!(!store.put_chunk("s1", 2, 3, "c".to_string()).await?);
    assert!(store.put_chunk("s1", 1, 3, "b".to_string()).await?);

    // Single-chunk sessions complete on the first write.
    assert!(store.put_chunk("s2", 0, 1, "only".to_string()).await?);

    Ok(())
}

#[tokio::test]
async fn test_out_of_range_index_rejected_without_mutation() -> Result<()> {
    let store = SessionStore::new();

    // Unknown session: the session must not be created.
    let err = store.put_chunk("s1", 5, 2, "x".to_string()).await.unwrap_err();
    assert!(matches!(err, TranscribeError::InvalidRequest(_)));
    assert!(!store.contains("s1").await);

    // Existing session: the fixed slot count wins over the declaration.
    store.put_chunk("s2", 0, 2, "a".to_string()).await?;
    let err = store.put_chunk("s2", 2, 9, "x".to_string()).await.unwrap_err();
    assert!(matches!(err, TranscribeError::InvalidRequest(_)));
    assert_eq!(store.get("s2").await.unwrap().chunks.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_delete_is_idempotent() -> Result<()> {
    let store = SessionStore::new();

    store.put_chunk("s1", 0, 1, "a".to_string()).await?;
    store.delete("s1").await;
    store.delete("s1").await;
    store.delete("never-existed").await;

    assert!(store.is_empty().await);

    Ok(())
}

#[tokio::test]
async fn test_touch_refreshes_idle_timer() -> Result<()> {
    let store = SessionStore::new();

    store.put_chunk("s1", 0, 2, "a".to_string()).await?;
    let before = store.get("s1").await.unwrap().last_touched;

    tokio::time::sleep(Duration::from_millis(10)).await;
    store.touch("s1").await;

    let after = store.get("s1").await.unwrap().last_touched;
    assert!(after > before);

    Ok(())
}

#[tokio::test]
async fn test_assemble_concatenates_in_index_order() -> Result<()> {
    let store = SessionStore::new();

    // Arrival order deliberately reversed.
    store.put_chunk("s1", 2, 3, "cc".to_string()).await?;
    store.put_chunk("s1", 1, 3, "bb".to_string()).await?;
    store.put_chunk("s1", 0, 3, "aa".to_string()).await?;

    assert_eq!(store.assemble("s1", &linear16()).await?, "aabbcc");

    Ok(())
}

#[tokio::test]
async fn test_assemble_unknown_session_fails() {
    let store = SessionStore::new();

    let err = store.assemble("ghost", &linear16()).await.unwrap_err();
    assert!(matches!(err, TranscribeError::SessionNotFound { .. }));
}

#[tokio::test]
async fn test_assemble_empty_session_fails() -> Result<()> {
    let store = SessionStore::new();

    store.ensure("s1", 3).await?;

    let err = store.assemble("s1", &linear16()).await.unwrap_err();
    assert!(matches!(err, TranscribeError::IncompleteUpload { .. }));
    // The failed finalize must not consume the session.
    assert!(store.contains("s1").await);

    Ok(())
}

#[tokio::test]
async fn test_sweep_removes_only_sessions_outside_window() -> Result<()> {
    let store = SessionStore::new();

    store.put_chunk("old", 0, 1, "a".to_string()).await?;
    tokio::time::sleep(Duration::from_millis(20)).await;
    store.put_chunk("fresh", 0, 1, "b".to_string()).await?;

    let old_touched = store.get("old").await.unwrap().last_touched;
    let fresh_touched = store.get("fresh").await.unwrap().last_touched;
    let gap = fresh_touched
        .signed_duration_since(old_touched)
        .to_std()?;

    // A TTL between the two touch times expires "old" and spares "fresh".
    let removed = store.sweep_expired(gap / 2, fresh_touched).await;

    assert_eq!(removed, 1);
    assert!(!store.contains("old").await);
    assert!(store.contains("fresh").await);

    Ok(())
}

#[tokio::test]
async fn test_sweep_with_zero_ttl_removes_all_idle_sessions() -> Result<()> {
    let store = SessionStore::new();

    store.put_chunk("s1", 0, 1, "a".to_string()).await?;
    store.put_chunk("s2", 0, 2, "b".to_string()).await?;

    let later = Utc::now() + chrono::Duration::seconds(1);
    let removed = store.sweep_expired(Duration::ZERO, later).await;

    assert_eq!(removed, 2);
    assert!(store.is_empty().await);

    Ok(())
}

#[tokio::test]
async fn test_sweep_with_huge_ttl_removes_nothing() -> Result<()> {
    let store = SessionStore::new();

    store.put_chunk("s1", 0, 1, "a".to_string()).await?;
    store.put_chunk("s2", 0, 2, "b".to_string()).await?;

    let later = Utc::now() + chrono::Duration::days(30);
    let removed = store.sweep_expired(Duration::MAX, later).await;

    assert_eq!(removed, 0);
    assert_eq!(store.len().await, 2);

    Ok(())
}

#[tokio::test]
async fn test_sweep_reports_zero_on_empty_store() {
    let store = SessionStore::new();

    let removed = store.sweep_expired(Duration::ZERO, Utc::now()).await;
    assert_eq!(removed, 0);
}
