use crate::error::TranscribeError;
use crate::speech::DecodingConfig;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// One in-progress chunked upload.
#[derive(Debug, Clone)]
pub struct UploadSession {
    /// Slot `i` holds the payload for chunk index `i`, `None` until
    /// received. The length is fixed at creation and never resized.
    pub chunks: Vec<Option<String>>,

    /// Decoding configuration, recorded when the client finalizes.
    pub decoding_config: Option<DecodingConfig>,

    /// Refreshed on every chunk write; consulted only by the sweeper.
    pub last_touched: DateTime<Utc>,
}

impl UploadSession {
    fn new(total_chunks: usize, now: DateTime<Utc>) -> Self {
        Self {
            chunks: vec![None; total_chunks],
            decoding_config: None,
            last_touched: now,
        }
    }

    /// Whether every chunk slot has been filled. Always recomputed from
    /// the slots, never cached.
    pub fn is_complete(&self) -> bool {
        self.chunks.iter().all(Option::is_some)
    }

    /// Concatenation of the filled slots in index order.
    pub fn assembled_payload(&self) -> String {
        self.chunks.iter().flatten().map(String::as_str).collect()
    }
}

/// In-memory store for chunked upload sessions.
///
/// The store is the only owner of live session state: ingestion,
/// finalize and the expiry sweeper all reach sessions through it by id,
/// and every operation completes its mutation inside a single lock
/// acquisition with no await point, so interleaved requests never
/// observe a half-written session.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, UploadSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create the session if it does not exist yet.
    ///
    /// A second creation under the same id reuses the existing session;
    /// the slot count stays whatever the first declaration fixed.
    pub async fn ensure(&self, session_id: &str, total_chunks: usize) -> Result<(), TranscribeError> {
        if total_chunks == 0 {
            return Err(TranscribeError::InvalidRequest(
                "totalChunks must be greater than zero".to_string(),
            ));
        }

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| UploadSession::new(total_chunks, Utc::now()));

        Ok(())
    }

    /// Write one chunk, creating the session on first contact.
    ///
    /// Re-sending an index overwrites its slot, so client retries are
    /// idempotent. Returns whether the session is now complete. A
    /// failed write creates and mutates nothing.
    pub async fn put_chunk(
        &self,
        session_id: &str,
        chunk_index: usize,
        total_chunks: usize,
        data: String,
    ) -> Result<bool, TranscribeError> {
        if total_chunks == 0 {
            return Err(TranscribeError::InvalidRequest(
                "totalChunks must be greater than zero".to_string(),
            ));
        }

        let now = Utc::now();
        let mut sessions = self.sessions.write().await;

        if !sessions.contains_key(session_id) && chunk_index >= total_chunks {
            return Err(out_of_range(chunk_index, total_chunks));
        }

        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| UploadSession::new(total_chunks, now));

        if chunk_index >= session.chunks.len() {
            return Err(out_of_range(chunk_index, session.chunks.len()));
        }

        session.chunks[chunk_index] = Some(data);
        session.last_touched = now;

        Ok(session.is_complete())
    }

    /// Snapshot of a session, if present. The live value never leaves
    /// the store.
    pub async fn get(&self, session_id: &str) -> Option<UploadSession> {
        self.sessions.read().await.get(session_id).cloned()
    }

    /// Remove a session. Removing an absent id is a no-op.
    pub async fn delete(&self, session_id: &str) {
        self.sessions.write().await.remove(session_id);
    }

    /// Refresh a session's idle timer.
    pub async fn touch(&self, session_id: &str) {
        if let Some(session) = self.sessions.write().await.get_mut(session_id) {
            session.last_touched = Utc::now();
        }
    }

    /// Record the decoding configuration and return the index-ordered
    /// concatenation of the received chunks.
    ///
    /// The session stays in the store; callers delete it once the rest
    /// of validation has succeeded.
    pub async fn assemble(
        &self,
        session_id: &str,
        config: &DecodingConfig,
    ) -> Result<String, TranscribeError> {
        let mut sessions = self.sessions.write().await;

        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| TranscribeError::SessionNotFound {
                session_id: session_id.to_string(),
            })?;

        session.decoding_config = Some(config.clone());

        let payload = session.assembled_payload();
        if payload.is_empty() {
            return Err(TranscribeError::IncompleteUpload {
                session_id: session_id.to_string(),
            });
        }

        Ok(payload)
    }

    /// Evict every session idle for longer than `ttl`, returning how
    /// many were removed. `now` is passed in so callers control the
    /// clock.
    pub async fn sweep_expired(&self, ttl: Duration, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        sessions.retain(|_, session| {
            now.signed_duration_since(session.last_touched)
                .to_std()
                .map_or(true, |idle| idle <= ttl)
        });

        before - sessions.len()
    }

    pub async fn contains(&self, session_id: &str) -> bool {
        self.sessions.read().await.contains_key(session_id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

fn out_of_range(chunk_index: usize, total_chunks: usize) -> TranscribeError {
    TranscribeError::InvalidRequest(format!(
        "chunkIndex {} out of range for a session with {} chunks",
        chunk_index, total_chunks
    ))
}
