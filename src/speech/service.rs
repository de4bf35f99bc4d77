use super::dispatcher::TranscriptionDispatcher;
use super::recognizer::SpeechRecognizer;
use super::types::{AudioEncoding, DecodingConfig, TranscriptionRequest};
use crate::error::TranscribeError;
use crate::session::SessionStore;
use base64::alphabet;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Locale applied when the client does not pick one.
const DEFAULT_LANGUAGE_CODE: &str = "en-US";

/// One chunk upload as received from the wire. Every field is optional;
/// `ingest_chunk` owns the validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkUpload {
    pub session_id: Option<String>,
    pub chunk_index: Option<i64>,
    pub total_chunks: Option<i64>,
    pub chunk: Option<String>,
}

/// Acknowledgement for one ingested chunk.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkReceipt {
    pub session_id: String,
    pub chunk_index: usize,
    pub received: bool,
    pub complete: bool,
}

/// Front door of the transcription pipeline: chunk ingestion, session
/// finalize, and the single-shot path, all sharing one validation
/// routine.
pub struct TranscriptionService {
    store: SessionStore,
    dispatcher: TranscriptionDispatcher,
}

impl TranscriptionService {
    pub fn new(store: SessionStore, recognizer: Arc<dyn SpeechRecognizer>) -> Self {
        Self {
            store,
            dispatcher: TranscriptionDispatcher::new(recognizer),
        }
    }

    /// Buffer one chunk, reporting whether its session is now complete.
    ///
    /// Chunks may arrive in any order and may be re-sent; a re-send
    /// replaces the slot's content. Nothing is created or mutated when
    /// validation fails.
    pub async fn ingest_chunk(&self, upload: ChunkUpload) -> Result<ChunkReceipt, TranscribeError> {
        let session_id = match upload.session_id {
            Some(id) if !id.is_empty() => id,
            _ => return Err(missing("sessionId")),
        };
        let chunk_index = match upload.chunk_index {
            Some(index) if index >= 0 => index as usize,
            Some(_) => {
                return Err(TranscribeError::InvalidRequest(
                    "chunkIndex must not be negative".to_string(),
                ))
            }
            None => return Err(missing("chunkIndex")),
        };
        let total_chunks = match upload.total_chunks {
            Some(total) if total > 0 => total as usize,
            Some(_) => {
                return Err(TranscribeError::InvalidRequest(
                    "totalChunks must be greater than zero".to_string(),
                ))
            }
            None => return Err(missing("totalChunks")),
        };
        let chunk = match upload.chunk {
            Some(data) if !data.is_empty() => data,
            _ => return Err(missing("chunk")),
        };

        let complete = self
            .store
            .put_chunk(&session_id, chunk_index, total_chunks, chunk)
            .await?;

        info!(
            "Stored chunk {}/{} for session {}",
            chunk_index + 1,
            total_chunks,
            session_id
        );

        Ok(ChunkReceipt {
            session_id,
            chunk_index,
            received: true,
            complete,
        })
    }

    /// Reassemble a buffered session and transcribe it.
    ///
    /// The session is deleted as soon as validation succeeds, so a
    /// successful finalize cannot be replayed against the same id. A
    /// session swept between its last chunk and this call fails with
    /// `SessionNotFound`; expiry does not distinguish complete uploads.
    pub async fn finalize_session(
        &self,
        session_id: &str,
        config: &DecodingConfig,
    ) -> Result<String, TranscribeError> {
        let payload = self.store.assemble(session_id, config).await?;

        info!(
            "Combined session {} into {} base64 chars",
            session_id,
            payload.len()
        );

        let request = validated_request(payload, config)?;
        self.store.delete(session_id).await;

        self.dispatcher.transcribe(&request).await
    }

    /// Transcribe a payload supplied in full, skipping the session
    /// store entirely.
    pub async fn transcribe_direct(
        &self,
        content: Option<String>,
        config: &DecodingConfig,
    ) -> Result<String, TranscribeError> {
        let payload = match content {
            Some(content) if !content.is_empty() => content,
            Some(_) => {
                return Err(TranscribeError::InvalidRequest(
                    "Empty audio content".to_string(),
                ))
            }
            None => {
                return Err(TranscribeError::InvalidRequest(
                    "No audio content provided".to_string(),
                ))
            }
        };

        let request = validated_request(payload, config)?;

        self.dispatcher.transcribe(&request).await
    }
}

/// Validate a decoding configuration against an assembled payload.
///
/// Both the chunked and the single-shot path go through here, so the
/// encoding allow-list and the default policies cannot drift apart. A
/// caller-supplied sample rate is passed through verbatim, even when it
/// does not match the encoding's natural rate.
pub fn validated_request(
    payload: String,
    config: &DecodingConfig,
) -> Result<TranscriptionRequest, TranscribeError> {
    let encoding = AudioEncoding::from_tag(&config.encoding).ok_or_else(|| {
        TranscribeError::UnsupportedEncoding {
            encoding: config.encoding.clone(),
        }
    })?;

    if !looks_like_base64(&payload) {
        warn!("Audio content does not look like base64; forwarding as-is");
    }

    let sample_rate_hertz = config
        .sample_rate_hertz
        .unwrap_or_else(|| encoding.default_sample_rate());
    let language_code = config
        .language_code
        .clone()
        .unwrap_or_else(|| DEFAULT_LANGUAGE_CODE.to_string());

    Ok(TranscriptionRequest {
        payload,
        encoding,
        sample_rate_hertz,
        language_code,
    })
}

/// Cheap shape check on a payload prefix; diagnostics only, never a
/// rejection.
fn looks_like_base64(payload: &str) -> bool {
    let symbols = alphabet::STANDARD.as_str().as_bytes();
    payload
        .bytes()
        .take(100)
        .all(|b| b == b'=' || symbols.contains(&b))
}

fn missing(field: &str) -> TranscribeError {
    TranscribeError::InvalidRequest(format!(
        "Missing required chunk upload parameter: {}",
        field
    ))
}
