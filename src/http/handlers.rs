use super::state::AppState;
use crate::error::TranscribeError;
use crate::speech::{ChunkReceipt, ChunkUpload, DecodingConfig};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct UploadChunkResponse {
    pub status: String,
    #[serde(flatten)]
    pub receipt: ChunkReceipt,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscribeSessionRequest {
    pub session_id: Option<String>,
    pub config: Option<DecodingConfig>,
}

#[derive(Debug, Deserialize)]
pub struct TranscribeRequest {
    pub audio: Option<TranscribeAudio>,
    pub config: Option<DecodingConfig>,
}

#[derive(Debug, Deserialize)]
pub struct TranscribeAudio {
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TranscriptionResponse {
    pub transcription: String,
}

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
}

/// Map a pipeline failure onto its HTTP shape. Service failures keep
/// the collaborator's code and details for diagnostics; everything else
/// reports its own message as the error string.
fn error_response(err: TranscribeError) -> Response {
    let status = match &err {
        TranscribeError::InvalidRequest(_)
        | TranscribeError::IncompleteUpload { .. }
        | TranscribeError::UnsupportedEncoding { .. }
        | TranscribeError::NoTranscriptionResult => StatusCode::BAD_REQUEST,
        TranscribeError::SessionNotFound { .. } => StatusCode::NOT_FOUND,
        TranscribeError::Service { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let body = match err {
        TranscribeError::Service { code, message } => ErrorResponse {
            error: "Transcription failed".to_string(),
            details: Some(message),
            code,
        },
        other => ErrorResponse {
            error: other.to_string(),
            details: None,
            code: None,
        },
    };

    (status, Json(body)).into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /upload-chunk
/// Buffer one chunk of a chunked audio upload
pub async fn upload_chunk(
    State(state): State<AppState>,
    Json(upload): Json<ChunkUpload>,
) -> impl IntoResponse {
    match state.service.ingest_chunk(upload).await {
        Ok(receipt) => (
            StatusCode::OK,
            Json(UploadChunkResponse {
                status: "success".to_string(),
                receipt,
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Chunk upload rejected: {}", e);
            error_response(e)
        }
    }
}

/// POST /transcribe-session
/// Reassemble a chunked session and transcribe it
pub async fn transcribe_session(
    State(state): State<AppState>,
    Json(req): Json<TranscribeSessionRequest>,
) -> impl IntoResponse {
    let (session_id, config) = match (req.session_id, req.config) {
        (Some(id), Some(config)) if !id.is_empty() => (id, config),
        _ => {
            return error_response(TranscribeError::InvalidRequest(
                "Missing sessionId or config".to_string(),
            ))
        }
    };

    info!("Received session transcription request for {}", session_id);

    match state.service.finalize_session(&session_id, &config).await {
        Ok(transcription) => {
            info!("Transcription successful for session {}", session_id);
            (StatusCode::OK, Json(TranscriptionResponse { transcription })).into_response()
        }
        Err(e) => {
            error!("Transcription failed for session {}: {}", session_id, e);
            error_response(e)
        }
    }
}

/// POST /transcribe
/// Transcribe a payload supplied in one request
pub async fn transcribe(
    State(state): State<AppState>,
    Json(req): Json<TranscribeRequest>,
) -> impl IntoResponse {
    let config = match req.config {
        Some(config) => config,
        None => {
            return error_response(TranscribeError::InvalidRequest(
                "No configuration provided".to_string(),
            ))
        }
    };
    let content = req.audio.and_then(|audio| audio.content);

    match state.service.transcribe_direct(content, &config).await {
        Ok(transcription) => {
            info!("Transcription successful");
            (StatusCode::OK, Json(TranscriptionResponse { transcription })).into_response()
        }
        Err(e) => {
            error!("Transcription failed: {}", e);
            error_response(e)
        }
    }
}

/// POST /ping
/// Connectivity probe for the mobile client
pub async fn ping() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(PingResponse {
            status: "ok".to_string(),
            message: "Server is running".to_string(),
        }),
    )
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
