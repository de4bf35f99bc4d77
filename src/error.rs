//! Error types for the medscribe backend.

use thiserror::Error;

/// Failures surfaced by the upload and transcription pipeline.
///
/// Every variant is a distinct, stable kind: the HTTP layer maps kinds
/// to statuses, and clients can branch on them without parsing the
/// detail strings.
#[derive(Error, Debug)]
pub enum TranscribeError {
    // Caller-correctable input problems
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Session {session_id} not found")]
    SessionNotFound { session_id: String },

    #[error("No audio content in session {session_id}")]
    IncompleteUpload { session_id: String },

    #[error("Invalid encoding format: {encoding}")]
    UnsupportedEncoding { encoding: String },

    // Speech collaborator outcomes
    #[error("No transcription results")]
    NoTranscriptionResult,

    #[error("Transcription failed: {message}")]
    Service { code: Option<i32>, message: String },
}
