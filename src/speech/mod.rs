//! Transcription pipeline
//!
//! This module turns buffered or directly supplied audio payloads into
//! text:
//! - `TranscriptionService` - chunk ingestion, session finalize, and
//!   the single-shot path, sharing one validation routine
//! - `TranscriptionDispatcher` - forwards assembled requests to the
//!   speech collaborator and folds the outcome into the error taxonomy
//! - `SpeechRecognizer` / `HttpSpeechClient` - the collaborator seam
//!   and its production REST implementation

mod dispatcher;
mod recognizer;
mod service;
mod types;

pub use dispatcher::TranscriptionDispatcher;
pub use recognizer::{HttpSpeechClient, SpeechRecognizer, SpeechServiceError};
pub use service::{validated_request, ChunkReceipt, ChunkUpload, TranscriptionService};
pub use types::{AudioEncoding, DecodingConfig, RecognizedSegment, TranscriptionRequest};
