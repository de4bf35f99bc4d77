//! HTTP API server for the mobile client
//!
//! This module provides the REST surface of the transcription backend:
//! - POST /upload-chunk - Buffer one chunk of a chunked audio upload
//! - POST /transcribe-session - Reassemble and transcribe a session
//! - POST /transcribe - Single-shot transcription
//! - POST /ping - Connectivity probe
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
