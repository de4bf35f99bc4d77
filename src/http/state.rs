use crate::speech::TranscriptionService;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Upload and transcription pipeline shared by every handler
    pub service: Arc<TranscriptionService>,
}

impl AppState {
    pub fn new(service: Arc<TranscriptionService>) -> Self {
        Self { service }
    }
}
