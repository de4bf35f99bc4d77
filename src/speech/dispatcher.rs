use super::recognizer::SpeechRecognizer;
use super::types::TranscriptionRequest;
use crate::error::TranscribeError;
use std::sync::Arc;
use tracing::info;

/// Sends assembled requests to the speech collaborator and folds the
/// outcome into the service error taxonomy.
pub struct TranscriptionDispatcher {
    recognizer: Arc<dyn SpeechRecognizer>,
}

impl TranscriptionDispatcher {
    pub fn new(recognizer: Arc<dyn SpeechRecognizer>) -> Self {
        Self { recognizer }
    }

    /// Run one recognition call and join the resulting segments.
    ///
    /// Segment order is whatever the service returned; there is no
    /// local re-ordering or scoring. Collaborator failures pass through
    /// with their code and details intact and are not retried here.
    pub async fn transcribe(
        &self,
        request: &TranscriptionRequest,
    ) -> Result<String, TranscribeError> {
        info!(
            "Starting transcription with encoding: {}",
            request.encoding.as_tag()
        );

        let segments =
            self.recognizer
                .recognize(request)
                .await
                .map_err(|e| TranscribeError::Service {
                    code: e.code,
                    message: e.message,
                })?;

        if segments.is_empty() {
            return Err(TranscribeError::NoTranscriptionResult);
        }

        let transcription = segments
            .iter()
            .map(|segment| segment.transcript.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        info!("Transcription completed ({} segments)", segments.len());

        Ok(transcription)
    }
}
