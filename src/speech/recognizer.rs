use super::types::{RecognizedSegment, TranscriptionRequest};
use crate::config::SpeechConfig;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Failure reported by the speech service or the transport to it.
///
/// Code and message are preserved verbatim for diagnostics; the
/// pipeline never interprets them.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct SpeechServiceError {
    pub code: Option<i32>,
    pub message: String,
}

/// An external service that turns an audio payload into text segments.
///
/// An `Ok` with an empty list is a successful call that produced
/// nothing usable; callers decide what that means.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Recognize the payload, returning segments in service order.
    async fn recognize(
        &self,
        request: &TranscriptionRequest,
    ) -> Result<Vec<RecognizedSegment>, SpeechServiceError>;
}

/// JSON/REST client for a hosted speech-to-text API.
pub struct HttpSpeechClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpSpeechClient {
    pub fn new(config: &SpeechConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

#[derive(Serialize)]
struct RecognizeRequest<'a> {
    config: RecognizeConfig<'a>,
    audio: RecognizeAudio<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognizeConfig<'a> {
    encoding: &'a str,
    sample_rate_hertz: u32,
    language_code: &'a str,
    enable_automatic_punctuation: bool,
    model: &'a str,
    use_enhanced: bool,
}

#[derive(Serialize)]
struct RecognizeAudio<'a> {
    content: &'a str,
}

#[derive(Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognizeResult>,
}

#[derive(Deserialize)]
struct RecognizeResult {
    #[serde(default)]
    alternatives: Vec<RecognizeAlternative>,
}

#[derive(Deserialize)]
struct RecognizeAlternative {
    #[serde(default)]
    transcript: String,
    confidence: Option<f32>,
}

#[async_trait]
impl SpeechRecognizer for HttpSpeechClient {
    async fn recognize(
        &self,
        request: &TranscriptionRequest,
    ) -> Result<Vec<RecognizedSegment>, SpeechServiceError> {
        let body = RecognizeRequest {
            config: RecognizeConfig {
                encoding: request.encoding.as_tag(),
                sample_rate_hertz: request.sample_rate_hertz,
                language_code: &request.language_code,
                enable_automatic_punctuation: true,
                model: "default",
                use_enhanced: true,
            },
            audio: RecognizeAudio {
                content: &request.payload,
            },
        };

        let url = format!("{}/v1/speech:recognize", self.endpoint);

        debug!(
            "Sending {} base64 chars to {} ({}, {} Hz, {})",
            request.payload.len(),
            url,
            request.encoding.as_tag(),
            request.sample_rate_hertz,
            request.language_code
        );

        let mut http_request = self.http.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            http_request = http_request.query(&[("key", key)]);
        }

        let response = http_request.send().await.map_err(|e| SpeechServiceError {
            code: None,
            message: format!("Speech service request failed: {}", e),
        })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(SpeechServiceError {
                code: Some(i32::from(status.as_u16())),
                message: format!("Speech service returned {}: {}", status, detail),
            });
        }

        let parsed: RecognizeResponse =
            response.json().await.map_err(|e| SpeechServiceError {
                code: None,
                message: format!("Malformed speech service response: {}", e),
            })?;

        // Each result contributes its top alternative only.
        Ok(parsed
            .results
            .into_iter()
            .filter_map(|result| result.alternatives.into_iter().next())
            .map(|alternative| RecognizedSegment {
                transcript: alternative.transcript,
                confidence: alternative.confidence,
            })
            .collect())
    }
}
