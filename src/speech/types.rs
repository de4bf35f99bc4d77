use serde::{Deserialize, Serialize};

/// Audio encodings the transcription pipeline accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEncoding {
    /// Uncompressed 16-bit signed little-endian PCM
    Linear16,
    Mp3,
    /// Adaptive Multi-Rate narrowband
    Amr,
}

impl AudioEncoding {
    /// Parse a wire tag such as `"LINEAR16"`. Tags outside the
    /// supported set yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "LINEAR16" => Some(Self::Linear16),
            "MP3" => Some(Self::Mp3),
            "AMR" => Some(Self::Amr),
            _ => None,
        }
    }

    pub fn as_tag(self) -> &'static str {
        match self {
            Self::Linear16 => "LINEAR16",
            Self::Mp3 => "MP3",
            Self::Amr => "AMR",
        }
    }

    /// Sample rate assumed when the client does not supply one. MP3
    /// uploads come from 44.1 kHz recordings; everything else is
    /// treated as 16 kHz wideband speech.
    pub fn default_sample_rate(self) -> u32 {
        match self {
            Self::Mp3 => 44_100,
            Self::Linear16 | Self::Amr => 16_000,
        }
    }
}

/// Decoding configuration as supplied by the client.
///
/// The encoding tag is kept verbatim until validation so rejection
/// messages can echo exactly what was sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodingConfig {
    #[serde(default)]
    pub encoding: String,

    pub sample_rate_hertz: Option<u32>,

    pub language_code: Option<String>,
}

/// A fully validated request, ready for the speech service.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionRequest {
    /// Base64 audio content, reassembled in chunk-index order
    pub payload: String,
    pub encoding: AudioEncoding,
    pub sample_rate_hertz: u32,
    pub language_code: String,
}

/// One recognized segment returned by the speech service.
#[derive(Debug, Clone)]
pub struct RecognizedSegment {
    pub transcript: String,
    /// Confidence score (0.0 to 1.0), if the service reports one
    pub confidence: Option<f32>,
}
