pub mod config;
pub mod error;
pub mod http;
pub mod session;
pub mod speech;

pub use config::Config;
pub use error::TranscribeError;
pub use http::{create_router, AppState};
pub use session::{spawn_expiry_sweeper, SessionStore, UploadSession};
pub use speech::{
    AudioEncoding, ChunkReceipt, ChunkUpload, DecodingConfig, HttpSpeechClient,
    RecognizedSegment, SpeechRecognizer, SpeechServiceError, TranscriptionDispatcher,
    TranscriptionRequest, TranscriptionService,
};
