use anyhow::Result;
use clap::Parser;
use medscribe::{
    create_router, spawn_expiry_sweeper, AppState, Config, HttpSpeechClient, SessionStore,
    TranscriptionService,
};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "medscribe", about = "Chunked audio upload and transcription backend")]
struct Cli {
    /// Configuration file to load (path without extension)
    #[arg(short, long, default_value = "config/medscribe")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!("Speech endpoint: {}", cfg.speech.endpoint);

    let recognizer = Arc::new(HttpSpeechClient::new(&cfg.speech)?);
    let store = SessionStore::new();
    let service = Arc::new(TranscriptionService::new(store.clone(), recognizer));

    let _sweeper = spawn_expiry_sweeper(store, cfg.sessions.ttl(), cfg.sessions.sweep_interval());

    let app = create_router(AppState::new(service));
    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);

    info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
