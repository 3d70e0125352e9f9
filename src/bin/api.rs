use keuanganku::{
    api::{start_server, ApiState},
    auth::AuthService,
    entries::InMemoryEntryStore,
    gemini::GeminiClient,
    market::MockPriceSource,
    state::FileStorage,
    AppConfig,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration (.env + environment)
    let config = AppConfig::from_env()?;

    if config.gemini_api_key.is_empty() {
        eprintln!("⚠️  GEMINI_API_KEY not set in .env");
        eprintln!("📌 AI features (OCR, tips, chat, crypto analysis) will return errors");
    }

    info!("🚀 KeuanganKu - API Server");
    info!("📍 Port: {}", config.port);
    info!("🤖 Model: {}", config.gemini_model);
    info!("💾 Storage: {}", config.storage_path.display());

    // Create components
    let storage = Arc::new(FileStorage::open(&config.storage_path).await?);
    let auth = Arc::new(AuthService::new(storage, config.login_delay));
    let entries = Arc::new(InMemoryEntryStore::seeded());
    let model = Arc::new(GeminiClient::new(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
    )?);
    let prices = Arc::new(MockPriceSource::from_api_key(
        config.arkham_api_key.as_deref(),
    ));

    let state = ApiState::new(auth, entries, model, prices);

    info!("✅ Services initialized");
    info!("📡 Starting API server...");

    // Start API server
    start_server(state, config.port).await?;

    Ok(())
}
