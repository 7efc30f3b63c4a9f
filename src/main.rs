// src/main.rs
use tracing::{error, info};

use virtupack::api::{self, ApiState};
use virtupack::config::AppConfig;
use virtupack::logging;
use virtupack::store::ConfigurationStore;

#[tokio::main]
async fn main() {
    if let Err(err) = dotenvy::dotenv() {
        if !matches!(err, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("⚠️ Could not load .env: {}", err);
        }
    }

    let app_config = AppConfig::from_env();
    logging::init(&app_config.log);

    info!("🚀 VirtuPack starting...");
    let state = ApiState::new(
        ConfigurationStore::new(),
        app_config.export.clone(),
        app_config.preview.clone(),
    );

    if let Err(err) = api::start_api_server(app_config.api.clone(), state).await {
        error!("❌ API server terminated with an error: {err}");
        std::process::exit(1);
    }
}
