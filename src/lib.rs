pub mod api;
pub mod config;
pub mod downloader;
pub mod progress;

use std::sync::Arc;

use api::AppState;
use config::AppConfig;
use downloader::extractors::ExtractorChain;
use downloader::VideoService;

/// Wire the service graph from configuration
pub fn build_state(config: &AppConfig) -> Result<Arc<AppState>, downloader::DownloadError> {
    let ex = &config.extractor;
    let extractors = ExtractorChain::for_mode(ex.mode, &ex.python_cmd, ex.ytdlp_path.as_deref());
    log::info!(
        "[Setup] Extractor mode {} ({})",
        ex.mode,
        extractors.names().join(" -> ")
    );

    let converter = config.converter_client()?;
    if converter.is_none() {
        log::info!("[Setup] No conversion API configured, skipping that tier");
    }

    let service = VideoService::standard(extractors, config.extractor_config(), converter);

    Ok(Arc::new(AppState { service }))
}

/// Load configuration and serve the HTTP API
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let state = build_state(&config)?;
    api::serve(&config.bind_address(), state).await?;
    Ok(())
}
