// Extractor chain - mode selection and fallback between extractors
//
// Auto mode tries the python module first, then the standalone binary.
// Each extractor gets one attempt; the last error is returned.

use super::cli::CliInfoExtractor;
use super::diagnostics::diagnose;
use super::python::PythonInfoExtractor;
use super::traits::{ExtractorConfig, ExtractorMode, InfoExtractor, RawVideoInfo};
use crate::downloader::errors::DownloadError;

pub struct ExtractorChain {
    extractors: Vec<Box<dyn InfoExtractor>>,
}

impl ExtractorChain {
    /// Build the chain for a mode from the two yt-dlp entry points
    pub fn for_mode(mode: ExtractorMode, python_cmd: &str, ytdlp_path: Option<&str>) -> Self {
        let python = || Box::new(PythonInfoExtractor::new(python_cmd)) as Box<dyn InfoExtractor>;
        let cli = || Box::new(CliInfoExtractor::new(ytdlp_path)) as Box<dyn InfoExtractor>;

        let extractors = match mode {
            ExtractorMode::Python => vec![python()],
            ExtractorMode::Cli => vec![cli()],
            ExtractorMode::Auto => vec![python(), cli()],
        };
        Self { extractors }
    }

    pub fn from_extractors(extractors: Vec<Box<dyn InfoExtractor>>) -> Self {
        Self { extractors }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.extractors.iter().map(|e| e.name()).collect()
    }

    /// Fetch metadata with the first extractor that succeeds
    pub async fn extract(
        &self,
        url: &str,
        config: &ExtractorConfig,
    ) -> Result<RawVideoInfo, DownloadError> {
        let mut last_error =
            DownloadError::ToolNotFound("No extractor configured".to_string());

        for extractor in &self.extractors {
            log::info!("[Extractors] Trying {} for {}", extractor.name(), url);
            match extractor.extract(url, config).await {
                Ok(info) => {
                    log::info!("[Extractors] {} succeeded", extractor.name());
                    return Ok(info);
                }
                Err(e) => {
                    log::warn!(
                        "[Extractors] {} failed ({}): {}",
                        extractor.name(),
                        diagnose(&e).description(),
                        e
                    );
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    /// Ask each extractor in turn for a direct media URL
    pub async fn get_url(
        &self,
        url: &str,
        format_spec: &str,
        config: &ExtractorConfig,
    ) -> Result<String, DownloadError> {
        let mut last_error =
            DownloadError::ToolNotFound("No extractor configured".to_string());

        for extractor in &self.extractors {
            match extractor.get_url(url, format_spec, config).await {
                Ok(link) => return Ok(link),
                Err(e) => {
                    log::warn!("[Extractors] {} --get-url failed: {}", extractor.name(), e);
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    /// Version reported by the first extractor that can be started
    pub async fn available_version(&self) -> Option<String> {
        for extractor in &self.extractors {
            if let Some(version) = extractor.version().await {
                return Some(version);
            }
            log::debug!("[Extractors] {} is not available", extractor.name());
        }
        None
    }
}
