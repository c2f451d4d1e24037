// Download link resolver - ordered strategy chain with fallback
//
// Direct source URL, then extractor `--get-url`, then the conversion API,
// then a converter page redirect. First success wins, one attempt each.

use async_trait::async_trait;
use std::sync::Arc;

use super::converter::ConverterClient;
use super::errors::DownloadError;
use super::extractors::{ExtractorChain, ExtractorConfig};
use super::format_resolver::{audio_redirect_url, is_converter_page, video_redirect_url};
use super::format_selector::FormatSelector;
use super::models::ResolvedLink;
use super::traits::{LinkRequest, LinkStrategy};
use super::utils::is_usable_url;

/// Use the descriptor's own URL when it is already fetchable. Mock
/// descriptors point at converter pages, which come back degraded.
pub struct DirectStrategy;

#[async_trait]
impl LinkStrategy for DirectStrategy {
    fn name(&self) -> &'static str {
        "direct"
    }

    async fn resolve(&self, request: &LinkRequest) -> Result<ResolvedLink, DownloadError> {
        let url = request
            .source_url
            .as_deref()
            .map(str::trim)
            .filter(|u| is_usable_url(u))
            .ok_or_else(|| DownloadError::Service("No direct source URL".to_string()))?;

        Ok(ResolvedLink {
            url: url.to_string(),
            degraded: is_converter_page(url),
            strategy: self.name().to_string(),
        })
    }
}

/// Ask yt-dlp for the media URL of a format expression
pub struct ExtractorUrlStrategy {
    extractors: Arc<ExtractorChain>,
    config: ExtractorConfig,
}

impl ExtractorUrlStrategy {
    pub fn new(extractors: Arc<ExtractorChain>, config: ExtractorConfig) -> Self {
        Self { extractors, config }
    }
}

#[async_trait]
impl LinkStrategy for ExtractorUrlStrategy {
    fn name(&self) -> &'static str {
        "extractor"
    }

    async fn resolve(&self, request: &LinkRequest) -> Result<ResolvedLink, DownloadError> {
        let spec = FormatSelector::format_spec(
            request.format_id.as_deref(),
            request.quality_label.as_deref(),
        );
        log::info!("[LinkResolver] Requesting --get-url with format {}", spec);

        let url = self
            .extractors
            .get_url(&request.original_url, &spec, &self.config)
            .await?;

        Ok(ResolvedLink {
            url,
            degraded: false,
            strategy: self.name().to_string(),
        })
    }
}

/// Third-party conversion API
pub struct ConverterServiceStrategy {
    client: ConverterClient,
}

impl ConverterServiceStrategy {
    pub fn new(client: ConverterClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LinkStrategy for ConverterServiceStrategy {
    fn name(&self) -> &'static str {
        "converter-service"
    }

    async fn resolve(&self, request: &LinkRequest) -> Result<ResolvedLink, DownloadError> {
        let url = self
            .client
            .convert(
                &request.original_url,
                request.quality_label.as_deref().unwrap_or_default(),
                request.is_audio(),
            )
            .await?;

        Ok(ResolvedLink {
            url,
            degraded: false,
            strategy: self.name().to_string(),
        })
    }
}

/// Converter web page for the video id; always works when the id is known
pub struct ConverterRedirectStrategy;

#[async_trait]
impl LinkStrategy for ConverterRedirectStrategy {
    fn name(&self) -> &'static str {
        "converter-redirect"
    }

    async fn resolve(&self, request: &LinkRequest) -> Result<ResolvedLink, DownloadError> {
        let video_id = request
            .video_id
            .as_deref()
            .ok_or_else(|| DownloadError::NoIdentifier(request.original_url.clone()))?;

        let url = if request.is_audio() {
            audio_redirect_url(video_id)
        } else {
            video_redirect_url(video_id)
        };

        Ok(ResolvedLink {
            url,
            degraded: true,
            strategy: self.name().to_string(),
        })
    }
}

pub struct LinkResolver {
    strategies: Vec<Box<dyn LinkStrategy>>,
}

impl LinkResolver {
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    pub fn add_strategy(&mut self, strategy: Box<dyn LinkStrategy>) {
        self.strategies.push(strategy);
    }

    /// The full chain: direct, extractor, converter API (when configured), redirect
    pub fn standard(
        extractors: Arc<ExtractorChain>,
        config: ExtractorConfig,
        converter: Option<ConverterClient>,
    ) -> Self {
        let mut resolver = Self::new();
        resolver.add_strategy(Box::new(DirectStrategy));
        resolver.add_strategy(Box::new(ExtractorUrlStrategy::new(extractors, config)));
        if let Some(client) = converter {
            resolver.add_strategy(Box::new(ConverterServiceStrategy::new(client)));
        }
        resolver.add_strategy(Box::new(ConverterRedirectStrategy));
        resolver
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub async fn resolve(&self, request: &LinkRequest) -> Result<ResolvedLink, DownloadError> {
        let mut last_error = DownloadError::Unknown("No link strategy configured".to_string());

        for strategy in &self.strategies {
            match strategy.resolve(request).await {
                Ok(link) => {
                    if link.degraded {
                        log::warn!(
                            "[LinkResolver] Falling back to {} for {}",
                            strategy.name(),
                            request.original_url
                        );
                    } else {
                        log::info!("[LinkResolver] Resolved with {}", strategy.name());
                    }
                    return Ok(link);
                }
                Err(e) => {
                    log::warn!("[LinkResolver] {} failed: {}", strategy.name(), e);
                    last_error = e;
                }
            }
        }

        match &request.video_id {
            None => Err(DownloadError::NoIdentifier(request.original_url.clone())),
            Some(_) => Err(last_error),
        }
    }
}

impl Default for LinkResolver {
    fn default() -> Self {
        Self::new()
    }
}
