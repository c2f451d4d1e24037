// Video service - the two inbound operations on top of extractors and link chain

use std::sync::Arc;

use super::converter::ConverterClient;
use super::errors::DownloadError;
use super::extractors::{diagnose, ExtractorChain, ExtractorConfig};
use super::format_resolver::{build_video_info, mock_video_info};
use super::format_selector::FormatSelector;
use super::link_resolver::LinkResolver;
use super::models::{FormatDescriptor, ResolvedLink, ResolvedVideo};
use super::traits::LinkRequest;
use super::utils::validate_video_url;

pub struct VideoService {
    extractors: Arc<ExtractorChain>,
    extractor_config: ExtractorConfig,
    links: LinkResolver,
}

impl VideoService {
    pub fn new(
        extractors: Arc<ExtractorChain>,
        extractor_config: ExtractorConfig,
        links: LinkResolver,
    ) -> Self {
        Self {
            extractors,
            extractor_config,
            links,
        }
    }

    /// Service with the standard link chain
    pub fn standard(
        extractors: ExtractorChain,
        extractor_config: ExtractorConfig,
        converter: Option<ConverterClient>,
    ) -> Self {
        let extractors = Arc::new(extractors);
        let links = LinkResolver::standard(extractors.clone(), extractor_config.clone(), converter);
        Self::new(extractors, extractor_config, links)
    }

    /// Fetch metadata and formats; extraction failures degrade to a flagged mock
    pub async fn resolve(&self, url: &str) -> Result<ResolvedVideo, DownloadError> {
        let video_id = validate_video_url(url)?;
        let url = url.trim();

        match self.extractors.extract(url, &self.extractor_config).await {
            Ok(raw) => {
                let info = build_video_info(&raw, &video_id, url);
                log::info!(
                    "[VideoService] Resolved '{}' with {} formats",
                    info.title,
                    info.formats.len()
                );
                Ok(ResolvedVideo::extracted(info))
            }
            Err(e) => {
                let reason = diagnose(&e);
                log::warn!(
                    "[VideoService] Extraction failed for {} ({}), serving mock data: {}",
                    video_id,
                    reason.description(),
                    e
                );
                Ok(ResolvedVideo::mocked(mock_video_info(&video_id), reason))
            }
        }
    }

    /// Turn a chosen format into a fetchable URL. Unrecognized URLs are
    /// rejected before any tier runs.
    pub async fn get_download_link(
        &self,
        request: &LinkRequest,
    ) -> Result<ResolvedLink, DownloadError> {
        validate_video_url(&request.original_url)?;
        self.links.resolve(request).await
    }

    /// Single-click flow: resolve, pick the best format, link it
    pub async fn instant_download(
        &self,
        url: &str,
    ) -> Result<(FormatDescriptor, ResolvedLink), DownloadError> {
        let resolved = self.resolve(url).await?;
        let best = FormatSelector::select_best(&resolved.info.formats)
            .cloned()
            .ok_or_else(|| DownloadError::Unknown("Resolver returned no formats".to_string()))?;

        let link = self
            .get_download_link(&LinkRequest::for_format(&best, url.trim()))
            .await?;
        Ok((best, link))
    }

    /// yt-dlp version from the extractor chain, None when nothing runs
    pub async fn extractor_version(&self) -> Option<String> {
        self.extractors.available_version().await
    }
}
