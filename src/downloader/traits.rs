// Download link strategy trait definition

use async_trait::async_trait;

use super::errors::DownloadError;
use super::models::{FormatDescriptor, ResolvedLink, AUDIO_CONTAINER};
use super::utils::extract_video_id;

/// Everything a strategy may need to produce a link for one chosen format
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkRequest {
    /// URL the user originally submitted
    pub original_url: String,
    /// Video identifier, when the URL carries one
    pub video_id: Option<String>,
    pub format_id: Option<String>,
    pub quality_label: Option<String>,
    pub container: Option<String>,
    pub source_url: Option<String>,
}

impl LinkRequest {
    pub fn new(original_url: impl Into<String>) -> Self {
        let original_url = original_url.into();
        Self {
            video_id: extract_video_id(&original_url),
            original_url,
            ..Default::default()
        }
    }

    pub fn for_format(format: &FormatDescriptor, original_url: impl Into<String>) -> Self {
        Self {
            format_id: Some(format.format_id.clone()),
            quality_label: Some(format.quality_label.clone()),
            container: Some(format.container.clone()),
            source_url: Some(format.source_url.clone()),
            ..Self::new(original_url)
        }
    }

    pub fn with_format_id(mut self, format_id: Option<String>) -> Self {
        self.format_id = format_id.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn with_quality(mut self, quality_label: Option<String>) -> Self {
        self.quality_label = quality_label.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn with_container(mut self, container: Option<String>) -> Self {
        self.container = container
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty());
        self
    }

    pub fn with_source_url(mut self, source_url: Option<String>) -> Self {
        self.source_url = source_url;
        self
    }

    /// Audio iff the container is mp3
    pub fn is_audio(&self) -> bool {
        self.container.as_deref() == Some(AUDIO_CONTAINER)
    }
}

/// One tier of the download link chain
#[async_trait]
pub trait LinkStrategy: Send + Sync {
    /// Name of the strategy (for logging and the response body)
    fn name(&self) -> &'static str;

    /// Produce a link or explain why this tier cannot
    async fn resolve(&self, request: &LinkRequest) -> Result<ResolvedLink, DownloadError>;
}
