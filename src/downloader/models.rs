// Common data models for format resolution

use serde::{Deserialize, Serialize};

use super::extractors::BlockingReason;

/// Container token that marks a descriptor as audio
pub const AUDIO_CONTAINER: &str = "mp3";

/// Display and selection category of a descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaCategory {
    Video,
    Audio,
}

/// One retrievable media variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatDescriptor {
    /// Extractor format ID (e.g., "22", "140")
    pub format_id: String,
    /// Lowercase file extension (mp4, webm, mp3)
    #[serde(rename = "ext")]
    pub container: String,
    /// "720p", "128kbps", "audio" or "best available"
    #[serde(rename = "quality")]
    pub quality_label: String,
    /// File size in bytes, when known
    #[serde(rename = "filesize", default, skip_serializing_if = "Option::is_none")]
    pub filesize_bytes: Option<u64>,
    /// Direct media URL or a redirect/converter URL
    #[serde(rename = "url")]
    pub source_url: String,
    #[serde(rename = "resolution", default, skip_serializing_if = "Option::is_none")]
    pub resolution_hint: Option<String>,
    #[serde(rename = "format_note", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl FormatDescriptor {
    pub fn category(&self) -> MediaCategory {
        if self.container == AUDIO_CONTAINER {
            MediaCategory::Audio
        } else {
            MediaCategory::Video
        }
    }

    pub fn is_audio(&self) -> bool {
        self.category() == MediaCategory::Audio
    }
}

/// Video information returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub title: String,
    pub thumbnail: String,
    pub duration: String,
    pub uploader: String,
    pub formats: Vec<FormatDescriptor>,
}

/// Where a resolved video came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionSource {
    /// Real extractor output
    Extractor,
    /// Fixed stand-in data after the extractor failed
    Mock,
}

/// Result of a resolve call; mocks stay distinguishable from real data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedVideo {
    #[serde(flatten)]
    pub info: VideoInfo,
    pub source: ResolutionSource,
    /// Diagnosed extractor failure when `source` is `Mock`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<BlockingReason>,
}

impl ResolvedVideo {
    pub fn extracted(info: VideoInfo) -> Self {
        Self {
            info,
            source: ResolutionSource::Extractor,
            fallback_reason: None,
        }
    }

    pub fn mocked(info: VideoInfo, reason: BlockingReason) -> Self {
        Self {
            info,
            source: ResolutionSource::Mock,
            fallback_reason: Some(reason),
        }
    }

    pub fn is_mock(&self) -> bool {
        self.source == ResolutionSource::Mock
    }
}

/// Final download link for a chosen format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLink {
    pub url: String,
    /// True when the URL points at a third-party converter page
    pub degraded: bool,
    /// Name of the strategy that produced the URL
    pub strategy: String,
}
