// Failure diagnostics - classifies extractor errors
//
// A mocked resolution must say why the extractor failed, so the reason
// travels with the result and into the logs.

use serde::{Deserialize, Serialize};

use crate::downloader::errors::DownloadError;

/// Why an extraction attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockingReason {
    /// HTTP 403 Forbidden
    Http403Forbidden,
    /// Age-restricted content requiring login
    AgeRestricted,
    /// Geographic restriction
    GeoBlocked,
    /// Network or process timeout
    NetworkTimeout,
    /// 429 or similar
    RateLimited,
    /// Bot detection / captcha
    BotDetection,
    PrivateVideo,
    /// Deleted or otherwise gone
    VideoUnavailable,
    /// DRM, Premium or paid content
    DrmProtected,
    /// Neither yt-dlp nor the python module could be started
    ToolMissing,
    /// Extractor ran but printed something that is not a payload
    MalformedOutput,
    Unknown,
}

// Checked in order; the first matching row wins
const PATTERNS: &[(BlockingReason, &[&str])] = &[
    (
        BlockingReason::DrmProtected,
        &["drm", "widevine", "youtube premium", "requires purchase", "rental"],
    ),
    (
        BlockingReason::AgeRestricted,
        &["age-restricted", "confirm your age", "age_verification"],
    ),
    (
        BlockingReason::PrivateVideo,
        &["private video", "video is private", "granted access"],
    ),
    (
        BlockingReason::VideoUnavailable,
        &["video unavailable", "video is unavailable", "has been removed", "no longer available"],
    ),
    (
        BlockingReason::GeoBlocked,
        &["not available in your country", "blocked in your country", "geo restrict"],
    ),
    (
        BlockingReason::RateLimited,
        &["429", "rate limit", "too many requests"],
    ),
    (
        BlockingReason::BotDetection,
        &["not a bot", "captcha", "unusual traffic", "automated"],
    ),
    (BlockingReason::Http403Forbidden, &["403", "forbidden"]),
    (
        BlockingReason::NetworkTimeout,
        &["timeout", "timed out", "connection refused", "network unreachable"],
    ),
];

impl BlockingReason {
    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Http403Forbidden => "Access denied (HTTP 403)",
            Self::AgeRestricted => "Age-restricted content",
            Self::GeoBlocked => "Geographic restriction",
            Self::NetworkTimeout => "Network timeout",
            Self::RateLimited => "Rate limited by video host",
            Self::BotDetection => "Bot detection triggered",
            Self::PrivateVideo => "Private video",
            Self::VideoUnavailable => "Video unavailable",
            Self::DrmProtected => "DRM-protected content",
            Self::ToolMissing => "Extractor not installed",
            Self::MalformedOutput => "Extractor returned malformed data",
            Self::Unknown => "Unknown extractor failure",
        }
    }
}

/// Classify an extractor error message
pub fn diagnose_error(error: &str) -> BlockingReason {
    let lower = error.to_lowercase();

    PATTERNS
        .iter()
        .find(|(_, needles)| needles.iter().any(|n| lower.contains(n)))
        .map_or(BlockingReason::Unknown, |(reason, _)| *reason)
}

/// Classify a typed error, falling back to its message
pub fn diagnose(error: &DownloadError) -> BlockingReason {
    match error {
        DownloadError::ToolNotFound(_) => BlockingReason::ToolMissing,
        DownloadError::ParseError(_) => BlockingReason::MalformedOutput,
        DownloadError::NetworkTimeout(_) => BlockingReason::NetworkTimeout,
        other => diagnose_error(&other.to_string()),
    }
}
