// InfoExtractor trait and raw payload types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::downloader::errors::DownloadError;
use crate::downloader::utils::is_usable_url;

/// Extraction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorMode {
    /// Python module yt_dlp
    Python,
    /// CLI binary yt-dlp
    Cli,
    /// Python first, then CLI
    #[default]
    Auto,
}

impl fmt::Display for ExtractorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Python => write!(f, "python"),
            Self::Cli => write!(f, "cli"),
            Self::Auto => write!(f, "auto"),
        }
    }
}

/// Configuration for info extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Extraction mode (Python, CLI, or Auto)
    pub mode: ExtractorMode,
    /// SOCKS5/HTTP proxy URL
    pub proxy: Option<String>,
    /// Path to cookies.txt file
    pub cookies_path: Option<String>,
    /// Use cookies from browser (Chrome)
    pub cookies_from_browser: bool,
    /// Process timeout in seconds
    pub timeout_seconds: u32,
    /// YouTube player client (android, web, tv)
    pub player_client: Option<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            mode: ExtractorMode::Auto,
            proxy: None,
            cookies_path: None,
            cookies_from_browser: false,
            timeout_seconds: 30,
            player_client: None,
        }
    }
}

impl ExtractorConfig {
    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn with_cookies_path(mut self, path: Option<String>) -> Self {
        self.cookies_path = path;
        self
    }

    pub fn with_cookies_from_browser(mut self, enabled: bool) -> Self {
        self.cookies_from_browser = enabled;
        self
    }

    pub fn with_mode(mut self, mode: ExtractorMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_timeout(mut self, seconds: u32) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn with_player_client(mut self, client: Option<String>) -> Self {
        self.player_client = client;
        self
    }

    /// Arguments shared by every yt-dlp invocation
    pub fn common_args(&self) -> Vec<String> {
        let mut args = vec![
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "--socket-timeout".to_string(),
            self.timeout_seconds.to_string(),
        ];

        if let Some(client) = &self.player_client {
            args.push("--extractor-args".to_string());
            args.push(format!("youtube:player_client={}", client));
        }

        if let Some(path) = &self.cookies_path {
            args.push("--cookies".to_string());
            args.push(path.clone());
        } else if self.cookies_from_browser {
            args.push("--cookies-from-browser".to_string());
            args.push("chrome".to_string());
        }

        if let Some(proxy) = &self.proxy {
            args.push("--proxy".to_string());
            args.push(proxy.clone());
        }

        args
    }
}

/// One raw format entry as reported by yt-dlp; every field may be missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawFormat {
    /// Format ID (e.g., "137", "140")
    pub format_id: Option<String>,
    /// File extension (mp4, webm, m4a)
    pub ext: Option<String>,
    /// Direct media URL
    pub url: Option<String>,
    /// Video codec (avc1, vp9, av01, none)
    pub vcodec: Option<String>,
    /// Audio codec (mp4a, opus, none)
    pub acodec: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Audio bitrate in kbps
    pub abr: Option<f32>,
    /// Total bitrate in kbps
    pub tbr: Option<f32>,
    pub filesize: Option<u64>,
    pub filesize_approx: Option<u64>,
    /// Resolution string (e.g., "1920x1080")
    pub resolution: Option<String>,
    /// Format note (e.g., "1080p", "tiny")
    pub format_note: Option<String>,
}

impl RawFormat {
    /// URL if it is an absolute http(s) URL
    pub fn usable_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| is_usable_url(u))
    }

    /// Height if present and non-zero
    pub fn usable_height(&self) -> Option<u32> {
        self.height.filter(|h| *h > 0)
    }

    /// Has a real video stream, a URL and a height
    pub fn is_video_capable(&self) -> bool {
        codec_present(self.vcodec.as_deref())
            && self.usable_url().is_some()
            && self.usable_height().is_some()
    }

    /// No video stream, a real audio stream, and a URL
    pub fn is_audio_only(&self) -> bool {
        self.vcodec.as_deref() == Some("none")
            && codec_present(self.acodec.as_deref())
            && self.usable_url().is_some()
    }

    /// Exact size, or the approximate one when exact is unknown
    pub fn effective_size(&self) -> Option<u64> {
        self.filesize.or(self.filesize_approx)
    }

    /// Lowercase, non-empty extension
    pub fn container(&self) -> Option<String> {
        non_empty(self.ext.as_deref()).map(|e| e.to_lowercase())
    }

    pub fn id(&self) -> Option<&str> {
        non_empty(self.format_id.as_deref())
    }

    fn from_json(f: &serde_json::Value) -> Self {
        Self {
            format_id: json_string(&f["format_id"]),
            ext: json_string(&f["ext"]),
            url: json_string(&f["url"]),
            vcodec: json_string(&f["vcodec"]),
            acodec: json_string(&f["acodec"]),
            width: json_u32(&f["width"]),
            height: json_u32(&f["height"]),
            abr: f["abr"].as_f64().map(|a| a as f32),
            tbr: f["tbr"].as_f64().map(|t| t as f32),
            filesize: json_u64(&f["filesize"]),
            filesize_approx: json_u64(&f["filesize_approx"]),
            resolution: json_string(&f["resolution"]),
            format_note: json_string(&f["format_note"]),
        }
    }
}

/// Raw `--dump-json` payload; every field may be missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawVideoInfo {
    pub id: Option<String>,
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    /// Duration in seconds
    pub duration: Option<f64>,
    pub uploader: Option<String>,
    pub channel: Option<String>,
    /// Best single URL chosen by the extractor
    pub url: Option<String>,
    pub webpage_url: Option<String>,
    pub ext: Option<String>,
    pub filesize: Option<u64>,
    pub formats: Vec<RawFormat>,
}

impl RawVideoInfo {
    /// Parse yt-dlp JSON output. Wrong-typed fields are treated as absent;
    /// only non-JSON or non-object output is an error.
    pub fn from_json(stdout: &[u8]) -> Result<Self, DownloadError> {
        let json_str = String::from_utf8_lossy(stdout);
        let json: serde_json::Value = serde_json::from_str(json_str.trim())
            .map_err(|e| DownloadError::ParseError(format!("Invalid JSON: {}", e)))?;

        if !json.is_object() {
            return Err(DownloadError::ParseError(
                "Extractor output is not a JSON object".to_string(),
            ));
        }

        let formats = json["formats"]
            .as_array()
            .map(|arr| arr.iter().map(RawFormat::from_json).collect())
            .unwrap_or_default();

        Ok(Self {
            id: json_string(&json["id"]),
            title: json_string(&json["title"]),
            thumbnail: json_string(&json["thumbnail"]),
            duration: json["duration"].as_f64().filter(|d| d.is_finite() && *d >= 0.0),
            uploader: json_string(&json["uploader"]),
            channel: json_string(&json["channel"]),
            url: json_string(&json["url"]),
            webpage_url: json_string(&json["webpage_url"]),
            ext: json_string(&json["ext"]),
            filesize: json_u64(&json["filesize"]),
            formats,
        })
    }

    /// Best single URL in the payload: `url`, then `webpage_url`
    pub fn best_url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .filter(|u| is_usable_url(u))
            .or_else(|| self.webpage_url.as_deref().filter(|u| is_usable_url(u)))
    }

    pub fn uploader_name(&self) -> Option<&str> {
        non_empty(self.uploader.as_deref()).or_else(|| non_empty(self.channel.as_deref()))
    }
}

fn codec_present(codec: Option<&str>) -> bool {
    codec.map_or(false, |c| c != "none" && !c.is_empty())
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn json_string(v: &serde_json::Value) -> Option<String> {
    v.as_str().map(|s| s.to_string())
}

fn json_u64(v: &serde_json::Value) -> Option<u64> {
    v.as_u64()
        .or_else(|| v.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64))
}

fn json_u32(v: &serde_json::Value) -> Option<u32> {
    json_u64(v).and_then(|n| u32::try_from(n).ok())
}

/// Trait for info extractors (collaborator A)
#[async_trait]
pub trait InfoExtractor: Send + Sync {
    /// Name of the extractor (for logging)
    fn name(&self) -> &'static str;

    /// yt-dlp version, or None when the extractor cannot be started
    async fn version(&self) -> Option<String>;

    /// Extract video metadata with raw formats
    async fn extract(
        &self,
        url: &str,
        config: &ExtractorConfig,
    ) -> Result<RawVideoInfo, DownloadError>;

    /// Resolve a direct media URL for a yt-dlp format expression
    async fn get_url(
        &self,
        url: &str,
        format_spec: &str,
        config: &ExtractorConfig,
    ) -> Result<String, DownloadError>;
}
