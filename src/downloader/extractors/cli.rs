// CLI InfoExtractor - uses native `yt-dlp` binary

use async_trait::async_trait;

use super::traits::{ExtractorConfig, InfoExtractor, RawVideoInfo};
use crate::downloader::errors::DownloadError;
use crate::downloader::tools::ToolManager;
use crate::downloader::utils::{is_usable_url, run_output_with_timeout};

/// CLI-based info extractor using yt-dlp binary
pub struct CliInfoExtractor {
    ytdlp_path: String,
}

impl CliInfoExtractor {
    pub fn new(configured_path: Option<&str>) -> Self {
        Self {
            ytdlp_path: ToolManager::find_ytdlp(configured_path),
        }
    }

    /// Arguments for `--dump-json`. The URL follows `--` so it is never
    /// read as an option.
    pub fn info_args(url: &str, config: &ExtractorConfig) -> Vec<String> {
        let mut args = vec!["--dump-json".to_string(), "--no-download".to_string()];
        args.extend(config.common_args());
        args.push("--".to_string());
        args.push(url.to_string());
        args
    }

    /// Arguments for `--get-url`
    pub fn get_url_args(url: &str, format_spec: &str, config: &ExtractorConfig) -> Vec<String> {
        let mut args = vec![
            "--get-url".to_string(),
            "--format".to_string(),
            format_spec.to_string(),
        ];
        args.extend(config.common_args());
        args.push("--".to_string());
        args.push(url.to_string());
        args
    }

    /// Run yt-dlp (or a wrapper of it) and return stdout on success
    pub(super) async fn run(
        tag: &str,
        program: &str,
        args: Vec<String>,
        config: &ExtractorConfig,
    ) -> Result<Vec<u8>, DownloadError> {
        log::debug!("[{}] Running: {} {}", tag, program, args.join(" "));

        let out = run_output_with_timeout(program, args, u64::from(config.timeout_seconds)).await?;

        if out.status.success() {
            Ok(out.stdout)
        } else {
            let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
            log::warn!("[{}] {} exited with {}: {}", tag, program, out.status, stderr);
            Err(DownloadError::from(if stderr.is_empty() {
                format!("{} exited with {}", program, out.status)
            } else {
                stderr
            }))
        }
    }

    /// First usable URL line of `--get-url` output
    pub(super) fn parse_url_output(stdout: &[u8]) -> Result<String, DownloadError> {
        String::from_utf8_lossy(stdout)
            .lines()
            .map(str::trim)
            .find(|line| is_usable_url(line))
            .map(|line| line.to_string())
            .ok_or_else(|| DownloadError::ParseError("No download URL found".to_string()))
    }
}

#[async_trait]
impl InfoExtractor for CliInfoExtractor {
    fn name(&self) -> &'static str {
        "cli-yt-dlp"
    }

    async fn version(&self) -> Option<String> {
        ToolManager::version(&self.ytdlp_path, &[]).await
    }

    async fn extract(
        &self,
        url: &str,
        config: &ExtractorConfig,
    ) -> Result<RawVideoInfo, DownloadError> {
        let stdout = Self::run(
            "CliExtractor",
            &self.ytdlp_path,
            Self::info_args(url, config),
            config,
        )
        .await?;
        RawVideoInfo::from_json(&stdout)
    }

    async fn get_url(
        &self,
        url: &str,
        format_spec: &str,
        config: &ExtractorConfig,
    ) -> Result<String, DownloadError> {
        let stdout = Self::run(
            "CliExtractor",
            &self.ytdlp_path,
            Self::get_url_args(url, format_spec, config),
            config,
        )
        .await?;
        Self::parse_url_output(&stdout)
    }
}
