// Python InfoExtractor - uses `python3 -m yt_dlp`
//
// Same command line as the CLI extractor, run through the interpreter so a
// pip-installed yt_dlp works without a standalone binary.

use async_trait::async_trait;

use super::cli::CliInfoExtractor;
use super::traits::{ExtractorConfig, InfoExtractor, RawVideoInfo};
use crate::downloader::errors::DownloadError;
use crate::downloader::tools::ToolManager;

const MODULE_ARGS: [&str; 2] = ["-m", "yt_dlp"];

/// Python-based info extractor using yt_dlp module
pub struct PythonInfoExtractor {
    python_cmd: String,
}

impl PythonInfoExtractor {
    pub fn new(python_cmd: impl Into<String>) -> Self {
        Self {
            python_cmd: python_cmd.into(),
        }
    }

    fn with_module(args: Vec<String>) -> Vec<String> {
        MODULE_ARGS
            .iter()
            .map(|a| a.to_string())
            .chain(args)
            .collect()
    }
}

#[async_trait]
impl InfoExtractor for PythonInfoExtractor {
    fn name(&self) -> &'static str {
        "python-yt-dlp"
    }

    async fn version(&self) -> Option<String> {
        ToolManager::version(&self.python_cmd, &MODULE_ARGS).await
    }

    async fn extract(
        &self,
        url: &str,
        config: &ExtractorConfig,
    ) -> Result<RawVideoInfo, DownloadError> {
        let args = Self::with_module(CliInfoExtractor::info_args(url, config));
        let stdout = CliInfoExtractor::run("PythonExtractor", &self.python_cmd, args, config).await?;
        RawVideoInfo::from_json(&stdout)
    }

    async fn get_url(
        &self,
        url: &str,
        format_spec: &str,
        config: &ExtractorConfig,
    ) -> Result<String, DownloadError> {
        let args = Self::with_module(CliInfoExtractor::get_url_args(url, format_spec, config));
        let stdout = CliInfoExtractor::run("PythonExtractor", &self.python_cmd, args, config).await?;
        CliInfoExtractor::parse_url_output(&stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_prefix() {
        let args = PythonInfoExtractor::with_module(vec!["--dump-json".to_string()]);
        assert_eq!(args, ["-m", "yt_dlp", "--dump-json"]);
    }
}
