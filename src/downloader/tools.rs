// Extractor tool discovery and version checks

use super::utils::run_output_with_timeout;

const VERSION_TIMEOUT_SECS: u64 = 10;

pub struct ToolManager;

impl ToolManager {
    /// Locate the yt-dlp binary; an explicit path always wins
    pub fn find_ytdlp(configured: Option<&str>) -> String {
        if let Some(path) = configured.map(str::trim).filter(|p| !p.is_empty()) {
            return path.to_string();
        }

        let common_paths = [
            "/opt/homebrew/bin/yt-dlp", // Homebrew on Apple Silicon
            "/usr/local/bin/yt-dlp",    // Homebrew on Intel Mac
            "/usr/bin/yt-dlp",          // System installation
        ];

        common_paths
            .iter()
            .find(|p| std::path::Path::new(p).exists())
            .map_or_else(|| "yt-dlp".to_string(), |p| p.to_string())
    }

    /// Run `<program> [prefix..] --version`; None when it cannot run
    pub async fn version(program: &str, prefix_args: &[&str]) -> Option<String> {
        let mut args: Vec<String> = prefix_args.iter().map(|a| a.to_string()).collect();
        args.push("--version".to_string());

        match run_output_with_timeout(program, args, VERSION_TIMEOUT_SECS).await {
            Ok(out) if out.status.success() => {
                let text = String::from_utf8_lossy(&out.stdout).trim().to_string();
                Some(text).filter(|v| !v.is_empty())
            }
            Ok(out) => {
                log::debug!(
                    "[Tools] {} --version exited with {}",
                    program,
                    out.status
                );
                None
            }
            Err(e) => {
                log::debug!("[Tools] {} unavailable: {}", program, e);
                None
            }
        }
    }
}
