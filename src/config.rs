// Service configuration: defaults, optional TOML file, environment overrides

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

use crate::downloader::converter::ConverterClient;
use crate::downloader::errors::DownloadError;
use crate::downloader::extractors::{ExtractorConfig, ExtractorMode};
use crate::downloader::utils::is_usable_url;

const APP_DIR: &str = "youtube-link-resolver";
const ENV_PREFIX: &str = "RESOLVER";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub extractor: ExtractorSettings,
    pub converter: ConverterSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorSettings {
    pub mode: ExtractorMode,
    /// Explicit yt-dlp binary; searched in common locations when unset
    pub ytdlp_path: Option<String>,
    pub python_cmd: String,
    pub timeout_seconds: u32,
    /// SOCKS5/HTTP proxy URL, shared with the converter client
    pub proxy: Option<String>,
    pub cookies_path: Option<String>,
    pub cookies_from_browser: bool,
    pub player_client: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterSettings {
    /// Conversion API endpoint; the strategy is skipped when unset
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            extractor: ExtractorSettings::default(),
            converter: ConverterSettings::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            mode: ExtractorMode::Auto,
            ytdlp_path: None,
            python_cmd: "python3".to_string(),
            timeout_seconds: 30,
            proxy: None,
            cookies_path: None,
            cookies_from_browser: false,
            player_client: None,
        }
    }
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            api_url: None,
            api_key: None,
            timeout_seconds: 15,
        }
    }
}

impl AppConfig {
    /// Load from the config file (if any) and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::build(Self::config_path(), None)
    }

    /// `env` replaces the process environment when given
    pub fn build(
        path: Option<PathBuf>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let plain_var = |key: &str| match &env {
            Some(vars) => vars.get(key).cloned(),
            None => std::env::var(key).ok(),
        };

        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?);

        if let Some(path) = path {
            log::debug!("[Config] Reading {}", path.display());
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(false),
            );
        }

        let cfg = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env.clone()),
            )
            .set_override_option("server.port", plain_var("PORT"))?
            .set_override_option("extractor.python_cmd", plain_var("YTDLP_PYTHON"))?
            .build()?;

        let config: AppConfig = cfg.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// `$RESOLVER_CONFIG`, else `<config_dir>/youtube-link-resolver/config.toml`
    pub fn config_path() -> Option<PathBuf> {
        std::env::var_os("RESOLVER_CONFIG")
            .map(PathBuf::from)
            .or_else(|| dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml")))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.extractor.timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "extractor.timeout_seconds must be positive".to_string(),
            ));
        }
        if self.converter.timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "converter.timeout_seconds must be positive".to_string(),
            ));
        }
        if let Some(url) = &self.converter.api_url {
            if !is_usable_url(url) {
                return Err(ConfigError::Invalid(format!(
                    "converter.api_url is not an http(s) URL: {}",
                    url
                )));
            }
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn extractor_config(&self) -> ExtractorConfig {
        let ex = &self.extractor;
        ExtractorConfig::default()
            .with_mode(ex.mode)
            .with_timeout(ex.timeout_seconds)
            .with_proxy(ex.proxy.clone())
            .with_cookies_path(ex.cookies_path.clone())
            .with_cookies_from_browser(ex.cookies_from_browser)
            .with_player_client(ex.player_client.clone())
    }

    /// Conversion API client, or None when no endpoint is configured
    pub fn converter_client(&self) -> Result<Option<ConverterClient>, DownloadError> {
        self.converter
            .api_url
            .as_deref()
            .map(|url| {
                ConverterClient::new(
                    url,
                    self.converter.api_key.clone(),
                    self.converter.timeout_seconds,
                    self.extractor.proxy.as_deref(),
                )
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vars(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::build(None, vars(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert!(config.converter_client().unwrap().is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::build(
            None,
            vars(&[
                ("RESOLVER_SERVER__PORT", "9000"),
                ("RESOLVER_EXTRACTOR__MODE", "cli"),
                ("RESOLVER_EXTRACTOR__PROXY", "socks5://127.0.0.1:1080"),
                ("RESOLVER_CONVERTER__API_URL", "https://converter.example/api/json"),
                ("YTDLP_PYTHON", "/usr/bin/python3.12"),
            ]),
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.extractor.mode, ExtractorMode::Cli);
        assert_eq!(config.extractor.python_cmd, "/usr/bin/python3.12");
        assert_eq!(
            config.extractor_config().proxy.as_deref(),
            Some("socks5://127.0.0.1:1080")
        );
        assert!(config.converter_client().unwrap().is_some());
    }

    #[test]
    fn test_plain_port_wins() {
        let config = AppConfig::build(
            None,
            vars(&[("RESOLVER_SERVER__PORT", "9000"), ("PORT", "3000")]),
        )
        .unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_toml_file() {
        let path = std::env::temp_dir().join(format!(
            "youtube-link-resolver-test-{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "[extractor]\ntimeout_seconds = 45\nplayer_client = \"android\"\n",
        )
        .unwrap();

        let config = AppConfig::build(Some(path.clone()), vars(&[])).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.extractor.timeout_seconds, 45);
        assert_eq!(config.extractor.player_client.as_deref(), Some("android"));
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_missing_file_is_fine() {
        let path = PathBuf::from("/nonexistent/youtube-link-resolver/config.toml");
        assert!(AppConfig::build(Some(path), vars(&[])).is_ok());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            AppConfig::build(None, vars(&[("RESOLVER_EXTRACTOR__TIMEOUT_SECONDS", "0")])),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            AppConfig::build(None, vars(&[("RESOLVER_CONVERTER__API_URL", "ftp://x")])),
            Err(ConfigError::Invalid(_))
        ));
    }
}
