// Conversion API client (third-party "cobalt-style" service)
//
// POST {url, vQuality, isAudioOnly} -> {status, url | text}

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::errors::DownloadError;
use super::quality::{self, QualityLabel};
use super::utils::is_usable_url;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConvertRequest<'a> {
    url: &'a str,
    v_quality: String,
    is_audio_only: bool,
}

#[derive(Debug, Deserialize)]
struct ConvertResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ConverterClient {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl ConverterClient {
    pub fn new(
        api_url: impl Into<String>,
        api_key: Option<String>,
        timeout_secs: u64,
        proxy: Option<&str>,
    ) -> Result<Self, DownloadError> {
        let mut builder = reqwest::Client::builder().timeout(Duration::from_secs(timeout_secs));

        if let Some(proxy_url) = proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| DownloadError::Service(format!("Invalid proxy URL {}: {}", proxy_url, e)))?;
            builder = builder.proxy(proxy);
        }

        Ok(Self {
            client: builder.build()?,
            api_url: api_url.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    /// Ask the service for a download URL
    pub async fn convert(
        &self,
        url: &str,
        quality_label: &str,
        is_audio_only: bool,
    ) -> Result<String, DownloadError> {
        let body = ConvertRequest {
            url,
            v_quality: requested_quality(quality_label),
            is_audio_only,
        };

        let mut request = self
            .client
            .post(&self.api_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body);
        if let Some(key) = &self.api_key {
            request = request.header(reqwest::header::AUTHORIZATION, format!("Api-Key {}", key));
        }

        log::debug!("[Converter] POST {} ({})", self.api_url, body.v_quality);
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        let parsed: ConvertResponse = serde_json::from_str(&text).map_err(|e| {
            if status.is_success() {
                DownloadError::ParseError(format!("Converter response: {}", e))
            } else {
                DownloadError::Http(format!("Converter returned HTTP {}", status))
            }
        })?;

        if parsed.status.as_deref() == Some("error") {
            return Err(DownloadError::Service(
                parsed
                    .text
                    .unwrap_or_else(|| "Converter reported an error".to_string()),
            ));
        }

        parsed
            .url
            .map(|u| u.trim().to_string())
            .filter(|u| is_usable_url(u))
            .ok_or_else(|| DownloadError::Service("Converter returned no usable URL".to_string()))
    }
}

/// `vQuality` value: the height for video labels, "max" otherwise
fn requested_quality(quality_label: &str) -> String {
    match quality::parse(quality_label) {
        QualityLabel::Height(h) if h > 0 => h.to_string(),
        _ => "max".to_string(),
    }
}
