// Error types for extraction and link resolution

use thiserror::Error;

/// Coarse category of a failure, used to pick a fallback or an HTTP status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input URL is not a recognized video URL
    InvalidInput,
    /// An extractor process or the conversion API failed
    CollaboratorFailure,
    /// No video identifier could be extracted from the URL
    NoIdentifier,
    /// Anything else
    Internal,
}

#[derive(Debug, Clone, Error)]
pub enum DownloadError {
    /// Network timeout while talking to a collaborator
    #[error("Network timeout: {0}")]
    NetworkTimeout(String),

    /// The video host refused the request (429, bot detection, etc.)
    #[error("Blocked by video host: {0}")]
    Blocked(String),

    /// yt-dlp or python not found in system
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Invalid video URL format
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// URL carries no video identifier
    #[error("No video identifier in URL: {0}")]
    NoIdentifier(String),

    /// Failed to parse extractor or service output
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Command execution failed
    #[error("Execution error: {0}")]
    ExecutionError(String),

    /// Conversion service answered without a usable URL
    #[error("Service error: {0}")]
    Service(String),

    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// Unknown error with details
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl DownloadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidUrl(_) => ErrorKind::InvalidInput,
            Self::NoIdentifier(_) => ErrorKind::NoIdentifier,
            Self::NetworkTimeout(_)
            | Self::Blocked(_)
            | Self::ToolNotFound(_)
            | Self::ParseError(_)
            | Self::ExecutionError(_)
            | Self::Service(_)
            | Self::Http(_) => ErrorKind::CollaboratorFailure,
            Self::Unknown(_) => ErrorKind::Internal,
        }
    }
}

impl From<reqwest::Error> for DownloadError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::NetworkTimeout(e.to_string())
        } else if e.is_decode() {
            Self::ParseError(e.to_string())
        } else {
            Self::Http(e.to_string())
        }
    }
}

// Process plumbing reports errors as strings; sort them into a variant
impl From<String> for DownloadError {
    fn from(s: String) -> Self {
        let lower = s.to_lowercase();

        if lower.contains("timeout") || lower.contains("timed out") {
            return Self::NetworkTimeout(s);
        }

        if lower.contains("429") || lower.contains("bot") || lower.contains("blocked") {
            return Self::Blocked(s);
        }

        if lower.contains("command not found")
            || lower.contains("no such file")
            || lower.contains("no module named")
        {
            return Self::ToolNotFound(s);
        }

        if lower.contains("parse") || lower.contains("json") {
            return Self::ParseError(s);
        }

        if lower.contains("unsupported url") {
            return Self::InvalidUrl(s);
        }

        Self::ExecutionError(s)
    }
}
