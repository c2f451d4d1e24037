// Downloader module - format resolution and download link pipeline

pub mod converter;
pub mod errors;
pub mod extractors;
pub mod format_resolver;
pub mod format_selector;
pub mod link_resolver;
pub mod models;
pub mod orchestrator;
pub mod quality;
pub mod tools;
pub mod traits;
pub mod utils;

pub use errors::{DownloadError, ErrorKind};
pub use format_selector::FormatSelector;
pub use link_resolver::LinkResolver;
pub use models::{FormatDescriptor, ResolvedLink, ResolvedVideo, VideoInfo};
pub use orchestrator::VideoService;
pub use traits::{LinkRequest, LinkStrategy};
