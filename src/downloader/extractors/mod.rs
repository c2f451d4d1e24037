// InfoExtractor module - video metadata extraction through yt-dlp
//
// Two entry points:
// - Python mode: `python3 -m yt_dlp`
// - CLI mode: native `yt-dlp` binary
//
// ExtractorChain picks the order from ExtractorMode and falls back on failure.

mod cli;
mod diagnostics;
mod orchestrator;
mod python;
mod traits;

pub use cli::CliInfoExtractor;
pub use diagnostics::{diagnose, diagnose_error, BlockingReason};
pub use orchestrator::ExtractorChain;
pub use python::PythonInfoExtractor;
pub use traits::{ExtractorConfig, ExtractorMode, InfoExtractor, RawFormat, RawVideoInfo};
