// FormatSelector - "instant download" pick and yt-dlp format expressions
//
// Only video descriptors with a "<height>p" label compete; ties keep the
// upstream order. Audio never competes against video.

use super::models::FormatDescriptor;
use super::quality::{self, QualityLabel};

/// Expression used when the requested quality says nothing usable
pub const FALLBACK_SPEC: &str = "best";

const AUDIO_SPEC: &str = "bestaudio[ext=m4a]/bestaudio";

pub struct FormatSelector;

impl FormatSelector {
    /// Pick the descriptor for a single-click download
    pub fn select_best(formats: &[FormatDescriptor]) -> Option<&FormatDescriptor> {
        let mut best: Option<&FormatDescriptor> = None;

        for format in formats
            .iter()
            .filter(|f| !f.is_audio() && quality::is_height_label(&f.quality_label))
        {
            // strict comparison keeps the first of equal ranks
            if best.map_or(true, |b| {
                quality::rank(&format.quality_label) > quality::rank(&b.quality_label)
            }) {
                best = Some(format);
            }
        }

        best.or_else(|| formats.first())
    }

    /// yt-dlp `--format` expression for a chosen descriptor
    pub fn format_spec(format_id: Option<&str>, quality_label: Option<&str>) -> String {
        if let Some(id) = format_id.map(str::trim).filter(|id| is_extractor_id(id)) {
            return id.to_string();
        }

        match quality_label.map(quality::parse) {
            Some(QualityLabel::Height(h)) if h > 0 => format!("best[height<={}]/best", h),
            Some(QualityLabel::Bitrate(_)) => AUDIO_SPEC.to_string(),
            Some(QualityLabel::Other) if quality_label.map(str::trim) == Some("audio") => {
                AUDIO_SPEC.to_string()
            }
            _ => FALLBACK_SPEC.to_string(),
        }
    }
}

/// Ids minted by the resolver ("best", "audio", "video-3") mean nothing to yt-dlp
fn is_extractor_id(id: &str) -> bool {
    !id.is_empty()
        && id != "best"
        && id != "audio"
        && !id.starts_with("video-")
        && !id.starts_with("audio-")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(id: &str, ext: &str, quality: &str) -> FormatDescriptor {
        FormatDescriptor {
            format_id: id.to_string(),
            container: ext.to_string(),
            quality_label: quality.to_string(),
            filesize_bytes: None,
            source_url: format!("https://cdn.example/{}", id),
            resolution_hint: None,
            note: None,
        }
    }

    #[test]
    fn test_highest_video_wins() {
        let formats = vec![
            fmt("18", "mp4", "360p"),
            fmt("22", "mp4", "720p"),
            fmt("135", "mp4", "480p"),
        ];
        assert_eq!(FormatSelector::select_best(&formats).unwrap().format_id, "22");
    }

    #[test]
    fn test_ties_keep_first() {
        let formats = vec![
            fmt("a", "webm", "720p"),
            fmt("b", "mp4", "720p"),
        ];
        assert_eq!(FormatSelector::select_best(&formats).unwrap().format_id, "a");
    }

    #[test]
    fn test_audio_never_competes() {
        let formats = vec![fmt("140", "mp3", "999p"), fmt("18", "mp4", "360p")];
        assert_eq!(FormatSelector::select_best(&formats).unwrap().format_id, "18");
    }

    #[test]
    fn test_only_audio_returns_first() {
        let formats = vec![fmt("140", "mp3", "128kbps"), fmt("251", "mp3", "160kbps")];
        assert_eq!(FormatSelector::select_best(&formats).unwrap().format_id, "140");
    }

    #[test]
    fn test_best_available_is_returned() {
        let formats = vec![fmt("best", "mp4", "best available")];
        assert_eq!(FormatSelector::select_best(&formats).unwrap().format_id, "best");
    }

    #[test]
    fn test_empty() {
        assert!(FormatSelector::select_best(&[]).is_none());
    }

    #[test]
    fn test_format_spec() {
        assert_eq!(FormatSelector::format_spec(Some("137"), Some("1080p")), "137");
        assert_eq!(
            FormatSelector::format_spec(Some("video-2"), Some("720p")),
            "best[height<=720]/best"
        );
        assert_eq!(
            FormatSelector::format_spec(Some("audio"), Some("128kbps")),
            "bestaudio[ext=m4a]/bestaudio"
        );
        assert_eq!(
            FormatSelector::format_spec(None, Some("audio")),
            "bestaudio[ext=m4a]/bestaudio"
        );
        assert_eq!(
            FormatSelector::format_spec(Some("best"), Some("best available")),
            "best"
        );
        assert_eq!(FormatSelector::format_spec(None, None), "best");
    }
}
