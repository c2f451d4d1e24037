// Format resolver - raw extractor payload into FormatDescriptors
//
// Partition, dedupe by format_id, cap, map. Upstream order is kept; the
// selector is the only place that ranks.

use std::collections::HashSet;

use super::extractors::{RawFormat, RawVideoInfo};
use super::models::{FormatDescriptor, VideoInfo, AUDIO_CONTAINER};
use super::quality;
use super::utils::is_usable_url;

pub const MAX_VIDEO_FORMATS: usize = 5;
pub const MAX_AUDIO_FORMATS: usize = 3;

const DEFAULT_VIDEO_CONTAINER: &str = "mp4";
const MOCK_DURATION_SECS: f64 = 300.0;

/// Build the descriptor list for a payload. Never empty.
pub fn resolve(raw: &RawVideoInfo, original_url: &str) -> Vec<FormatDescriptor> {
    let mut seen = HashSet::new();
    let mut videos = Vec::new();
    let mut audios = Vec::new();

    for (index, entry) in raw.formats.iter().enumerate() {
        if entry.is_video_capable() {
            let id = entry
                .id()
                .map_or_else(|| format!("video-{}", index), str::to_string);
            if seen.insert(id.clone()) && videos.len() < MAX_VIDEO_FORMATS {
                videos.extend(video_descriptor(entry, id));
            }
        } else if entry.is_audio_only() {
            let id = entry
                .id()
                .map_or_else(|| format!("audio-{}", index), str::to_string);
            if seen.insert(id.clone()) && audios.len() < MAX_AUDIO_FORMATS {
                audios.extend(audio_descriptor(entry, id));
            }
        }
    }

    if videos.is_empty() && audios.is_empty() {
        log::warn!("[Resolver] No usable formats in payload, using single best entry");
        return vec![fallback_descriptor(raw, original_url)];
    }

    videos.extend(audios);
    videos
}

fn video_descriptor(entry: &RawFormat, format_id: String) -> Option<FormatDescriptor> {
    let height = entry.usable_height()?;
    let label = quality::height_label(height);
    let container = entry
        .container()
        .unwrap_or_else(|| DEFAULT_VIDEO_CONTAINER.to_string());

    Some(FormatDescriptor {
        format_id,
        quality_label: label.clone(),
        filesize_bytes: entry.effective_size(),
        source_url: entry.usable_url()?.to_string(),
        resolution_hint: Some(
            non_blank(entry.resolution.as_deref())
                .unwrap_or(label.as_str())
                .to_string(),
        ),
        note: Some(match non_blank(entry.format_note.as_deref()) {
            Some(note) => note.to_string(),
            None => format!("{} {}", label, container.to_uppercase()),
        }),
        container,
    })
}

fn audio_descriptor(entry: &RawFormat, format_id: String) -> Option<FormatDescriptor> {
    let container = entry
        .container()
        .unwrap_or_else(|| AUDIO_CONTAINER.to_string());
    let label = entry
        .abr
        .filter(|abr| abr.is_finite() && *abr > 0.0)
        .map_or_else(|| "audio".to_string(), quality::bitrate_label);

    Some(FormatDescriptor {
        format_id,
        quality_label: label,
        filesize_bytes: entry.effective_size(),
        source_url: entry.usable_url()?.to_string(),
        resolution_hint: None,
        note: Some(format!("Audio Only ({})", container.to_uppercase())),
        container,
    })
}

fn fallback_descriptor(raw: &RawVideoInfo, original_url: &str) -> FormatDescriptor {
    FormatDescriptor {
        format_id: "best".to_string(),
        container: non_blank(raw.ext.as_deref())
            .map_or_else(|| DEFAULT_VIDEO_CONTAINER.to_string(), str::to_lowercase),
        quality_label: "best available".to_string(),
        filesize_bytes: raw.filesize,
        source_url: raw.best_url().unwrap_or(original_url).to_string(),
        resolution_hint: None,
        note: Some("Best Quality Available".to_string()),
    }
}

/// Format seconds as `H:MM:SS`, or `M:SS` under an hour
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }

    let total = seconds.floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

pub fn thumbnail_url(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{}/maxresdefault.jpg", video_id)
}

const VIDEO_CONVERTER: &str = "https://ssyoutube.com/";
const AUDIO_CONVERTER: &str = "https://ytmp3.cc/";

/// Converter page for a video download
pub fn video_redirect_url(video_id: &str) -> String {
    format!("{}watch?v={}", VIDEO_CONVERTER, video_id)
}

/// Converter page for an audio download
pub fn audio_redirect_url(video_id: &str) -> String {
    format!("{}en13/{}/", AUDIO_CONVERTER, video_id)
}

/// True for a converter page rather than a media file
pub fn is_converter_page(url: &str) -> bool {
    let url = url.trim();
    url.starts_with(VIDEO_CONVERTER) || url.starts_with(AUDIO_CONVERTER)
}

/// Full VideoInfo for a payload, with metadata defaults filled in
pub fn build_video_info(raw: &RawVideoInfo, video_id: &str, original_url: &str) -> VideoInfo {
    VideoInfo {
        title: non_blank(raw.title.as_deref())
            .map_or_else(|| format!("Video {}", video_id), str::to_string),
        thumbnail: raw
            .thumbnail
            .as_deref()
            .filter(|t| is_usable_url(t))
            .map_or_else(|| thumbnail_url(video_id), str::to_string),
        duration: format_duration(raw.duration.unwrap_or(0.0)),
        uploader: raw.uploader_name().unwrap_or("Unknown").to_string(),
        formats: resolve(raw, original_url),
    }
}

/// Fixed stand-in result used when extraction failed
pub fn mock_video_info(video_id: &str) -> VideoInfo {
    let video = |format_id: &str, height: u32, size: u64| {
        let label = quality::height_label(height);
        FormatDescriptor {
            format_id: format_id.to_string(),
            container: DEFAULT_VIDEO_CONTAINER.to_string(),
            quality_label: label.clone(),
            filesize_bytes: Some(size),
            source_url: video_redirect_url(video_id),
            resolution_hint: Some(label.clone()),
            note: Some(label),
        }
    };

    VideoInfo {
        title: format!("Video {}", video_id),
        thumbnail: thumbnail_url(video_id),
        duration: format_duration(MOCK_DURATION_SECS),
        uploader: "YouTube Channel".to_string(),
        formats: vec![
            video("22", 720, 50_000_000),
            video("18", 360, 25_000_000),
            FormatDescriptor {
                format_id: "audio".to_string(),
                container: AUDIO_CONTAINER.to_string(),
                quality_label: quality::bitrate_label(128.0),
                filesize_bytes: Some(5_000_000),
                source_url: audio_redirect_url(video_id),
                resolution_hint: None,
                note: Some("Audio only".to_string()),
            },
        ],
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

    fn video_entry(id: &str, height: u32) -> RawFormat {
        RawFormat {
            format_id: Some(id.to_string()),
            ext: Some("mp4".to_string()),
            url: Some(format!("https://cdn.example/{}", id)),
            vcodec: Some("avc1".to_string()),
            acodec: Some("none".to_string()),
            height: Some(height),
            ..Default::default()
        }
    }

    fn audio_entry(id: &str, abr: Option<f32>) -> RawFormat {
        RawFormat {
            format_id: Some(id.to_string()),
            ext: Some("m4a".to_string()),
            url: Some(format!("https://cdn.example/{}", id)),
            vcodec: Some("none".to_string()),
            acodec: Some("mp4a".to_string()),
            abr,
            ..Default::default()
        }
    }

    fn payload(formats: Vec<RawFormat>) -> RawVideoInfo {
        RawVideoInfo {
            formats,
            ..Default::default()
        }
    }

    #[test]
    fn test_video_cap() {
        let raw = payload((0..8).map(|i| video_entry(&format!("v{}", i), 144 + i)).collect());
        let formats = resolve(&raw, URL);
        assert_eq!(formats.len(), MAX_VIDEO_FORMATS);
        assert_eq!(formats[0].format_id, "v0");
        assert_eq!(formats[4].format_id, "v4");
    }

    #[test]
    fn test_audio_cap_and_order() {
        let mut entries: Vec<RawFormat> =
            (0..5).map(|i| audio_entry(&format!("a{}", i), Some(64.0))).collect();
        entries.push(video_entry("v", 720));
        let formats = resolve(&payload(entries), URL);

        let ids: Vec<&str> = formats.iter().map(|f| f.format_id.as_str()).collect();
        assert_eq!(ids, ["v", "a0", "a1", "a2"]);
    }

    #[test]
    fn test_duplicates_first_wins() {
        let mut second = video_entry("22", 1080);
        second.url = Some("https://cdn.example/other".to_string());
        let formats = resolve(&payload(vec![video_entry("22", 720), second]), URL);

        assert_eq!(formats.len(), 1);
        assert_eq!(formats[0].quality_label, "720p");
    }

    #[test]
    fn test_missing_ids_stay_distinct() {
        let mut a = video_entry("x", 360);
        a.format_id = None;
        let mut b = video_entry("x", 480);
        b.format_id = Some("  ".to_string());
        let formats = resolve(&payload(vec![a, b]), URL);

        let ids: Vec<&str> = formats.iter().map(|f| f.format_id.as_str()).collect();
        assert_eq!(ids, ["video-0", "video-1"]);
    }

    #[test]
    fn test_video_mapping() {
        let mut entry = video_entry("22", 720);
        entry.ext = None;
        entry.filesize_approx = Some(1234);
        let formats = resolve(&payload(vec![entry]), URL);

        assert_eq!(
            formats[0],
            FormatDescriptor {
                format_id: "22".to_string(),
                container: "mp4".to_string(),
                quality_label: "720p".to_string(),
                filesize_bytes: Some(1234),
                source_url: "https://cdn.example/22".to_string(),
                resolution_hint: Some("720p".to_string()),
                note: Some("720p MP4".to_string()),
            }
        );
    }

    #[test]
    fn test_audio_mapping() {
        let formats = resolve(
            &payload(vec![audio_entry("140", Some(129.47)), audio_entry("251", None)]),
            URL,
        );
        assert_eq!(formats[0].quality_label, "129kbps");
        assert_eq!(formats[0].note.as_deref(), Some("Audio Only (M4A)"));
        assert_eq!(formats[1].quality_label, "audio");
    }

    #[test]
    fn test_unusable_entries_dropped() {
        let mut no_url = video_entry("a", 720);
        no_url.url = None;
        let mut manifest = video_entry("b", 720);
        manifest.url = Some("manifest.mpd".to_string());
        let mut no_height = video_entry("c", 0);
        no_height.height = None;
        let mut both_none = audio_entry("d", Some(128.0));
        both_none.acodec = Some("none".to_string());

        let raw = RawVideoInfo {
            ext: Some("webm".to_string()),
            filesize: Some(99),
            webpage_url: Some(URL.to_string()),
            formats: vec![no_url, manifest, no_height, both_none],
            ..Default::default()
        };
        let formats = resolve(&raw, "https://youtu.be/dQw4w9WgXcQ");

        assert_eq!(formats.len(), 1);
        assert_eq!(formats[0].format_id, "best");
        assert_eq!(formats[0].quality_label, "best available");
        assert_eq!(formats[0].container, "webm");
        assert_eq!(formats[0].filesize_bytes, Some(99));
        assert_eq!(formats[0].source_url, URL);
        assert_eq!(formats[0].note.as_deref(), Some("Best Quality Available"));
    }

    #[test]
    fn test_fallback_uses_original_url() {
        let formats = resolve(&RawVideoInfo::default(), URL);
        assert_eq!(formats.len(), 1);
        assert_eq!(formats[0].container, "mp4");
        assert_eq!(formats[0].source_url, URL);
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let raw = payload(vec![
            video_entry("18", 360),
            audio_entry("140", Some(128.0)),
            video_entry("22", 720),
        ]);
        assert_eq!(resolve(&raw, URL), resolve(&raw, URL));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(65.0), "1:05");
        assert_eq!(format_duration(65.9), "1:05");
        assert_eq!(format_duration(3661.0), "1:01:01");
        assert_eq!(format_duration(-3.0), "0:00");
        assert_eq!(format_duration(f64::NAN), "0:00");
    }

    #[test]
    fn test_metadata_defaults() {
        let raw = RawVideoInfo {
            channel: Some("Chan".to_string()),
            ..Default::default()
        };
        let info = build_video_info(&raw, "dQw4w9WgXcQ", URL);

        assert_eq!(info.title, "Video dQw4w9WgXcQ");
        assert_eq!(
            info.thumbnail,
            "https://img.youtube.com/vi/dQw4w9WgXcQ/maxresdefault.jpg"
        );
        assert_eq!(info.duration, "0:00");
        assert_eq!(info.uploader, "Chan");

        let anonymous = build_video_info(&RawVideoInfo::default(), "dQw4w9WgXcQ", URL);
        assert_eq!(anonymous.uploader, "Unknown");
    }

    #[test]
    fn test_mock_video_info() {
        let info = mock_video_info("dQw4w9WgXcQ");
        let labels: Vec<&str> = info.formats.iter().map(|f| f.quality_label.as_str()).collect();

        assert_eq!(labels, ["720p", "360p", "128kbps"]);
        assert_eq!(info.duration, "5:00");
        assert_eq!(info.uploader, "YouTube Channel");
        assert!(info.formats.iter().all(|f| f.source_url.contains("dQw4w9WgXcQ")));
        assert!(info.formats[2].is_audio());
        assert_eq!(info.formats[2].source_url, "https://ytmp3.cc/en13/dQw4w9WgXcQ/");
        assert!(info.formats.iter().all(|f| is_converter_page(&f.source_url)));
    }

    #[test]
    fn test_converter_page_detection() {
        assert!(is_converter_page(&video_redirect_url("dQw4w9WgXcQ")));
        assert!(is_converter_page(" https://ytmp3.cc/en13/dQw4w9WgXcQ/"));
        assert!(!is_converter_page("https://rr3.example/videoplayback?itag=22"));
        assert!(!is_converter_page("https://ssyoutube.com.evil.example/x"));
    }
}
