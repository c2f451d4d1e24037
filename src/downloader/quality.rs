// Quality label parsing
//
// Labels come in two shapes: "<height>p" for video and "<bitrate>kbps" for
// audio. This module is the only place that interprets label text.

/// Parsed form of a quality label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityLabel {
    /// Video height in pixels ("720p")
    Height(u32),
    /// Audio bitrate in kbps ("128kbps")
    Bitrate(u32),
    /// "audio", "best available", empty, or unparseable
    Other,
}

/// Parse a quality label. Never fails.
pub fn parse(label: &str) -> QualityLabel {
    let label = label.trim();

    if let Some(bitrate) = label.strip_suffix("kbps") {
        return bitrate
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|b| b.is_finite() && *b >= 0.0)
            .map_or(QualityLabel::Other, |b| QualityLabel::Bitrate(b.round() as u32));
    }

    if let Some(height) = label.strip_suffix('p') {
        return height
            .parse::<u32>()
            .map_or(QualityLabel::Other, QualityLabel::Height);
    }

    QualityLabel::Other
}

/// Ranking key for video labels; anything that is not "<digits>p" ranks 0
pub fn rank(label: &str) -> u32 {
    match parse(label) {
        QualityLabel::Height(h) => h,
        _ => 0,
    }
}

/// Whether the label has the video shape (ends in "p")
pub fn is_height_label(label: &str) -> bool {
    label.ends_with('p')
}

pub fn height_label(height: u32) -> String {
    format!("{}p", height)
}

pub fn bitrate_label(kbps: f32) -> String {
    format!("{}kbps", kbps.round() as u32)
}
