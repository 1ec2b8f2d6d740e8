//! Codec report types and diagnostic-line scanning.

use serde::{Deserialize, Serialize};

/// Marker preceding audio stream attributes in analyzer output.
pub const AUDIO_MARKER: &str = "Audio: ";
/// Marker preceding video stream attributes in analyzer output.
pub const VIDEO_MARKER: &str = "Video: ";

/// Codec information extracted from one camera source by probing.
///
/// The report is mutated in place across probe cycles: `probed` drops to
/// false when a new cycle starts, and descriptor lists keep their previous
/// contents until a matching line overwrites them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecReport {
    /// True once a probe cycle has completed (process exited, including
    /// after a forced kill).
    pub probed: bool,
    /// True if the last completed cycle exceeded the time budget.
    pub timed_out: bool,
    /// Audio stream attributes from the most recent matching line.
    pub audio: Vec<String>,
    /// Video stream attributes from the most recent matching line.
    pub video: Vec<String>,
}

impl CodecReport {
    /// Scan one diagnostic line and capture any codec descriptors it carries.
    ///
    /// A line containing [`AUDIO_MARKER`] replaces `audio` with the
    /// comma-and-space separated attributes following the marker; symmetric
    /// handling for [`VIDEO_MARKER`] into `video`. Lines matching neither
    /// marker leave the report unchanged.
    pub fn apply_line(&mut self, line: &str) {
        if let Some(descriptors) = descriptors_after(line, AUDIO_MARKER) {
            self.audio = descriptors;
        }
        if let Some(descriptors) = descriptors_after(line, VIDEO_MARKER) {
            self.video = descriptors;
        }
    }

    /// The detected video codec name (first video descriptor).
    pub fn video_codec(&self) -> Option<&str> {
        self.video.first().map(String::as_str)
    }

    /// The detected audio codec name (first audio descriptor).
    pub fn audio_codec(&self) -> Option<&str> {
        self.audio.first().map(String::as_str)
    }
}

/// Extract the descriptor list following `marker` in `line`.
///
/// Returns `None` when the marker is absent or nothing follows it; the
/// remainder runs to the end of the line and is split on `", "`.
pub fn descriptors_after(line: &str, marker: &str) -> Option<Vec<String>> {
    let (_, rest) = line.split_once(marker)?;
    if rest.is_empty() {
        return None;
    }
    Some(rest.split(", ").map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_line_extracts_descriptors() {
        let mut report = CodecReport::default();
        report.apply_line("Video: h264, yuv420p, 1920x1080");
        assert_eq!(report.video, vec!["h264", "yuv420p", "1920x1080"]);
        assert!(report.audio.is_empty());
    }

    #[test]
    fn audio_line_extracts_descriptors() {
        let mut report = CodecReport::default();
        report.apply_line("    Stream #0:1: Audio: pcm_mulaw, 8000 Hz, 1 channels, s16, 64 kb/s");
        assert_eq!(
            report.audio,
            vec!["pcm_mulaw", "8000 Hz", "1 channels", "s16", "64 kb/s"]
        );
        assert!(report.video.is_empty());
    }

    #[test]
    fn realistic_stream_line() {
        let mut report = CodecReport::default();
        report.apply_line(
            "    Stream #0:0: Video: h264 (Main), yuvj420p(pc, bt709, progressive), 1280x720, 30 fps, 30 tbr, 90k tbn",
        );
        assert_eq!(report.video_codec(), Some("h264 (Main)"));
        assert_eq!(report.video[2], "bt709");
        assert!(report.video.contains(&"1280x720".to_string()));
    }

    #[test]
    fn last_matching_line_wins() {
        let mut report = CodecReport::default();
        report.apply_line("Audio: aac, 44100 Hz, stereo");
        report.apply_line("Audio: pcm_mulaw, 8000 Hz, mono");
        assert_eq!(report.audio, vec!["pcm_mulaw", "8000 Hz", "mono"]);
    }

    #[test]
    fn non_marker_lines_ignored() {
        let mut report = CodecReport::default();
        report.apply_line("Input #0, rtsp, from 'rtsp://cam/stream1':");
        report.apply_line("  Duration: N/A, start: 0.441000, bitrate: N/A");
        assert!(report.audio.is_empty());
        assert!(report.video.is_empty());
    }

    #[test]
    fn marker_with_empty_remainder_ignored() {
        let mut report = CodecReport::default();
        report.apply_line("Audio: aac, 44100 Hz");
        report.apply_line("something Audio: ");
        assert_eq!(report.audio, vec!["aac", "44100 Hz"]);
    }

    #[test]
    fn single_descriptor_line() {
        assert_eq!(
            descriptors_after("Video: h264", VIDEO_MARKER),
            Some(vec!["h264".to_string()])
        );
    }

    #[test]
    fn marker_absent_is_none() {
        assert_eq!(descriptors_after("frame=  100 fps= 25", AUDIO_MARKER), None);
    }

    #[test]
    fn codec_accessors() {
        let mut report = CodecReport::default();
        assert_eq!(report.video_codec(), None);
        assert_eq!(report.audio_codec(), None);
        report.apply_line("Video: hevc, yuv420p10le, 3840x2160");
        report.apply_line("Audio: aac, 48000 Hz, stereo");
        assert_eq!(report.video_codec(), Some("hevc"));
        assert_eq!(report.audio_codec(), Some("aac"));
    }

    #[test]
    fn report_serde_roundtrip() {
        let mut report = CodecReport::default();
        report.apply_line("Video: h264, 1280x720");
        report.probed = true;
        let json = serde_json::to_string(&report).unwrap();
        let back: CodecReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn report_deserializes_from_empty_object() {
        let report: CodecReport = serde_json::from_str("{}").unwrap();
        assert!(!report.probed);
        assert!(!report.timed_out);
        assert!(report.audio.is_empty());
        assert!(report.video.is_empty());
    }
}
