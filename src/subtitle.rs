// src/subtitle.rs
// SRT output helpers - download naming and a lenient cue parser for preview

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

const DEFAULT_BASE_NAME: &str = "subtitle";

/// One parsed SRT cue. Used for preview and cue-count logging only; the saved
/// file is always the verbatim result text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleSegment {
    pub index: u32,
    pub start_time: String,
    pub end_time: String,
    pub text: String,
}

/// Derive the download file name from the source media name: everything before
/// the first '.' plus the `.srt` suffix. Names without a separator are kept
/// whole; an empty base falls back to a default.
pub fn srt_file_name(source_name: &str) -> String {
    let base = source_name.split('.').next().unwrap_or("").trim();
    if base.is_empty() {
        format!("{}.srt", DEFAULT_BASE_NAME)
    } else {
        format!("{}.srt", base)
    }
}

fn timestamp_line_regex() -> &'static Regex {
    static TS_RE: OnceLock<Regex> = OnceLock::new();
    TS_RE.get_or_init(|| {
        Regex::new(r"^(\d{2}:\d{2}:\d{2},\d{3})\s*-->\s*(\d{2}:\d{2}:\d{2},\d{3})$")
            .expect("valid timestamp regex")
    })
}

/// Parse SRT text into cues, skipping malformed blocks instead of failing.
/// The remote service owns the format; this never validates or rejects output.
pub fn parse_segments(srt: &str) -> Vec<SubtitleSegment> {
    let mut segments = Vec::new();

    for block in srt.replace("\r\n", "\n").split("\n\n") {
        let mut lines = block.lines().filter(|l| !l.trim().is_empty());

        let Some(index_line) = lines.next() else {
            continue;
        };
        let Ok(index) = index_line.trim().parse::<u32>() else {
            continue;
        };

        let Some(timestamp_line) = lines.next() else {
            continue;
        };
        let Some(captures) = timestamp_line_regex().captures(timestamp_line.trim()) else {
            continue;
        };

        let text = lines.collect::<Vec<_>>().join("\n");
        if text.is_empty() {
            continue;
        }

        segments.push(SubtitleSegment {
            index,
            start_time: captures[1].to_string(),
            end_time: captures[2].to_string(),
            text,
        });
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_srt_file_name_replaces_extension() {
        assert_eq!(srt_file_name("lecture.mp4"), "lecture.srt");
        assert_eq!(srt_file_name("talk.m4a"), "talk.srt");
    }

    #[test]
    fn test_srt_file_name_without_separator_keeps_whole_name() {
        assert_eq!(srt_file_name("recording"), "recording.srt");
    }

    #[test]
    fn test_srt_file_name_first_dot_wins() {
        assert_eq!(srt_file_name("interview.final.mp3"), "interview.srt");
    }

    #[test]
    fn test_srt_file_name_fallback() {
        assert_eq!(srt_file_name(""), "subtitle.srt");
        assert_eq!(srt_file_name(".hidden"), "subtitle.srt");
    }

    #[test]
    fn test_parse_segments_two_blocks() {
        let srt = "1\n00:00:00,000 --> 00:00:02,000\nHello\n\n2\n00:00:02,500 --> 00:00:04,000\nWorld\nagain\n";
        let segments = parse_segments(srt);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].index, 1);
        assert_eq!(segments[0].start_time, "00:00:00,000");
        assert_eq!(segments[0].end_time, "00:00:02,000");
        assert_eq!(segments[0].text, "Hello");
        assert_eq!(segments[1].text, "World\nagain");
    }

    #[test]
    fn test_parse_segments_skips_malformed_blocks() {
        let srt = "1\n00:00:00,000 --> 00:00:02,000\nHello\n\nnot a cue\n\n3\nbad timestamp\nText\n";
        let segments = parse_segments(srt);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].index, 1);
    }

    #[test]
    fn test_parse_segments_handles_crlf() {
        let srt = "1\r\n00:00:00,000 --> 00:00:01,000\r\nHi\r\n\r\n";
        let segments = parse_segments(srt);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "Hi");
    }

    #[test]
    fn test_parse_segments_empty_input() {
        assert!(parse_segments("").is_empty());
    }
}
