use std::{borrow::Cow, path::Path};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{LyricSyncError, Result};

/// Text shown in place of an empty timestamped line.
pub const INSTRUMENTAL_MARK: &str = "♪";

/// Timestamp used for every line of an untimed lyric block.
pub const STATIC_TIME: f64 = -1.0;

static LRC_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[(\d{2}):(\d{2})\.(\d{2,3})\](.*)").expect("valid LRC pattern"));

/// One timestamped line of lyrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LyricLine {
    /// Onset in seconds from the start of the track.
    pub time: f64,
    pub text: String,
    #[serde(default)]
    pub is_instrumental: bool,
}

impl LyricLine {
    pub fn new(time: f64, text: impl Into<String>) -> Self {
        Self {
            time,
            text: text.into(),
            is_instrumental: false,
        }
    }

    pub fn instrumental(time: f64) -> Self {
        Self {
            time,
            text: INSTRUMENTAL_MARK.to_string(),
            is_instrumental: true,
        }
    }
}

/// Whether the lines carry usable timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LyricsKind {
    Synced,
    Static,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LyricsMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
}

/// Complete lyric set for one track, as handed over by the lyric source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LyricDocument {
    pub track_id: String,
    #[serde(rename = "type")]
    pub kind: LyricsKind,
    pub lyrics: Vec<LyricLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<LyricsMeta>,
}

impl LyricDocument {
    pub fn synced(track_id: impl Into<String>, lyrics: Vec<LyricLine>) -> Self {
        Self {
            track_id: track_id.into(),
            kind: LyricsKind::Synced,
            lyrics,
            meta: None,
        }
    }

    /// Builds an untimed document, one line per non-blank input line.
    pub fn static_text(track_id: impl Into<String>, text: &str) -> Self {
        let lyrics = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| LyricLine::new(STATIC_TIME, line))
            .collect();

        Self {
            track_id: track_id.into(),
            kind: LyricsKind::Static,
            lyrics,
            meta: None,
        }
    }

    /// Parses LRC text into a synced document.
    pub fn from_lrc(track_id: impl Into<String>, lrc: &str) -> Self {
        Self::synced(track_id, parse_lrc(lrc))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a document from disk. `.json` files are decoded as documents,
    /// `.lrc` files as timestamped lyrics and anything else as static text.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let track_id = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase());

        match extension.as_deref() {
            Some("json") => Self::from_json(&raw),
            Some("lrc") => {
                let document = Self::from_lrc(track_id, &raw);
                if document.lyrics.is_empty() {
                    return Err(LyricSyncError::msg(format!(
                        "`{}` contains no timestamped lines",
                        path.display()
                    )));
                }
                Ok(document)
            }
            _ => Ok(Self::static_text(track_id, &raw)),
        }
    }

    pub fn is_synced(&self) -> bool {
        self.kind == LyricsKind::Synced
    }

    pub fn lines(&self) -> &[LyricLine] {
        &self.lyrics
    }
}

/// Parses `[mm:ss.xx]text` lines. Lines without a leading timestamp are
/// skipped. Times are rounded to centiseconds.
pub fn parse_lrc(lrc: &str) -> Vec<LyricLine> {
    lrc.trim()
        .lines()
        .filter_map(|line| {
            let caps = LRC_LINE.captures(line)?;
            let minutes: u32 = caps[1].parse().ok()?;
            let seconds: u32 = caps[2].parse().ok()?;
            let fraction = &caps[3];
            let millis: u32 = format!("{fraction:0<3}")[..3].parse().ok()?;

            let time = f64::from(minutes) * 60.0 + f64::from(seconds) + f64::from(millis) / 1000.0;
            let time = (time * 100.0).round() / 100.0;

            let text = caps[4].trim();
            if text.is_empty()
                || text == INSTRUMENTAL_MARK
                || text.eq_ignore_ascii_case("instrumental")
            {
                Some(LyricLine {
                    time,
                    text: if text.is_empty() {
                        INSTRUMENTAL_MARK.to_string()
                    } else {
                        text.to_string()
                    },
                    is_instrumental: true,
                })
            } else {
                Some(LyricLine::new(time, text))
            }
        })
        .collect()
}

/// Casing transform applied to line text before it is split and weighted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextCasing {
    #[default]
    Original,
    Uppercase,
    Lowercase,
}

impl TextCasing {
    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self {
            TextCasing::Original => Cow::Borrowed(text),
            TextCasing::Uppercase => Cow::Owned(text.to_uppercase()),
            TextCasing::Lowercase => Cow::Owned(text.to_lowercase()),
        }
    }
}

impl std::str::FromStr for TextCasing {
    type Err = LyricSyncError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "original" => Ok(Self::Original),
            "uppercase" | "upper" => Ok(Self::Uppercase),
            "lowercase" | "lower" => Ok(Self::Lowercase),
            _ => Err(LyricSyncError::msg(format!("unknown casing `{value}`"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn parses_timestamps_with_two_and_three_digit_fractions() {
        let lines = parse_lrc("[00:12.34]First line\n[01:02.5]ignored\n[01:02.507]Second line");

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], LyricLine::new(12.34, "First line"));
        assert_eq!(lines[1].time, 62.51);
        assert_eq!(lines[1].text, "Second line");
    }

    #[test]
    fn marks_empty_and_note_lines_as_instrumental() {
        let lines =
            parse_lrc("[00:01.00]\n[00:02.00] ♪ \n[00:03.00]Instrumental\n[00:04.00]words");

        assert!(lines[0].is_instrumental);
        assert_eq!(lines[0].text, INSTRUMENTAL_MARK);
        assert!(lines[1].is_instrumental);
        assert!(lines[2].is_instrumental);
        assert_eq!(lines[2].text, "Instrumental");
        assert!(!lines[3].is_instrumental);
    }

    #[test]
    fn skips_metadata_tags() {
        let lines = parse_lrc("[ar:Someone]\n[ti:Song]\n[00:05.00]hello");
        assert_eq!(lines, vec![LyricLine::new(5.0, "hello")]);
    }

    #[test]
    fn static_documents_drop_blank_lines() {
        let document = LyricDocument::static_text("t", "one\n\n  two  \n");
        assert_eq!(document.kind, LyricsKind::Static);
        assert_eq!(document.lyrics.len(), 2);
        assert_eq!(document.lyrics[1].text, "two");
        assert_eq!(document.lyrics[1].time, STATIC_TIME);
    }

    #[test]
    fn decodes_camel_case_documents() {
        let document = LyricDocument::from_json(concat!(
            r#"{"trackId":"yt_1","type":"synced","lyrics":["#,
            r#"{"time":1.5,"text":"hi"},{"time":3,"text":"♪","isInstrumental":true}],"#,
            r#""meta":{"provider":"lrclib"}}"#,
        ))
        .unwrap();

        assert!(document.is_synced());
        assert!(!document.lyrics[0].is_instrumental);
        assert!(document.lyrics[1].is_instrumental);
        assert_eq!(document.meta.unwrap().provider.as_deref(), Some("lrclib"));
    }

    #[test]
    fn loads_by_extension() {
        let mut lrc = tempfile::Builder::new().suffix(".lrc").tempfile().unwrap();
        write!(lrc, "[00:01.00]a\n[00:02.00]b\n").unwrap();
        let document = LyricDocument::load(lrc.path()).unwrap();
        assert!(document.is_synced());
        assert_eq!(document.lyrics.len(), 2);

        let mut txt = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(txt, "a\nb\n").unwrap();
        let document = LyricDocument::load(txt.path()).unwrap();
        assert_eq!(document.kind, LyricsKind::Static);
    }

    #[test]
    fn lrc_without_timestamps_is_an_error() {
        let mut lrc = tempfile::Builder::new().suffix(".lrc").tempfile().unwrap();
        write!(lrc, "no timestamps here").unwrap();
        assert!(LyricDocument::load(lrc.path()).is_err());
    }

    #[test]
    fn casing_keeps_punctuation() {
        assert_eq!(TextCasing::Uppercase.apply("hello, world!"), "HELLO, WORLD!");
        assert_eq!(TextCasing::Lowercase.apply("ÉTÉ."), "été.");
        assert!(matches!(TextCasing::Original.apply("x"), Cow::Borrowed(_)));
    }
}
