//! Scrolling list presentation: keeps the active row centered, dims the
//! others and turns row clicks into seek requests.

use serde::{Deserialize, Serialize};

use crate::{DisplayConfig, LyricLine, LyricsKind, TextCasing};

const ACTIVE_OPACITY: f32 = 1.0;
const INACTIVE_OPACITY: f32 = 0.4;
const IMMERSIVE_INACTIVE_OPACITY: f32 = 0.3;
const ACTIVE_SCALE: f32 = 1.05;
const INACTIVE_FONT_RATIO: f32 = 0.7;

/// Measured position of a rendered row inside the scroll container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowLayout {
    pub top: f32,
    pub height: f32,
}

/// Scroll offset that puts the middle of `row` in the middle of the viewport.
pub fn scroll_target(row: RowLayout, viewport_height: f32) -> f32 {
    (row.top - viewport_height / 2.0 + row.height / 2.0).max(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowStyle {
    pub opacity: f32,
    pub scale: f32,
    pub font_size: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "text")]
pub enum RowText {
    Lyric(String),
    Instrumental,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListRow {
    pub index: usize,
    pub time: f64,
    pub text: RowText,
    pub is_active: bool,
    pub is_past: bool,
    pub style: RowStyle,
}

#[derive(Debug, Clone)]
pub struct ScrollFollower {
    casing: TextCasing,
    immersive: bool,
    click_to_seek: bool,
    font_size: f32,
    followed: Option<usize>,
}

impl ScrollFollower {
    pub fn new(display: &DisplayConfig) -> Self {
        Self {
            casing: display.casing,
            immersive: display.immersive,
            click_to_seek: display.click_to_seek,
            font_size: display.font_size,
            followed: None,
        }
    }

    pub fn row_style(&self, is_active: bool) -> RowStyle {
        if is_active {
            RowStyle {
                opacity: ACTIVE_OPACITY,
                scale: ACTIVE_SCALE,
                font_size: self.font_size,
            }
        } else {
            RowStyle {
                opacity: if self.immersive {
                    IMMERSIVE_INACTIVE_OPACITY
                } else {
                    INACTIVE_OPACITY
                },
                scale: 1.0,
                font_size: self.font_size * INACTIVE_FONT_RATIO,
            }
        }
    }

    pub fn rows(&self, lines: &[LyricLine], active: Option<usize>) -> Vec<ListRow> {
        lines
            .iter()
            .enumerate()
            .map(|(index, line)| {
                let is_active = active == Some(index);
                let text = if line.is_instrumental {
                    RowText::Instrumental
                } else {
                    RowText::Lyric(self.casing.apply(&line.text).into_owned())
                };
                ListRow {
                    index,
                    time: line.time,
                    text,
                    is_active,
                    is_past: active.map_or(false, |active| index < active),
                    style: self.row_style(is_active),
                }
            })
            .collect()
    }

    /// Returns a new scroll offset when the active row changed since the last
    /// call, `None` otherwise.
    pub fn follow(
        &mut self,
        active: Option<usize>,
        layouts: &[RowLayout],
        viewport_height: f32,
    ) -> Option<f32> {
        if active == self.followed {
            return None;
        }
        self.followed = active;
        let row = layouts.get(active?)?;
        Some(scroll_target(*row, viewport_height))
    }

    /// Forget the followed row, e.g. after a track change.
    pub fn reset(&mut self) {
        self.followed = None;
    }

    /// Timestamp to seek to when row `index` is clicked, if clicking seeks.
    pub fn seek_request(&self, kind: LyricsKind, lines: &[LyricLine], index: usize) -> Option<f64> {
        if !self.click_to_seek || kind != LyricsKind::Synced {
            return None;
        }
        lines.get(index).map(|line| line.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn follower(immersive: bool) -> ScrollFollower {
        ScrollFollower::new(&DisplayConfig {
            immersive,
            casing: TextCasing::Lowercase,
            ..DisplayConfig::default()
        })
    }

    fn layouts(count: usize) -> Vec<RowLayout> {
        (0..count)
            .map(|i| RowLayout {
                top: 400.0 + i as f32 * 60.0,
                height: 40.0,
            })
            .collect()
    }

    #[test]
    fn centers_the_active_row() {
        let row = RowLayout {
            top: 700.0,
            height: 40.0,
        };
        assert_eq!(scroll_target(row, 800.0), 320.0);

        let near_top = RowLayout {
            top: 10.0,
            height: 20.0,
        };
        assert_eq!(scroll_target(near_top, 800.0), 0.0);
    }

    #[test]
    fn follows_only_on_index_change() {
        let mut follower = follower(false);
        let rows = layouts(5);

        assert_eq!(follower.follow(Some(2), &rows, 600.0), Some(240.0));
        assert_eq!(follower.follow(Some(2), &rows, 600.0), None);
        assert_eq!(follower.follow(Some(3), &rows, 600.0), Some(300.0));
        assert_eq!(follower.follow(None, &rows, 600.0), None);
        follower.reset();
        assert_eq!(follower.follow(Some(3), &rows, 600.0), Some(300.0));
    }

    #[test]
    fn dims_inactive_rows() {
        let lines = vec![
            LyricLine::new(0.0, "One"),
            LyricLine::instrumental(2.0),
            LyricLine::new(4.0, "THREE"),
        ];

        let rows = follower(false).rows(&lines, Some(1));
        assert!(rows[0].is_past);
        assert_eq!(rows[0].style.opacity, 0.4);
        assert_eq!(rows[0].text, RowText::Lyric("one".to_string()));
        assert!(rows[1].is_active);
        assert_eq!(rows[1].text, RowText::Instrumental);
        assert_eq!(rows[1].style.scale, 1.05);
        assert_eq!(rows[1].style.font_size, 24.0);
        assert!(!rows[2].is_past);
        assert!((rows[2].style.font_size - 16.8).abs() < 1e-4);

        let rows = follower(true).rows(&lines, None);
        assert!(rows.iter().all(|row| row.style.opacity == 0.3 && !row.is_past));
    }

    #[test]
    fn click_to_seek_needs_synced_lyrics_and_the_flag() {
        let lines = vec![LyricLine::new(12.5, "a")];
        let follower = follower(false);
        assert_eq!(follower.seek_request(LyricsKind::Synced, &lines, 0), Some(12.5));
        assert_eq!(follower.seek_request(LyricsKind::Static, &lines, 0), None);
        assert_eq!(follower.seek_request(LyricsKind::Synced, &lines, 3), None);

        let disabled = ScrollFollower::new(&DisplayConfig {
            click_to_seek: false,
            ..DisplayConfig::default()
        });
        assert_eq!(disabled.seek_request(LyricsKind::Synced, &lines, 0), None);
    }
}
