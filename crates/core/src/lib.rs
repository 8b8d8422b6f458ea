//! Core library for the Lyric Sync application.
//!
//! The crate keeps an animated lyric display in time with an audio playback
//! clock. Each module owns one step of the pipeline: a clock tick is turned
//! into an active line ([`tracker`]), the active line into a time budget
//! ([`tracker::DurationResolver`]), and the budget into per-word reveal
//! timings ([`planner`]) that one of the renderers ([`render`], [`viewport`])
//! consumes. [`session`] wires the steps together for one playback session.

pub mod config;
pub mod error;
pub mod lyrics;
pub mod planner;
pub mod random;
pub mod render;
pub mod session;
pub mod timeline;
pub mod tracker;
pub mod viewport;
pub mod weight;

pub use config::{AppConfig, DisplayConfig, TimingConfig};
pub use error::{LyricSyncError, Result};
pub use lyrics::{parse_lrc, LyricDocument, LyricLine, LyricsKind, LyricsMeta, TextCasing};
pub use planner::{LineTimingPlanner, SizeTier, SubLine, TimedWord, TimingPlan, TimingPolicy};
pub use random::{RandomSource, RngSource, ScriptedSource};
pub use render::{compose_view, ActiveLineView, RenderRoute, StrategySelector, StyleMode};
pub use session::{LyricSession, SessionEvent};
pub use timeline::{ManualClock, PlaybackClock};
pub use tracker::{active_index, ActiveLineTracker, DurationResolver, LineChange};
pub use viewport::{scroll_target, ListRow, RowLayout, RowStyle, RowText, ScrollFollower};
pub use weight::WeightModel;
