use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    compose_view, render::ActiveLineView, viewport::ListRow, ActiveLineTracker, AppConfig,
    DisplayConfig, DurationResolver, LineChange, LineTimingPlanner, LyricDocument, PlaybackClock,
    RandomSource, RenderRoute, Result, RngSource, RowLayout, ScrollFollower, StrategySelector,
};

/// What a clock reading did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// No synced lyrics loaded; nothing is tracked.
    Idle,
    Unchanged,
    Entered {
        index: usize,
        previous: Option<usize>,
    },
    /// Playback is before the first line.
    Cleared,
    /// A seek landed on the line that was already active; its animation
    /// starts over.
    Restarted { index: usize },
}

/// Owns everything one playback session needs: the lyric set of the current
/// track, display preferences, the tracker state and the plan of the active
/// line. Plans are rebuilt on line transitions, seeks and preference changes
/// only.
#[derive(Debug)]
pub struct LyricSession<R = RngSource<rand::rngs::StdRng>> {
    config: AppConfig,
    planner: LineTimingPlanner,
    resolver: DurationResolver,
    selector: StrategySelector,
    follower: ScrollFollower,
    tracker: ActiveLineTracker,
    document: Option<LyricDocument>,
    view: Option<ActiveLineView>,
    rng: R,
}

impl LyricSession {
    /// Session backed by an entropy-seeded generator.
    pub fn with_config(config: AppConfig) -> Result<Self> {
        Self::new(config, RngSource::from_entropy())
    }
}

impl<R: RandomSource> LyricSession<R> {
    pub fn new(config: AppConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            planner: LineTimingPlanner::new(config.timing.clone()),
            resolver: DurationResolver::from_config(&config.timing),
            selector: StrategySelector::from_display(&config.display),
            follower: ScrollFollower::new(&config.display),
            tracker: ActiveLineTracker::new(),
            document: None,
            view: None,
            config,
            rng,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn document(&self) -> Option<&LyricDocument> {
        self.document.as_ref()
    }

    /// Replaces the lyric set wholesale and forgets all per-track state.
    pub fn load_track(&mut self, document: LyricDocument) {
        info!(
            track = %document.track_id,
            kind = ?document.kind,
            lines = document.lyrics.len(),
            "loaded lyrics"
        );
        self.document = Some(document);
        self.forget_position();
    }

    /// Playback stopped or the track was unloaded.
    pub fn unload(&mut self) {
        self.document = None;
        self.forget_position();
    }

    fn forget_position(&mut self) {
        self.tracker.reset();
        self.follower.reset();
        self.view = None;
    }

    /// Renderer that should consume the current lyrics, if any are loaded.
    pub fn route(&self) -> Option<RenderRoute> {
        self.document
            .as_ref()
            .map(|document| self.selector.route(document.kind))
    }

    pub fn active_index(&self) -> Option<usize> {
        self.tracker.current()
    }

    /// Plan for the active line when a kinetic renderer is in use.
    pub fn active_view(&self) -> Option<&ActiveLineView> {
        self.view.as_ref()
    }

    /// Feeds one clock reading.
    pub fn tick(&mut self, now: f64) -> SessionEvent {
        let change = match self.document.as_ref().filter(|doc| doc.is_synced()) {
            Some(document) => self.tracker.update(&document.lyrics, now),
            None => return SessionEvent::Idle,
        };

        match change {
            LineChange::Unchanged => SessionEvent::Unchanged,
            LineChange::Entered { index, previous } => {
                debug!(index, ?previous, now, "active line changed");
                self.rebuild_view();
                SessionEvent::Entered { index, previous }
            }
            LineChange::Cleared { previous } => {
                debug!(previous, now, "no active line");
                self.view = None;
                SessionEvent::Cleared
            }
        }
    }

    /// Reads the clock and ticks.
    pub fn poll<C: PlaybackClock + ?Sized>(&mut self, clock: &C) -> SessionEvent {
        self.tick(clock.current_time())
    }

    /// Handles a discontinuous jump of the playback position. The plan of the
    /// active line is always discarded, even if the seek lands on it again.
    pub fn seek(&mut self, now: f64) -> SessionEvent {
        info!(now, "seek");
        self.view = None;
        match self.tick(now) {
            SessionEvent::Unchanged => match self.tracker.current() {
                Some(index) => {
                    self.rebuild_view();
                    SessionEvent::Restarted { index }
                }
                None => SessionEvent::Cleared,
            },
            event => event,
        }
    }

    /// Applies new display preferences and replans the active line.
    pub fn set_display(&mut self, display: DisplayConfig) -> Result<()> {
        let mut config = self.config.clone();
        config.display = display;
        config.validate()?;

        self.selector = StrategySelector::from_display(&config.display);
        self.follower = ScrollFollower::new(&config.display);
        self.config = config;
        self.rebuild_view();
        Ok(())
    }

    /// Rows for the scrolling list renderer.
    pub fn rows(&self) -> Vec<ListRow> {
        self.document
            .as_ref()
            .map(|document| {
                let active = if document.is_synced() {
                    self.tracker.current()
                } else {
                    None
                };
                self.follower.rows(&document.lyrics, active)
            })
            .unwrap_or_default()
    }

    /// New scroll offset for the list renderer after the active row moved.
    pub fn follow(&mut self, layouts: &[RowLayout], viewport_height: f32) -> Option<f32> {
        if self.route() != Some(RenderRoute::ScrollList) {
            return None;
        }
        self.follower
            .follow(self.tracker.current(), layouts, viewport_height)
    }

    /// Seek target for a clicked row. The caller forwards it to the audio
    /// transport and then reports the jump through [`LyricSession::seek`].
    pub fn click(&self, index: usize) -> Option<f64> {
        let document = self.document.as_ref()?;
        self.follower
            .seek_request(document.kind, &document.lyrics, index)
    }

    fn rebuild_view(&mut self) {
        self.view = None;
        let Some(RenderRoute::Kinetic(policy)) = self.route() else {
            return;
        };
        let (Some(index), Some(document)) = (self.tracker.current(), self.document.as_ref()) else {
            return;
        };

        self.view = compose_view(
            &document.lyrics,
            index,
            policy,
            self.config.display.casing,
            &self.resolver,
            &self.planner,
            &mut self.rng,
        );
    }
}
