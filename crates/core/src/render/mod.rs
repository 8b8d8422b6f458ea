use serde::{Deserialize, Serialize};

use crate::{
    DisplayConfig, DurationResolver, LineTimingPlanner, LyricLine, LyricSyncError, LyricsKind,
    RandomSource, TextCasing, TimingPlan, TimingPolicy,
};

/// Lyric presentation chosen by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleMode {
    /// Scrolling list with the active row centered.
    Classic,
    /// One word at a time, back to back.
    #[serde(alias = "drill", alias = "seamless")]
    WordStream,
    /// Whole line revealed word by word, then held.
    #[default]
    #[serde(alias = "kinetic")]
    RevealWindow,
    /// Stacked sub-lines of random size.
    #[serde(alias = "story")]
    RandomizedMultiline,
}

impl StyleMode {
    pub fn policy(self) -> Option<TimingPolicy> {
        match self {
            StyleMode::Classic => None,
            StyleMode::WordStream => Some(TimingPolicy::Seamless),
            StyleMode::RevealWindow => Some(TimingPolicy::RevealWindow),
            StyleMode::RandomizedMultiline => Some(TimingPolicy::RandomizedMultiline),
        }
    }
}

impl std::str::FromStr for StyleMode {
    type Err = LyricSyncError;

    fn from_str(value: &str) -> crate::Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "classic" => Ok(Self::Classic),
            "word-stream" | "drill" | "seamless" => Ok(Self::WordStream),
            "reveal-window" | "kinetic" => Ok(Self::RevealWindow),
            "randomized-multiline" | "story" => Ok(Self::RandomizedMultiline),
            _ => Err(LyricSyncError::msg(format!("unknown style `{value}`"))),
        }
    }
}

/// Which renderer consumes the current lyrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderRoute {
    /// Untimed text block, no tracking at all.
    Static,
    /// Scrolling list following the active index.
    ScrollList,
    /// Single active line animated under a timing policy.
    Kinetic(TimingPolicy),
}

/// Stateless dispatch from display settings to a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategySelector {
    pub style: StyleMode,
    pub immersive: bool,
}

impl StrategySelector {
    pub fn new(style: StyleMode, immersive: bool) -> Self {
        Self { style, immersive }
    }

    pub fn from_display(display: &DisplayConfig) -> Self {
        Self::new(display.style, display.immersive)
    }

    pub fn route(&self, kind: LyricsKind) -> RenderRoute {
        if kind == LyricsKind::Static {
            return RenderRoute::Static;
        }
        match self.style.policy() {
            Some(policy) if self.immersive => RenderRoute::Kinetic(policy),
            _ => RenderRoute::ScrollList,
        }
    }
}

/// What the kinetic renderer needs for the active line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveLineView {
    pub index: usize,
    pub line_text: String,
    pub is_instrumental: bool,
    /// `None` for instrumental lines, which show a looping placeholder.
    pub timing_plan: Option<TimingPlan>,
    pub total_budget: f64,
}

impl ActiveLineView {
    /// Nothing word-by-word to show: instrumental placeholder or blank text.
    pub fn is_placeholder(&self) -> bool {
        self.timing_plan.as_ref().map_or(true, TimingPlan::is_empty)
    }
}

/// Resolves the budget and plans `lines[index]`. Returns `None` when the
/// index is out of range.
pub fn compose_view<R>(
    lines: &[LyricLine],
    index: usize,
    policy: TimingPolicy,
    casing: TextCasing,
    resolver: &DurationResolver,
    planner: &LineTimingPlanner,
    rng: &mut R,
) -> Option<ActiveLineView>
where
    R: RandomSource + ?Sized,
{
    let line = lines.get(index)?;
    let total_budget = resolver.budget(line, lines.get(index + 1));
    let line_text = casing.apply(&line.text).into_owned();

    let timing_plan = if line.is_instrumental {
        None
    } else {
        Some(planner.plan(&line_text, total_budget, policy, rng))
    };

    Some(ActiveLineView {
        index,
        line_text,
        is_instrumental: line.is_instrumental,
        timing_plan,
        total_budget,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScriptedSource;

    /// Panics on any draw, proving the planner was never consulted.
    struct NoDraws;

    impl RandomSource for NoDraws {
        fn pick(&mut self, _low: usize, _high: usize) -> usize {
            panic!("planner should not run for instrumental lines");
        }
    }

    #[test]
    fn routes_by_style_and_immersion() {
        let immersive = StrategySelector::new(StyleMode::WordStream, true);
        assert_eq!(
            immersive.route(LyricsKind::Synced),
            RenderRoute::Kinetic(TimingPolicy::Seamless)
        );
        assert_eq!(immersive.route(LyricsKind::Static), RenderRoute::Static);

        let windowed = StrategySelector::new(StyleMode::RandomizedMultiline, false);
        assert_eq!(windowed.route(LyricsKind::Synced), RenderRoute::ScrollList);

        let classic = StrategySelector::new(StyleMode::Classic, true);
        assert_eq!(classic.route(LyricsKind::Synced), RenderRoute::ScrollList);
    }

    #[test]
    fn parses_style_names() {
        assert_eq!("kinetic".parse::<StyleMode>().unwrap(), StyleMode::RevealWindow);
        assert_eq!("Word-Stream".parse::<StyleMode>().unwrap(), StyleMode::WordStream);
        assert!("glitter".parse::<StyleMode>().is_err());
    }

    #[test]
    fn composes_worked_example() {
        let lines = vec![
            LyricLine::new(10.0, "Hello, world"),
            LyricLine::new(13.0, "Goodbye"),
        ];
        let view = compose_view(
            &lines,
            0,
            TimingPolicy::Seamless,
            TextCasing::Uppercase,
            &DurationResolver::default(),
            &LineTimingPlanner::default(),
            &mut ScriptedSource::default(),
        )
        .unwrap();

        assert_eq!(view.line_text, "HELLO, WORLD");
        assert_eq!(view.total_budget, 3.0);
        let plan = view.timing_plan.unwrap();
        assert_eq!(plan.words[0].text, "HELLO,");
        assert_eq!(plan.words[0].weight, 12.0);
    }

    #[test]
    fn instrumental_lines_skip_the_planner() {
        let lines = vec![
            LyricLine::instrumental(0.0),
            LyricLine::new(4.0, "words"),
        ];
        for policy in [
            TimingPolicy::Seamless,
            TimingPolicy::RevealWindow,
            TimingPolicy::RandomizedMultiline,
        ] {
            let view = compose_view(
                &lines,
                0,
                policy,
                TextCasing::Original,
                &DurationResolver::default(),
                &LineTimingPlanner::default(),
                &mut NoDraws,
            )
            .unwrap();

            assert!(view.is_instrumental);
            assert!(view.timing_plan.is_none());
            assert!(view.is_placeholder());
            assert_eq!(view.total_budget, 4.0);
        }
    }

    #[test]
    fn out_of_range_index_has_no_view() {
        let view = compose_view(
            &[],
            0,
            TimingPolicy::RevealWindow,
            TextCasing::Original,
            &DurationResolver::default(),
            &LineTimingPlanner::default(),
            &mut ScriptedSource::default(),
        );
        assert!(view.is_none());
    }
}
