use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{LyricLine, TimingConfig};

/// Index of the last line whose onset is at or before `now`.
///
/// Lines sharing a timestamp resolve to the later one. Unsorted input is
/// tolerated: the last line in sequence order that qualifies wins.
pub fn active_index(lines: &[LyricLine], now: f64) -> Option<usize> {
    let mut active = None;
    for (index, line) in lines.iter().enumerate() {
        if line.time <= now {
            active = Some(index);
        }
    }
    active
}

/// Outcome of feeding a new clock reading to [`ActiveLineTracker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineChange {
    Unchanged,
    Entered {
        index: usize,
        previous: Option<usize>,
    },
    /// Time moved before the first line.
    Cleared { previous: usize },
}

/// Remembers the active index between ticks so callers only react to
/// transitions.
#[derive(Debug, Default, Clone)]
pub struct ActiveLineTracker {
    current: Option<usize>,
}

impl ActiveLineTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn reset(&mut self) {
        self.current = None;
    }

    pub fn update(&mut self, lines: &[LyricLine], now: f64) -> LineChange {
        let next = active_index(lines, now);
        let previous = std::mem::replace(&mut self.current, next);

        match (previous, next) {
            (a, b) if a == b => LineChange::Unchanged,
            (previous, Some(index)) => LineChange::Entered { index, previous },
            (Some(previous), None) => LineChange::Cleared { previous },
            (None, None) => LineChange::Unchanged,
        }
    }
}

/// Works out how long the active line may animate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationResolver {
    pub fallback: f64,
    pub minimum: f64,
}

impl Default for DurationResolver {
    fn default() -> Self {
        Self::from_config(&TimingConfig::default())
    }
}

impl DurationResolver {
    pub fn from_config(timing: &TimingConfig) -> Self {
        Self {
            fallback: timing.fallback_budget,
            minimum: timing.min_budget,
        }
    }

    /// Gap to the next onset, or the fallback for the final line. Gaps that
    /// are not positive are clamped to the minimum.
    pub fn budget(&self, active: &LyricLine, next: Option<&LyricLine>) -> f64 {
        let Some(next) = next else {
            return self.fallback;
        };

        let gap = next.time - active.time;
        if gap.is_finite() && gap > 0.0 {
            gap
        } else {
            warn!(
                active = active.time,
                next = next.time,
                minimum = self.minimum,
                "next line does not start after the active one, clamping budget"
            );
            self.minimum
        }
    }

    /// Budget for `lines[index]`, looking up its successor.
    pub fn budget_at(&self, lines: &[LyricLine], index: usize) -> Option<f64> {
        let active = lines.get(index)?;
        Some(self.budget(active, lines.get(index + 1)))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn lines(times: &[f64]) -> Vec<LyricLine> {
        times
            .iter()
            .enumerate()
            .map(|(i, time)| LyricLine::new(*time, format!("line {i}")))
            .collect()
    }

    #[test]
    fn resolves_reference_times() {
        let lines = lines(&[0.0, 2.5, 5.0, 9.0]);
        assert_eq!(active_index(&lines, 2.5), Some(1));
        assert_eq!(active_index(&lines, 2.49), Some(0));
        assert_eq!(active_index(&lines, -1.0), None);
        assert_eq!(active_index(&lines, 100.0), Some(3));
        assert_eq!(active_index(&[], 1.0), None);
    }

    #[test]
    fn duplicate_times_pick_the_later_line() {
        let lines = lines(&[1.0, 3.0, 3.0, 4.0]);
        assert_eq!(active_index(&lines, 3.0), Some(2));
        assert_eq!(active_index(&lines, 3.5), Some(2));
    }

    #[test]
    fn unsorted_input_returns_last_qualifying_line() {
        let lines = lines(&[5.0, 1.0, 8.0]);
        assert_eq!(active_index(&lines, 2.0), Some(1));
        assert_eq!(active_index(&lines, 6.0), Some(1));
    }

    #[test]
    fn tracker_reports_transitions() {
        let lines = lines(&[1.0, 2.0, 3.0]);
        let mut tracker = ActiveLineTracker::new();

        assert_eq!(tracker.update(&lines, 0.5), LineChange::Unchanged);
        assert_eq!(
            tracker.update(&lines, 1.0),
            LineChange::Entered {
                index: 0,
                previous: None,
            }
        );
        assert_eq!(tracker.update(&lines, 1.5), LineChange::Unchanged);
        assert_eq!(
            tracker.update(&lines, 2.7),
            LineChange::Entered {
                index: 1,
                previous: Some(0),
            }
        );
        assert_eq!(
            tracker.update(&lines, 1.2),
            LineChange::Entered {
                index: 0,
                previous: Some(1),
            }
        );
        assert_eq!(
            tracker.update(&lines, 0.0),
            LineChange::Cleared { previous: 0 }
        );
        assert_eq!(tracker.current(), None);
    }

    #[test]
    fn final_line_gets_fallback_budget() {
        let resolver = DurationResolver::default();
        let end = LyricLine::new(5.0, "end");
        assert_eq!(resolver.budget(&end, None), 3.0);
    }

    #[test]
    fn budget_is_gap_to_next_line() {
        let resolver = DurationResolver::default();
        let lines = vec![
            LyricLine::new(10.0, "Hello, world"),
            LyricLine::new(13.0, "Goodbye"),
        ];
        assert_eq!(resolver.budget_at(&lines, 0), Some(3.0));
        assert_eq!(resolver.budget_at(&lines, 1), Some(3.0));
        assert_eq!(resolver.budget_at(&lines, 2), None);
    }

    #[test]
    fn out_of_order_lines_clamp_to_minimum() {
        let resolver = DurationResolver::default();
        let a = LyricLine::new(4.0, "a");
        assert_eq!(resolver.budget(&a, Some(&LyricLine::new(4.0, "b"))), 0.1);
        assert_eq!(resolver.budget(&a, Some(&LyricLine::new(2.0, "b"))), 0.1);
    }

    proptest! {
        #[test]
        fn index_never_decreases_with_time(
            mut times in prop::collection::vec(0.0f64..300.0, 0..64),
            mut samples in prop::collection::vec(-10.0f64..320.0, 1..64),
        ) {
            times.sort_by(f64::total_cmp);
            samples.sort_by(f64::total_cmp);
            let lines = lines(&times);

            let mut last: Option<usize> = None;
            for now in samples {
                let index = active_index(&lines, now);
                prop_assert!(index >= last);
                prop_assert_eq!(index, active_index(&lines, now));
                if let Some(i) = index {
                    prop_assert!(lines[i].time <= now);
                    prop_assert!(lines.get(i + 1).map_or(true, |next| next.time > now));
                }
                last = index;
            }
        }
    }
}
