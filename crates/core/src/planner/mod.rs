//! Allocation of a line's time budget across its words.
//!
//! Three policies share one weighting rule and one accumulator:
//!
//! * [`TimingPolicy::Seamless`] hands out the whole budget, so the last word
//!   ends exactly when the next line starts.
//! * [`TimingPolicy::RevealWindow`] reveals words over the first part of the
//!   budget and keeps the finished line on screen for the rest.
//! * [`TimingPolicy::RandomizedMultiline`] stacks the words into short
//!   sub-lines of random size before revealing them in reading order.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    weight::{weigh_words, Word},
    RandomSource, TimingConfig, WeightModel,
};

/// Allocation policy used for one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimingPolicy {
    Seamless,
    RevealWindow,
    RandomizedMultiline,
}

/// Ordered display sizes for randomized sub-lines, smallest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeTier {
    Small,
    Medium,
    Large,
    Huge,
}

impl SizeTier {
    pub const ALL: [SizeTier; 4] = [
        SizeTier::Small,
        SizeTier::Medium,
        SizeTier::Large,
        SizeTier::Huge,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Largest tier a line of `chars` characters may use at all.
    pub fn ceiling_for(chars: usize) -> SizeTier {
        if chars > 80 {
            SizeTier::Medium
        } else if chars > 40 {
            SizeTier::Large
        } else {
            SizeTier::Huge
        }
    }
}

/// Schedule entry for one word. Times are seconds relative to line onset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedWord {
    pub text: String,
    pub weight: f64,
    /// Wait before this word starts revealing.
    pub delay: f64,
    /// Part of the allocated window owned by this word.
    pub share: f64,
    /// Animation length, never below the configured floor.
    pub duration: f64,
}

/// Visual sub-line of the randomized layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubLine {
    pub tier: SizeTier,
    pub first_word: usize,
    pub word_count: usize,
}

impl SubLine {
    pub fn words(&self) -> std::ops::Range<usize> {
        self.first_word..self.first_word + self.word_count
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingPlan {
    pub policy: TimingPolicy,
    pub budget: f64,
    pub words: Vec<TimedWord>,
    /// Only filled by the randomized policy.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_lines: Vec<SubLine>,
}

impl TimingPlan {
    fn empty(policy: TimingPolicy, budget: f64) -> Self {
        Self {
            policy,
            budget,
            words: Vec::new(),
            sub_lines: Vec::new(),
        }
    }

    /// An empty plan means there is nothing to animate for this line.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Sum of every word's share of the budget.
    pub fn allocated(&self) -> f64 {
        self.words.iter().map(|word| word.share).sum()
    }

    /// Time at which the last word's allocation ends.
    pub fn end(&self) -> f64 {
        self.words
            .last()
            .map(|word| word.delay + word.share)
            .unwrap_or(0.0)
    }

    pub fn sub_line_words(&self, sub_line: &SubLine) -> &[TimedWord] {
        &self.words[sub_line.words()]
    }
}

/// Builds [`TimingPlan`]s from line text and a budget.
#[derive(Debug, Clone, Default)]
pub struct LineTimingPlanner {
    timing: TimingConfig,
}

impl LineTimingPlanner {
    pub fn new(timing: TimingConfig) -> Self {
        Self { timing }
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    pub fn weight_model(&self, policy: TimingPolicy) -> WeightModel {
        let bonus = match policy {
            TimingPolicy::Seamless => self.timing.seamless_punctuation_bonus,
            TimingPolicy::RevealWindow => self.timing.reveal_punctuation_bonus,
            TimingPolicy::RandomizedMultiline => self.timing.randomized_punctuation_bonus,
        };
        WeightModel::new(self.timing.base_weight, bonus)
    }

    /// Plans `text` under `policy`. Only the randomized policy draws from
    /// `rng`.
    pub fn plan<R>(&self, text: &str, budget: f64, policy: TimingPolicy, rng: &mut R) -> TimingPlan
    where
        R: RandomSource + ?Sized,
    {
        let budget = self.sanitize_budget(budget);
        let plan = match policy {
            TimingPolicy::Seamless => self.seamless(text, budget),
            TimingPolicy::RevealWindow => self.reveal_window(text, budget),
            TimingPolicy::RandomizedMultiline => self.randomized(text, budget, rng),
        };

        debug!(
            ?policy,
            budget,
            words = plan.len(),
            sub_lines = plan.sub_lines.len(),
            "planned line"
        );
        plan
    }

    /// Whole budget split by weight; delays chain back to back.
    pub fn seamless(&self, text: &str, budget: f64) -> TimingPlan {
        let policy = TimingPolicy::Seamless;
        let words = weigh_words(text, &self.weight_model(policy));
        TimingPlan {
            words: self.allocate(&words, budget, 0.0),
            ..TimingPlan::empty(policy, budget)
        }
    }

    /// Delays spread over the reveal window; the rest of the budget is hold.
    pub fn reveal_window(&self, text: &str, budget: f64) -> TimingPlan {
        let policy = TimingPolicy::RevealWindow;
        let window = (budget * self.timing.reveal_window_fraction)
            .max(self.timing.reveal_window_floor)
            .min(budget);
        let words = weigh_words(text, &self.weight_model(policy));
        TimingPlan {
            words: self.allocate(&words, window, 0.0),
            ..TimingPlan::empty(policy, budget)
        }
    }

    pub fn randomized<R>(&self, text: &str, budget: f64, rng: &mut R) -> TimingPlan
    where
        R: RandomSource + ?Sized,
    {
        let policy = TimingPolicy::RandomizedMultiline;
        let words = weigh_words(text, &self.weight_model(policy));
        if words.is_empty() {
            return TimingPlan::empty(policy, budget);
        }

        let ceiling = SizeTier::ceiling_for(text.chars().count());
        let sub_lines = stack_sub_lines(words.len(), ceiling, rng);

        // The leading pause and the reveal window both fit inside the budget.
        let start = self.timing.start_offset.min(budget);
        let window = (budget * self.timing.randomized_window_fraction).min(budget - start);
        let timed = self.allocate(&words, window, start);
        if timed.is_empty() {
            return TimingPlan::empty(policy, budget);
        }

        TimingPlan {
            policy,
            budget,
            words: timed,
            sub_lines,
        }
    }

    fn allocate(&self, words: &[Word<'_>], window: f64, start: f64) -> Vec<TimedWord> {
        let total: f64 = words.iter().map(|word| word.weight).sum();
        if total <= 0.0 || !total.is_finite() {
            return Vec::new();
        }

        let floor = self.timing.min_word_duration;
        let mut accumulated = start;
        words
            .iter()
            .map(|word| {
                let share = word.weight / total * window;
                let delay = accumulated;
                accumulated += share;
                TimedWord {
                    text: word.text.to_string(),
                    weight: word.weight,
                    delay,
                    share,
                    duration: share.max(floor),
                }
            })
            .collect()
    }

    fn sanitize_budget(&self, budget: f64) -> f64 {
        if budget.is_finite() && budget > 0.0 {
            budget
        } else {
            warn!(budget, "non-positive line budget, clamping");
            self.timing.min_budget
        }
    }
}

/// Greedily groups `word_count` words into sub-lines of one to three words
/// and gives each a size tier. A tier never repeats on consecutive sub-lines
/// and [`SizeTier::Huge`] is never used for more than two words.
pub fn stack_sub_lines<R>(word_count: usize, ceiling: SizeTier, rng: &mut R) -> Vec<SubLine>
where
    R: RandomSource + ?Sized,
{
    let allowed = &SizeTier::ALL[..=ceiling.index().max(SizeTier::Medium.index())];
    let mut sub_lines: Vec<SubLine> = Vec::new();
    let mut next = 0;

    while next < word_count {
        let remaining = word_count - next;
        let length = rng.pick(1, 3).clamp(1, 3).min(remaining);
        let previous = sub_lines.last().map(|line| line.tier);

        let candidates: Vec<SizeTier> = allowed
            .iter()
            .copied()
            .filter(|tier| Some(*tier) != previous)
            .filter(|tier| !(*tier == SizeTier::Huge && length > 2))
            .collect();
        let last = candidates.len() - 1;
        let tier = candidates[rng.pick(0, last).min(last)];

        sub_lines.push(SubLine {
            tier,
            first_word: next,
            word_count: length,
        });
        next += length;
    }

    sub_lines
}
