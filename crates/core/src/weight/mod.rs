//! Readability weights used to share a line's time budget between its words.

use serde::{Deserialize, Serialize};

/// Characters that usually mark a spoken pause.
pub const PAUSE_PUNCTUATION: [char; 6] = [',', '.', '!', '?', ';', ':'];

/// Weighting policy: a fixed base plus one unit per character, plus a bonus
/// when the word carries pause punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightModel {
    pub base: f64,
    pub punctuation_bonus: f64,
}

impl WeightModel {
    pub fn new(base: f64, punctuation_bonus: f64) -> Self {
        Self {
            base,
            punctuation_bonus,
        }
    }

    /// Weight of a single, already trimmed, non-empty word.
    pub fn weight(&self, word: &str) -> f64 {
        let mut weight = self.base + word.chars().count() as f64;
        if has_pause(word) {
            weight += self.punctuation_bonus;
        }
        weight
    }
}

pub fn has_pause(word: &str) -> bool {
    word.contains(PAUSE_PUNCTUATION)
}

/// A word together with its weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Word<'a> {
    pub text: &'a str,
    pub weight: f64,
}

/// Splits on whitespace and weighs every resulting word.
pub fn weigh_words<'a>(text: &'a str, model: &WeightModel) -> Vec<Word<'a>> {
    text.split_whitespace()
        .map(|word| Word {
            text: word,
            weight: model.weight(word),
        })
        .collect()
}
