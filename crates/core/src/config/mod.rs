use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{LyricSyncError, Result, StyleMode, TextCasing};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub display: DisplayConfig,
    pub timing: TimingConfig,
}

impl AppConfig {
    /// Parses a (possibly partial) JSON document. Missing keys keep their
    /// defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        self.display.validate()?;
        self.timing.validate()
    }
}

/// Presentation settings the core reads when routing a line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub style: StyleMode,
    pub casing: TextCasing,
    /// Full-screen player view. The kinetic styles only apply here.
    pub immersive: bool,
    pub click_to_seek: bool,
    /// Base font size of the active row in the scrolling list, in pixels.
    pub font_size: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            style: StyleMode::RevealWindow,
            casing: TextCasing::Original,
            immersive: true,
            click_to_seek: true,
            font_size: 24.0,
        }
    }
}

impl DisplayConfig {
    fn validate(&self) -> Result<()> {
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            return Err(LyricSyncError::config(
                "display.font_size",
                format!("expected a positive size, got {}", self.font_size),
            ));
        }
        Ok(())
    }
}

/// Numeric tunables for weighting and allocation. All times are seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Added to every word so one-letter words still get stage time.
    pub base_weight: f64,
    pub seamless_punctuation_bonus: f64,
    pub reveal_punctuation_bonus: f64,
    pub randomized_punctuation_bonus: f64,
    pub reveal_window_fraction: f64,
    pub reveal_window_floor: f64,
    pub randomized_window_fraction: f64,
    pub start_offset: f64,
    pub min_word_duration: f64,
    /// Budget handed to the last line of a track.
    pub fallback_budget: f64,
    /// Budget used when the next line does not start after the active one.
    pub min_budget: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            base_weight: 2.0,
            seamless_punctuation_bonus: 4.0,
            reveal_punctuation_bonus: 3.0,
            randomized_punctuation_bonus: 3.0,
            reveal_window_fraction: 0.8,
            reveal_window_floor: 0.5,
            randomized_window_fraction: 0.85,
            start_offset: 0.1,
            min_word_duration: 0.1,
            fallback_budget: 3.0,
            min_budget: 0.1,
        }
    }
}

impl TimingConfig {
    pub fn validate(&self) -> Result<()> {
        positive("timing.base_weight", self.base_weight)?;
        non_negative(
            "timing.seamless_punctuation_bonus",
            self.seamless_punctuation_bonus,
        )?;
        non_negative(
            "timing.reveal_punctuation_bonus",
            self.reveal_punctuation_bonus,
        )?;
        non_negative(
            "timing.randomized_punctuation_bonus",
            self.randomized_punctuation_bonus,
        )?;
        fraction("timing.reveal_window_fraction", self.reveal_window_fraction)?;
        fraction(
            "timing.randomized_window_fraction",
            self.randomized_window_fraction,
        )?;
        non_negative("timing.reveal_window_floor", self.reveal_window_floor)?;
        non_negative("timing.start_offset", self.start_offset)?;
        positive("timing.min_word_duration", self.min_word_duration)?;
        positive("timing.fallback_budget", self.fallback_budget)?;
        positive("timing.min_budget", self.min_budget)
    }
}

fn positive(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LyricSyncError::config(
            field,
            format!("expected a positive number, got {value}"),
        ))
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(LyricSyncError::config(
            field,
            format!("must not be negative, got {value}"),
        ))
    }
}

fn fraction(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(LyricSyncError::config(
            field,
            format!("expected a fraction in (0, 1], got {value}"),
        ))
    }
}
