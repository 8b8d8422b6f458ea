/// Result alias that carries the custom [`LyricSyncError`] type.
pub type Result<T> = std::result::Result<T, LyricSyncError>;

/// Common error type for the core crate.
///
/// Timing code never fails on malformed lyric data; it clamps and degrades
/// instead. Errors only surface at the edges: reading files, decoding JSON
/// and validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum LyricSyncError {
    /// Free-form message for failures that do not deserve their own variant.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Lyric documents and configuration files are JSON.
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    /// Caller handed in a value the operation cannot work with.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// A configuration tunable is out of range.
    #[error("invalid configuration `{field}`: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: String,
    },
}

impl LyricSyncError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

impl From<&str> for LyricSyncError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for LyricSyncError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_name_the_field() {
        let err = LyricSyncError::config("timing.start_offset", "must not be negative");
        let text = err.to_string();
        assert!(text.contains("timing.start_offset"));
        assert!(text.contains("must not be negative"));
    }

    #[test]
    fn strings_convert_into_messages() {
        let err: LyricSyncError = "lyrics unavailable".into();
        assert!(matches!(err, LyricSyncError::Message(ref m) if m == "lyrics unavailable"));
    }
}
