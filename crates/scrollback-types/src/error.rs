use thiserror::Error;

/// Failures of the rendering surface's command channel.
///
/// These are the only errors a retrieval propagates to its caller. Everything
/// else (missing container, unavailable store, bad records) is absorbed into
/// a best-effort result.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("rendering surface disconnected: {0}")]
    Disconnected(String),

    #[error("surface command '{command}' failed: {message}")]
    Command { command: String, message: String },

    #[error("surface evaluation failed: {0}")]
    Evaluation(String),
}

impl SurfaceError {
    /// Whether the command channel itself is broken.
    ///
    /// Channel failures abort a retrieval. An `Evaluation` failure is scoped
    /// to the single query that raised it (e.g. a selector the surface
    /// rejects) and callers may move on to the next query.
    pub fn is_channel_failure(&self) -> bool {
        matches!(
            self,
            SurfaceError::Disconnected(..) | SurfaceError::Command { .. }
        )
    }
}

/// Per-record conversion failures.
///
/// A `RecordError` never aborts an extraction; the offending record is
/// dropped and the rest of the batch continues.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("record '{key}' could not be serialized: {reason}")]
    Serialization { key: String, reason: String },

    #[error("record '{key}' is malformed: {reason}")]
    Malformed { key: String, reason: String },
}

impl RecordError {
    /// Store key of the record that failed.
    pub fn key(&self) -> &str {
        match self {
            RecordError::Serialization { key, .. } | RecordError::Malformed { key, .. } => key,
        }
    }
}

/// Errors from parsing or validating configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid chat handle: {0}")]
    InvalidChatHandle(String),

    #[error("invalid limit policy: '{0}'")]
    InvalidLimitPolicy(String),

    #[error("invalid retriever config: {0}")]
    InvalidRetriever(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_error_display() {
        let err = SurfaceError::Command {
            command: "scroll_to_origin".to_string(),
            message: "target closed".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "surface command 'scroll_to_origin' failed: target closed"
        );
    }

    #[test]
    fn test_channel_failure_classification() {
        assert!(SurfaceError::Disconnected("session closed".to_string()).is_channel_failure());
        assert!(
            SurfaceError::Command {
                command: "evaluate".to_string(),
                message: "timeout".to_string(),
            }
            .is_channel_failure()
        );
        assert!(!SurfaceError::Evaluation("bad selector".to_string()).is_channel_failure());
    }

    #[test]
    fn test_record_error_key() {
        let err = RecordError::Serialization {
            key: "false_123@c.us_ABC".to_string(),
            reason: "cyclic structure".to_string(),
        };
        assert_eq!(err.key(), "false_123@c.us_ABC");
        assert!(err.to_string().contains("cyclic structure"));

        let err = RecordError::Malformed {
            key: "k1".to_string(),
            reason: "missing field `t`".to_string(),
        };
        assert_eq!(err.key(), "k1");
    }
}
