use std::num::TryFromIntError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SortError>;

#[derive(Debug, Error)]
pub enum SortError {
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    TryFromInt(#[from] TryFromIntError),
    #[error("invalid sort configuration: {reason}")]
    InvalidConfig { reason: String },
    #[error("group of {group_len} records cannot fit into chunks of at most {max_chunk_len} records")]
    ChunkTooSmall {
        group_len: usize,
        max_chunk_len: usize,
    },
    #[error("run cleanup failed: {}", render_failure_list(.failures))]
    Cleanup { failures: Vec<SortError> },
    #[error("{}; cleanup also failed: {}", .source, render_failure_list(.cleanup))]
    WithCleanup {
        source: Box<SortError>,
        cleanup: Vec<SortError>,
    },
}

fn render_failure_list(failures: &[SortError]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl SortError {
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Attaches cleanup failures to a primary error. With no failures the
    /// primary passes through untouched.
    pub fn with_cleanup(primary: SortError, cleanup: Vec<SortError>) -> Self {
        if cleanup.is_empty() {
            primary
        } else {
            Self::WithCleanup {
                source: Box::new(primary),
                cleanup,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_cleanup_passes_primary_through_without_failures() {
        let error = SortError::with_cleanup(SortError::message("primary failure"), Vec::new());
        assert!(matches!(error, SortError::Message(_)));
        assert_eq!(error.to_string(), "primary failure");
    }

    #[test]
    fn with_cleanup_renders_primary_and_every_secondary_failure() {
        let error = SortError::with_cleanup(
            SortError::message("primary failure"),
            vec![
                SortError::message("first cleanup failure"),
                SortError::message("second cleanup failure"),
            ],
        );
        let message = error.to_string();
        assert!(message.contains("primary failure"));
        assert!(message.contains("first cleanup failure"));
        assert!(message.contains("second cleanup failure"));
    }

    #[test]
    fn cleanup_error_lists_every_failure() {
        let error = SortError::Cleanup {
            failures: vec![
                SortError::message("first close failure"),
                SortError::message("second close failure"),
            ],
        };
        let message = error.to_string();
        assert!(message.starts_with("run cleanup failed"));
        assert!(message.contains("first close failure"));
        assert!(message.contains("second close failure"));
    }

    #[test]
    fn chunk_too_small_names_group_size_and_bound() {
        let error = SortError::ChunkTooSmall {
            group_len: 5,
            max_chunk_len: 4,
        };
        let message = error.to_string();
        assert!(message.contains('5'));
        assert!(message.contains('4'));
    }

    #[test]
    fn invalid_config_names_the_offending_setting() {
        let message = SortError::invalid_config("run-size must be >= 1").to_string();
        assert!(message.contains("invalid sort configuration"));
        assert!(message.contains("run-size"));
    }
}
