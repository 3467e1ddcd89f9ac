//! Error types shared by the engines and their data collaborators

use std::path::PathBuf;

use thiserror::Error;

/// Kanji or puzzle data could not be loaded
#[derive(Debug, Error)]
pub enum DataError {
    /// The data file could not be read
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The data file is not valid JSON for the expected records
    #[error("Failed to parse {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Grades run from 1 to 6
    #[error("Grade {0} is out of range (expected 1-6)")]
    GradeOutOfRange(u8),
}

/// A quiz or puzzle session could not be started
///
/// These are reported to the learner as a "cannot start" message; no partial
/// session is kept when one is returned.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Fewer kanji qualify for the quiz type than a question needs
    #[error("Not enough kanji for this quiz ({eligible} eligible, {required} required)")]
    NotEnoughKanji { eligible: usize, required: usize },

    /// Fewer puzzle pairs match the grade and difficulty than a round needs
    #[error("Not enough puzzle pairs for this setting ({eligible} eligible, {required} required)")]
    NotEnoughPairs { eligible: usize, required: usize },

    /// Every sampled kanji was unusable for the quiz type
    #[error("No questions could be generated")]
    NoQuestions,

    /// The underlying data could not be loaded
    #[error(transparent)]
    Data(#[from] DataError),
}

/// The progress blob could not be read or written
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored progress is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The external score sync failed
#[derive(Debug, Error)]
pub enum SyncError {
    /// HTTP request failed
    #[error("Score sync request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with an error status
    #[error("Score sync rejected ({status})")]
    Status {
        /// HTTP status code
        status: u16,
    },
}

impl SyncError {
    /// Whether another attempt may succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            SyncError::Request(_) => true,
            SyncError::Status { status } => *status == 429 || *status >= 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_recoverable() {
        assert!(SyncError::Status { status: 503 }.is_recoverable());
        assert!(SyncError::Status { status: 429 }.is_recoverable());
    }

    #[test]
    fn client_errors_are_not_recoverable() {
        assert!(!SyncError::Status { status: 400 }.is_recoverable());
        assert!(!SyncError::Status { status: 401 }.is_recoverable());
    }

    #[test]
    fn session_error_messages_are_user_facing() {
        let err = SessionError::NotEnoughKanji { eligible: 2, required: 4 };
        assert_eq!(err.to_string(), "Not enough kanji for this quiz (2 eligible, 4 required)");
    }
}
