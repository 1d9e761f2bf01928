//! Text extraction error types.

use thiserror::Error;

/// Errors that can occur when talking to the text extraction service.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The document exceeds the configured upload limit.
    #[error("file too large ({size} bytes), maximum is {max} bytes")]
    FileTooLarge { size: u64, max: u64 },

    /// The service returned an error response.
    #[error("extraction service error (HTTP {status}): {message}")]
    ServiceError { status: u16, message: String },

    /// The service answered with something other than `{"text": ...}`.
    #[error("invalid response from extraction service: {0}")]
    InvalidResponse(String),

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}

impl ExtractError {
    /// Returns `true` if retrying the same request cannot succeed.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            ExtractError::FileTooLarge { .. } | ExtractError::InvalidResponse(_)
        ) || matches!(self, ExtractError::ServiceError { status, .. } if (400..500).contains(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permanence() {
        assert!(ExtractError::FileTooLarge { size: 2, max: 1 }.is_permanent());
        assert!(ExtractError::ServiceError {
            status: 413,
            message: String::new()
        }
        .is_permanent());
        assert!(!ExtractError::ServiceError {
            status: 503,
            message: String::new()
        }
        .is_permanent());
        assert!(!ExtractError::Timeout(30).is_permanent());
    }
}
