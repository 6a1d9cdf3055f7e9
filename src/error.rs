//! Error types for veracity

use thiserror::Error;

/// Operation error type
#[derive(Debug, Error)]
pub enum Error {
    /// Client not configured (no API key found)
    #[error("client not configured: {0}")]
    NotConfigured(String),

    /// Required input was blank
    #[error("{0}")]
    Validation(String),

    /// Network error (connection failure, timeout)
    #[error("network error: {0}")]
    Network(String),

    /// Remote endpoint rejected the request with a non-2xx status
    #[error("http status {0}")]
    HttpStatus(u16),

    /// Expected response field absent or envelope unparseable
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Structured payload failed shape validation
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),
}

impl Error {
    /// Whether a retry could change the outcome.
    ///
    /// Transport and HTTP-status failures are transient; a malformed body or
    /// a schema mismatch is permanent for a given response and retrying it
    /// would only burn the retry budget.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Network(_) | Error::HttpStatus(_))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(Error::Network("connection reset".into()).is_retryable());
        assert!(Error::HttpStatus(500).is_retryable());
        assert!(Error::HttpStatus(429).is_retryable());
        assert!(!Error::MalformedResponse("no candidates".into()).is_retryable());
        assert!(!Error::SchemaMismatch("wrong type".into()).is_retryable());
        assert!(!Error::Validation("empty input".into()).is_retryable());
        assert!(!Error::NotConfigured("no key".into()).is_retryable());
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(Error::HttpStatus(503).to_string(), "http status 503");
        assert_eq!(
            Error::Validation("Please enter a claim to analyze.".into()).to_string(),
            "Please enter a claim to analyze."
        );
    }
}
