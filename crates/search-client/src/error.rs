//! Error types for the search client

use thiserror::Error;

/// Result type alias for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Search client errors
///
/// A multi-collection search never surfaces `RemoteUnavailable` or
/// `MalformedResponse` to its caller; failed collections contribute zero
/// results instead. The variants escape only from single-collection
/// operations (health, stats, lookups, synonym administration).
#[derive(Error, Debug)]
pub enum SearchError {
    /// The index did not respond successfully (timeout, transport failure,
    /// or non-2xx status)
    #[error("search index unavailable: {reason}")]
    RemoteUnavailable {
        /// What went wrong, including the HTTP status when there was one
        reason: String,
    },

    /// The index returned success but the body did not match the expected
    /// schema
    #[error("malformed index response: {0}")]
    MalformedResponse(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// The request failed validation before any remote call
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl SearchError {
    /// Create a `RemoteUnavailable` error
    pub fn remote(reason: impl Into<String>) -> Self {
        Self::RemoteUnavailable {
            reason: reason.into(),
        }
    }

    /// Create a `Config` error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an `InvalidRequest` error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// True if the index could not be reached or answered non-2xx
    #[must_use]
    pub fn is_remote_unavailable(&self) -> bool {
        matches!(self, Self::RemoteUnavailable { .. })
    }

    /// True if the index answered 2xx with an unparseable body
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResponse(_))
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        // A decode failure means the index answered but the body was not
        // what we expected; everything else is the index being unreachable.
        // Timeouts fold into RemoteUnavailable so downstream handling stays
        // uniform.
        if e.is_decode() {
            Self::MalformedResponse(e.to_string())
        } else {
            Self::RemoteUnavailable {
                reason: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_predicates() {
        let remote = SearchError::remote("connection refused");
        assert!(remote.is_remote_unavailable());
        assert!(!remote.is_malformed());

        let malformed = SearchError::MalformedResponse("missing field `hits`".to_string());
        assert!(malformed.is_malformed());
        assert!(!malformed.is_remote_unavailable());
    }

    #[test]
    fn test_error_display() {
        let err = SearchError::remote("status 503: upstream down");
        assert_eq!(
            err.to_string(),
            "search index unavailable: status 503: upstream down"
        );

        let err = SearchError::invalid_request("limit must be greater than zero");
        assert_eq!(err.to_string(), "invalid request: limit must be greater than zero");
    }
}
