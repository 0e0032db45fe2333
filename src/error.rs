//! Error taxonomy shared by the content client, the loader and the video proxy.

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Caller-supplied parameter out of range.
    #[error("{0}")]
    InvalidArgument(String),

    /// Referenced channel or content is not known to the system of record.
    #[error("{0}")]
    NotConfigured(String),

    /// A content query returned zero results.
    #[error("Content not found")]
    NotFound,

    /// Network failure, timeout, or a non-2xx status that is not a client error.
    #[error("upstream request failed: {reason}")]
    Transport { status: Option<u16>, reason: String },

    /// The upstream rejected the request with a 4xx status.
    #[error("upstream rejected request ({status}): {reason}")]
    Upstream { status: u16, reason: String },

    /// A response body could not be decoded.
    #[error("failed to decode upstream response: {0}")]
    Decode(String),
}

impl Error {
    /// Build a transport error from a reqwest failure.
    ///
    /// The reqwest URL is dropped so query-string credentials never end up in
    /// messages or logs.
    #[must_use]
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        let status = err.status().map(|s| s.as_u16());
        let reason = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            "connection failed".to_string()
        } else {
            err.without_url().to_string()
        };
        Self::Transport { status, reason }
    }

    /// Classify a non-success HTTP status.
    #[must_use]
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        let reason = status
            .canonical_reason()
            .unwrap_or("Unknown status")
            .to_string();
        if status.is_client_error() {
            Self::Upstream {
                status: status.as_u16(),
                reason,
            }
        } else {
            Self::Transport {
                status: Some(status.as_u16()),
                reason,
            }
        }
    }
}

/// One provider item that could not be turned into a summary.
///
/// Recovered locally: the item is skipped and the batch continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartialItemError {
    #[error("item has no usable video id")]
    MissingVideoId,
    #[error("item has no snippet")]
    MissingSnippet,
    #[error("item is not an object")]
    Malformed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_client_error() {
        let err = Error::from_status(reqwest::StatusCode::FORBIDDEN);
        assert_eq!(
            err,
            Error::Upstream {
                status: 403,
                reason: "Forbidden".to_string()
            }
        );
    }

    #[test]
    fn test_from_status_server_error() {
        let err = Error::from_status(reqwest::StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            err,
            Error::Transport {
                status: Some(503),
                reason: "Service Unavailable".to_string()
            }
        );
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(Error::NotFound.to_string(), "Content not found");
    }
}
