//! HTTP mapping for [`Error`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::Error;

/// Body of every error response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_status: Option<u16>,
}

impl Error {
    /// HTTP status this error is reported with.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidArgument(_) | Self::NotConfigured(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Transport { .. } | Self::Decode(_) => StatusCode::BAD_GATEWAY,
            Self::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Upstream details stay in the logs; clients get the status and a short reason.
        let body = match self {
            Self::InvalidArgument(message) | Self::NotConfigured(message) => ErrorBody {
                error: message,
                upstream_status: None,
            },
            Self::NotFound => ErrorBody {
                error: Self::NotFound.to_string(),
                upstream_status: None,
            },
            Self::Transport { status, .. } => ErrorBody {
                error: "Upstream request failed".to_string(),
                upstream_status: status,
            },
            Self::Decode(_) => ErrorBody {
                error: "Upstream returned an unreadable response".to_string(),
                upstream_status: None,
            },
            Self::Upstream { reason, .. } => ErrorBody {
                error: reason,
                upstream_status: None,
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            Error::InvalidArgument("x".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::NotConfigured("x".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(Error::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            Error::Transport {
                status: None,
                reason: "request timed out".to_string()
            }
            .status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            Error::Upstream {
                status: 403,
                reason: "Forbidden".to_string()
            }
            .status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            Error::Decode("eof".to_string()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_invalid_upstream_status_falls_back_to_bad_gateway() {
        let err = Error::Upstream {
            status: 42,
            reason: "odd".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }
}
