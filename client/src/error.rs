//! [`Error`] of [`Client`] requests.
//!
//! [`Client`]: crate::Client

use std::str;

use derive_more::{Display, Error as StdError, From};
use http::StatusCode;
use serde_json::Value;

use crate::infra::transport;

/// Kind of an [`Error`], as exposed to views.
#[derive(
    Clone, Copy, Debug, Eq, Hash, PartialEq, strum::Display, strum::IntoStaticStr,
)]
pub enum ErrorKind {
    /// See [`Error::BadRequest`].
    BadRequest,

    /// See [`Error::Forbidden`].
    Forbidden,

    /// See [`Error::NotFound`].
    NotFound,

    /// See [`Error::ServerError`].
    ServerError,

    /// See [`Error::Network`].
    Network,

    /// See [`Error::SessionExpired`].
    SessionExpired,

    /// See [`Error::UnexpectedShape`].
    UnexpectedShape,
}

/// Error of a [`Client`] request.
///
/// [`Client`]: crate::Client
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Backend rejected the request (`400` or any other `4xx` status not
    /// mapped to a dedicated variant).
    #[display("Request rejected with `{status}` status: {message}")]
    #[from(ignore)]
    BadRequest {
        /// Returned HTTP status.
        status: StatusCode,

        /// Message extracted from the response body.
        message: String,
    },

    /// Authenticated user lacks permissions (`403` status).
    #[display("Access denied: {_0}")]
    #[from(ignore)]
    Forbidden(#[error(not(source))] String),

    /// Requested endpoint or item doesn't exist (`404` status).
    #[display("Not found: {message}")]
    #[from(ignore)]
    NotFound {
        /// Message extracted from the response body.
        message: String,

        /// Explanation provided by the backend in the `detail` or `message`
        /// field, if any.
        detail: Option<String>,
    },

    /// Backend failed to handle the request (`5xx` or any other non-success
    /// status).
    #[display("Server responded with `{status}` status: {message}")]
    #[from(ignore)]
    ServerError {
        /// Returned HTTP status.
        status: StatusCode,

        /// Message extracted from the response body.
        message: String,
    },

    /// [`Transport`] failed to deliver the request or receive the response.
    ///
    /// [`Transport`]: crate::infra::Transport
    #[display("Network failure: {_0}")]
    Network(transport::Error),

    /// [`Session`] is missing, or can't be refreshed anymore.
    ///
    /// [`Session`]: crate::Session
    #[display("Session expired")]
    #[from(ignore)]
    SessionExpired,

    /// Response body doesn't match any expected shape.
    #[display("Unexpected response shape: {_0}")]
    #[from(ignore)]
    UnexpectedShape(#[error(not(source))] String),
}

impl Error {
    /// Returns [`ErrorKind`] of this [`Error`].
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BadRequest { .. } => ErrorKind::BadRequest,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::ServerError { .. } => ErrorKind::ServerError,
            Self::Network(_) => ErrorKind::Network,
            Self::SessionExpired => ErrorKind::SessionExpired,
            Self::UnexpectedShape(_) => ErrorKind::UnexpectedShape,
        }
    }

    /// Returns a human-readable message of this [`Error`], suitable for
    /// showing in a notification.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::BadRequest { message, .. } => {
                format!("Invalid request: {message}")
            }
            Self::Forbidden(_) => {
                "Access denied. Admin privileges required.".to_owned()
            }
            Self::NotFound { detail, .. } => detail.clone().unwrap_or_else(|| {
                "Endpoint not found. Please check the API configuration."
                    .to_owned()
            }),
            Self::ServerError { .. } => {
                "Server error. Please try again later.".to_owned()
            }
            Self::Network(_) => {
                "Network error. Please check your connection.".to_owned()
            }
            Self::SessionExpired => {
                "Unauthorized. Please login again.".to_owned()
            }
            Self::UnexpectedShape(_) => {
                "Unexpected response format.".to_owned()
            }
        }
    }

    /// Maps a non-success HTTP `status` into an [`Error`], extracting its
    /// message from the response `body`.
    #[must_use]
    pub fn from_status(status: StatusCode, body: &[u8]) -> Self {
        let detail = detail_of(body);
        let message = message_of(status, body, detail.clone());
        match status {
            StatusCode::UNAUTHORIZED => Self::SessionExpired,
            StatusCode::FORBIDDEN => Self::Forbidden(message),
            StatusCode::NOT_FOUND => Self::NotFound { message, detail },
            s if s.is_client_error() => Self::BadRequest { status, message },
            _ => Self::ServerError { status, message },
        }
    }
}

/// Extracts the `detail` or `message` JSON field of an error response `body`.
fn detail_of(body: &[u8]) -> Option<String> {
    let json = serde_json::from_slice::<Value>(body).ok()?;
    ["detail", "message"]
        .into_iter()
        .find_map(|key| json.get(key)?.as_str().map(str::to_owned))
}

/// Builds a human-readable message of an error response `body`.
///
/// Prefers the provided `detail`, falling back to the raw body text, and
/// then to the canonical reason of the `status`.
fn message_of(
    status: StatusCode,
    body: &[u8],
    detail: Option<String>,
) -> String {
    detail
        .or_else(|| {
            str::from_utf8(body)
                .ok()
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| {
            status.canonical_reason().unwrap_or("Unknown status").to_owned()
        })
}
