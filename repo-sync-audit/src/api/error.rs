//! Remote API error types.

use http::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// A failure of a single remote call.
///
/// Errors are values here: every concurrent task reports exactly one result,
/// so failures travel inside [`FileFingerprint`](crate::FileFingerprint) and
/// [`LabelCheckResult`](crate::LabelCheckResult) instead of aborting the run.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("HTTP {code} {reason}: {message}")]
    Status {
        /// Numeric HTTP status code.
        code: u16,
        /// Canonical status text (e.g. "Not Found").
        reason: String,
        /// Message returned by the server.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("Malformed response body: {message}")]
    Decode { message: String },

    /// The request never produced a response.
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// The per-call deadline expired.
    #[error("Request timed out after {millis} ms")]
    Timeout { millis: u64 },

    /// The task producing this result stopped without reporting.
    #[error("Task failed before reporting: {message}")]
    TaskFailed { message: String },
}

impl ApiError {
    /// Builds a status error from a code, filling in the canonical reason text.
    #[must_use]
    pub fn status(code: u16, message: impl Into<String>) -> Self {
        match StatusCode::from_u16(code) {
            Ok(status) => Self::from_status(status, message),
            Err(_) => Self::Status {
                code,
                reason: UNKNOWN_REASON.to_string(),
                message: message.into(),
            },
        }
    }

    /// Builds a status error from a response status.
    #[must_use]
    pub fn from_status(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Status {
            code: status.as_u16(),
            reason: status.canonical_reason().unwrap_or(UNKNOWN_REASON).to_string(),
            message: message.into(),
        }
    }

    /// Returns true when the server reported the resource as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { code: 404, .. })
    }
}

/// Reason used for codes without a registered phrase.
const UNKNOWN_REASON: &str = "Unknown Status";
