// ── Core error types ──
//
// Every failure names the endpoint it came from and, where one applies, the
// field attribute. The five-way `ErrorKind` is what callers branch on:
// a malformed optional endpoint is skipped, a malformed link table aborts.

use serde::Serialize;
use thiserror::Error;

use swos_wire::WireError;

use crate::endpoint::Endpoint;

/// Coarse failure class shared by every `CoreError` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    MalformedResponse,
    InvalidNumeric,
    InvalidFormat,
    FieldMissing,
    UnsupportedType,
}

/// Unified error type for the core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CoreError {
    // ── Response structure ──────────────────────────────────────────
    /// The response could not be repaired into structured text, or its
    /// shape is not what the endpoint returns.
    #[error("{endpoint}: malformed response: {reason}")]
    MalformedResponse {
        endpoint: Endpoint,
        reason: String,
        raw: String,
    },

    // ── Field decoding ──────────────────────────────────────────────
    #[error("{endpoint}.{field}: invalid hex number '{value}'")]
    InvalidNumeric {
        endpoint: Endpoint,
        field: String,
        value: String,
    },

    #[error("{endpoint}.{field}: invalid {expected} '{value}'")]
    InvalidFormat {
        endpoint: Endpoint,
        field: String,
        value: String,
        expected: &'static str,
    },

    /// A required field, or a required per-port entry, is absent.
    #[error("{endpoint}.{field}: required value missing")]
    FieldMissing {
        endpoint: Endpoint,
        field: String,
        index: Option<usize>,
    },

    /// The endpoint's arrays are not self-describing and the caller gave no
    /// port count.
    #[error("{endpoint}: a port count is required to decode this endpoint")]
    PortCountRequired { endpoint: Endpoint },

    // ── Integration errors ──────────────────────────────────────────
    /// Programmer error on encode, or a field table / type mismatch.
    #[error("{endpoint}.{field}: unsupported: {detail}")]
    UnsupportedType {
        endpoint: Endpoint,
        field: String,
        detail: String,
    },

    #[error("unknown endpoint '{0}'")]
    UnknownEndpoint(String),
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            Self::InvalidNumeric { .. } => ErrorKind::InvalidNumeric,
            Self::InvalidFormat { .. } => ErrorKind::InvalidFormat,
            Self::FieldMissing { .. } | Self::PortCountRequired { .. } => ErrorKind::FieldMissing,
            Self::UnsupportedType { .. } | Self::UnknownEndpoint(_) => ErrorKind::UnsupportedType,
        }
    }

    /// The endpoint this error was raised for, if any.
    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            Self::MalformedResponse { endpoint, .. }
            | Self::InvalidNumeric { endpoint, .. }
            | Self::InvalidFormat { endpoint, .. }
            | Self::FieldMissing { endpoint, .. }
            | Self::PortCountRequired { endpoint }
            | Self::UnsupportedType { endpoint, .. } => Some(*endpoint),
            Self::UnknownEndpoint(_) => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        self.kind() == ErrorKind::MalformedResponse
    }

    /// Integration errors: retrying with other data will not help.
    pub fn is_programmer_error(&self) -> bool {
        self.kind() == ErrorKind::UnsupportedType
    }

    pub(crate) fn malformed(endpoint: Endpoint, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            endpoint,
            reason: reason.into(),
            raw: String::new(),
        }
    }

    pub(crate) fn missing(endpoint: Endpoint, field: &str, index: Option<usize>) -> Self {
        Self::FieldMissing {
            endpoint,
            field: field.to_owned(),
            index,
        }
    }

    pub(crate) fn unsupported(endpoint: Endpoint, field: &str, detail: impl Into<String>) -> Self {
        Self::UnsupportedType {
            endpoint,
            field: field.to_owned(),
            detail: detail.into(),
        }
    }

    /// Attach endpoint and field context to a codec error.
    pub(crate) fn from_wire(endpoint: Endpoint, field: &str, err: WireError) -> Self {
        match err {
            WireError::MalformedResponse { reason, raw } => Self::MalformedResponse {
                endpoint,
                reason,
                raw,
            },
            WireError::InvalidNumeric { value } => Self::InvalidNumeric {
                endpoint,
                field: field.to_owned(),
                value,
            },
            WireError::InvalidFormat { value, expected } => Self::InvalidFormat {
                endpoint,
                field: field.to_owned(),
                value,
                expected,
            },
            WireError::UnsupportedType(detail) => Self::UnsupportedType {
                endpoint,
                field: field.to_owned(),
                detail,
            },
            other => Self::UnsupportedType {
                endpoint,
                field: field.to_owned(),
                detail: other.to_string(),
            },
        }
    }
}
