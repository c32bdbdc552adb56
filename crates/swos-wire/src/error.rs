use std::fmt::Display;

use thiserror::Error;

/// Top-level error type for the `swos-wire` crate.
///
/// Raised while repairing, parsing, decoding or serializing the switch
/// dialect. Carries no endpoint context; `swos-core` attaches that when it
/// maps these into `CoreError`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum WireError {
    // ── Structure ───────────────────────────────────────────────────
    /// Repaired text still failed strict parsing, with the raw response
    /// kept for diagnostics.
    #[error("malformed response: {reason}")]
    MalformedResponse { reason: String, raw: String },

    // ── Scalars ─────────────────────────────────────────────────────
    /// Text that should have been a hex integer.
    #[error("invalid hex number '{value}'")]
    InvalidNumeric { value: String },

    /// Text with the wrong length or encoding for its primitive.
    #[error("invalid {expected} '{value}'")]
    InvalidFormat {
        value: String,
        expected: &'static str,
    },

    // ── Serialization ───────────────────────────────────────────────
    /// A value the device dialect has no spelling for.
    #[error("unsupported value for the wire format: {0}")]
    UnsupportedType(String),
}

impl WireError {
    pub(crate) fn numeric(value: impl Into<String>) -> Self {
        Self::InvalidNumeric {
            value: value.into(),
        }
    }

    pub(crate) fn format(value: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidFormat {
            value: value.into(),
            expected,
        }
    }

    /// Returns `true` if the whole response was unreadable, as opposed to a
    /// single field.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResponse { .. })
    }
}

impl serde::ser::Error for WireError {
    fn custom<T: Display>(msg: T) -> Self {
        Self::UnsupportedType(msg.to_string())
    }
}
