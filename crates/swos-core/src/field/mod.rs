//! Table-driven field engine.
//!
//! Each endpoint declares a static table of [`FieldSpec`]s: which device key
//! holds which attribute, how the value is encoded, whether it is one value,
//! one value per port, or one key per port, and whether saves may write it.
//! [`Fields`] reads typed values out of a parsed record through that table and
//! [`FieldWriter`] builds the outgoing record through the same table, so a key
//! or byte-order correction is made in exactly one place.

mod read;
mod value;
mod write;

pub use read::{Decoder, Fields};
pub use value::{FromValue, Value, ValueError};
pub use write::{Encoder, FieldWriter};

/// IPv4 byte order of a field. The switch uses both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    Little,
    Big,
}

/// Primitive encoding of a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Unsigned hex integer.
    Int,
    /// 16-bit two's complement carried as a hex integer.
    Signed16,
    /// Hex integer read as `!= 0`, written as `0x01`/`0x00`.
    Flag,
    /// Hex byte pairs holding UTF-8 text.
    HexText,
    Mac,
    Ipv4(ByteOrder),
    /// Port mask, bit `i` for port `i`.
    Bitmask,
}

impl FieldKind {
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Int => "hex integer",
            Self::Signed16 => "signed 16-bit integer",
            Self::Flag => "flag",
            Self::HexText => "hex-encoded text",
            Self::Mac => "MAC address",
            Self::Ipv4(ByteOrder::Little) => "IPv4 address (little-endian)",
            Self::Ipv4(ByteOrder::Big) => "IPv4 address (big-endian)",
            Self::Bitmask => "port mask",
        }
    }
}

/// How a field's values are laid out in the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// A single value under the key.
    Scalar,
    /// A list under the key, one entry per port or entity. A scalar where a
    /// list is expected counts as a one-entry list.
    PerPort,
    /// One key per port: `key1`, `key2`, ...
    Numbered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Presence {
    Required,
    Optional,
}

/// One row of an endpoint's field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldSpec {
    /// Device key (the prefix for `Numbered` fields).
    pub key: &'static str,
    /// Stable attribute name used by decoders and key overrides.
    pub attr: &'static str,
    pub kind: FieldKind,
    pub shape: Shape,
    pub presence: Presence,
    /// Emitted on save. Read-only telemetry never is.
    pub writable: bool,
}

impl FieldSpec {
    pub const fn new(key: &'static str, attr: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            attr,
            kind,
            shape: Shape::Scalar,
            presence: Presence::Required,
            writable: false,
        }
    }

    pub const fn per_port(mut self) -> Self {
        self.shape = Shape::PerPort;
        self
    }

    pub const fn numbered(mut self) -> Self {
        self.shape = Shape::Numbered;
        self
    }

    pub const fn optional(mut self) -> Self {
        self.presence = Presence::Optional;
        self
    }

    pub const fn writable(mut self) -> Self {
        self.writable = true;
        self
    }

    pub const fn is_optional(&self) -> bool {
        matches!(self.presence, Presence::Optional)
    }
}

/// Find an attribute in a table.
pub fn find_spec<'t>(table: &'t [FieldSpec], attr: &str) -> Option<&'t FieldSpec> {
    table.iter().find(|spec| spec.attr == attr)
}
