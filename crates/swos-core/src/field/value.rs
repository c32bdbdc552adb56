use std::net::Ipv4Addr;

use swos_wire::MacAddress;

/// A decoded field value, before conversion to the record's Rust type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(u32),
    Signed(i16),
    Flag(bool),
    Text(String),
    Mac(MacAddress),
    Ip(Ipv4Addr),
    Mask(Vec<bool>),
}

impl Value {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "integer",
            Self::Signed(_) => "signed integer",
            Self::Flag(_) => "flag",
            Self::Text(_) => "text",
            Self::Mac(_) => "MAC address",
            Self::Ip(_) => "IPv4 address",
            Self::Mask(_) => "port mask",
        }
    }
}

/// Why a [`Value`] could not become the requested type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The table kind and the Rust type disagree.
    Kind {
        expected: &'static str,
        found: &'static str,
    },
    /// A device code with no matching enum variant.
    Code { code: u32, expected: &'static str },
}

/// Conversion from a decoded [`Value`] into a record field type.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, ValueError>;
}

fn mismatch(expected: &'static str, found: &Value) -> ValueError {
    ValueError::Kind {
        expected,
        found: found.kind_name(),
    }
}

impl FromValue for u32 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Int(v) => Ok(v),
            other => Err(mismatch("integer", &other)),
        }
    }
}

impl FromValue for i16 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Signed(v) => Ok(v),
            other => Err(mismatch("signed integer", &other)),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Flag(v) => Ok(v),
            other => Err(mismatch("flag", &other)),
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Text(v) => Ok(v),
            other => Err(mismatch("text", &other)),
        }
    }
}

impl FromValue for MacAddress {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Mac(v) => Ok(v),
            other => Err(mismatch("MAC address", &other)),
        }
    }
}

impl FromValue for Ipv4Addr {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Ip(v) => Ok(v),
            other => Err(mismatch("IPv4 address", &other)),
        }
    }
}

impl FromValue for Vec<bool> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Mask(v) => Ok(v),
            other => Err(mismatch("port mask", &other)),
        }
    }
}

// ── Encoding direction ──────────────────────────────────────────────

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Int(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Self::Signed(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Flag(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<MacAddress> for Value {
    fn from(v: MacAddress) -> Self {
        Self::Mac(v)
    }
}

impl From<Ipv4Addr> for Value {
    fn from(v: Ipv4Addr) -> Self {
        Self::Ip(v)
    }
}

impl From<Vec<bool>> for Value {
    fn from(v: Vec<bool>) -> Self {
        Self::Mask(v)
    }
}

impl From<&[bool]> for Value {
    fn from(v: &[bool]) -> Self {
        Self::Mask(v.to_vec())
    }
}
