// ── Outgoing values ──
//
// Typed fields are encoded into this tree before serialization. It only has
// variants the write syntax can spell, so serializing it never hits
// `UnsupportedType`.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::WireError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireValue {
    Int(u32),
    Bool(bool),
    Str(String),
    List(Vec<WireValue>),
    /// Bare-keyed record, emitted in insertion order.
    Record(Vec<(String, WireValue)>),
}

impl WireValue {
    /// Render in device write syntax.
    pub fn to_wire(&self) -> Result<String, WireError> {
        crate::ser::to_string(self)
    }
}

impl Serialize for WireValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Int(v) => serializer.serialize_u32(*v),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Str(v) => serializer.serialize_str(v),
            Self::List(items) => serializer.collect_seq(items),
            Self::Record(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, value) in fields {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl From<u32> for WireValue {
    fn from(v: u32) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for WireValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<String> for WireValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for WireValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn record_keeps_insertion_order() {
        let value = WireValue::Record(vec![
            ("nm".into(), WireValue::List(vec!["506f727431".into()])),
            ("en".into(), WireValue::Int(0x3f)),
            ("wdt".into(), true.into()),
        ]);
        assert_snapshot!(value.to_wire().unwrap(), @"{nm:['506f727431'],en:0x3F,wdt:0x01}");
    }

    #[test]
    fn list_of_records() {
        let value = WireValue::List(vec![
            WireValue::Record(vec![("vid".into(), WireValue::Int(1))]),
            WireValue::Record(vec![]),
        ]);
        assert_snapshot!(value.to_wire().unwrap(), @"[{vid:0x1},{}]");
    }
}
