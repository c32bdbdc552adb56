//! Serde serializer for the device write syntax.
//!
//! | Rust value              | Wire text                  |
//! |-------------------------|----------------------------|
//! | struct / map            | `{key:value,key:value}`    |
//! | sequence / tuple        | `[value,value]`            |
//! | unsigned integer        | `0x` + uppercase hex       |
//! | `bool`                  | `0x01` / `0x00`            |
//! | `str` / `char`          | `'text'`, never escaped    |
//!
//! Keys are bare and kept in encounter order. Everything else (floats,
//! negative integers, `None`, unit, bytes, data-carrying enum variants) is an
//! [`WireError::UnsupportedType`], which callers should treat as a bug rather
//! than bad device data.

use serde::Serialize;
use serde::ser::{self, Impossible};

use crate::error::WireError;

type Result<T, E = WireError> = std::result::Result<T, E>;

/// Serialize any value into device write syntax.
pub fn to_string<T: ?Sized + Serialize>(value: &T) -> Result<String> {
    let mut serializer = Serializer {
        output: String::new(),
    };
    value.serialize(&mut serializer)?;
    Ok(serializer.output)
}

pub struct Serializer {
    output: String,
}

fn unsupported(what: impl Into<String>) -> WireError {
    WireError::UnsupportedType(what.into())
}

impl<'a> ser::Serializer for &'a mut Serializer {
    type Ok = ();
    type Error = WireError;

    type SerializeSeq = Compound<'a>;
    type SerializeTuple = Compound<'a>;
    type SerializeTupleStruct = Compound<'a>;
    type SerializeTupleVariant = Impossible<(), WireError>;
    type SerializeMap = Compound<'a>;
    type SerializeStruct = Compound<'a>;
    type SerializeStructVariant = Impossible<(), WireError>;

    fn serialize_bool(self, v: bool) -> Result<()> {
        self.output.push_str(if v { "0x01" } else { "0x00" });
        Ok(())
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<()> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<()> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<()> {
        let v = u64::try_from(v).map_err(|_| unsupported(format!("negative integer {v}")))?;
        self.serialize_u64(v)
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<()> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<()> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<()> {
        self.output.push_str(&format!("0x{v:X}"));
        Ok(())
    }

    fn serialize_f32(self, v: f32) -> Result<()> {
        Err(unsupported(format!("float {v}")))
    }

    fn serialize_f64(self, v: f64) -> Result<()> {
        Err(unsupported(format!("float {v}")))
    }

    fn serialize_char(self, v: char) -> Result<()> {
        self.serialize_str(v.encode_utf8(&mut [0; 4]))
    }

    fn serialize_str(self, v: &str) -> Result<()> {
        self.output.push('\'');
        self.output.push_str(v);
        self.output.push('\'');
        Ok(())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<()> {
        Err(unsupported("raw bytes"))
    }

    fn serialize_none(self) -> Result<()> {
        Err(unsupported("missing optional value"))
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<()> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        Err(unsupported("unit"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<()> {
        Err(unsupported(format!("unit struct {name}")))
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<()> {
        Err(unsupported(format!("enum variant {name}::{variant}")))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<()> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _value: &T,
    ) -> Result<()> {
        Err(unsupported(format!("enum variant {name}::{variant}")))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        self.output.push('[');
        Ok(Compound::new(self))
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(unsupported(format!("enum variant {name}::{variant}")))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        self.output.push('{');
        Ok(Compound::new(self))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<Self::SerializeStruct> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(unsupported(format!("enum variant {name}::{variant}")))
    }
}

// ── Compound serializers ────────────────────────────────────────────

/// State of one open `[...]` or `{...}`.
pub struct Compound<'a> {
    ser: &'a mut Serializer,
    first: bool,
}

impl<'a> Compound<'a> {
    fn new(ser: &'a mut Serializer) -> Self {
        Self { ser, first: true }
    }

    /// Comma before every entry but the first.
    fn separator(&mut self) {
        if self.first {
            self.first = false;
        } else {
            self.ser.output.push(',');
        }
    }
}

impl ser::SerializeSeq for Compound<'_> {
    type Ok = ();
    type Error = WireError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.separator();
        value.serialize(&mut *self.ser)
    }

    fn end(self) -> Result<()> {
        self.ser.output.push(']');
        Ok(())
    }
}

impl ser::SerializeTuple for Compound<'_> {
    type Ok = ();
    type Error = WireError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<()> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for Compound<'_> {
    type Ok = ();
    type Error = WireError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<()> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeMap for Compound<'_> {
    type Ok = ();
    type Error = WireError;

    /// Keys must serialize as strings; they are written bare.
    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<()> {
        let rendered = to_string(key)?;
        let bare = rendered
            .strip_prefix('\'')
            .and_then(|k| k.strip_suffix('\''))
            .ok_or_else(|| unsupported(format!("non-string map key {rendered}")))?;
        self.separator();
        self.ser.output.push_str(bare);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.ser.output.push(':');
        value.serialize(&mut *self.ser)
    }

    fn end(self) -> Result<()> {
        self.ser.output.push('}');
        Ok(())
    }
}

impl ser::SerializeStruct for Compound<'_> {
    type Ok = ();
    type Error = WireError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        self.separator();
        self.ser.output.push_str(key);
        self.ser.output.push(':');
        value.serialize(&mut *self.ser)
    }

    fn end(self) -> Result<()> {
        self.ser.output.push('}');
        Ok(())
    }
}
