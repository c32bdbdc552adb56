use swos_wire::WireValue;
use swos_wire::scalar::{bitmask_value, encode_hex_ascii, encode_ip_be, encode_ip_le, i16_bits};

use super::{ByteOrder, FieldKind, FieldSpec, Shape, Value, find_spec};
use crate::endpoint::{DecodeContext, Endpoint};
use crate::error::CoreError;
use crate::overrides::KeyOverrides;

// ── Encoder ─────────────────────────────────────────────────────────

/// Per-call encoding state, the write-side twin of [`super::Decoder`].
#[derive(Debug, Clone, Copy)]
pub struct Encoder<'a> {
    endpoint: Endpoint,
    overrides: &'a KeyOverrides,
    port_count: Option<usize>,
}

impl<'a> Encoder<'a> {
    pub fn new(endpoint: Endpoint, overrides: &'a KeyOverrides, ctx: &DecodeContext) -> Self {
        Self {
            endpoint,
            overrides,
            port_count: ctx.port_count,
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn port_count(&self) -> Option<usize> {
        self.port_count
    }

    /// Start an outgoing record.
    pub fn writer(&self) -> FieldWriter<'a> {
        FieldWriter {
            endpoint: self.endpoint,
            table: self.endpoint.fields(),
            overrides: self.overrides,
            port_count: self.port_count,
            fields: Vec::new(),
        }
    }
}

// ── FieldWriter ─────────────────────────────────────────────────────

/// Builds one outgoing record in call order.
///
/// Only writable fields are accepted. When the context carries a port
/// count, per-port values beyond it are dropped.
#[derive(Debug)]
pub struct FieldWriter<'a> {
    endpoint: Endpoint,
    table: &'static [FieldSpec],
    overrides: &'a KeyOverrides,
    port_count: Option<usize>,
    fields: Vec<(String, WireValue)>,
}

impl FieldWriter<'_> {
    /// Write a scalar field.
    pub fn set(&mut self, attr: &str, value: impl Into<Value>) -> Result<(), CoreError> {
        let spec = self.spec(attr)?;
        if spec.shape != Shape::Scalar {
            return Err(CoreError::unsupported(
                self.endpoint,
                attr,
                "per-port field written as a single value",
            ));
        }
        let key = self.key(spec).to_owned();
        let encoded = self.encode(spec, value.into())?;
        self.fields.push((key, encoded));
        Ok(())
    }

    /// Write a scalar field only when a value is present.
    pub fn set_opt<V: Into<Value>>(&mut self, attr: &str, value: Option<V>) -> Result<(), CoreError> {
        match value {
            Some(value) => self.set(attr, value),
            None => Ok(()),
        }
    }

    /// Write one value per port.
    ///
    /// A list field becomes a list, a numbered field becomes `key1..keyN`,
    /// and a scalar port mask folds the flags into one mask.
    pub fn set_ports<I, V>(&mut self, attr: &str, values: I) -> Result<(), CoreError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let spec = self.spec(attr)?;
        let values: Vec<Value> = values
            .into_iter()
            .take(self.port_limit())
            .map(Into::into)
            .collect();
        let key = self.key(spec).to_owned();

        match spec.shape {
            Shape::Scalar => {
                if spec.kind != FieldKind::Bitmask {
                    return Err(CoreError::unsupported(
                        self.endpoint,
                        attr,
                        "per-port values written to a single value field",
                    ));
                }
                let bits = values
                    .into_iter()
                    .map(|value| match value {
                        Value::Flag(set) => Ok(set),
                        other => Err(self.mismatch(spec, &other)),
                    })
                    .collect::<Result<Vec<bool>, _>>()?;
                self.fields.push((key, WireValue::Int(bitmask_value(&bits))));
            }
            Shape::PerPort => {
                let items = values
                    .into_iter()
                    .map(|value| self.encode(spec, value))
                    .collect::<Result<Vec<_>, _>>()?;
                self.fields.push((key, WireValue::List(items)));
            }
            Shape::Numbered => {
                for (i, value) in values.into_iter().enumerate() {
                    let encoded = self.encode(spec, value)?;
                    self.fields.push((format!("{key}{}", i + 1), encoded));
                }
            }
        }
        Ok(())
    }

    pub fn finish(self) -> WireValue {
        WireValue::Record(self.fields)
    }

    // ── Internals ───────────────────────────────────────────────────

    fn spec(&self, attr: &str) -> Result<&'static FieldSpec, CoreError> {
        let spec = find_spec(self.table, attr).ok_or_else(|| {
            CoreError::unsupported(self.endpoint, attr, "attribute is not in the field table")
        })?;
        if !spec.writable {
            return Err(CoreError::unsupported(
                self.endpoint,
                attr,
                "read-only field cannot be written",
            ));
        }
        Ok(spec)
    }

    fn key(&self, spec: &'static FieldSpec) -> &str {
        self.overrides
            .key(self.endpoint, spec.attr)
            .unwrap_or(spec.key)
    }

    fn port_limit(&self) -> usize {
        self.port_count.unwrap_or(usize::MAX)
    }

    fn encode(&self, spec: &FieldSpec, value: Value) -> Result<WireValue, CoreError> {
        let encoded = match (spec.kind, value) {
            (FieldKind::Int, Value::Int(v)) => WireValue::Int(v),
            (FieldKind::Signed16, Value::Signed(v)) => WireValue::Int(i16_bits(v)),
            (FieldKind::Flag, Value::Flag(v)) => WireValue::Bool(v),
            (FieldKind::HexText, Value::Text(v)) => WireValue::Str(encode_hex_ascii(&v)),
            (FieldKind::Mac, Value::Mac(v)) => WireValue::Str(v.to_wire()),
            (FieldKind::Ipv4(ByteOrder::Little), Value::Ip(v)) => WireValue::Int(encode_ip_le(v)),
            (FieldKind::Ipv4(ByteOrder::Big), Value::Ip(v)) => WireValue::Int(encode_ip_be(v)),
            (FieldKind::Bitmask, Value::Mask(bits)) => {
                let bits: Vec<bool> = bits.into_iter().take(self.port_limit()).collect();
                WireValue::Int(bitmask_value(&bits))
            }
            (_, other) => return Err(self.mismatch(spec, &other)),
        };
        Ok(encoded)
    }

    fn mismatch(&self, spec: &FieldSpec, value: &Value) -> CoreError {
        CoreError::unsupported(
            self.endpoint,
            spec.attr,
            format!(
                "cannot write {} as {}",
                value.kind_name(),
                spec.kind.describe()
            ),
        )
    }
}
