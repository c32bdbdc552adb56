use std::net::Ipv4Addr;

use indexmap::IndexMap;
use swos_wire::scalar::{
    decode_bitmask, decode_hex_ascii, decode_hex_i16, decode_hex_int, decode_ip_be, decode_ip_le,
    decode_mac, encode_hex_int,
};
use swos_wire::{MacAddress, RawValue};

use super::{ByteOrder, FieldKind, FieldSpec, FromValue, Shape, Value, ValueError, find_spec};
use crate::endpoint::{DecodeContext, Endpoint};
use crate::error::CoreError;
use crate::overrides::KeyOverrides;

// ── Decoder ─────────────────────────────────────────────────────────

/// Per-call decoding state: endpoint, key overrides and caller context.
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'a> {
    endpoint: Endpoint,
    overrides: &'a KeyOverrides,
    port_count: Option<usize>,
}

impl<'a> Decoder<'a> {
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

    pub fn require_port_count(&self) -> Result<usize, CoreError> {
        self.port_count.ok_or(CoreError::PortCountRequired {
            endpoint: self.endpoint,
        })
    }

    /// Field reader over a record response.
    pub fn fields<'r>(&'r self, raw: &'r RawValue) -> Result<Fields<'r>, CoreError> {
        let record = raw.as_record().ok_or_else(|| {
            CoreError::malformed(
                self.endpoint,
                format!("expected a record, got a {}", raw.kind()),
            )
        })?;
        Ok(self.record(record))
    }

    /// Field reader over one record, e.g. an entry of a list response.
    pub fn record<'r>(&'r self, record: &'r IndexMap<String, RawValue>) -> Fields<'r> {
        Fields {
            endpoint: self.endpoint,
            record,
            overrides: self.overrides,
            table: self.endpoint.fields(),
            port_count: self.port_count.unwrap_or(0),
        }
    }

    /// Entries of a list response. An empty record counts as an empty list.
    pub fn entries<'r>(&self, raw: &'r RawValue) -> Result<Vec<&'r IndexMap<String, RawValue>>, CoreError> {
        match raw {
            RawValue::List(items) => items
                .iter()
                .map(|item| {
                    item.as_record().ok_or_else(|| {
                        CoreError::malformed(
                            self.endpoint,
                            format!("expected a list of records, found a {}", item.kind()),
                        )
                    })
                })
                .collect(),
            RawValue::Record(fields) if fields.is_empty() => Ok(Vec::new()),
            other => Err(CoreError::malformed(
                self.endpoint,
                format!("expected a list of records, got a {}", other.kind()),
            )),
        }
    }
}

// ── Fields ──────────────────────────────────────────────────────────

/// Typed access to one parsed record through an endpoint's field table.
///
/// Empty scalars (`key:` holes) count as absent for every kind except
/// hex-encoded text, where they are the empty string. Absent optional fields
/// read as the kind's neutral value (`0`, `false`, `""`, zero MAC,
/// `0.0.0.0`, all-clear mask) through [`get`](Self::get) and
/// [`port`](Self::port), and as `None` through the `_opt` accessors.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'r> {
    endpoint: Endpoint,
    record: &'r IndexMap<String, RawValue>,
    overrides: &'r KeyOverrides,
    table: &'static [FieldSpec],
    port_count: usize,
}

impl<'r> Fields<'r> {
    pub fn with_port_count(mut self, port_count: usize) -> Self {
        self.port_count = port_count;
        self
    }

    pub fn port_count(&self) -> usize {
        self.port_count
    }

    pub fn is_empty(&self) -> bool {
        self.record.is_empty()
    }

    // ── Scalar fields ───────────────────────────────────────────────

    /// Value of a scalar field, `None` when absent.
    pub fn opt<T: FromValue>(&self, attr: &str) -> Result<Option<T>, CoreError> {
        let spec = self.spec(attr)?;
        if spec.shape != Shape::Scalar {
            return Err(self.shape_error(spec, "a single value"));
        }
        match self.lookup(spec, self.key(spec)) {
            None => Ok(None),
            Some(raw) => {
                let value = self.decode_raw(spec, raw)?;
                self.convert(spec, value).map(Some)
            }
        }
    }

    /// Value of a scalar field. Absent required fields are `FieldMissing`.
    pub fn get<T: FromValue>(&self, attr: &str) -> Result<T, CoreError> {
        let spec = self.spec(attr)?;
        match self.opt(attr)? {
            Some(value) => Ok(value),
            None if spec.is_optional() => self.convert(spec, self.neutral(spec)),
            None => Err(CoreError::missing(self.endpoint, attr, None)),
        }
    }

    // ── Per-port fields ─────────────────────────────────────────────

    /// Entry `index` of a per-port field, `None` when the field or the entry
    /// is absent.
    ///
    /// A scalar port mask yields bit `index` as a flag; a numbered field
    /// reads key `{key}{index + 1}`.
    pub fn port_opt<T: FromValue>(&self, attr: &str, index: usize) -> Result<Option<T>, CoreError> {
        let spec = self.spec(attr)?;
        let key = self.key(spec);

        let value = match spec.shape {
            Shape::Scalar => {
                if spec.kind != FieldKind::Bitmask {
                    return Err(self.shape_error(spec, "per-port values"));
                }
                match self.lookup(spec, key) {
                    None => None,
                    Some(raw) => match self.decode_raw(spec, raw)? {
                        Value::Mask(bits) => bits.get(index).copied().map(Value::Flag),
                        _ => None,
                    },
                }
            }
            Shape::PerPort => match self.lookup(spec, key) {
                None => None,
                Some(RawValue::List(items)) => match items.get(index) {
                    Some(item) if !self.is_hole(spec, item) => Some(self.decode_raw(spec, item)?),
                    _ => None,
                },
                Some(scalar @ RawValue::Scalar(_)) if index == 0 => {
                    Some(self.decode_raw(spec, scalar)?)
                }
                Some(RawValue::Scalar(_)) => None,
                Some(other) => return Err(self.format_error(spec, other.kind())),
            },
            Shape::Numbered => {
                let key = format!("{key}{}", index + 1);
                match self.lookup(spec, &key) {
                    None => None,
                    Some(raw) => Some(self.decode_raw(spec, raw)?),
                }
            }
        };

        value.map(|v| self.convert(spec, v)).transpose()
    }

    /// Entry `index` of a per-port field.
    ///
    /// A missing entry is `FieldMissing` for required fields and the neutral
    /// value for optional ones.
    pub fn port<T: FromValue>(&self, attr: &str, index: usize) -> Result<T, CoreError> {
        let spec = self.spec(attr)?;
        match self.port_opt(attr, index)? {
            Some(value) => Ok(value),
            None if spec.is_optional() => {
                let neutral = if spec.shape == Shape::Scalar {
                    Value::Flag(false)
                } else {
                    self.neutral(spec)
                };
                self.convert(spec, neutral)
            }
            None => Err(CoreError::missing(self.endpoint, attr, Some(index))),
        }
    }

    /// All `port_count` entries of a per-port field.
    pub fn ports<T: FromValue>(&self, attr: &str) -> Result<Vec<T>, CoreError> {
        (0..self.port_count).map(|i| self.port(attr, i)).collect()
    }

    /// Number of entries a per-port field carries, `None` when absent.
    pub fn len(&self, attr: &str) -> Result<Option<usize>, CoreError> {
        let spec = self.spec(attr)?;
        let key = self.key(spec);
        match spec.shape {
            Shape::Scalar => Err(self.shape_error(spec, "a list")),
            Shape::PerPort => Ok(match self.lookup(spec, key) {
                Some(RawValue::List(items)) => Some(items.len()),
                Some(_) => Some(1),
                None => None,
            }),
            Shape::Numbered => {
                let count = (1..)
                    .take_while(|n| self.record.contains_key(&format!("{key}{n}")))
                    .count();
                Ok((count > 0).then_some(count))
            }
        }
    }

    // ── Internals ───────────────────────────────────────────────────

    fn spec(&self, attr: &str) -> Result<&'static FieldSpec, CoreError> {
        find_spec(self.table, attr).ok_or_else(|| {
            CoreError::unsupported(self.endpoint, attr, "attribute is not in the field table")
        })
    }

    fn key(&self, spec: &'static FieldSpec) -> &'r str {
        self.overrides
            .key(self.endpoint, spec.attr)
            .unwrap_or(spec.key)
    }

    fn is_hole(&self, spec: &FieldSpec, raw: &RawValue) -> bool {
        spec.kind != FieldKind::HexText && matches!(raw, RawValue::Scalar(s) if s.is_empty())
    }

    fn lookup(&self, spec: &FieldSpec, key: &str) -> Option<&'r RawValue> {
        self.record.get(key).filter(|raw| !self.is_hole(spec, raw))
    }

    fn decode_raw(&self, spec: &FieldSpec, raw: &RawValue) -> Result<Value, CoreError> {
        let text = raw
            .as_scalar()
            .ok_or_else(|| self.format_error(spec, raw.kind()))?;
        self.decode_text(spec, text)
    }

    fn decode_text(&self, spec: &FieldSpec, text: &str) -> Result<Value, CoreError> {
        let value = match spec.kind {
            FieldKind::Int => decode_hex_int(text).map(Value::Int),
            FieldKind::Signed16 => decode_hex_i16(text).map(Value::Signed),
            FieldKind::Flag => decode_hex_int(text).map(|v| Value::Flag(v != 0)),
            FieldKind::HexText => decode_hex_ascii(text).map(Value::Text),
            FieldKind::Mac => decode_mac(text).map(Value::Mac),
            FieldKind::Ipv4(ByteOrder::Little) => {
                decode_hex_int(text).map(|v| Value::Ip(decode_ip_le(v)))
            }
            FieldKind::Ipv4(ByteOrder::Big) => {
                decode_hex_int(text).map(|v| Value::Ip(decode_ip_be(v)))
            }
            FieldKind::Bitmask => decode_bitmask(text, self.port_count).map(Value::Mask),
        };
        value.map_err(|e| CoreError::from_wire(self.endpoint, spec.attr, e))
    }

    fn neutral(&self, spec: &FieldSpec) -> Value {
        match spec.kind {
            FieldKind::Int => Value::Int(0),
            FieldKind::Signed16 => Value::Signed(0),
            FieldKind::Flag => Value::Flag(false),
            FieldKind::HexText => Value::Text(String::new()),
            FieldKind::Mac => Value::Mac(MacAddress::default()),
            FieldKind::Ipv4(_) => Value::Ip(Ipv4Addr::UNSPECIFIED),
            FieldKind::Bitmask => Value::Mask(vec![false; self.port_count]),
        }
    }

    fn convert<T: FromValue>(&self, spec: &FieldSpec, value: Value) -> Result<T, CoreError> {
        T::from_value(value).map_err(|err| match err {
            ValueError::Kind { expected, found } => CoreError::unsupported(
                self.endpoint,
                spec.attr,
                format!("field yields {found} but {expected} was requested"),
            ),
            ValueError::Code { code, expected } => CoreError::InvalidFormat {
                endpoint: self.endpoint,
                field: spec.attr.to_owned(),
                value: encode_hex_int(code),
                expected,
            },
        })
    }

    fn format_error(&self, spec: &FieldSpec, found: &str) -> CoreError {
        CoreError::InvalidFormat {
            endpoint: self.endpoint,
            field: spec.attr.to_owned(),
            value: format!("<{found}>"),
            expected: spec.kind.describe(),
        }
    }

    fn shape_error(&self, spec: &FieldSpec, wanted: &str) -> CoreError {
        CoreError::unsupported(
            self.endpoint,
            spec.attr,
            format!("{:?} field read as {wanted}", spec.shape),
        )
    }
}
