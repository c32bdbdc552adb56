// ── SFP modules (`/sfp.b`) ──
//
// Read-only. Switches with one cage answer with scalars, multi-cage models
// with one list entry per cage; both shapes go through the same per-port
// accessors. Only SFP-capable cages are listed, so the module list is
// usually shorter than the port list.

use serde::{Deserialize, Serialize};
use swos_wire::RawValue;

use crate::codec::Feature;
use crate::endpoint::Endpoint;
use crate::error::CoreError;
use crate::field::{Decoder, FieldKind, FieldSpec};

pub(crate) const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("vnd", "vendor", FieldKind::HexText).per_port(),
    FieldSpec::new("pnr", "part_number", FieldKind::HexText).per_port(),
    FieldSpec::new("rev", "revision", FieldKind::HexText)
        .per_port()
        .optional(),
    FieldSpec::new("ser", "serial", FieldKind::HexText).per_port(),
    FieldSpec::new("dat", "date", FieldKind::HexText)
        .per_port()
        .optional(),
    FieldSpec::new("typ", "module_type", FieldKind::HexText)
        .per_port()
        .optional(),
    FieldSpec::new("wln", "wavelength", FieldKind::Int)
        .per_port()
        .optional(),
    FieldSpec::new("tmp", "temperature", FieldKind::Int).per_port(),
    FieldSpec::new("vcc", "voltage", FieldKind::Int).per_port(),
    FieldSpec::new("tbs", "tx_bias", FieldKind::Int)
        .per_port()
        .optional(),
    FieldSpec::new("tpw", "tx_power", FieldKind::Signed16).per_port(),
    FieldSpec::new("rpw", "rx_power", FieldKind::Signed16).per_port(),
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SfpModule {
    pub vendor: String,
    pub part_number: String,
    pub revision: Option<String>,
    pub serial: String,
    pub date: Option<String>,
    pub module_type: Option<String>,
    pub wavelength: Option<u32>,
    /// Raw sensor word. An empty cage reports `0xffffff80`.
    pub temperature: u32,
    pub voltage: u32,
    pub tx_bias: Option<u32>,
    pub tx_power: i16,
    pub rx_power: i16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SfpStatus {
    pub modules: Vec<SfpModule>,
}

impl Feature for SfpStatus {
    const ENDPOINT: Endpoint = Endpoint::Sfp;

    fn decode(raw: &RawValue, cx: &Decoder<'_>) -> Result<Self, CoreError> {
        let f = cx.fields(raw)?;

        // The longest column decides; a missing entry in a required column
        // then surfaces as `FieldMissing`.
        let mut count = 0;
        for spec in FIELDS {
            count = count.max(f.len(spec.attr)?.unwrap_or(0));
        }
        let f = f.with_port_count(count);

        let modules = (0..count)
            .map(|i| {
                Ok(SfpModule {
                    vendor: f.port("vendor", i)?,
                    part_number: f.port("part_number", i)?,
                    revision: f.port_opt("revision", i)?,
                    serial: f.port("serial", i)?,
                    date: f.port_opt("date", i)?,
                    module_type: f.port_opt("module_type", i)?,
                    wavelength: f.port_opt("wavelength", i)?,
                    temperature: f.port("temperature", i)?,
                    voltage: f.port("voltage", i)?,
                    tx_bias: f.port_opt("tx_bias", i)?,
                    tx_power: f.port("tx_power", i)?,
                    rx_power: f.port("rx_power", i)?,
                })
            })
            .collect::<Result<Vec<_>, CoreError>>()?;

        Ok(Self { modules })
    }
}
