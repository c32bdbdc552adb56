// ── Link status (`/link.b`) ──
//
// The primary table: its name list defines the port count every other
// endpoint is validated against.

use serde::{Deserialize, Serialize};
use swos_wire::{RawValue, WireValue};

use super::codes::{ComboMode, LinkSpeed, QsfpType};
use super::every;
use crate::codec::{Feature, Writable};
use crate::endpoint::Endpoint;
use crate::error::CoreError;
use crate::field::{Decoder, Encoder, FieldKind, FieldSpec};

pub(crate) const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("nm", "name", FieldKind::HexText).per_port().writable(),
    FieldSpec::new("en", "enabled", FieldKind::Bitmask).writable(),
    FieldSpec::new("lnk", "link_up", FieldKind::Bitmask),
    FieldSpec::new("an", "auto_negotiation", FieldKind::Bitmask)
        .optional()
        .writable(),
    FieldSpec::new("dpx", "duplex", FieldKind::Bitmask).optional(),
    FieldSpec::new("dpxc", "duplex_control", FieldKind::Bitmask)
        .optional()
        .writable(),
    FieldSpec::new("fct", "flow_control", FieldKind::Bitmask)
        .optional()
        .writable(),
    FieldSpec::new("spd", "speed", FieldKind::Int).per_port().optional(),
    FieldSpec::new("spdc", "speed_control", FieldKind::Int)
        .per_port()
        .optional()
        .writable(),
    FieldSpec::new("poe", "poe_mode", FieldKind::Int)
        .per_port()
        .optional()
        .writable(),
    FieldSpec::new("prio", "poe_priority", FieldKind::Int)
        .per_port()
        .optional()
        .writable(),
    FieldSpec::new("poes", "poe_status", FieldKind::Int).per_port().optional(),
    FieldSpec::new("pwr", "power", FieldKind::Int).per_port().optional(),
    FieldSpec::new("curr", "current", FieldKind::Int).per_port().optional(),
    FieldSpec::new("cm", "combo_mode", FieldKind::Int).per_port().optional(),
    FieldSpec::new("qtyp", "qsfp_type", FieldKind::Int).per_port().optional(),
];

/// Physical state and PHY settings of one port.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkPort {
    /// Port label as stored on the device, trailing newline included.
    pub name: String,
    pub enabled: bool,
    pub link_up: bool,
    pub auto_negotiation: bool,
    /// Full duplex when `true`.
    pub duplex: bool,
    pub duplex_control: bool,
    pub flow_control: bool,
    pub speed: Option<u32>,
    pub speed_control: Option<u32>,
    pub poe_mode: Option<u32>,
    pub poe_priority: Option<u32>,
    pub poe_status: Option<u32>,
    /// Tenths of a watt.
    pub power: Option<u32>,
    /// Milliamps.
    pub current: Option<u32>,
    /// Raw combo-port mode code; see [`LinkPort::combo_mode`].
    pub combo_mode: Option<u32>,
    /// Raw QSFP breakout code; see [`LinkPort::qsfp_type`].
    pub qsfp_type: Option<u32>,
}

impl LinkPort {
    /// Negotiated speed, when the device reports a known code.
    pub fn link_speed(&self) -> Option<LinkSpeed> {
        self.speed.and_then(LinkSpeed::from_code)
    }

    /// Combo-port mode, when the device reports a known code.
    pub fn combo_mode(&self) -> Option<ComboMode> {
        self.combo_mode.and_then(ComboMode::from_code)
    }

    pub fn qsfp_type(&self) -> Option<QsfpType> {
        self.qsfp_type.and_then(QsfpType::from_code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkStatus {
    pub ports: Vec<LinkPort>,
}

impl LinkStatus {
    pub fn port_count(&self) -> usize {
        self.ports.len()
    }
}

impl Feature for LinkStatus {
    const ENDPOINT: Endpoint = Endpoint::Link;

    fn decode(raw: &RawValue, cx: &Decoder<'_>) -> Result<Self, CoreError> {
        let fields = cx.fields(raw)?;
        let count = fields
            .len("name")?
            .ok_or_else(|| CoreError::missing(Self::ENDPOINT, "name", None))?;
        let fields = fields.with_port_count(count);

        let ports = (0..count)
            .map(|i| {
                Ok(LinkPort {
                    name: fields.port("name", i)?,
                    enabled: fields.port("enabled", i)?,
                    link_up: fields.port("link_up", i)?,
                    auto_negotiation: fields.port("auto_negotiation", i)?,
                    duplex: fields.port("duplex", i)?,
                    duplex_control: fields.port("duplex_control", i)?,
                    flow_control: fields.port("flow_control", i)?,
                    speed: fields.port_opt("speed", i)?,
                    speed_control: fields.port_opt("speed_control", i)?,
                    poe_mode: fields.port_opt("poe_mode", i)?,
                    poe_priority: fields.port_opt("poe_priority", i)?,
                    poe_status: fields.port_opt("poe_status", i)?,
                    power: fields.port_opt("power", i)?,
                    current: fields.port_opt("current", i)?,
                    combo_mode: fields.port_opt("combo_mode", i)?,
                    qsfp_type: fields.port_opt("qsfp_type", i)?,
                })
            })
            .collect::<Result<Vec<_>, CoreError>>()?;

        Ok(Self { ports })
    }
}

impl Writable for LinkStatus {
    fn encode(&self, cx: &Encoder<'_>) -> Result<WireValue, CoreError> {
        let ports = &self.ports;
        let mut w = cx.writer();

        w.set_ports("name", ports.iter().map(|p| p.name.as_str()))?;
        w.set_ports("enabled", ports.iter().map(|p| p.enabled))?;
        w.set_ports("auto_negotiation", ports.iter().map(|p| p.auto_negotiation))?;
        if let Some(speeds) = every(ports, |p| p.speed_control) {
            w.set_ports("speed_control", speeds)?;
        }
        w.set_ports("duplex_control", ports.iter().map(|p| p.duplex_control))?;
        w.set_ports("flow_control", ports.iter().map(|p| p.flow_control))?;
        if let Some(modes) = every(ports, |p| p.poe_mode) {
            w.set_ports("poe_mode", modes)?;
        }
        if let Some(prio) = every(ports, |p| p.poe_priority) {
            w.set_ports("poe_priority", prio)?;
        }

        Ok(w.finish())
    }
}
