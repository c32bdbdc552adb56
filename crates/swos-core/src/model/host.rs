// ── Host tables (`/host.b`, `/!dhost.b`) ──
//
// Static and learned MAC entries share one record layout; only the static
// table carries the drop and mirror flags.

use serde::{Deserialize, Serialize};
use swos_wire::{MacAddress, RawValue};

use crate::codec::Feature;
use crate::endpoint::Endpoint;
use crate::error::CoreError;
use crate::field::{Decoder, FieldKind, FieldSpec};

pub(crate) const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("prt", "port", FieldKind::Int),
    FieldSpec::new("adr", "mac", FieldKind::Mac),
    FieldSpec::new("vid", "vlan_id", FieldKind::Int).optional(),
    FieldSpec::new("drp", "drop", FieldKind::Flag).optional(),
    FieldSpec::new("mir", "mirror", FieldKind::Flag).optional(),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostEntry {
    /// Zero-based port index.
    pub port: u32,
    pub mac: MacAddress,
    pub vlan_id: u32,
    pub drop: Option<bool>,
    pub mirror: Option<bool>,
}

fn decode_entries(raw: &RawValue, cx: &Decoder<'_>) -> Result<Vec<HostEntry>, CoreError> {
    cx.entries(raw)?
        .into_iter()
        .map(|record| {
            let f = cx.record(record);
            Ok(HostEntry {
                port: f.get("port")?,
                mac: f.get("mac")?,
                vlan_id: f.get("vlan_id")?,
                drop: f.opt("drop")?,
                mirror: f.opt("mirror")?,
            })
        })
        .collect()
}

/// Static host entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostTable {
    pub entries: Vec<HostEntry>,
}

impl Feature for HostTable {
    const ENDPOINT: Endpoint = Endpoint::Host;

    fn decode(raw: &RawValue, cx: &Decoder<'_>) -> Result<Self, CoreError> {
        decode_entries(raw, cx).map(|entries| Self { entries })
    }
}

/// Learned host entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicHostTable {
    pub entries: Vec<HostEntry>,
}

impl Feature for DynamicHostTable {
    const ENDPOINT: Endpoint = Endpoint::DynamicHost;

    fn decode(raw: &RawValue, cx: &Decoder<'_>) -> Result<Self, CoreError> {
        decode_entries(raw, cx).map(|entries| Self { entries })
    }
}
