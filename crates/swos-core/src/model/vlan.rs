// ── VLAN table (`/vlan.b`) ──
//
// A list of records, one per configured VLAN. Saves replace the whole table.

use serde::{Deserialize, Serialize};
use swos_wire::{RawValue, WireValue};

use super::codes::VlanPortMode;
use crate::codec::{Feature, Writable};
use crate::endpoint::Endpoint;
use crate::error::CoreError;
use crate::field::{Decoder, Encoder, FieldKind, FieldSpec};

pub(crate) const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("vid", "id", FieldKind::Int).writable(),
    FieldSpec::new("nm", "name", FieldKind::HexText)
        .optional()
        .writable(),
    FieldSpec::new("ivl", "independent_learning", FieldKind::Flag)
        .optional()
        .writable(),
    FieldSpec::new("igmp", "igmp_snooping", FieldKind::Flag)
        .optional()
        .writable(),
    FieldSpec::new("prt", "port_modes", FieldKind::Int)
        .per_port()
        .writable(),
    FieldSpec::new("mbr", "members", FieldKind::Bitmask).optional(),
    FieldSpec::new("piso", "port_isolation", FieldKind::Flag).optional(),
    FieldSpec::new("lrn", "learning", FieldKind::Flag).optional(),
    FieldSpec::new("mrr", "mirror", FieldKind::Flag).optional(),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vlan {
    pub id: u32,
    pub name: Option<String>,
    pub independent_learning: bool,
    pub igmp_snooping: bool,
    /// Egress mode per port, index = port.
    pub port_modes: Vec<VlanPortMode>,
    /// Member ports. When the device omits the mask, every port whose mode
    /// is not `NotAMember` counts as a member.
    pub members: Vec<bool>,
    pub port_isolation: Option<bool>,
    pub learning: Option<bool>,
    pub mirror: Option<bool>,
}

impl Vlan {
    /// A fresh VLAN with every port in `LeaveAsIs` mode.
    pub fn new(id: u32, port_count: usize) -> Self {
        Self {
            id,
            name: None,
            independent_learning: false,
            igmp_snooping: false,
            port_modes: vec![VlanPortMode::LeaveAsIs; port_count],
            members: vec![true; port_count],
            port_isolation: None,
            learning: None,
            mirror: None,
        }
    }

    pub fn is_member(&self, port: usize) -> bool {
        self.members.get(port).copied().unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlanTable {
    pub vlans: Vec<Vlan>,
}

impl VlanTable {
    pub fn get(&self, id: u32) -> Option<&Vlan> {
        self.vlans.iter().find(|v| v.id == id)
    }
}

impl Feature for VlanTable {
    const ENDPOINT: Endpoint = Endpoint::Vlan;

    fn decode(raw: &RawValue, cx: &Decoder<'_>) -> Result<Self, CoreError> {
        let vlans = cx
            .entries(raw)?
            .into_iter()
            .map(|record| {
                let f = cx.record(record);
                let count = f.len("port_modes")?.or(cx.port_count()).unwrap_or(0);
                let f = f.with_port_count(count);

                let port_modes: Vec<VlanPortMode> = f.ports("port_modes")?;
                let members = match f.opt::<Vec<bool>>("members")? {
                    Some(mask) => mask,
                    None => port_modes
                        .iter()
                        .map(|mode| *mode != VlanPortMode::NotAMember)
                        .collect(),
                };

                Ok(Vlan {
                    id: f.get("id")?,
                    name: f.opt("name")?,
                    independent_learning: f.get("independent_learning")?,
                    igmp_snooping: f.get("igmp_snooping")?,
                    port_modes,
                    members,
                    port_isolation: f.opt("port_isolation")?,
                    learning: f.opt("learning")?,
                    mirror: f.opt("mirror")?,
                })
            })
            .collect::<Result<Vec<_>, CoreError>>()?;

        Ok(Self { vlans })
    }
}

impl Writable for VlanTable {
    fn encode(&self, cx: &Encoder<'_>) -> Result<WireValue, CoreError> {
        let records = self
            .vlans
            .iter()
            .map(|vlan| {
                let mut w = cx.writer();
                w.set("id", vlan.id)?;
                if let Some(name) = &vlan.name {
                    w.set("name", name.as_str())?;
                }
                w.set("independent_learning", vlan.independent_learning)?;
                w.set("igmp_snooping", vlan.igmp_snooping)?;
                w.set_ports("port_modes", vlan.port_modes.iter().copied())?;
                Ok(w.finish())
            })
            .collect::<Result<Vec<_>, CoreError>>()?;

        Ok(WireValue::List(records))
    }
}
