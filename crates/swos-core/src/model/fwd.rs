// ── Forwarding (`/fwd.b`) ──
//
// Per-port forwarding tables (`fp1`..`fpN`, each a port mask), port locking,
// mirroring, 802.1Q settings and rate limits.
//
// Key mapping for the VLAN columns: `vlan` is the VLAN mode, `vlni` the
// receive filter and `dvid` the default VLAN id. Firmware that disagrees
// can be corrected through key overrides.

use serde::{Deserialize, Serialize};
use swos_wire::{RawValue, WireValue};

use super::codes::{VlanMode, VlanReceive};
use super::every;
use crate::codec::{Feature, Writable};
use crate::endpoint::Endpoint;
use crate::error::CoreError;
use crate::field::{Decoder, Encoder, FieldKind, FieldSpec};

pub(crate) const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("fp", "forward_to", FieldKind::Bitmask)
        .numbered()
        .writable(),
    FieldSpec::new("lck", "locked", FieldKind::Bitmask).writable(),
    FieldSpec::new("lckf", "lock_first", FieldKind::Bitmask)
        .optional()
        .writable(),
    FieldSpec::new("imr", "ingress_mirror", FieldKind::Bitmask)
        .optional()
        .writable(),
    FieldSpec::new("omr", "egress_mirror", FieldKind::Bitmask)
        .optional()
        .writable(),
    FieldSpec::new("fvid", "force_vlan_id", FieldKind::Bitmask)
        .optional()
        .writable(),
    FieldSpec::new("mrto", "mirror_to", FieldKind::Int)
        .optional()
        .writable(),
    FieldSpec::new("vlan", "vlan_mode", FieldKind::Int)
        .per_port()
        .writable(),
    FieldSpec::new("vlni", "vlan_receive", FieldKind::Int)
        .per_port()
        .optional()
        .writable(),
    FieldSpec::new("dvid", "default_vlan_id", FieldKind::Int)
        .per_port()
        .writable(),
    FieldSpec::new("srt", "storm_rate", FieldKind::Int)
        .per_port()
        .optional()
        .writable(),
    FieldSpec::new("ir", "ingress_rate", FieldKind::Int)
        .per_port()
        .optional()
        .writable(),
    FieldSpec::new("or", "egress_rate", FieldKind::Int)
        .per_port()
        .optional()
        .writable(),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FwdPort {
    /// Ports this port may forward to, index = destination port.
    pub forward_to: Vec<bool>,
    pub locked: bool,
    pub lock_first: Option<bool>,
    pub ingress_mirror: Option<bool>,
    pub egress_mirror: Option<bool>,
    pub force_vlan_id: Option<bool>,
    pub vlan_mode: VlanMode,
    pub vlan_receive: Option<VlanReceive>,
    pub default_vlan_id: u32,
    pub storm_rate: Option<u32>,
    pub ingress_rate: Option<u32>,
    pub egress_rate: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forwarding {
    pub ports: Vec<FwdPort>,
    pub mirror_to: Option<u32>,
}

impl Feature for Forwarding {
    const ENDPOINT: Endpoint = Endpoint::Fwd;

    fn decode(raw: &RawValue, cx: &Decoder<'_>) -> Result<Self, CoreError> {
        let count = cx.require_port_count()?;
        let f = cx.fields(raw)?;

        let ports = (0..count)
            .map(|i| {
                Ok(FwdPort {
                    forward_to: f.port("forward_to", i)?,
                    locked: f.port("locked", i)?,
                    lock_first: f.port_opt("lock_first", i)?,
                    ingress_mirror: f.port_opt("ingress_mirror", i)?,
                    egress_mirror: f.port_opt("egress_mirror", i)?,
                    force_vlan_id: f.port_opt("force_vlan_id", i)?,
                    vlan_mode: f.port("vlan_mode", i)?,
                    vlan_receive: f.port_opt("vlan_receive", i)?,
                    default_vlan_id: f.port("default_vlan_id", i)?,
                    storm_rate: f.port_opt("storm_rate", i)?,
                    ingress_rate: f.port_opt("ingress_rate", i)?,
                    egress_rate: f.port_opt("egress_rate", i)?,
                })
            })
            .collect::<Result<Vec<_>, CoreError>>()?;

        Ok(Self {
            ports,
            mirror_to: f.opt("mirror_to")?,
        })
    }
}

impl Writable for Forwarding {
    fn encode(&self, cx: &Encoder<'_>) -> Result<WireValue, CoreError> {
        let ports = &self.ports;
        let mut w = cx.writer();

        w.set_ports("forward_to", ports.iter().map(|p| p.forward_to.clone()))?;
        w.set_ports("locked", ports.iter().map(|p| p.locked))?;
        if let Some(mask) = every(ports, |p| p.lock_first) {
            w.set_ports("lock_first", mask)?;
        }
        if let Some(mask) = every(ports, |p| p.ingress_mirror) {
            w.set_ports("ingress_mirror", mask)?;
        }
        if let Some(mask) = every(ports, |p| p.egress_mirror) {
            w.set_ports("egress_mirror", mask)?;
        }
        if let Some(mask) = every(ports, |p| p.force_vlan_id) {
            w.set_ports("force_vlan_id", mask)?;
        }
        w.set_opt("mirror_to", self.mirror_to)?;
        w.set_ports("vlan_mode", ports.iter().map(|p| p.vlan_mode))?;
        if let Some(receive) = every(ports, |p| p.vlan_receive) {
            w.set_ports("vlan_receive", receive)?;
        }
        w.set_ports("default_vlan_id", ports.iter().map(|p| p.default_vlan_id))?;
        if let Some(rates) = every(ports, |p| p.storm_rate) {
            w.set_ports("storm_rate", rates)?;
        }
        if let Some(rates) = every(ports, |p| p.ingress_rate) {
            w.set_ports("ingress_rate", rates)?;
        }
        if let Some(rates) = every(ports, |p| p.egress_rate) {
            w.set_ports("egress_rate", rates)?;
        }

        Ok(w.finish())
    }
}
