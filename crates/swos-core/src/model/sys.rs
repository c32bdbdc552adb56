// ── System (`/sys.b`) ──
//
// Device-wide identity and management settings, plus a handful of per-port
// masks. The masks carry no length of their own, so decoding needs the
// port count from context.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};
use swos_wire::{MacAddress, RawValue, WireValue};

use super::codes::{AddressAcquisition, PortCostMode};
use super::every;
use crate::codec::{Feature, Writable};
use crate::endpoint::Endpoint;
use crate::error::CoreError;
use crate::field::{ByteOrder, Decoder, Encoder, FieldKind, FieldSpec};

const LE: FieldKind = FieldKind::Ipv4(ByteOrder::Little);

pub(crate) const FIELDS: &[FieldSpec] = &[
    // identity
    FieldSpec::new("mac", "mac", FieldKind::Mac),
    FieldSpec::new("sid", "serial", FieldKind::HexText),
    FieldSpec::new("id", "identity", FieldKind::HexText).writable(),
    FieldSpec::new("ver", "version", FieldKind::HexText),
    FieldSpec::new("brd", "board", FieldKind::HexText),
    FieldSpec::new("upt", "uptime", FieldKind::Int),
    FieldSpec::new("bld", "build", FieldKind::Int).optional(),
    FieldSpec::new("ip", "ip", LE),
    // addressing
    FieldSpec::new("sip", "static_ip", LE).optional().writable(),
    FieldSpec::new("iptp", "address_acquisition", FieldKind::Int)
        .optional()
        .writable(),
    FieldSpec::new("alla", "allow_from", LE).optional().writable(),
    FieldSpec::new("allm", "allow_from_mask", FieldKind::Int)
        .optional()
        .writable(),
    FieldSpec::new("avln", "allow_from_vlan", FieldKind::Int)
        .optional()
        .writable(),
    // global switches
    FieldSpec::new("wdt", "watchdog", FieldKind::Flag).optional().writable(),
    FieldSpec::new("dsc", "discovery", FieldKind::Flag).optional().writable(),
    FieldSpec::new("ivl", "independent_vlan_lookup", FieldKind::Flag)
        .optional()
        .writable(),
    FieldSpec::new("igmp", "igmp_snooping", FieldKind::Flag)
        .optional()
        .writable(),
    FieldSpec::new("igmq", "igmp_querier", FieldKind::Flag)
        .optional()
        .writable(),
    FieldSpec::new("igve", "igmp_version", FieldKind::Int)
        .optional()
        .writable(),
    FieldSpec::new("ainf", "add_information_option", FieldKind::Flag)
        .optional()
        .writable(),
    FieldSpec::new("lcbl", "long_poe_cable", FieldKind::Flag)
        .optional()
        .writable(),
    FieldSpec::new("frmc", "forward_reserved_multicast", FieldKind::Flag)
        .optional()
        .writable(),
    // spanning tree
    FieldSpec::new("prio", "bridge_priority", FieldKind::Int)
        .optional()
        .writable(),
    FieldSpec::new("cost", "port_cost_mode", FieldKind::Int)
        .optional()
        .writable(),
    FieldSpec::new("rpr", "root_bridge_priority", FieldKind::Int).optional(),
    FieldSpec::new("rmac", "root_bridge_mac", FieldKind::Mac).optional(),
    // health
    FieldSpec::new("volt", "voltage", FieldKind::Int).optional(),
    FieldSpec::new("temp", "temperature", FieldKind::Int).optional(),
    // per-port masks
    FieldSpec::new("allp", "allow_from_ports", FieldKind::Bitmask)
        .optional()
        .writable(),
    FieldSpec::new("pdsc", "discovery_ports", FieldKind::Bitmask)
        .optional()
        .writable(),
    FieldSpec::new("igfl", "igmp_fast_leave", FieldKind::Bitmask)
        .optional()
        .writable(),
    FieldSpec::new("dtrp", "dhcp_trusted", FieldKind::Bitmask)
        .optional()
        .writable(),
];

/// Device-wide attributes. Per-port flags live on the port view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSummary {
    pub mac: MacAddress,
    pub serial: String,
    pub identity: String,
    pub version: String,
    pub board: String,
    /// Hundredths of a second.
    pub uptime: u32,
    pub build: Option<u32>,
    pub ip: Ipv4Addr,

    pub static_ip: Ipv4Addr,
    pub address_acquisition: AddressAcquisition,
    pub allow_from: Ipv4Addr,
    pub allow_from_mask: u32,
    pub allow_from_vlan: u32,

    pub watchdog: bool,
    pub discovery: bool,
    pub independent_vlan_lookup: bool,
    pub igmp_snooping: bool,
    pub igmp_querier: Option<bool>,
    pub igmp_version: Option<u32>,
    pub add_information_option: Option<bool>,
    pub long_poe_cable: bool,
    pub forward_reserved_multicast: Option<bool>,

    pub bridge_priority: u32,
    pub port_cost_mode: PortCostMode,
    pub root_bridge_priority: Option<u32>,
    pub root_bridge_mac: Option<MacAddress>,

    pub voltage: Option<u32>,
    pub temperature: Option<u32>,
}

/// Per-port flags reported by `/sys.b`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemPortFlags {
    /// Management access is allowed from this port.
    pub allow_from: bool,
    pub discovery: Option<bool>,
    pub igmp_fast_leave: Option<bool>,
    pub trusted: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub device: DeviceSummary,
    pub ports: Vec<SystemPortFlags>,
}

impl Feature for SystemStatus {
    const ENDPOINT: Endpoint = Endpoint::Sys;

    fn decode(raw: &RawValue, cx: &Decoder<'_>) -> Result<Self, CoreError> {
        let count = cx.require_port_count()?;
        let f = cx.fields(raw)?;

        let device = DeviceSummary {
            mac: f.get("mac")?,
            serial: f.get("serial")?,
            identity: f.get("identity")?,
            version: f.get("version")?,
            board: f.get("board")?,
            uptime: f.get("uptime")?,
            build: f.opt("build")?,
            ip: f.get("ip")?,
            static_ip: f.get("static_ip")?,
            address_acquisition: f.get("address_acquisition")?,
            allow_from: f.get("allow_from")?,
            allow_from_mask: f.get("allow_from_mask")?,
            allow_from_vlan: f.get("allow_from_vlan")?,
            watchdog: f.get("watchdog")?,
            discovery: f.get("discovery")?,
            independent_vlan_lookup: f.get("independent_vlan_lookup")?,
            igmp_snooping: f.get("igmp_snooping")?,
            igmp_querier: f.opt("igmp_querier")?,
            igmp_version: f.opt("igmp_version")?,
            add_information_option: f.opt("add_information_option")?,
            long_poe_cable: f.get("long_poe_cable")?,
            forward_reserved_multicast: f.opt("forward_reserved_multicast")?,
            bridge_priority: f.get("bridge_priority")?,
            port_cost_mode: f.get("port_cost_mode")?,
            root_bridge_priority: f.opt("root_bridge_priority")?,
            root_bridge_mac: f.opt("root_bridge_mac")?,
            voltage: f.opt("voltage")?,
            temperature: f.opt("temperature")?,
        };

        let ports = (0..count)
            .map(|i| {
                Ok(SystemPortFlags {
                    allow_from: f.port("allow_from_ports", i)?,
                    discovery: f.port_opt("discovery_ports", i)?,
                    igmp_fast_leave: f.port_opt("igmp_fast_leave", i)?,
                    trusted: f.port_opt("dhcp_trusted", i)?,
                })
            })
            .collect::<Result<Vec<_>, CoreError>>()?;

        Ok(Self { device, ports })
    }
}

impl Writable for SystemStatus {
    fn encode(&self, cx: &Encoder<'_>) -> Result<WireValue, CoreError> {
        let d = &self.device;
        let ports = &self.ports;
        let mut w = cx.writer();

        w.set("address_acquisition", d.address_acquisition)?;
        w.set("static_ip", d.static_ip)?;
        w.set("identity", d.identity.as_str())?;
        w.set("allow_from", d.allow_from)?;
        w.set("allow_from_mask", d.allow_from_mask)?;
        w.set_ports("allow_from_ports", ports.iter().map(|p| p.allow_from))?;
        w.set("allow_from_vlan", d.allow_from_vlan)?;
        w.set("independent_vlan_lookup", d.independent_vlan_lookup)?;
        w.set("igmp_snooping", d.igmp_snooping)?;
        w.set_opt("igmp_querier", d.igmp_querier)?;
        w.set_opt("igmp_version", d.igmp_version)?;
        if let Some(mask) = every(ports, |p| p.igmp_fast_leave) {
            w.set_ports("igmp_fast_leave", mask)?;
        }
        if let Some(mask) = every(ports, |p| p.discovery) {
            w.set_ports("discovery_ports", mask)?;
        }
        if let Some(mask) = every(ports, |p| p.trusted) {
            w.set_ports("dhcp_trusted", mask)?;
        }
        w.set("watchdog", d.watchdog)?;
        w.set("discovery", d.discovery)?;
        w.set_opt("add_information_option", d.add_information_option)?;
        w.set("long_poe_cable", d.long_poe_cable)?;
        w.set_opt("forward_reserved_multicast", d.forward_reserved_multicast)?;
        w.set("bridge_priority", d.bridge_priority)?;
        w.set("port_cost_mode", d.port_cost_mode)?;

        Ok(w.finish())
    }
}
