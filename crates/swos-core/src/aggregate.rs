// ── Port aggregation ──
//
// Joins the per-feature records into one view per physical port. The link
// table is authoritative for the port count; every other table is indexed
// against it and never the other way round.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::endpoint::Endpoint;
use crate::model::codes::VlanPortMode;
use crate::model::fwd::{Forwarding, FwdPort};
use crate::model::lag::{LagPort, LagStatus};
use crate::model::link::{LinkPort, LinkStatus};
use crate::model::rstp::{RstpPort, RstpStatus};
use crate::model::sfp::{SfpModule, SfpStatus};
use crate::model::stats::{PortStatistics, PortStats};
use crate::model::sys::{DeviceSummary, SystemPortFlags, SystemStatus};
use crate::model::vlan::VlanTable;

/// Decoded per-feature records for one snapshot. Only the link table is
/// mandatory; `None` means the endpoint is unsupported or was not fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSet {
    pub links: LinkStatus,
    pub system: Option<SystemStatus>,
    pub vlans: Option<VlanTable>,
    pub forwarding: Option<Forwarding>,
    pub rstp: Option<RstpStatus>,
    pub sfp: Option<SfpStatus>,
    pub lag: Option<LagStatus>,
    pub stats: Option<PortStatistics>,
}

impl FeatureSet {
    pub fn new(links: LinkStatus) -> Self {
        Self {
            links,
            system: None,
            vlans: None,
            forwarding: None,
            rstp: None,
            sfp: None,
            lag: None,
            stats: None,
        }
    }
}

/// Physical connector deduced for a port.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ConnectorType {
    Copper,
    Sfp,
    Combo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlanMembership {
    pub vlan_id: u32,
    pub mode: VlanPortMode,
}

/// Everything known about one port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortView {
    /// Zero-based position in the link table.
    pub index: usize,
    /// One-based number as printed on the front panel.
    pub number: usize,
    pub name: String,
    pub connector: ConnectorType,
    pub link: LinkPort,
    pub forwarding: Option<FwdPort>,
    pub rstp: Option<RstpPort>,
    pub sfp: Option<SfpModule>,
    pub lag: Option<LagPort>,
    pub stats: Option<PortStats>,
    pub system: Option<SystemPortFlags>,
    /// Ascending by VLAN id.
    pub vlans: Vec<VlanMembership>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceState {
    pub summary: Option<DeviceSummary>,
    pub ports: Vec<PortView>,
}

impl DeviceState {
    pub fn port_count(&self) -> usize {
        self.ports.len()
    }

    pub fn port(&self, index: usize) -> Option<&PortView> {
        self.ports.get(index)
    }
}

// ── Aggregation ─────────────────────────────────────────────────────

pub fn aggregate(features: &FeatureSet) -> DeviceState {
    let count = features.links.port_count();

    let forwarding = features.forwarding.as_ref().map(|f| table(Endpoint::Fwd, &f.ports, count));
    let rstp = features.rstp.as_ref().map(|r| table(Endpoint::Rstp, &r.ports, count));
    let lag = features.lag.as_ref().map(|l| table(Endpoint::Lag, &l.ports, count));
    let stats = features.stats.as_ref().map(|s| table(Endpoint::Stats, &s.ports, count));
    let system = features.system.as_ref().map(|s| table(Endpoint::Sys, &s.ports, count));
    let modules = features.sfp.as_ref().map_or(&[][..], |s| s.modules.as_slice());

    if !modules.is_empty() && modules.len() != count {
        debug!(
            ports = count,
            modules = modules.len(),
            "sfp table length differs from port table"
        );
    }

    let ports = features
        .links
        .ports
        .iter()
        .enumerate()
        .map(|(index, link)| {
            let sfp = sfp_slot(index, count, modules.len()).and_then(|slot| modules.get(slot));
            PortView {
                index,
                number: index + 1,
                name: link.name.clone(),
                connector: classify(link, sfp.is_some()),
                link: link.clone(),
                forwarding: at(forwarding, index),
                rstp: at(rstp, index),
                sfp: sfp.cloned(),
                lag: at(lag, index),
                stats: at(stats, index),
                system: at(system, index),
                vlans: memberships(features.vlans.as_ref(), index),
            }
        })
        .collect();

    DeviceState {
        summary: features.system.as_ref().map(|s| s.device.clone()),
        ports,
    }
}

/// Trim a per-port table to the link port count.
fn table<T>(endpoint: Endpoint, rows: &[T], count: usize) -> &[T] {
    if rows.len() > count {
        debug!(%endpoint, rows = rows.len(), ports = count, "truncating per-port table");
    } else if rows.len() < count {
        debug!(%endpoint, rows = rows.len(), ports = count, "per-port table is short");
    }
    &rows[..rows.len().min(count)]
}

fn at<T: Clone>(rows: Option<&[T]>, index: usize) -> Option<T> {
    rows.and_then(|rows| rows.get(index)).cloned()
}

/// Module index for `port`. Short module lists occupy the trailing ports;
/// a list longer than the port table maps nowhere.
fn sfp_slot(port: usize, ports: usize, modules: usize) -> Option<usize> {
    if modules == ports {
        return Some(port);
    }
    let offset = ports.checked_sub(modules)?;
    port.checked_sub(offset)
}

fn classify(link: &LinkPort, has_sfp: bool) -> ConnectorType {
    if link.combo_mode.is_some() {
        ConnectorType::Combo
    } else if link.qsfp_type.is_some() || has_sfp || link.name.to_ascii_lowercase().contains("sfp") {
        ConnectorType::Sfp
    } else {
        ConnectorType::Copper
    }
}

fn memberships(vlans: Option<&VlanTable>, port: usize) -> Vec<VlanMembership> {
    let Some(table) = vlans else {
        return Vec::new();
    };
    let mut list: Vec<VlanMembership> = table
        .vlans
        .iter()
        .filter(|vlan| vlan.is_member(port))
        .filter_map(|vlan| {
            vlan.port_modes.get(port).map(|&mode| VlanMembership {
                vlan_id: vlan.id,
                mode,
            })
        })
        .collect();
    list.sort_by_key(|m| m.vlan_id);
    list
}
