// ── Endpoint catalogue ──
//
// One variant per `.b` resource the switch serves. The name is what callers
// and configuration use; the path is what the transport requests.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::error::CoreError;
use crate::field::FieldSpec;
use crate::model;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Endpoint {
    Link,
    Sys,
    Vlan,
    Fwd,
    Rstp,
    Sfp,
    Stats,
    Lag,
    Snmp,
    Host,
    #[serde(rename = "dhost")]
    #[strum(serialize = "dhost")]
    DynamicHost,
    Igmp,
}

impl Endpoint {
    /// Request path on the switch.
    pub const fn path(self) -> &'static str {
        match self {
            Self::Link => "/link.b",
            Self::Sys => "/sys.b",
            Self::Vlan => "/vlan.b",
            Self::Fwd => "/fwd.b",
            Self::Rstp => "/rstp.b",
            Self::Sfp => "/sfp.b",
            Self::Stats => "/!stats.b",
            Self::Lag => "/lacp.b",
            Self::Snmp => "/snmp.b",
            Self::Host => "/host.b",
            Self::DynamicHost => "/!dhost.b",
            Self::Igmp => "/!igmp.b",
        }
    }

    /// Whether the switch accepts a save on this endpoint.
    pub const fn is_writable(self) -> bool {
        matches!(
            self,
            Self::Link | Self::Sys | Self::Vlan | Self::Fwd | Self::Rstp | Self::Snmp
        )
    }

    /// Endpoints whose arrays do not carry their own length.
    pub const fn needs_port_count(self) -> bool {
        matches!(self, Self::Sys | Self::Fwd | Self::Igmp)
    }

    /// The field table that drives decoding and encoding.
    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            Self::Link => model::link::FIELDS,
            Self::Sys => model::sys::FIELDS,
            Self::Vlan => model::vlan::FIELDS,
            Self::Fwd => model::fwd::FIELDS,
            Self::Rstp => model::rstp::FIELDS,
            Self::Sfp => model::sfp::FIELDS,
            Self::Stats => model::stats::FIELDS,
            Self::Lag => model::lag::FIELDS,
            Self::Snmp => model::snmp::FIELDS,
            Self::Host | Self::DynamicHost => model::host::FIELDS,
            Self::Igmp => model::igmp::FIELDS,
        }
    }

    /// Resolve a name (`"fwd"`) or a path (`"/fwd.b"`, `"!stats.b"`).
    pub fn from_identifier(id: &str) -> Result<Self, CoreError> {
        let stem = path_stem(id);
        Self::iter()
            .find(|e| e.as_ref() == stem || path_stem(e.path()) == stem)
            .ok_or_else(|| CoreError::UnknownEndpoint(id.to_owned()))
    }
}

fn path_stem(id: &str) -> &str {
    let id = id.trim();
    let id = id.strip_prefix('/').unwrap_or(id);
    let id = id.strip_prefix('!').unwrap_or(id);
    id.strip_suffix(".b").unwrap_or(id)
}

/// Per-call context supplied by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeContext {
    /// Port count, normally taken from a decoded link table.
    pub port_count: Option<usize>,
}

impl DecodeContext {
    pub const fn new() -> Self {
        Self { port_count: None }
    }

    pub const fn with_ports(port_count: usize) -> Self {
        Self {
            port_count: Some(port_count),
        }
    }
}
