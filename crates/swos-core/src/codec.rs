// ── Codec facade ──
//
// Entry point for callers holding raw endpoint text: dispatch by endpoint
// identifier, typed decode and encode, and raw-snapshot aggregation. The
// codec is immutable once built and safe to share between threads.

use std::collections::BTreeMap;

use serde::Serialize;
use swos_wire::{RawValue, WireValue};
use tracing::{debug, warn};

use crate::aggregate::{DeviceState, FeatureSet, aggregate};
use crate::endpoint::{DecodeContext, Endpoint};
use crate::error::CoreError;
use crate::field::{Decoder, Encoder};
use crate::model::fwd::Forwarding;
use crate::model::host::{DynamicHostTable, HostTable};
use crate::model::igmp::IgmpTable;
use crate::model::lag::LagStatus;
use crate::model::link::LinkStatus;
use crate::model::rstp::RstpStatus;
use crate::model::sfp::SfpStatus;
use crate::model::snmp::SnmpSettings;
use crate::model::stats::PortStatistics;
use crate::model::sys::SystemStatus;
use crate::model::vlan::VlanTable;
use crate::overrides::KeyOverrides;

// ── Feature traits ──────────────────────────────────────────────────

/// A typed record decoded from one endpoint.
pub trait Feature: Sized {
    const ENDPOINT: Endpoint;

    fn decode(raw: &RawValue, cx: &Decoder<'_>) -> Result<Self, CoreError>;
}

/// A record the switch accepts back on save.
pub trait Writable: Feature {
    /// Build the outgoing record. Read-only attributes are never emitted.
    fn encode(&self, cx: &Encoder<'_>) -> Result<WireValue, CoreError>;
}

// ── Decoded ─────────────────────────────────────────────────────────

/// Result of decoding by endpoint identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "endpoint", content = "data", rename_all = "lowercase")]
pub enum Decoded {
    Link(LinkStatus),
    Sys(SystemStatus),
    Vlan(VlanTable),
    Fwd(Forwarding),
    Rstp(RstpStatus),
    Sfp(SfpStatus),
    Stats(PortStatistics),
    Lag(LagStatus),
    Snmp(SnmpSettings),
    Host(HostTable),
    #[serde(rename = "dhost")]
    DynamicHost(DynamicHostTable),
    Igmp(IgmpTable),
}

impl Decoded {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::Link(_) => Endpoint::Link,
            Self::Sys(_) => Endpoint::Sys,
            Self::Vlan(_) => Endpoint::Vlan,
            Self::Fwd(_) => Endpoint::Fwd,
            Self::Rstp(_) => Endpoint::Rstp,
            Self::Sfp(_) => Endpoint::Sfp,
            Self::Stats(_) => Endpoint::Stats,
            Self::Lag(_) => Endpoint::Lag,
            Self::Snmp(_) => Endpoint::Snmp,
            Self::Host(_) => Endpoint::Host,
            Self::DynamicHost(_) => Endpoint::DynamicHost,
            Self::Igmp(_) => Endpoint::Igmp,
        }
    }
}

/// Raw response text per endpoint, as fetched by the transport.
pub type RawSnapshot = BTreeMap<Endpoint, String>;

// ── Codec ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct Codec {
    overrides: KeyOverrides,
}

impl Codec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overrides(overrides: KeyOverrides) -> Self {
        Self { overrides }
    }

    pub fn overrides(&self) -> &KeyOverrides {
        &self.overrides
    }

    /// Decode a response for an endpoint given by name or path.
    pub fn decode(
        &self,
        endpoint_id: &str,
        text: &str,
        ctx: &DecodeContext,
    ) -> Result<Decoded, CoreError> {
        let endpoint = Endpoint::from_identifier(endpoint_id)?;
        self.decode_endpoint(endpoint, text, ctx)
    }

    pub fn decode_endpoint(
        &self,
        endpoint: Endpoint,
        text: &str,
        ctx: &DecodeContext,
    ) -> Result<Decoded, CoreError> {
        Ok(match endpoint {
            Endpoint::Link => Decoded::Link(self.decode_feature(text, ctx)?),
            Endpoint::Sys => Decoded::Sys(self.decode_feature(text, ctx)?),
            Endpoint::Vlan => Decoded::Vlan(self.decode_feature(text, ctx)?),
            Endpoint::Fwd => Decoded::Fwd(self.decode_feature(text, ctx)?),
            Endpoint::Rstp => Decoded::Rstp(self.decode_feature(text, ctx)?),
            Endpoint::Sfp => Decoded::Sfp(self.decode_feature(text, ctx)?),
            Endpoint::Stats => Decoded::Stats(self.decode_feature(text, ctx)?),
            Endpoint::Lag => Decoded::Lag(self.decode_feature(text, ctx)?),
            Endpoint::Snmp => Decoded::Snmp(self.decode_feature(text, ctx)?),
            Endpoint::Host => Decoded::Host(self.decode_feature(text, ctx)?),
            Endpoint::DynamicHost => Decoded::DynamicHost(self.decode_feature(text, ctx)?),
            Endpoint::Igmp => Decoded::Igmp(self.decode_feature(text, ctx)?),
        })
    }

    /// Repair, parse and decode one endpoint into its typed record.
    pub fn decode_feature<T: Feature>(&self, text: &str, ctx: &DecodeContext) -> Result<T, CoreError> {
        let raw = RawValue::parse(text).map_err(|e| CoreError::from_wire(T::ENDPOINT, "", e))?;
        let cx = Decoder::new(T::ENDPOINT, &self.overrides, ctx);
        let value = T::decode(&raw, &cx)?;
        debug!(endpoint = %T::ENDPOINT, bytes = text.len(), "decoded endpoint");
        Ok(value)
    }

    /// Encode a writable record into request-body text.
    pub fn encode<T: Writable>(&self, value: &T, ctx: &DecodeContext) -> Result<String, CoreError> {
        let cx = Encoder::new(T::ENDPOINT, &self.overrides, ctx);
        let text = value
            .encode(&cx)?
            .to_wire()
            .map_err(|e| CoreError::from_wire(T::ENDPOINT, "", e))?;
        debug!(endpoint = %T::ENDPOINT, bytes = text.len(), "encoded endpoint");
        Ok(text)
    }

    /// Decode a full snapshot and join it into per-port views.
    ///
    /// The link table is mandatory since it defines the port count. Every
    /// other endpoint is decoded with that count; one that is missing or
    /// fails to decode is left absent.
    pub fn aggregate_raw(&self, snapshot: &RawSnapshot) -> Result<DeviceState, CoreError> {
        let link_text = snapshot
            .get(&Endpoint::Link)
            .ok_or_else(|| CoreError::malformed(Endpoint::Link, "link status missing from snapshot"))?;
        let links: LinkStatus = self.decode_feature(link_text, &DecodeContext::new())?;
        let ctx = DecodeContext::with_ports(links.port_count());

        let mut features = FeatureSet::new(links);
        features.system = self.optional(snapshot, &ctx);
        features.vlans = self.optional(snapshot, &ctx);
        features.forwarding = self.optional(snapshot, &ctx);
        features.rstp = self.optional(snapshot, &ctx);
        features.sfp = self.optional(snapshot, &ctx);
        features.lag = self.optional(snapshot, &ctx);
        features.stats = self.optional(snapshot, &ctx);

        Ok(aggregate(&features))
    }

    fn optional<T: Feature>(&self, snapshot: &RawSnapshot, ctx: &DecodeContext) -> Option<T> {
        let Some(text) = snapshot.get(&T::ENDPOINT) else {
            debug!(endpoint = %T::ENDPOINT, "endpoint not in snapshot");
            return None;
        };
        match self.decode_feature(text, ctx) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(endpoint = %T::ENDPOINT, error = %err, "endpoint failed to decode, treating as absent");
                None
            }
        }
    }
}
