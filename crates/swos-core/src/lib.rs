//! Typed view of a MikroTik SwOS switch, built on the `swos-wire` codec.
//!
//! The switch serves one `.b` resource per feature. This crate turns each of
//! them into a typed record and back, then joins the records into one view
//! per physical port:
//!
//! - **[`Endpoint`]**: the resource catalogue, with paths, writability and
//!   whether decoding needs the port count ([`DecodeContext`]).
//! - **[`field`]**: the table-driven engine. Every endpoint declares a
//!   `FIELDS` table of [`FieldSpec`](field::FieldSpec)s mapping short device
//!   keys to attribute names and codecs; decoders and encoders only ever
//!   speak attribute names.
//! - **[`model`]**: one module per endpoint holding its records and the
//!   [`Feature`] / [`Writable`] impls.
//! - **[`KeyOverrides`]**: per-endpoint key remapping for firmware that
//!   renamed a field.
//! - **[`Codec`]**: the facade. Decode by endpoint name or path, encode a
//!   writable record, or aggregate a whole raw snapshot.
//! - **[`aggregate()`]**: the Port Aggregator producing [`DeviceState`].
//!
//! Everything here is pure. No I/O, no shared mutable state.

pub mod aggregate;
pub mod codec;
pub mod endpoint;
pub mod error;
pub mod field;
pub mod model;
pub mod overrides;

// ── Primary re-exports ──────────────────────────────────────────────
pub use aggregate::{
    ConnectorType, DeviceState, FeatureSet, PortView, VlanMembership, aggregate,
};
pub use codec::{Codec, Decoded, Feature, RawSnapshot, Writable};
pub use endpoint::{DecodeContext, Endpoint};
pub use error::{CoreError, ErrorKind};
pub use overrides::KeyOverrides;

// Record types at the crate root for ergonomics.
pub use model::{
    codes::{
        AddressAcquisition, ComboMode, LacpMode, LinkSpeed, PortCostMode, QsfpType, RstpPortType,
        RstpRole, RstpState, VlanMode, VlanPortMode, VlanReceive,
    },
    fwd::{Forwarding, FwdPort},
    host::{DynamicHostTable, HostEntry, HostTable},
    igmp::{IgmpGroup, IgmpTable},
    lag::{LagPort, LagStatus},
    link::{LinkPort, LinkStatus},
    rstp::{RstpPort, RstpStatus},
    sfp::{SfpModule, SfpStatus},
    snmp::SnmpSettings,
    stats::{Counter, PortStatistics, PortStats},
    sys::{DeviceSummary, SystemPortFlags, SystemStatus},
    vlan::{Vlan, VlanTable},
};
pub use swos_wire::MacAddress;
