// ── Device enumerations ──
//
// Small integer codes the switch uses for modes and roles. Each enum maps
// code <-> variant both ways; an unknown code on decode is `InvalidFormat`.

use serde::{Deserialize, Serialize};

use crate::field::{FromValue, Value, ValueError};

macro_rules! code_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            Serialize,
            Deserialize,
            strum::Display,
            strum::EnumIter,
            strum::AsRefStr,
        )]
        #[serde(rename_all = "kebab-case")]
        #[strum(serialize_all = "kebab-case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            pub const fn from_code(code: u32) -> Option<Self> {
                match code {
                    $( $code => Some(Self::$variant), )+
                    _ => None,
                }
            }

            pub const fn code(self) -> u32 {
                match self {
                    $( Self::$variant => $code ),+
                }
            }
        }

        impl FromValue for $name {
            fn from_value(value: Value) -> Result<Self, ValueError> {
                let code = u32::from_value(value)?;
                Self::from_code(code).ok_or(ValueError::Code {
                    code,
                    expected: stringify!($name),
                })
            }
        }

        impl From<$name> for Value {
            fn from(v: $name) -> Self {
                Value::Int(v.code())
            }
        }
    };
}

code_enum! {
    /// Egress tagging of one port in one VLAN.
    pub enum VlanPortMode {
        LeaveAsIs = 0,
        AlwaysStrip = 1,
        AddIfMissing = 2,
        NotAMember = 3,
    }
}

code_enum! {
    /// Per-port 802.1Q mode (`fwd.vlan`).
    pub enum VlanMode {
        Disabled = 0,
        Optional = 1,
        Enabled = 2,
        Strict = 3,
    }
}

code_enum! {
    /// Which frames a port accepts (`fwd.vlni`).
    pub enum VlanReceive {
        Any = 0,
        OnlyTagged = 1,
        OnlyUntagged = 2,
    }
}

code_enum! {
    pub enum RstpRole {
        Disabled = 0,
        Alternate = 1,
        Root = 2,
        Designated = 3,
        Backup = 4,
    }
}

code_enum! {
    pub enum RstpPortType {
        Shared = 0,
        #[serde(rename = "p2p")]
        #[strum(serialize = "p2p")]
        PointToPoint = 1,
        Edge = 2,
        EdgeAlt = 3,
    }
}

code_enum! {
    pub enum LacpMode {
        Passive = 0,
        Active = 1,
        Static = 2,
    }
}

code_enum! {
    /// How the management address is obtained (`sys.iptp`).
    pub enum AddressAcquisition {
        DhcpWithFallback = 0,
        Static = 1,
        DhcpOnly = 2,
    }
}

code_enum! {
    pub enum PortCostMode {
        Short = 0,
        Long = 1,
    }
}

code_enum! {
    pub enum ComboMode {
        Auto = 0,
        Copper = 1,
        Sfp = 2,
    }
}

code_enum! {
    pub enum QsfpType {
        Auto = 0,
        #[serde(rename = "40G")]
        #[strum(serialize = "40G")]
        Single40G = 1,
        #[serde(rename = "4x10G")]
        #[strum(serialize = "4x10G")]
        Split4x10G = 2,
    }
}

code_enum! {
    /// Negotiated link speed as reported in `link.spd`.
    pub enum LinkSpeed {
        #[serde(rename = "10M")]
        #[strum(serialize = "10M")]
        Mbps10 = 0,
        #[serde(rename = "100M")]
        #[strum(serialize = "100M")]
        Mbps100 = 1,
        #[serde(rename = "1G")]
        #[strum(serialize = "1G")]
        Gbps1 = 2,
        #[serde(rename = "10G")]
        #[strum(serialize = "10G")]
        Gbps10 = 3,
        #[serde(rename = "5G")]
        #[strum(serialize = "5G")]
        Gbps5 = 4,
        #[serde(rename = "2.5G")]
        #[strum(serialize = "2.5G")]
        Gbps2_5 = 5,
        #[serde(rename = "40G")]
        #[strum(serialize = "40G")]
        Gbps40 = 6,
    }
}

/// Spanning-tree forwarding state, derived from the `lrn` and `fwd` masks.
/// It has no code of its own on the wire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RstpState {
    Discarding,
    Learning,
    Forwarding,
}

impl RstpState {
    /// Forwarding wins over learning; neither bit means discarding.
    pub const fn from_bits(learning: bool, forwarding: bool) -> Self {
        if forwarding {
            Self::Forwarding
        } else if learning {
            Self::Learning
        } else {
            Self::Discarding
        }
    }
}
