// ── Port statistics (`/!stats.b`) ──
//
// Read-only. Every counter is a per-port list; 64-bit counters come as a
// low word list plus a `…h` high word list.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use swos_wire::RawValue;

use crate::codec::Feature;
use crate::endpoint::Endpoint;
use crate::error::CoreError;
use crate::field::{Decoder, FieldKind, FieldSpec};

const fn counter(key: &'static str, attr: &'static str) -> FieldSpec {
    FieldSpec::new(key, attr, FieldKind::Int).per_port().optional()
}

pub(crate) const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("rrb", "rx_rate", FieldKind::Int).per_port(),
    counter("trb", "tx_rate"),
    counter("rrp", "rx_packet_rate"),
    counter("trp", "tx_packet_rate"),
    counter("rb", "rx_bytes"),
    counter("rbh", "rx_bytes_high"),
    counter("tb", "tx_bytes"),
    counter("tbh", "tx_bytes_high"),
    counter("rtp", "rx_total_packets"),
    counter("ttp", "tx_total_packets"),
    counter("rup", "rx_unicast"),
    counter("ruph", "rx_unicast_high"),
    counter("tup", "tx_unicast"),
    counter("tuph", "tx_unicast_high"),
    counter("rbp", "rx_broadcast"),
    counter("rbph", "rx_broadcast_high"),
    counter("tbp", "tx_broadcast"),
    counter("tbph", "tx_broadcast_high"),
    counter("rmp", "rx_multicast"),
    counter("rmph", "rx_multicast_high"),
    counter("tmp", "tx_multicast"),
    counter("tmph", "tx_multicast_high"),
    counter("rpp", "rx_pause"),
    counter("rte", "rx_mac_errors"),
    counter("rfcs", "rx_fcs_errors"),
    counter("rae", "rx_jabber"),
    counter("rr", "rx_runts"),
    counter("fr", "rx_fragments"),
    counter("rov", "rx_overruns"),
    counter("tpp", "tx_pause"),
    counter("tur", "tx_underruns"),
    counter("tcl", "tx_collisions"),
    counter("tmc", "tx_multiple_collisions"),
    counter("tec", "tx_excessive_collisions"),
    counter("tlc", "tx_late_collisions"),
    counter("tdf", "tx_deferred"),
    counter("p64", "frames_64"),
    counter("p65", "frames_65_127"),
    counter("p128", "frames_128_255"),
    counter("p256", "frames_256_511"),
    counter("p512", "frames_512_1023"),
    counter("p1k", "frames_1024_max"),
];

/// Counter catalogue. The display name is also the field attribute.
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
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Counter {
    RxRate,
    TxRate,
    RxPacketRate,
    TxPacketRate,
    RxBytes,
    TxBytes,
    RxTotalPackets,
    TxTotalPackets,
    RxUnicast,
    TxUnicast,
    RxBroadcast,
    TxBroadcast,
    RxMulticast,
    TxMulticast,
    RxPause,
    RxMacErrors,
    RxFcsErrors,
    RxJabber,
    RxRunts,
    RxFragments,
    RxOverruns,
    TxPause,
    TxUnderruns,
    TxCollisions,
    TxMultipleCollisions,
    TxExcessiveCollisions,
    TxLateCollisions,
    TxDeferred,
    #[serde(rename = "frames_64")]
    #[strum(serialize = "frames_64")]
    Frames64,
    #[serde(rename = "frames_65_127")]
    #[strum(serialize = "frames_65_127")]
    Frames65To127,
    #[serde(rename = "frames_128_255")]
    #[strum(serialize = "frames_128_255")]
    Frames128To255,
    #[serde(rename = "frames_256_511")]
    #[strum(serialize = "frames_256_511")]
    Frames256To511,
    #[serde(rename = "frames_512_1023")]
    #[strum(serialize = "frames_512_1023")]
    Frames512To1023,
    #[serde(rename = "frames_1024_max")]
    #[strum(serialize = "frames_1024_max")]
    Frames1024Max,
}

impl Counter {
    pub fn attr(self) -> &'static str {
        self.into()
    }

    /// Attribute of the high word, for 64-bit counters.
    pub const fn high_attr(self) -> Option<&'static str> {
        match self {
            Self::RxBytes => Some("rx_bytes_high"),
            Self::TxBytes => Some("tx_bytes_high"),
            Self::RxUnicast => Some("rx_unicast_high"),
            Self::TxUnicast => Some("tx_unicast_high"),
            Self::RxBroadcast => Some("rx_broadcast_high"),
            Self::TxBroadcast => Some("tx_broadcast_high"),
            Self::RxMulticast => Some("rx_multicast_high"),
            Self::TxMulticast => Some("tx_multicast_high"),
            _ => None,
        }
    }
}

/// Counters of one port. Counters the firmware does not report are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortStats {
    pub counters: BTreeMap<Counter, u64>,
}

impl PortStats {
    pub fn get(&self, counter: Counter) -> Option<u64> {
        self.counters.get(&counter).copied()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortStatistics {
    pub ports: Vec<PortStats>,
}

impl Feature for PortStatistics {
    const ENDPOINT: Endpoint = Endpoint::Stats;

    fn decode(raw: &RawValue, cx: &Decoder<'_>) -> Result<Self, CoreError> {
        let f = cx.fields(raw)?;
        let count = f
            .len("rx_rate")?
            .ok_or_else(|| CoreError::missing(Self::ENDPOINT, "rx_rate", None))?;
        let f = f.with_port_count(count);

        let ports = (0..count)
            .map(|i| {
                let mut counters = BTreeMap::new();
                for counter in Counter::iter() {
                    let Some(low) = f.port_opt::<u32>(counter.attr(), i)? else {
                        continue;
                    };
                    let high = match counter.high_attr() {
                        Some(attr) => f.port::<u32>(attr, i)?,
                        None => 0,
                    };
                    counters.insert(counter, (u64::from(high) << 32) | u64::from(low));
                }
                Ok(PortStats { counters })
            })
            .collect::<Result<Vec<_>, CoreError>>()?;

        Ok(Self { ports })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::endpoint::DecodeContext;
    use crate::field::find_spec;
    use crate::overrides::KeyOverrides;

    #[test]
    fn every_counter_has_a_field() {
        for counter in Counter::iter() {
            assert!(find_spec(FIELDS, counter.attr()).is_some(), "{counter}");
            if let Some(high) = counter.high_attr() {
                assert!(find_spec(FIELDS, high).is_some(), "{high}");
            }
        }
    }

    #[test]
    fn combines_high_and_low_words() {
        let overrides = KeyOverrides::default();
        let cx = Decoder::new(Endpoint::Stats, &overrides, &DecodeContext::new());
        let raw = RawValue::parse(
            "{rrb:[0x10,0x0],rb:[0x5,0xffffffff],rbh:[0x1,0x0],rfcs:[0x0,0x3]}",
        )
        .unwrap();

        let stats = PortStatistics::decode(&raw, &cx).unwrap();
        assert_eq!(stats.ports.len(), 2);
        assert_eq!(stats.ports[0].get(Counter::RxBytes), Some(0x1_0000_0005));
        assert_eq!(stats.ports[1].get(Counter::RxBytes), Some(0xffff_ffff));
        assert_eq!(stats.ports[1].get(Counter::RxFcsErrors), Some(3));
        assert_eq!(stats.ports[0].get(Counter::TxBytes), None);
        assert_eq!(stats.ports[0].get(Counter::RxRate), Some(16));
    }
}
