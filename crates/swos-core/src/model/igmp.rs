// ── IGMP groups (`/!igmp.b`) ──
//
// Group addresses are the one big-endian IPv4 field on the switch.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};
use swos_wire::RawValue;

use crate::codec::Feature;
use crate::endpoint::Endpoint;
use crate::error::CoreError;
use crate::field::{ByteOrder, Decoder, FieldKind, FieldSpec};

pub(crate) const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("addr", "group", FieldKind::Ipv4(ByteOrder::Big)),
    FieldSpec::new("vlan", "vlan_id", FieldKind::Int).optional(),
    FieldSpec::new("prts", "members", FieldKind::Bitmask),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgmpGroup {
    pub group: Ipv4Addr,
    pub vlan_id: u32,
    pub members: Vec<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgmpTable {
    pub groups: Vec<IgmpGroup>,
}

impl Feature for IgmpTable {
    const ENDPOINT: Endpoint = Endpoint::Igmp;

    fn decode(raw: &RawValue, cx: &Decoder<'_>) -> Result<Self, CoreError> {
        let count = cx.require_port_count()?;
        let groups = cx
            .entries(raw)?
            .into_iter()
            .map(|record| {
                let f = cx.record(record).with_port_count(count);
                Ok(IgmpGroup {
                    group: f.get("group")?,
                    vlan_id: f.get("vlan_id")?,
                    members: f.get("members")?,
                })
            })
            .collect::<Result<Vec<_>, CoreError>>()?;

        Ok(Self { groups })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::endpoint::DecodeContext;
    use crate::overrides::KeyOverrides;

    #[test]
    fn group_address_is_big_endian() {
        let overrides = KeyOverrides::default();
        let cx = Decoder::new(Endpoint::Igmp, &overrides, &DecodeContext::with_ports(4));
        let raw = RawValue::parse("[{addr:0xeffffffa,vlan:0x1,prts:0x5}]").unwrap();

        let table = IgmpTable::decode(&raw, &cx).unwrap();
        let group = &table.groups[0];
        assert_eq!(group.group, Ipv4Addr::new(239, 255, 255, 250));
        assert_eq!(group.members, [true, false, true, false]);
    }
}
