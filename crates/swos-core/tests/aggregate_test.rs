#![allow(clippy::unwrap_used)]
// Aggregate a captured six-port snapshot into per-port views.

use pretty_assertions::assert_eq;
use serde_json::json;

use swos_core::{
    Codec, ConnectorType, Endpoint, FeatureSet, LinkStatus, RawSnapshot, RstpState, VlanMembership,
    VlanPortMode, aggregate,
};

const LINK: &str = "{en:0x3f,lnk:0x1e,dpx:0x2e,an:0x3f,\
nm:['506f727431','506f727432','506f727433','506f727434','506f727435','53465031'],\
spd:[0x2,0x2,0x2,0x2,0x1,0x3]}";

const SYS: &str = "{mac:'d4ca6d000001',sid:'3738393041424344',id:'6f66666963652d726f75746572',\
ver:'322e3136',brd:'4353533130362d35472d31532b',upt:0x0001e240,ip:0x0101a8c0,allp:0x3f}";

const FWD: &str = "{fp1:0x3e,fp2:0x3d,fp3:0x3b,fp4:0x37,fp5:0x2f,fp6:0x1f,lck:0x01,\
vlan:[0x01,0x01,0x01,0x01,0x01,0x01],dvid:[0x0001,0x0001,0x0001,0x0001,0x0001,0x0064]}";

const RSTP: &str = "{ena:0x3f,role:[0x3,0x3,0x2,0x0,0x0,0x3],lrn:0x27,fwd:0x23}";

const SFP: &str = "{vnd:'4d696b726f54696b',pnr:'532b3835444c43303344',ser:'5331323334',\
tmp:0x1e,vcc:0x80e8,tpw:0xfff6,rpw:0xffec}";

// VLAN 100 arrives before VLAN 1 on purpose.
const VLAN: &str = "[{vid:0x0064,nm:'6d676d74',mbr:0x21,prt:[0x2,0x3,0x3,0x3,0x3,0x1]},\
{vid:0x0001,mbr:0x3f,prt:[0x0,0x0,0x0,0x0,0x0,0x0]}]";

fn snapshot() -> RawSnapshot {
    [
        (Endpoint::Link, LINK),
        (Endpoint::Sys, SYS),
        (Endpoint::Fwd, FWD),
        (Endpoint::Rstp, RSTP),
        (Endpoint::Sfp, SFP),
        (Endpoint::Vlan, VLAN),
    ]
    .into_iter()
    .map(|(endpoint, text)| (endpoint, text.to_owned()))
    .collect()
}

#[test]
fn full_snapshot() {
    let state = Codec::new().aggregate_raw(&snapshot()).unwrap();

    assert_eq!(state.port_count(), 6);
    let summary = state.summary.as_ref().unwrap();
    assert_eq!(summary.identity, "office-router");

    let first = state.port(0).unwrap();
    assert_eq!((first.index, first.number), (0, 1));
    assert_eq!(first.name, "Port1");
    assert_eq!(first.connector, ConnectorType::Copper);
    assert!(first.sfp.is_none());
    assert!(first.forwarding.as_ref().unwrap().locked);
    assert_eq!(first.rstp.as_ref().unwrap().state, RstpState::Forwarding);
    assert!(first.system.as_ref().unwrap().allow_from);
    assert!(first.lag.is_none());
    assert!(first.stats.is_none());

    let cage = state.port(5).unwrap();
    assert_eq!(cage.connector, ConnectorType::Sfp);
    assert_eq!(cage.sfp.as_ref().unwrap().vendor, "MikroTik");
    assert_eq!(cage.forwarding.as_ref().unwrap().default_vlan_id, 100);
}

#[test]
fn vlan_memberships_are_ordered() {
    let state = Codec::new().aggregate_raw(&snapshot()).unwrap();

    assert_eq!(
        state.ports[0].vlans,
        [
            VlanMembership { vlan_id: 1, mode: VlanPortMode::LeaveAsIs },
            VlanMembership { vlan_id: 100, mode: VlanPortMode::AddIfMissing },
        ]
    );
    assert_eq!(
        state.ports[1].vlans,
        [VlanMembership { vlan_id: 1, mode: VlanPortMode::LeaveAsIs }]
    );
    assert_eq!(
        state.ports[5].vlans,
        [
            VlanMembership { vlan_id: 1, mode: VlanPortMode::LeaveAsIs },
            VlanMembership { vlan_id: 100, mode: VlanPortMode::AlwaysStrip },
        ]
    );
}

#[test]
fn link_only_snapshot_leaves_features_unset() {
    let mut raw = RawSnapshot::new();
    raw.insert(Endpoint::Link, LINK.to_owned());
    raw.insert(Endpoint::Sys, "{mac:'zz'}".to_owned());

    let state = Codec::new().aggregate_raw(&raw).unwrap();
    assert!(state.summary.is_none());
    for port in &state.ports {
        assert!(port.forwarding.is_none());
        assert!(port.rstp.is_none());
        assert!(port.system.is_none());
        assert!(port.vlans.is_empty());
    }
    // The name heuristic still applies without an SFP table.
    assert_eq!(state.ports[5].connector, ConnectorType::Sfp);
}

#[test]
fn broken_link_table_is_fatal() {
    let mut raw = snapshot();
    raw.insert(Endpoint::Link, "{en:0x3f".to_owned());
    let err = Codec::new().aggregate_raw(&raw).unwrap_err();
    assert!(err.is_malformed());
}

#[test]
fn decoded_features_aggregate_the_same() {
    let codec = Codec::new();
    let links: LinkStatus = codec
        .decode_feature(LINK, &swos_core::DecodeContext::new())
        .unwrap();
    let ctx = swos_core::DecodeContext::with_ports(links.port_count());

    let mut features = FeatureSet::new(links);
    features.sfp = Some(codec.decode_feature(SFP, &ctx).unwrap());
    features.vlans = Some(codec.decode_feature(VLAN, &ctx).unwrap());

    let state = aggregate(&features);
    let view: Vec<_> = state
        .ports
        .iter()
        .map(|p| json!({ "number": p.number, "connector": p.connector, "vlans": p.vlans.len() }))
        .collect();

    insta::assert_json_snapshot!(view, @r#"
    [
      {
        "connector": "copper",
        "number": 1,
        "vlans": 2
      },
      {
        "connector": "copper",
        "number": 2,
        "vlans": 1
      },
      {
        "connector": "copper",
        "number": 3,
        "vlans": 1
      },
      {
        "connector": "copper",
        "number": 4,
        "vlans": 1
      },
      {
        "connector": "copper",
        "number": 5,
        "vlans": 1
      },
      {
        "connector": "sfp",
        "number": 6,
        "vlans": 2
      }
    ]
    "#);
}
