#![allow(clippy::unwrap_used)]
// Decode captured switch responses through the public codec and save them
// back, the way a load/edit/save cycle would.

use std::net::Ipv4Addr;

use insta::assert_snapshot;
use pretty_assertions::assert_eq;

use swos_core::{
    AddressAcquisition, Codec, ComboMode, ConnectorType, CoreError, DecodeContext, Decoded,
    Endpoint, ErrorKind, Forwarding, KeyOverrides, LinkSpeed, LinkStatus, RawSnapshot, RstpRole,
    RstpState, RstpStatus, SfpStatus, SystemStatus, VlanMode, VlanPortMode, VlanTable,
};

// ── Fixtures ────────────────────────────────────────────────────────

// CSS106-5G-1S, five copper ports and one cage.
const LINK: &str = r#"{en:"0x3f",lnk:"0x1e",dpx:"0x2e",dpxc:"0x3f",fct:"0x3f",an:"0x3f",poe:["0x0","0x0","0x0","0x0","0x0","0x0"],spdc:["0x0","0x0","0x0","0x0","0x0","0x0"],nm:["506f7274310a","506f7274320a","506f7274330a","506f7274340a","506f7274350a","5366700a"],spd:["0x2","0x2","0x2","0x2","0x1","0x3"]}"#;

const SYS: &str = "{mac:'d4ca6d000001',sid:'3738393041424344',id:'6f66666963652d726f75746572',\
ver:'322e3136',brd:'4353533130362d35472d31532b',upt:0x0001e240,ip:0x0101a8c0,sip:0x0101a8c0,\
iptp:0x01,alla:0x00,allm:0x00,avln:0x00,allp:0x3f,wdt:0x01,dsc:0x01,pdsc:0x3f,ivl:0x00,\
igmp:0x00,igfl:0x00,lcbl:0x00,prio:0x8000,cost:0x00,volt:0xf0,temp:0x2a}";

const FWD: &str = "{fp1:0x3e,fp2:0x3d,fp3:0x3b,fp4:0x37,fp5:0x2f,fp6:0x1f,lck:0x00,lckf:0x00,\
imr:0x00,omr:0x00,mrto:0x01,vlan:[0x01,0x01,0x01,0x01,0x01,0x01],\
vlni:[0x00,0x00,0x00,0x00,0x00,0x00],dvid:[0x0001,0x0001,0x0001,0x0001,0x0001,0x0064],fvid:0x00}";

const RSTP: &str = "{ena:0x3f,role:[0x3,0x3,0x2,0x0,0x0,0x3],lrn:0x27,fwd:0x23,\
cst:[0x4e20,0x4e20,0x4e20,0x4e20,0x4e20,0x7d0],p2p:[0x1,0x1,0x1,0x0,0x0,0x2]}";

const SFP_SINGLE: &str = "{vnd:'4d696b726f54696b',pnr:'532b3835444c43303344',ser:'5331323334',\
tmp:0x1e,vcc:0x80e8,tpw:0xfff6,rpw:0xffec}";

const SFP_ARRAY: &str = "{vnd:['4d696b726f54696b',''],pnr:['532b3835444c43303344',''],\
ser:['5331323334',''],tmp:[0x1e,0x0],vcc:[0x80e8,0x0],tpw:[0xfff6,0x0],rpw:[0xffec,0x0]}";

const VLAN: &str = "[{vid:0x0001,nm:'64656661756c74',ivl:0x00,igmp:0x00,mbr:0x3f,\
prt:[0x0,0x0,0x0,0x0,0x0,0x0]},{vid:0x0064,nm:'6d676d74',ivl:0x00,igmp:0x01,mbr:0x21,\
prt:[0x2,0x3,0x3,0x3,0x3,0x1]}]";

// Three ports with empty array slots and combo/QSFP codes newer than the
// known tables.
const LINK_HOLES: &str = "{nm:['506f727431',,'53465033'],en:0x7,lnk:0x1,\
spd:[0x2,,0x3],cm:[,0x7,0x0],qtyp:[,,0x9]}";

// Two cages, the first one empty.
const SFP_HOLES: &str = "{vnd:[,'4d696b726f54696b'],pnr:[,'532b3835444c43303344'],\
ser:[,'5331323334'],tmp:[0x0,0x1e],vcc:[0x0,0x80e8],tpw:[0x0,0xfff6],rpw:[0x0,0xffec]}";

/// A 26-port forwarding table where every port forwards to all others.
fn fwd_26() -> String {
    let n = 26;
    let all: u32 = (1 << n) - 1;
    let mut parts: Vec<String> = (0..n)
        .map(|i| format!("fp{}:0x{:08x}", i + 1, all & !(1 << i)))
        .collect();
    parts.push("lck:0x00000000".into());
    parts.push(format!("vlan:[{}]", vec!["0x02"; n].join(",")));
    parts.push(format!("dvid:[{}]", vec!["0x0001"; n].join(",")));
    format!("{{{}}}", parts.join(","))
}

fn six_ports() -> DecodeContext {
    DecodeContext::with_ports(6)
}

// ── Decode ──────────────────────────────────────────────────────────

#[test]
fn link_defines_the_port_count() {
    let link: LinkStatus = Codec::new()
        .decode_feature(LINK, &DecodeContext::new())
        .unwrap();

    assert_eq!(link.port_count(), 6);
    assert_eq!(link.ports[0].name, "Port1\n");
    assert_eq!(link.ports[5].name, "Sfp\n");

    let up: Vec<bool> = link.ports.iter().map(|p| p.link_up).collect();
    assert_eq!(up, [false, true, true, true, true, false]);
    let full_duplex: Vec<bool> = link.ports.iter().map(|p| p.duplex).collect();
    assert_eq!(full_duplex, [false, true, true, true, false, true]);

    assert_eq!(link.ports[0].link_speed(), Some(LinkSpeed::Gbps1));
    assert_eq!(link.ports[5].link_speed(), Some(LinkSpeed::Gbps10));
    assert_eq!(link.ports[0].poe_mode, Some(0));
    assert_eq!(link.ports[0].combo_mode, None);
}

#[test]
fn system_identity_and_addresses() {
    let sys: SystemStatus = Codec::new().decode_feature(SYS, &six_ports()).unwrap();
    let device = &sys.device;

    assert_eq!(device.identity, "office-router");
    assert_eq!(device.version, "2.16");
    assert_eq!(device.board, "CSS106-5G-1S+");
    assert_eq!(device.serial, "7890ABCD");
    assert_eq!(device.mac.to_string(), "d4:ca:6d:00:00:01");
    assert_eq!(device.uptime, 123_456);
    assert_eq!(device.ip, Ipv4Addr::new(192, 168, 1, 1));
    assert_eq!(device.address_acquisition, AddressAcquisition::Static);
    assert_eq!(device.bridge_priority, 0x8000);
    assert_eq!(device.temperature, Some(42));
    assert_eq!(device.igmp_querier, None);

    assert_eq!(sys.ports.len(), 6);
    assert!(sys.ports.iter().all(|p| p.allow_from));
    assert_eq!(sys.ports[0].trusted, None);
    assert_eq!(sys.ports[0].igmp_fast_leave, Some(false));
}

#[test]
fn system_without_port_count_is_refused() {
    let err = Codec::new()
        .decode("sys", SYS, &DecodeContext::new())
        .unwrap_err();
    assert!(matches!(err, CoreError::PortCountRequired { endpoint: Endpoint::Sys }));
    assert!(err.is_programmer_error());
}

#[test]
fn forwarding_six_ports() {
    let fwd: Forwarding = Codec::new().decode_feature(FWD, &six_ports()).unwrap();

    assert_eq!(fwd.ports.len(), 6);
    assert_eq!(fwd.ports[0].forward_to, [false, true, true, true, true, true]);
    assert_eq!(fwd.ports[5].forward_to, [true, true, true, true, true, false]);
    assert_eq!(fwd.ports[5].default_vlan_id, 100);
    assert_eq!(fwd.ports[0].vlan_mode, VlanMode::Optional);
    assert_eq!(fwd.ports[0].lock_first, Some(false));
    assert_eq!(fwd.ports[0].storm_rate, None);
    assert_eq!(fwd.mirror_to, Some(1));
}

#[test]
fn forwarding_twenty_six_ports() {
    let fwd: Forwarding = Codec::new()
        .decode_feature(&fwd_26(), &DecodeContext::with_ports(26))
        .unwrap();

    assert_eq!(fwd.ports.len(), 26);
    let last = &fwd.ports[25];
    assert_eq!(last.forward_to.len(), 26);
    assert!(!last.forward_to[25]);
    assert!(last.forward_to[..25].iter().all(|&b| b));
    assert_eq!(last.vlan_mode, VlanMode::Enabled);
    assert_eq!(fwd.mirror_to, None);
}

#[test]
fn forwarding_keys_follow_overrides() {
    // Firmware that reports the VLAN mode under `vlnm`.
    let overrides = KeyOverrides::new()
        .with(Endpoint::Fwd, "vlan_mode", "vlnm")
        .unwrap();
    let text = "{fp1:0x2,fp2:0x1,lck:0x0,vlnm:[0x3,0x3],dvid:[0x1,0x1]}";

    let fwd: Forwarding = Codec::with_overrides(overrides)
        .decode_feature(text, &DecodeContext::with_ports(2))
        .unwrap();
    assert_eq!(fwd.ports[1].vlan_mode, VlanMode::Strict);
}

#[test]
fn rstp_roles_and_states() {
    let rstp: RstpStatus = Codec::new().decode_feature(RSTP, &six_ports()).unwrap();

    assert_eq!(rstp.ports.len(), 6);
    assert_eq!(rstp.ports[2].role, RstpRole::Root);
    assert_eq!(rstp.ports[0].state, RstpState::Forwarding);
    assert_eq!(rstp.ports[2].state, RstpState::Learning);
    assert_eq!(rstp.ports[3].state, RstpState::Discarding);
    assert_eq!(rstp.ports[5].cost, Some(2000));
    assert!(rstp.enabled());
}

#[test]
fn sfp_single_cage_scalars() {
    let sfp: SfpStatus = Codec::new()
        .decode_feature(SFP_SINGLE, &DecodeContext::new())
        .unwrap();

    assert_eq!(sfp.modules.len(), 1);
    let module = &sfp.modules[0];
    assert_eq!(module.vendor, "MikroTik");
    assert_eq!(module.part_number, "S+85DLC03D");
    assert_eq!(module.serial, "S1234");
    assert_eq!(module.temperature, 30);
    assert_eq!(module.tx_power, -10);
    assert_eq!(module.rx_power, -20);
}

#[test]
fn sfp_multi_cage_lists() {
    let sfp: SfpStatus = Codec::new()
        .decode_feature(SFP_ARRAY, &DecodeContext::new())
        .unwrap();

    assert_eq!(sfp.modules.len(), 2);
    assert_eq!(sfp.modules[0].vendor, "MikroTik");
    assert_eq!(sfp.modules[1].vendor, "");
    assert_eq!(sfp.modules[1].tx_power, 0);
}

#[test]
fn link_with_array_holes_and_unknown_codes() {
    let link: LinkStatus = Codec::new()
        .decode_feature(LINK_HOLES, &DecodeContext::new())
        .unwrap();

    let names: Vec<&str> = link.ports.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Port1", "", "SFP3"]);
    let speeds: Vec<Option<u32>> = link.ports.iter().map(|p| p.speed).collect();
    assert_eq!(speeds, [Some(2), None, Some(3)]);

    let combo: Vec<Option<u32>> = link.ports.iter().map(|p| p.combo_mode).collect();
    assert_eq!(combo, [None, Some(7), Some(0)]);
    assert_eq!(link.ports[1].combo_mode(), None);
    assert_eq!(link.ports[2].combo_mode(), Some(ComboMode::Auto));
    assert_eq!(link.ports[2].qsfp_type, Some(9));
    assert_eq!(link.ports[2].qsfp_type(), None);
}

#[test]
fn sfp_with_empty_cage_slots() {
    let sfp: SfpStatus = Codec::new()
        .decode_feature(SFP_HOLES, &DecodeContext::new())
        .unwrap();

    assert_eq!(sfp.modules.len(), 2);
    assert_eq!(sfp.modules[0].vendor, "");
    assert_eq!(sfp.modules[0].serial, "");
    assert_eq!(sfp.modules[1].vendor, "MikroTik");
    assert_eq!(sfp.modules[1].tx_power, -10);
}

#[test]
fn unknown_combo_code_still_aggregates() {
    let mut raw = RawSnapshot::new();
    raw.insert(Endpoint::Link, LINK_HOLES.to_owned());
    raw.insert(Endpoint::Sfp, SFP_HOLES.to_owned());

    let state = Codec::new().aggregate_raw(&raw).unwrap();
    let connectors: Vec<ConnectorType> = state.ports.iter().map(|p| p.connector).collect();
    assert_eq!(
        connectors,
        [ConnectorType::Copper, ConnectorType::Combo, ConnectorType::Combo]
    );
    assert!(state.ports[0].sfp.is_none());
    assert_eq!(state.ports[1].sfp.as_ref().unwrap().vendor, "");
    assert_eq!(state.ports[2].sfp.as_ref().unwrap().vendor, "MikroTik");
}

#[test]
fn vlan_table() {
    let vlans: VlanTable = Codec::new().decode_feature(VLAN, &six_ports()).unwrap();

    assert_eq!(vlans.vlans.len(), 2);
    let mgmt = vlans.get(100).unwrap();
    assert_eq!(mgmt.name.as_deref(), Some("mgmt"));
    assert!(mgmt.igmp_snooping);
    assert_eq!(mgmt.members, [true, false, false, false, false, true]);
    assert_eq!(mgmt.port_modes[0], VlanPortMode::AddIfMissing);
    assert_eq!(mgmt.port_modes[5], VlanPortMode::AlwaysStrip);
}

#[test]
fn dispatch_returns_matching_variant() {
    let decoded = Codec::new().decode("/vlan.b", VLAN, &six_ports()).unwrap();
    assert!(matches!(decoded, Decoded::Vlan(ref t) if t.vlans.len() == 2));
}

#[test]
fn unrepairable_responses_never_default() {
    let codec = Codec::new();
    for (endpoint, text) in [
        ("link", "{en:0x3f,nm:['50']"),
        ("sys", "{mac:'d4ca6d000001',,}"),
        ("vlan", "[{vid:0x1]"),
    ] {
        let err = codec.decode(endpoint, text, &six_ports()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse, "{endpoint}: {text}");
    }
}

#[test]
fn bad_field_fails_the_whole_record() {
    let err = Codec::new()
        .decode("fwd", "{fp1:0x2,fp2:0x1,lck:0xZZ,vlan:[0x1,0x1],dvid:[0x1,0x1]}", &DecodeContext::with_ports(2))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidNumeric);
    assert_eq!(err.endpoint(), Some(Endpoint::Fwd));
}

// ── Save ────────────────────────────────────────────────────────────

#[test]
fn system_save_after_rename() {
    let codec = Codec::new();
    let mut sys: SystemStatus = codec.decode_feature(SYS, &six_ports()).unwrap();
    sys.device.identity = "core-sw".into();

    let text = codec.encode(&sys, &six_ports()).unwrap();
    assert_snapshot!(text, @"{iptp:0x1,sip:0x101A8C0,id:'636f72652d7377',alla:0x0,allm:0x0,allp:0x3F,avln:0x0,ivl:0x00,igmp:0x00,igfl:0x0,pdsc:0x3F,wdt:0x01,dsc:0x01,lcbl:0x00,prio:0x8000,cost:0x0}");
}

#[test]
fn forwarding_save() {
    let codec = Codec::new();
    let fwd: Forwarding = codec.decode_feature(FWD, &six_ports()).unwrap();

    let text = codec.encode(&fwd, &six_ports()).unwrap();
    assert_snapshot!(text, @"{fp1:0x3E,fp2:0x3D,fp3:0x3B,fp4:0x37,fp5:0x2F,fp6:0x1F,lck:0x0,lckf:0x0,imr:0x0,omr:0x0,fvid:0x0,mrto:0x1,vlan:[0x1,0x1,0x1,0x1,0x1,0x1],vlni:[0x0,0x0,0x0,0x0,0x0,0x0],dvid:[0x1,0x1,0x1,0x1,0x1,0x64]}");
}

#[test]
fn rstp_save_disables_every_port() {
    let codec = Codec::new();
    let mut rstp: RstpStatus = codec.decode_feature(RSTP, &six_ports()).unwrap();
    rstp.set_enabled(false);

    assert_snapshot!(codec.encode(&rstp, &six_ports()).unwrap(), @"{ena:0x0}");
}

#[test]
fn saved_text_decodes_to_the_same_record() {
    let codec = Codec::new();
    let fwd: Forwarding = codec.decode_feature(FWD, &six_ports()).unwrap();
    let text = codec.encode(&fwd, &six_ports()).unwrap();

    let reloaded: Forwarding = codec.decode_feature(&text, &six_ports()).unwrap();
    assert_eq!(reloaded, fwd);
}
