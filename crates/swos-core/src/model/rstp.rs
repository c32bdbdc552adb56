// ── RSTP (`/rstp.b`) ──

use serde::{Deserialize, Serialize};
use swos_wire::{RawValue, WireValue};

use super::codes::{RstpPortType, RstpRole, RstpState};
use crate::codec::{Feature, Writable};
use crate::endpoint::Endpoint;
use crate::error::CoreError;
use crate::field::{Decoder, Encoder, FieldKind, FieldSpec};

pub(crate) const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("ena", "enabled", FieldKind::Bitmask).writable(),
    FieldSpec::new("role", "role", FieldKind::Int).per_port(),
    FieldSpec::new("lrn", "learning", FieldKind::Bitmask).optional(),
    FieldSpec::new("fwd", "forwarding", FieldKind::Bitmask).optional(),
    FieldSpec::new("cst", "cost", FieldKind::Int).per_port().optional(),
    FieldSpec::new("prio", "priority", FieldKind::Int)
        .per_port()
        .optional(),
    FieldSpec::new("p2p", "port_type", FieldKind::Int)
        .per_port()
        .optional(),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RstpPort {
    pub enabled: bool,
    pub role: RstpRole,
    pub state: RstpState,
    pub cost: Option<u32>,
    pub priority: Option<u32>,
    pub port_type: Option<RstpPortType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RstpStatus {
    pub ports: Vec<RstpPort>,
}

impl RstpStatus {
    /// RSTP counts as on when any port has it enabled.
    pub fn enabled(&self) -> bool {
        self.ports.iter().any(|p| p.enabled)
    }

    /// Switch RSTP on or off for every port.
    pub fn set_enabled(&mut self, enabled: bool) {
        for port in &mut self.ports {
            port.enabled = enabled;
        }
    }
}

impl Feature for RstpStatus {
    const ENDPOINT: Endpoint = Endpoint::Rstp;

    fn decode(raw: &RawValue, cx: &Decoder<'_>) -> Result<Self, CoreError> {
        let f = cx.fields(raw)?;
        let count = match f.len("role")? {
            Some(count) => count,
            None => cx
                .port_count()
                .ok_or_else(|| CoreError::missing(Self::ENDPOINT, "role", None))?,
        };
        let f = f.with_port_count(count);

        let ports = (0..count)
            .map(|i| {
                Ok(RstpPort {
                    enabled: f.port("enabled", i)?,
                    role: f.port("role", i)?,
                    state: RstpState::from_bits(f.port("learning", i)?, f.port("forwarding", i)?),
                    cost: f.port_opt("cost", i)?,
                    priority: f.port_opt("priority", i)?,
                    port_type: f.port_opt("port_type", i)?,
                })
            })
            .collect::<Result<Vec<_>, CoreError>>()?;

        Ok(Self { ports })
    }
}

impl Writable for RstpStatus {
    fn encode(&self, cx: &Encoder<'_>) -> Result<WireValue, CoreError> {
        let mut w = cx.writer();
        w.set_ports("enabled", self.ports.iter().map(|p| p.enabled))?;
        Ok(w.finish())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use insta::assert_snapshot;

    use super::*;
    use crate::endpoint::DecodeContext;
    use crate::overrides::KeyOverrides;

    fn decode(text: &str, ctx: &DecodeContext) -> Result<RstpStatus, CoreError> {
        let overrides = KeyOverrides::default();
        let cx = Decoder::new(Endpoint::Rstp, &overrides, ctx);
        RstpStatus::decode(&RawValue::parse(text).unwrap(), &cx)
    }

    #[test]
    fn state_from_learning_and_forwarding_masks() {
        let rstp = decode(
            "{ena:0x3,role:[0x2,0x3,0x1],lrn:0x6,fwd:0x2,p2p:[0x1,0x2,0x0]}",
            &DecodeContext::new(),
        )
        .unwrap();

        let states: Vec<_> = rstp.ports.iter().map(|p| p.state).collect();
        assert_eq!(
            states,
            [RstpState::Discarding, RstpState::Forwarding, RstpState::Learning]
        );
        assert_eq!(rstp.ports[0].role, RstpRole::Root);
        assert_eq!(rstp.ports[1].port_type, Some(RstpPortType::Edge));
        assert!(rstp.enabled());
    }

    #[test]
    fn port_count_from_roles_or_context() {
        let rstp = decode("{ena:0x0,role:[0x3]}", &DecodeContext::with_ports(2)).unwrap();
        assert_eq!(rstp.ports.len(), 1);

        let err = decode("{ena:0x0}", &DecodeContext::with_ports(2)).unwrap_err();
        assert!(matches!(err, CoreError::FieldMissing { index: Some(0), .. }));
    }

    #[test]
    fn save_writes_only_the_enable_mask() {
        let mut rstp = decode("{ena:0x0,role:[0x3,0x3,0x3]}", &DecodeContext::new()).unwrap();
        rstp.set_enabled(true);

        let overrides = KeyOverrides::default();
        let cx = Encoder::new(Endpoint::Rstp, &overrides, &DecodeContext::with_ports(3));
        assert_snapshot!(rstp.encode(&cx).unwrap().to_wire().unwrap(), @"{ena:0x7}");
    }
}
