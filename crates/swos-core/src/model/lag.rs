// ── Link aggregation (`/lacp.b`) ──

use serde::{Deserialize, Serialize};
use swos_wire::{MacAddress, RawValue};

use super::codes::LacpMode;
use crate::codec::Feature;
use crate::endpoint::Endpoint;
use crate::error::CoreError;
use crate::field::{Decoder, FieldKind, FieldSpec};

pub(crate) const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("mode", "mode", FieldKind::Int).per_port(),
    FieldSpec::new("grp", "group", FieldKind::Int).per_port().optional(),
    FieldSpec::new("sgrp", "secondary_group", FieldKind::Int)
        .per_port()
        .optional(),
    FieldSpec::new("mac", "partner", FieldKind::Mac).per_port().optional(),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LagPort {
    pub mode: LacpMode,
    /// Trunk group the port belongs to.
    pub group: Option<u32>,
    pub secondary_group: Option<u32>,
    /// LACP partner system MAC.
    pub partner: Option<MacAddress>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LagStatus {
    pub ports: Vec<LagPort>,
}

impl Feature for LagStatus {
    const ENDPOINT: Endpoint = Endpoint::Lag;

    fn decode(raw: &RawValue, cx: &Decoder<'_>) -> Result<Self, CoreError> {
        let f = cx.fields(raw)?;
        let count = f.len("mode")?.unwrap_or(0);
        let f = f.with_port_count(count);

        let ports = (0..count)
            .map(|i| {
                Ok(LagPort {
                    mode: f.port("mode", i)?,
                    group: f.port_opt("group", i)?,
                    secondary_group: f.port_opt("secondary_group", i)?,
                    partner: f.port_opt("partner", i)?,
                })
            })
            .collect::<Result<Vec<_>, CoreError>>()?;

        Ok(Self { ports })
    }
}
