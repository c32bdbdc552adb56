// ── SNMP (`/snmp.b`) ──

use serde::{Deserialize, Serialize};
use swos_wire::{RawValue, WireValue};

use crate::codec::{Feature, Writable};
use crate::endpoint::Endpoint;
use crate::error::CoreError;
use crate::field::{Decoder, Encoder, FieldKind, FieldSpec};

pub(crate) const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("en", "enabled", FieldKind::Flag).writable(),
    FieldSpec::new("com", "community", FieldKind::HexText)
        .optional()
        .writable(),
    FieldSpec::new("ci", "contact", FieldKind::HexText)
        .optional()
        .writable(),
    FieldSpec::new("loc", "location", FieldKind::HexText)
        .optional()
        .writable(),
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnmpSettings {
    pub enabled: bool,
    pub community: String,
    pub contact: String,
    pub location: String,
}

impl Feature for SnmpSettings {
    const ENDPOINT: Endpoint = Endpoint::Snmp;

    fn decode(raw: &RawValue, cx: &Decoder<'_>) -> Result<Self, CoreError> {
        let f = cx.fields(raw)?;
        Ok(Self {
            enabled: f.get("enabled")?,
            community: f.get("community")?,
            contact: f.get("contact")?,
            location: f.get("location")?,
        })
    }
}

impl Writable for SnmpSettings {
    fn encode(&self, cx: &Encoder<'_>) -> Result<WireValue, CoreError> {
        let mut w = cx.writer();
        w.set("enabled", self.enabled)?;
        w.set("community", self.community.as_str())?;
        w.set("contact", self.contact.as_str())?;
        w.set("location", self.location.as_str())?;
        Ok(w.finish())
    }
}
