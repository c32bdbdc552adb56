// ── Key overrides ──
//
// Firmware revisions do not always agree on which device key carries which
// attribute. Overrides remap an (endpoint, attribute) pair to another key
// for both decode and encode, without touching the field tables.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::endpoint::Endpoint;
use crate::error::CoreError;
use crate::field::find_spec;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct KeyOverrides {
    keys: BTreeMap<Endpoint, BTreeMap<String, String>>,
}

impl KeyOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `attr` on `endpoint` to device key `key`.
    ///
    /// The attribute must exist in the endpoint's field table and the key
    /// must be a bare identifier the write syntax can spell.
    pub fn insert(
        &mut self,
        endpoint: Endpoint,
        attr: &str,
        key: impl Into<String>,
    ) -> Result<(), CoreError> {
        let key = key.into();
        if find_spec(endpoint.fields(), attr).is_none() {
            return Err(CoreError::unsupported(
                endpoint,
                attr,
                "cannot override an attribute that is not in the field table",
            ));
        }
        if key.is_empty() || !key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
            return Err(CoreError::unsupported(
                endpoint,
                attr,
                format!("override key '{key}' is not a bare identifier"),
            ));
        }

        tracing::debug!(%endpoint, attr, key = %key, "registered key override");
        self.keys
            .entry(endpoint)
            .or_default()
            .insert(attr.to_owned(), key);
        Ok(())
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(
        mut self,
        endpoint: Endpoint,
        attr: &str,
        key: impl Into<String>,
    ) -> Result<Self, CoreError> {
        self.insert(endpoint, attr, key)?;
        Ok(self)
    }

    /// The overriding key for an attribute, if one is registered.
    pub fn key(&self, endpoint: Endpoint, attr: &str) -> Option<&str> {
        self.keys
            .get(&endpoint)
            .and_then(|attrs| attrs.get(attr))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.values().all(BTreeMap::is_empty)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Endpoint, &str, &str)> {
        self.keys.iter().flat_map(|(endpoint, attrs)| {
            attrs
                .iter()
                .map(move |(attr, key)| (*endpoint, attr.as_str(), key.as_str()))
        })
    }
}

// Deserialized entries go through `insert`, so a loaded set is as
// validated as a built one.
impl<'de> Deserialize<'de> for KeyOverrides {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<Endpoint, BTreeMap<String, String>>::deserialize(deserializer)?;
        let mut overrides = Self::new();
        for (endpoint, attrs) in raw {
            for (attr, key) in attrs {
                overrides
                    .insert(endpoint, &attr, key)
                    .map_err(serde::de::Error::custom)?;
            }
        }
        Ok(overrides)
    }
}
