//! Configuration for the SwOS codec.
//!
//! A TOML file (plus `SWOS_` environment overrides) that remaps device keys
//! per endpoint, for firmware that renamed a field. The file is validated
//! against the core field tables and turned into a
//! [`KeyOverrides`](swos_core::KeyOverrides) / [`Codec`](swos_core::Codec).
//!
//! ```toml
//! [fields.fwd]
//! vlan_mode = "vlan"
//! default_vlan_id = "dvid"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use swos_core::{Codec, CoreError, Endpoint, KeyOverrides};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A `[fields]` entry names an unknown endpoint or attribute, or a key
    /// the write syntax cannot spell.
    #[error("invalid override {field}: {source}")]
    InvalidOverride {
        field: String,
        #[source]
        source: CoreError,
    },

    #[error("failed to load config: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("failed to encode config: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    fn write(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Write {
            path: path.to_owned(),
            source,
        }
    }
}

// ── TOML config ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Key overrides: endpoint name, then attribute name to device key.
    #[serde(default)]
    pub fields: BTreeMap<String, BTreeMap<String, String>>,
}

impl Config {
    /// Snapshot an existing override set, e.g. before saving it.
    pub fn from_overrides(overrides: &KeyOverrides) -> Self {
        let mut fields: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        for (endpoint, attr, key) in overrides.iter() {
            fields
                .entry(endpoint.to_string())
                .or_default()
                .insert(attr.to_owned(), key.to_owned());
        }
        Self { fields }
    }

    /// Validate every entry against the core field tables.
    pub fn key_overrides(&self) -> Result<KeyOverrides, ConfigError> {
        let mut overrides = KeyOverrides::new();
        for (name, attrs) in &self.fields {
            let endpoint =
                Endpoint::from_identifier(name).map_err(|source| ConfigError::InvalidOverride {
                    field: format!("fields.{name}"),
                    source,
                })?;
            for (attr, key) in attrs {
                overrides
                    .insert(endpoint, attr, key.as_str())
                    .map_err(|source| ConfigError::InvalidOverride {
                        field: format!("fields.{name}.{attr}"),
                        source,
                    })?;
            }
        }
        Ok(overrides)
    }

    /// A codec carrying this configuration's overrides.
    pub fn codec(&self) -> Result<Codec, ConfigError> {
        self.key_overrides().map(Codec::with_overrides)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "swos", "swos").map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("swos");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load from the canonical path plus environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` plus environment. A missing file is not an error.
///
/// Environment keys nest on `__`: `SWOS_FIELDS__FWD__VLAN_MODE=vlnm`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SWOS_").split("__"));

    let config: Config = figment.extract().map_err(Box::new)?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(ConfigError::write(path))?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str).map_err(ConfigError::write(path))?;
    debug!(path = %path.display(), "saved config");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn file_and_env_merge() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "swos.toml",
                r#"
                [fields.fwd]
                vlan_mode = "vlan"
                default_vlan_id = "pvid"
                "#,
            )?;
            jail.set_env("SWOS_FIELDS__SYS__IDENTITY", "name");

            let config = load_config_from(Path::new("swos.toml")).map_err(|e| e.to_string())?;
            assert_eq!(config.fields["fwd"]["default_vlan_id"], "pvid");
            assert_eq!(config.fields["sys"]["identity"], "name");

            let overrides = config.key_overrides().map_err(|e| e.to_string())?;
            assert_eq!(overrides.key(Endpoint::Fwd, "default_vlan_id"), Some("pvid"));
            assert_eq!(overrides.key(Endpoint::Sys, "identity"), Some("name"));
            Ok(())
        });
    }

    #[test]
    fn missing_file_gives_defaults() {
        Jail::expect_with(|_| {
            let config = load_config_from(Path::new("absent.toml")).map_err(|e| e.to_string())?;
            assert_eq!(config, Config::default());
            assert!(config.key_overrides().map_err(|e| e.to_string())?.is_empty());
            Ok(())
        });
    }

    #[test]
    fn unknown_endpoint_is_rejected() {
        let mut config = Config::default();
        config
            .fields
            .entry("acl".into())
            .or_default()
            .insert("rules".into(), "r".into());

        let err = config.key_overrides().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidOverride { ref field, source: CoreError::UnknownEndpoint(_) }
                if field == "fields.acl"
        ));
    }

    #[test]
    fn unknown_attribute_and_bad_key_are_rejected() {
        for (attr, key) in [("colour", "c"), ("vlan_mode", ""), ("vlan_mode", "vl an")] {
            let mut config = Config::default();
            config
                .fields
                .entry("fwd".into())
                .or_default()
                .insert(attr.into(), key.into());

            let err = config.codec().unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidOverride { ref field, .. } if *field == format!("fields.fwd.{attr}")),
                "{attr}={key:?}"
            );
        }
    }

    #[test]
    fn write_failure_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "").unwrap();
        let path = blocker.join("config.toml");

        let err = save_config_to(&Config::default(), &path).unwrap_err();
        assert!(matches!(err, ConfigError::Write { path: ref p, .. } if *p == path));
    }

    #[test]
    fn save_then_load() {
        // Inside a jail so no SWOS_ variables from other tests leak in.
        Jail::expect_with(|_| {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("nested").join("config.toml");

            let overrides = KeyOverrides::new()
                .with(Endpoint::Link, "name", "nm2")
                .unwrap();
            let config = Config::from_overrides(&overrides);
            save_config_to(&config, &path).unwrap();

            let text = std::fs::read_to_string(&path).unwrap();
            assert!(text.contains("[fields.link]"));

            let loaded = load_config_from(&path).unwrap();
            assert_eq!(loaded, config);
            assert_eq!(loaded.key_overrides().unwrap(), overrides);
            Ok(())
        });
    }
}
