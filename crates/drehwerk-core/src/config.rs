// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{CONFIGURATION_CHANGED_ACTION, EVENT_SPECIFIC_ORIENTATION_DID_CHANGE, MODULE_NAME};

/// Settings for the orientation bridge. Missing fields in a config file fall
/// back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Name the module registers under with the host runtime.
    pub module_name: String,
    /// Event emitted when the specific orientation changes.
    pub event_name: String,
    /// Broadcast action the platform sends on configuration changes.
    pub broadcast_action: String,
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            module_name: MODULE_NAME.into(),
            event_name: EVENT_SPECIFIC_ORIENTATION_DID_CHANGE.into(),
            broadcast_action: CONFIGURATION_CHANGED_ACTION.into(),
            log_filter: "info".into(),
        }
    }
}

impl BridgeConfig {
    /// Parse a JSON config document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        let config = Self::from_json(&data)?;
        tracing::info!(path = %path.display(), "loaded bridge config");
        Ok(config)
    }

    /// Write the config as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_host_contract() {
        let config = BridgeConfig::default();
        assert_eq!(config.module_name, "Orientation");
        assert_eq!(config.event_name, "specificOrientationDidChange");
        assert_eq!(config.broadcast_action, "onConfigurationChanged");
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = BridgeConfig::from_json(r#"{ "log_filter": "drehwerk=debug" }"#)
            .expect("parse partial config");
        assert_eq!(config.log_filter, "drehwerk=debug");
        assert_eq!(config.event_name, "specificOrientationDidChange");
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("drehwerk.json");

        let config = BridgeConfig {
            broadcast_action: "com.example.CONFIG_CHANGED".into(),
            ..BridgeConfig::default()
        };
        config.save(&path).expect("save");

        let loaded = BridgeConfig::load(&path).expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let loaded = BridgeConfig::load(&dir.path().join("absent.json")).expect("load");
        assert_eq!(loaded, BridgeConfig::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").expect("write");
        assert!(BridgeConfig::load(&path).is_err());
    }
}
