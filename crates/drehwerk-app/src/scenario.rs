// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scenario file format for the simulator.
//
// A scenario describes the simulated device at start-up and then a list of
// host events (lifecycle transitions, rotations, broadcasts, method calls)
// to replay against the orientation service.

use std::path::Path;

use serde::{Deserialize, Serialize};

use drehwerk_core::error::Result;
use drehwerk_core::types::ModuleConstants;

/// A full simulator run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub device: DeviceSetup,
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }
}

/// Device state before the first step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSetup {
    /// `Configuration.orientation` code.
    #[serde(default)]
    pub configuration: i32,
    /// Foreground activity, `None` for a headless start.
    #[serde(default)]
    pub activity: Option<ActivitySetup>,
    /// Whether the host runtime bridge starts out live.
    #[serde(default = "default_live")]
    pub bridge_live: bool,
}

impl Default for DeviceSetup {
    fn default() -> Self {
        Self {
            configuration: 0,
            activity: None,
            bridge_live: true,
        }
    }
}

fn default_live() -> bool {
    true
}

/// Display state of a simulated foreground activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySetup {
    /// `Surface.ROTATION_*` code.
    pub rotation: i32,
    pub width: u32,
    pub height: u32,
}

/// One host event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    Resume,
    Pause,
    Destroy,
    /// Rotate the foreground activity, then broadcast the configuration
    /// change the platform would send.
    Rotate {
        rotation: i32,
        width: u32,
        height: u32,
        #[serde(default)]
        configuration: Option<i32>,
    },
    /// Replace (or remove) the foreground activity.
    Activity { activity: Option<ActivitySetup> },
    /// Bring the host runtime bridge up or tear it down.
    Bridge { live: bool },
    /// Broadcast a configuration change without touching the display.
    Broadcast {
        #[serde(default)]
        orientation: Option<i32>,
    },
    /// Invoke a module method by name.
    Call { method: String },
}

/// A line of simulator output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Output {
    /// Constants exported when the module loads.
    Constants {
        module: String,
        constants: ModuleConstants,
    },
    /// An event the service emitted to the host runtime.
    Event {
        name: String,
        payload: serde_json::Value,
    },
    /// Callback arguments `[error, value]` for a query method.
    Reply {
        method: String,
        args: serde_json::Value,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bundled_scenario() {
        let scenario = Scenario::from_json(include_str!("../scenarios/phone_rotation.json"))
            .expect("bundled scenario parses");
        assert_eq!(scenario.device.configuration, 1);
        assert!(scenario.device.bridge_live);
        assert_eq!(scenario.steps.first(), Some(&Step::Resume));
    }

    #[test]
    fn device_defaults() {
        let scenario = Scenario::from_json(r#"{ "steps": [ { "step": "pause" } ] }"#)
            .expect("parse");
        assert_eq!(scenario.device, DeviceSetup::default());
        assert_eq!(scenario.steps, vec![Step::Pause]);
    }

    #[test]
    fn step_tags() {
        let step: Step = serde_json::from_str(
            r#"{ "step": "rotate", "rotation": 1, "width": 2340, "height": 1080 }"#,
        )
        .expect("parse");
        assert_eq!(
            step,
            Step::Rotate {
                rotation: 1,
                width: 2340,
                height: 1080,
                configuration: None,
            }
        );

        let step: Step = serde_json::from_str(r#"{ "step": "call", "method": "getOrientation" }"#)
            .expect("parse");
        assert_eq!(
            step,
            Step::Call {
                method: "getOrientation".into()
            }
        );
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scenario.json");
        std::fs::write(&path, r#"{ "steps": [] }"#).expect("write");
        let scenario = Scenario::load(&path).expect("load");
        assert!(scenario.steps.is_empty());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(Scenario::load(&dir.path().join("nope.json")).is_err());
    }
}
