// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Drehwerk orientation bridge.
//
// Numeric codes follow the Android SDK constants (`Surface.ROTATION_*`,
// `Configuration.ORIENTATION_*`, `ActivityInfo.SCREEN_ORIENTATION_*`) since
// those are what the platform hosts hand us.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::UnrecognizedOrientation;

/// Name of the event emitted whenever the specific orientation changes.
pub const EVENT_SPECIFIC_ORIENTATION_DID_CHANGE: &str = "specificOrientationDidChange";

/// Name under which the module registers with the host runtime.
pub const MODULE_NAME: &str = "Orientation";

/// Broadcast action the platform host sends on configuration changes.
pub const CONFIGURATION_CHANGED_ACTION: &str = "onConfigurationChanged";

/// Six-way orientation label forwarded to the application layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrientationLabel {
    #[serde(rename = "PORTRAIT")]
    Portrait,
    #[serde(rename = "PORTRAITUPSIDEDOWN")]
    PortraitUpsideDown,
    #[serde(rename = "LANDSCAPE")]
    Landscape,
    #[serde(rename = "LANDSCAPE-LEFT")]
    LandscapeLeft,
    #[serde(rename = "LANDSCAPE-RIGHT")]
    LandscapeRight,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl OrientationLabel {
    /// Wire form understood by the application layer.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Portrait => "PORTRAIT",
            Self::PortraitUpsideDown => "PORTRAITUPSIDEDOWN",
            Self::Landscape => "LANDSCAPE",
            Self::LandscapeLeft => "LANDSCAPE-LEFT",
            Self::LandscapeRight => "LANDSCAPE-RIGHT",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for OrientationLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse orientation as reported by the resource configuration, without
/// left/right or upside-down distinctions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CoarseOrientation {
    Landscape,
    Portrait,
    Unknown,
}

impl CoarseOrientation {
    /// `Configuration.ORIENTATION_UNDEFINED`.
    pub const CODE_UNDEFINED: i32 = 0;
    /// `Configuration.ORIENTATION_PORTRAIT`.
    pub const CODE_PORTRAIT: i32 = 1;
    /// `Configuration.ORIENTATION_LANDSCAPE`.
    pub const CODE_LANDSCAPE: i32 = 2;

    /// Decode a platform configuration code.
    ///
    /// Codes outside the three known constants (including the long
    /// deprecated "square" value) are handed back raw.
    pub fn from_configuration(code: i32) -> Result<Self, UnrecognizedOrientation> {
        match code {
            Self::CODE_LANDSCAPE => Ok(Self::Landscape),
            Self::CODE_PORTRAIT => Ok(Self::Portrait),
            Self::CODE_UNDEFINED => Ok(Self::Unknown),
            other => Err(UnrecognizedOrientation(other)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Landscape => "LANDSCAPE",
            Self::Portrait => "PORTRAIT",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl From<CoarseOrientation> for OrientationLabel {
    fn from(coarse: CoarseOrientation) -> Self {
        match coarse {
            CoarseOrientation::Landscape => Self::Landscape,
            CoarseOrientation::Portrait => Self::Portrait,
            CoarseOrientation::Unknown => Self::Unknown,
        }
    }
}

impl std::fmt::Display for CoarseOrientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clockwise rotation of the display away from the device's natural
/// orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RawRotation {
    Rot0,
    Rot90,
    Rot180,
    Rot270,
}

impl RawRotation {
    /// All four cardinal rotations, in clockwise order.
    pub const ALL: [RawRotation; 4] = [Self::Rot0, Self::Rot90, Self::Rot180, Self::Rot270];

    /// Decode a `Surface.ROTATION_*` code. Returns `None` for anything else.
    pub fn from_surface(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Rot0),
            1 => Some(Self::Rot90),
            2 => Some(Self::Rot180),
            3 => Some(Self::Rot270),
            _ => None,
        }
    }

    /// The `Surface.ROTATION_*` code for this rotation.
    pub fn surface_code(self) -> i32 {
        match self {
            Self::Rot0 => 0,
            Self::Rot90 => 1,
            Self::Rot180 => 2,
            Self::Rot270 => 3,
        }
    }

    /// Whether this rotation swaps the width/height relationship relative to
    /// the natural orientation.
    pub fn is_quarter_turn(self) -> bool {
        matches!(self, Self::Rot90 | Self::Rot270)
    }
}

/// The orientation the device hardware defaults to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NaturalOrientation {
    /// Phones, most small tablets.
    Portrait,
    /// Large tablets, TV boxes, some Chromebooks.
    Landscape,
}

/// Display size in device pixels at the time of measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScreenMetrics {
    pub width: u32,
    pub height: u32,
}

impl ScreenMetrics {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_taller_than_wide(&self) -> bool {
        self.height > self.width
    }

    pub fn is_wider_than_tall(&self) -> bool {
        self.width > self.height
    }
}

/// Orientation lock the module can request. The OS holds the actual state;
/// we only ever issue set commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LockState {
    Unlocked,
    LockedPortrait,
    /// Either landscape direction, following the sensor.
    LockedLandscape,
    LockedLandscapeLeft,
    LockedLandscapeRight,
}

impl LockState {
    /// The `ActivityInfo.SCREEN_ORIENTATION_*` code for this lock.
    pub fn requested_orientation_code(self) -> i32 {
        match self {
            Self::Unlocked => -1,            // SCREEN_ORIENTATION_UNSPECIFIED
            Self::LockedPortrait => 1,       // SCREEN_ORIENTATION_PORTRAIT
            Self::LockedLandscape => 6,      // SCREEN_ORIENTATION_SENSOR_LANDSCAPE
            Self::LockedLandscapeLeft => 0,  // SCREEN_ORIENTATION_LANDSCAPE
            Self::LockedLandscapeRight => 8, // SCREEN_ORIENTATION_REVERSE_LANDSCAPE
        }
    }
}

/// Identifier of a configuration-change subscription handed out by the
/// notification source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub Uuid);

impl SubscriptionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A configuration-change notification as delivered by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfigurationChange {
    /// `newConfig.orientation` carried by the broadcast, if present.
    pub orientation: Option<i32>,
}

/// Payload of the `specificOrientationDidChange` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrientationEvent {
    #[serde(rename = "specificOrientation")]
    pub specific_orientation: OrientationLabel,
}

/// Constants exported to the host runtime when the module loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleConstants {
    /// Coarse orientation at construction time; `None` when the platform
    /// reported a code we do not recognise.
    #[serde(rename = "initialOrientation")]
    pub initial_orientation: Option<CoarseOrientation>,
}
