// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rotation classifier.
//
// Turns the display rotation plus the current screen metrics into one of the
// six specific orientation labels. Platforms do not expose a reliable
// "natural orientation" flag, so it is inferred: a quarter turn swaps the
// width/height relationship relative to the natural orientation, so the
// current metrics and current rotation together pin it down.

use crate::types::{NaturalOrientation, OrientationLabel, RawRotation, ScreenMetrics};

/// Infer whether the hardware is portrait- or landscape-native.
///
/// Square screens fall through to landscape.
pub fn natural_orientation(rotation: RawRotation, metrics: ScreenMetrics) -> NaturalOrientation {
    let natively_portrait = if rotation.is_quarter_turn() {
        metrics.is_wider_than_tall()
    } else {
        metrics.is_taller_than_wide()
    };

    if natively_portrait {
        NaturalOrientation::Portrait
    } else {
        NaturalOrientation::Landscape
    }
}

/// Map a rotation and the current metrics to a specific orientation label.
///
/// Never yields [`OrientationLabel::Landscape`]; that coarse label only comes
/// from the resource configuration.
pub fn classify(rotation: RawRotation, metrics: ScreenMetrics) -> OrientationLabel {
    match (natural_orientation(rotation, metrics), rotation) {
        (NaturalOrientation::Portrait, RawRotation::Rot0) => OrientationLabel::Portrait,
        (NaturalOrientation::Portrait, RawRotation::Rot90) => OrientationLabel::LandscapeLeft,
        (NaturalOrientation::Portrait, RawRotation::Rot180) => OrientationLabel::PortraitUpsideDown,
        (NaturalOrientation::Portrait, RawRotation::Rot270) => OrientationLabel::LandscapeRight,
        (NaturalOrientation::Landscape, RawRotation::Rot0) => OrientationLabel::LandscapeLeft,
        (NaturalOrientation::Landscape, RawRotation::Rot90) => OrientationLabel::Portrait,
        (NaturalOrientation::Landscape, RawRotation::Rot180) => OrientationLabel::LandscapeRight,
        (NaturalOrientation::Landscape, RawRotation::Rot270) => {
            OrientationLabel::PortraitUpsideDown
        }
    }
}

/// Same as [`classify`], but takes the raw `Surface.ROTATION_*` code the
/// platform reports. Any code outside the four cardinal rotations is
/// [`OrientationLabel::Unknown`].
pub fn classify_surface(rotation_code: i32, metrics: ScreenMetrics) -> OrientationLabel {
    match RawRotation::from_surface(rotation_code) {
        Some(rotation) => classify(rotation, metrics),
        None => OrientationLabel::Unknown,
    }
}
