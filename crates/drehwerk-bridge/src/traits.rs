// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for the collaborators the orientation
// service talks to.
//
// The OS side (activity/window manager, broadcast subsystem) is grouped under
// `PlatformHost`; the application runtime side is an `EventSink`. Lifecycle
// transitions arrive through `HostLifecycle`.

use drehwerk_core::error::Result;
use drehwerk_core::types::{LockState, ScreenMetrics, SubscriptionId};

/// Unified host that groups the native capabilities the service needs.
pub trait PlatformHost: ActivityProvider + NotificationSource {
    /// Human-readable platform name (e.g. "Android").
    fn platform_name(&self) -> &str;
}

/// Access to the application resources and the foreground activity.
pub trait ActivityProvider {
    /// `Configuration.orientation` of the application resources.
    fn configuration_orientation(&self) -> Result<i32>;

    /// The activity currently in the foreground, if any.
    fn current_activity(&self) -> Option<Box<dyn ForegroundActivity + '_>>;
}

/// The foreground activity and its window.
pub trait ForegroundActivity {
    /// `Surface.ROTATION_*` code of the default display.
    fn display_rotation(&self) -> Result<i32>;

    /// Size of the default display in device pixels.
    fn display_metrics(&self) -> Result<ScreenMetrics>;

    /// Request (or clear) an orientation lock.
    fn set_requested_orientation(&self, lock: LockState) -> Result<()>;
}

/// Registration with the platform's configuration-change broadcasts.
pub trait NotificationSource {
    /// Start receiving broadcasts for `action`.
    fn subscribe(&self, action: &str) -> Result<SubscriptionId>;

    /// Stop receiving broadcasts. Returns `DrehwerkError::NotSubscribed` if
    /// `id` is not currently registered.
    fn unsubscribe(&self, id: SubscriptionId) -> Result<()>;
}

/// The host runtime's event channel towards application code.
pub trait EventSink {
    /// Whether the bridge to the application layer is currently up.
    fn is_live(&self) -> bool;

    /// Emit a named event with a JSON payload.
    fn emit(&self, event: &str, payload: serde_json::Value) -> Result<()>;
}

/// Host application lifecycle transitions.
pub trait HostLifecycle {
    /// The host application came to the foreground.
    fn on_host_resume(&mut self);

    /// The host application went to the background.
    fn on_host_pause(&mut self);

    /// The host application is being torn down.
    fn on_host_destroy(&mut self);
}
