// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory host for desktop/CI builds and tests, where no mobile OS is
// around to ask.
//
// `StubHost` and `RecordingSink` are cheap handles over shared state: clone
// one before handing it to the service and keep the clone to drive the
// simulated device and inspect what the service did.

use std::sync::{Arc, Mutex, MutexGuard};

use drehwerk_core::error::{DrehwerkError, Result};
use drehwerk_core::types::{CoarseOrientation, LockState, ScreenMetrics, SubscriptionId};

use crate::traits::*;

/// Simulated foreground activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StubActivity {
    /// `Surface.ROTATION_*` code; may be out of range on purpose.
    pub rotation: i32,
    pub metrics: ScreenMetrics,
}

#[derive(Debug)]
struct StubState {
    configuration_orientation: i32,
    activity: Option<StubActivity>,
    requested: Vec<LockState>,
    subscriptions: Vec<(SubscriptionId, String)>,
    subscribe_calls: usize,
    failures: StubFailures,
}

/// Host calls that should fail with `DrehwerkError::Bridge`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StubFailures {
    pub configuration: bool,
    pub subscribe: bool,
    pub lock: bool,
}

/// No-op-safe host backed by shared in-memory state.
#[derive(Debug, Clone)]
pub struct StubHost {
    state: Arc<Mutex<StubState>>,
}

impl Default for StubHost {
    fn default() -> Self {
        Self::new()
    }
}

impl StubHost {
    /// A host with no foreground activity and an undefined configuration.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(StubState {
                configuration_orientation: CoarseOrientation::CODE_UNDEFINED,
                activity: None,
                requested: Vec::new(),
                subscriptions: Vec::new(),
                subscribe_calls: 0,
                failures: StubFailures::default(),
            })),
        }
    }

    /// A portrait phone (1080x2340) held upright in the foreground.
    pub fn portrait_phone() -> Self {
        let host = Self::new();
        host.set_configuration_orientation(CoarseOrientation::CODE_PORTRAIT);
        host.set_activity(Some(StubActivity {
            rotation: 0,
            metrics: ScreenMetrics::new(1080, 2340),
        }));
        host
    }

    fn lock(&self) -> MutexGuard<'_, StubState> {
        self.state.lock().expect("stub host lock poisoned")
    }

    pub fn set_configuration_orientation(&self, code: i32) {
        self.lock().configuration_orientation = code;
    }

    /// Bring an activity to the foreground, or clear it with `None`.
    pub fn set_activity(&self, activity: Option<StubActivity>) {
        self.lock().activity = activity;
    }

    /// Rotate the foreground activity. Ignored when there is none.
    pub fn rotate(&self, rotation: i32, metrics: ScreenMetrics) {
        if let Some(activity) = self.lock().activity.as_mut() {
            activity.rotation = rotation;
            activity.metrics = metrics;
        }
    }

    pub fn activity(&self) -> Option<StubActivity> {
        self.lock().activity
    }

    /// Every lock command issued so far, oldest first.
    pub fn requested_orientations(&self) -> Vec<LockState> {
        self.lock().requested.clone()
    }

    /// Subscriptions currently registered, oldest first.
    pub fn active_subscriptions(&self) -> Vec<SubscriptionId> {
        self.lock().subscriptions.iter().map(|(id, _)| *id).collect()
    }

    /// Subscriptions a broadcast of `action` would reach.
    pub fn subscribers_for(&self, action: &str) -> Vec<SubscriptionId> {
        self.lock()
            .subscriptions
            .iter()
            .filter(|(_, registered)| registered == action)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Make the configuration query fail.
    pub fn fail_configuration(&self, fail: bool) {
        self.lock().failures.configuration = fail;
    }

    /// Make `subscribe` fail. Failed attempts still count in
    /// [`subscribe_calls`](Self::subscribe_calls).
    pub fn fail_subscribe(&self, fail: bool) {
        self.lock().failures.subscribe = fail;
    }

    /// Make lock commands on the foreground activity fail.
    pub fn fail_lock(&self, fail: bool) {
        self.lock().failures.lock = fail;
    }

    /// How many times `subscribe` has been called.
    pub fn subscribe_calls(&self) -> usize {
        self.lock().subscribe_calls
    }
}

impl PlatformHost for StubHost {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }
}

impl ActivityProvider for StubHost {
    fn configuration_orientation(&self) -> Result<i32> {
        let state = self.lock();
        if state.failures.configuration {
            return Err(DrehwerkError::Bridge("stub configuration query failed".into()));
        }
        Ok(state.configuration_orientation)
    }

    fn current_activity(&self) -> Option<Box<dyn ForegroundActivity + '_>> {
        if self.lock().activity.is_none() {
            return None;
        }
        Some(Box::new(StubActivityHandle { host: self }))
    }
}

impl NotificationSource for StubHost {
    fn subscribe(&self, action: &str) -> Result<SubscriptionId> {
        let mut state = self.lock();
        state.subscribe_calls += 1;
        if state.failures.subscribe {
            return Err(DrehwerkError::Bridge("stub receiver registration failed".into()));
        }
        let id = SubscriptionId::new();
        state.subscriptions.push((id, action.to_owned()));
        Ok(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> Result<()> {
        let mut state = self.lock();
        let before = state.subscriptions.len();
        state.subscriptions.retain(|(registered, _)| *registered != id);
        if state.subscriptions.len() == before {
            return Err(DrehwerkError::NotSubscribed(id.to_string()));
        }
        Ok(())
    }
}

/// View of the stub's foreground activity. Reads through to the shared state
/// so later `rotate` calls are visible.
struct StubActivityHandle<'a> {
    host: &'a StubHost,
}

impl StubActivityHandle<'_> {
    fn current(&self) -> Result<StubActivity> {
        self.host
            .activity()
            .ok_or_else(|| DrehwerkError::Bridge("stub activity went away".into()))
    }
}

impl ForegroundActivity for StubActivityHandle<'_> {
    fn display_rotation(&self) -> Result<i32> {
        Ok(self.current()?.rotation)
    }

    fn display_metrics(&self) -> Result<ScreenMetrics> {
        Ok(self.current()?.metrics)
    }

    fn set_requested_orientation(&self, lock: LockState) -> Result<()> {
        self.current()?;
        let mut state = self.host.lock();
        if state.failures.lock {
            return Err(DrehwerkError::Bridge("stub setRequestedOrientation failed".into()));
        }
        state.requested.push(lock);
        Ok(())
    }
}

#[derive(Debug)]
struct SinkState {
    live: bool,
    events: Vec<(String, serde_json::Value)>,
}

/// Event sink that records everything emitted into it.
#[derive(Debug, Clone)]
pub struct RecordingSink {
    state: Arc<Mutex<SinkState>>,
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSink {
    /// A live sink with nothing recorded.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SinkState {
                live: true,
                events: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SinkState> {
        self.state.lock().expect("recording sink lock poisoned")
    }

    /// Simulate the host runtime bridge coming up or being torn down.
    pub fn set_live(&self, live: bool) {
        self.lock().live = live;
    }

    /// Recorded `(event name, payload)` pairs, oldest first.
    pub fn events(&self) -> Vec<(String, serde_json::Value)> {
        self.lock().events.clone()
    }

    /// Drain the recorded events.
    pub fn take_events(&self) -> Vec<(String, serde_json::Value)> {
        std::mem::take(&mut self.lock().events)
    }
}

impl EventSink for RecordingSink {
    fn is_live(&self) -> bool {
        self.lock().live
    }

    fn emit(&self, event: &str, payload: serde_json::Value) -> Result<()> {
        self.lock().events.push((event.to_owned(), payload));
        Ok(())
    }
}
