// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Orientation service, the module the host runtime talks to.
//
// Answers orientation queries, issues orientation locks, and while the host
// application is in the foreground forwards every configuration change to
// the application layer as a `specificOrientationDidChange` event.
//
// The host delivers lifecycle callbacks and broadcasts on a single dispatch
// thread, so the only mutable state (the subscription handle) needs no
// locking. Every platform failure degrades to a fallback value or a no-op
// and is logged, never raised to the host runtime.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use drehwerk_core::classify::classify_surface;
use drehwerk_core::config::BridgeConfig;
use drehwerk_core::error::{DrehwerkError, UnrecognizedOrientation};
use drehwerk_core::types::{
    CoarseOrientation, ConfigurationChange, LockState, ModuleConstants, OrientationEvent,
    OrientationLabel, SubscriptionId,
};

use crate::traits::{ActivityProvider, EventSink, HostLifecycle, PlatformHost};

/// Bridges device orientation state and orientation locks to the host
/// runtime.
///
/// Constructed once per host application context. The configuration-change
/// subscription is only held between `on_host_resume` and
/// `on_host_pause`/`on_host_destroy`.
pub struct OrientationService {
    host: Box<dyn PlatformHost>,
    sink: Arc<dyn EventSink>,
    config: BridgeConfig,
    constants: ModuleConstants,
    subscription: Option<SubscriptionId>,
}

impl OrientationService {
    /// Create the service and capture the initial orientation constant.
    pub fn new(host: Box<dyn PlatformHost>, sink: Arc<dyn EventSink>, config: BridgeConfig) -> Self {
        let mut service = Self {
            host,
            sink,
            config,
            constants: ModuleConstants {
                initial_orientation: None,
            },
            subscription: None,
        };
        service.constants.initial_orientation = service.orientation().ok();

        info!(
            module = %service.config.module_name,
            platform = service.host.platform_name(),
            initial = ?service.constants.initial_orientation,
            "orientation service created"
        );
        service
    }

    /// Name the module registers under with the host runtime.
    pub fn name(&self) -> &str {
        &self.config.module_name
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Constants exported once at module load.
    pub fn constants(&self) -> &ModuleConstants {
        &self.constants
    }

    /// Coarse orientation captured at construction, `None` if unrecognised.
    pub fn initial_orientation(&self) -> Option<CoarseOrientation> {
        self.constants.initial_orientation
    }

    /// Whether a configuration-change subscription is currently held.
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn subscription(&self) -> Option<SubscriptionId> {
        self.subscription
    }

    // -- Queries ------------------------------------------------------------

    /// Coarse orientation from the application's resource configuration.
    ///
    /// An unrecognised configuration code is handed back raw in the error.
    /// If the host cannot be queried at all the answer is `UNKNOWN`.
    pub fn orientation(&self) -> std::result::Result<CoarseOrientation, UnrecognizedOrientation> {
        match self.host.configuration_orientation() {
            Ok(code) => CoarseOrientation::from_configuration(code),
            Err(e) => {
                warn!("configuration orientation unavailable: {e}");
                Ok(CoarseOrientation::Unknown)
            }
        }
    }

    /// Specific orientation of the foreground activity.
    ///
    /// `UNKNOWN` when no activity is in the foreground or it cannot report
    /// its display state.
    pub fn specific_orientation(&self) -> OrientationLabel {
        let Some(activity) = self.host.current_activity() else {
            debug!("no foreground activity, specific orientation unknown");
            return OrientationLabel::Unknown;
        };

        let rotation = match activity.display_rotation() {
            Ok(rotation) => rotation,
            Err(e) => {
                warn!("display rotation unavailable: {e}");
                return OrientationLabel::Unknown;
            }
        };
        let metrics = match activity.display_metrics() {
            Ok(metrics) => metrics,
            Err(e) => {
                warn!("display metrics unavailable: {e}");
                return OrientationLabel::Unknown;
            }
        };

        let label = classify_surface(rotation, metrics);
        debug!(rotation, width = metrics.width, height = metrics.height, %label, "classified rotation");
        label
    }

    // -- Locks --------------------------------------------------------------

    pub fn lock_to_portrait(&self) {
        self.lock(LockState::LockedPortrait);
    }

    pub fn lock_to_landscape(&self) {
        self.lock(LockState::LockedLandscape);
    }

    pub fn lock_to_landscape_left(&self) {
        self.lock(LockState::LockedLandscapeLeft);
    }

    pub fn lock_to_landscape_right(&self) {
        self.lock(LockState::LockedLandscapeRight);
    }

    pub fn unlock_all_orientations(&self) {
        self.lock(LockState::Unlocked);
    }

    /// Issue an orientation lock to the foreground activity. No-op without
    /// one.
    pub fn lock(&self, lock: LockState) {
        let Some(activity) = self.host.current_activity() else {
            debug!(?lock, "no foreground activity, lock ignored");
            return;
        };

        match activity.set_requested_orientation(lock) {
            Ok(()) => info!(?lock, code = lock.requested_orientation_code(), "requested orientation"),
            Err(e) => warn!(?lock, "failed to request orientation: {e}"),
        }
    }

    // -- Notifications ------------------------------------------------------

    /// Handle a configuration-change broadcast delivered to subscription `id`.
    ///
    /// Broadcasts for anything but the active subscription are dropped, as
    /// is everything while the host runtime bridge is down.
    pub fn on_configuration_changed(&self, id: SubscriptionId, change: ConfigurationChange) {
        if self.subscription != Some(id) {
            debug!(subscription = %id, "ignoring broadcast for inactive subscription");
            return;
        }
        if !self.sink.is_live() {
            debug!("host runtime bridge not live, dropping orientation event");
            return;
        }

        debug!(new_config_orientation = ?change.orientation, "configuration changed");

        let event = OrientationEvent {
            specific_orientation: self.specific_orientation(),
        };
        let payload = match serde_json::to_value(event) {
            Ok(payload) => payload,
            Err(e) => {
                error!("failed to encode orientation event: {e}");
                return;
            }
        };

        if let Err(e) = self.sink.emit(&self.config.event_name, payload) {
            warn!(event = %self.config.event_name, "failed to emit orientation event: {e}");
        }
    }

    fn release_subscription(&mut self, transition: &str) {
        let Some(id) = self.subscription.take() else {
            debug!(transition, "receiver already unregistered");
            return;
        };

        match self.host.unsubscribe(id) {
            Ok(()) => info!(transition, subscription = %id, "unregistered configuration receiver"),
            Err(DrehwerkError::NotSubscribed(_)) => {
                error!(transition, subscription = %id, "receiver already unregistered")
            }
            Err(e) => error!(transition, subscription = %id, "failed to unregister receiver: {e}"),
        }
    }
}

impl HostLifecycle for OrientationService {
    fn on_host_resume(&mut self) {
        if let Some(id) = self.subscription {
            debug!(subscription = %id, "already subscribed, keeping existing receiver");
            return;
        }

        match self.host.subscribe(&self.config.broadcast_action) {
            Ok(id) => {
                info!(subscription = %id, action = %self.config.broadcast_action, "registered configuration receiver");
                self.subscription = Some(id);
            }
            Err(e) => warn!(action = %self.config.broadcast_action, "failed to register receiver: {e}"),
        }
    }

    fn on_host_pause(&mut self) {
        self.release_subscription("pause");
    }

    fn on_host_destroy(&mut self) {
        self.release_subscription("destroy");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::{RecordingSink, StubActivity, StubHost};
    use crate::traits::NotificationSource;
    use drehwerk_core::types::ScreenMetrics;
    use serde_json::json;

    /// Helper: a service over a fresh stub host and recording sink.
    fn service_with(host: &StubHost) -> (OrientationService, RecordingSink) {
        let sink = RecordingSink::new();
        let service = OrientationService::new(
            Box::new(host.clone()),
            Arc::new(sink.clone()),
            BridgeConfig::default(),
        );
        (service, sink)
    }

    fn deliver(host: &StubHost, service: &OrientationService) {
        for id in host.subscribers_for("onConfigurationChanged") {
            service.on_configuration_changed(id, ConfigurationChange { orientation: Some(2) });
        }
    }

    #[test]
    fn initial_orientation_is_captured_once() {
        let host = StubHost::portrait_phone();
        let (service, _) = service_with(&host);
        assert_eq!(service.initial_orientation(), Some(CoarseOrientation::Portrait));

        host.set_configuration_orientation(CoarseOrientation::CODE_LANDSCAPE);
        assert_eq!(service.initial_orientation(), Some(CoarseOrientation::Portrait));
        assert_eq!(service.orientation(), Ok(CoarseOrientation::Landscape));
    }

    #[test]
    fn unrecognized_configuration_is_raw_code() {
        let host = StubHost::new();
        host.set_configuration_orientation(3);
        let (service, _) = service_with(&host);

        assert_eq!(service.orientation(), Err(UnrecognizedOrientation(3)));
        assert_eq!(service.initial_orientation(), None);
        assert_eq!(
            serde_json::to_value(service.constants()).unwrap(),
            json!({ "initialOrientation": null })
        );
    }

    #[test]
    fn specific_orientation_follows_rotation() {
        let host = StubHost::portrait_phone();
        let (service, _) = service_with(&host);
        assert_eq!(service.specific_orientation(), OrientationLabel::Portrait);

        host.rotate(1, ScreenMetrics::new(2340, 1080));
        assert_eq!(service.specific_orientation(), OrientationLabel::LandscapeLeft);

        host.rotate(3, ScreenMetrics::new(2340, 1080));
        assert_eq!(service.specific_orientation(), OrientationLabel::LandscapeRight);
    }

    #[test]
    fn landscape_native_rotation_zero_is_landscape_left() {
        let host = StubHost::new();
        host.set_activity(Some(StubActivity {
            rotation: 0,
            metrics: ScreenMetrics::new(2560, 1600),
        }));
        let (service, _) = service_with(&host);
        assert_eq!(service.specific_orientation(), OrientationLabel::LandscapeLeft);
    }

    #[test]
    fn specific_orientation_is_idempotent() {
        let host = StubHost::portrait_phone();
        host.rotate(2, ScreenMetrics::new(1080, 2340));
        let (service, _) = service_with(&host);
        let first = service.specific_orientation();
        let second = service.specific_orientation();
        assert_eq!(first, OrientationLabel::PortraitUpsideDown);
        assert_eq!(first, second);
    }

    #[test]
    fn no_activity_falls_back() {
        let host = StubHost::new();
        let (service, _) = service_with(&host);

        assert_eq!(service.specific_orientation(), OrientationLabel::Unknown);

        service.lock_to_portrait();
        service.lock_to_landscape();
        service.lock_to_landscape_left();
        service.lock_to_landscape_right();
        service.unlock_all_orientations();
        assert!(host.requested_orientations().is_empty());
    }

    #[test]
    fn locks_reach_the_activity() {
        let host = StubHost::portrait_phone();
        let (service, _) = service_with(&host);

        service.lock_to_portrait();
        service.lock_to_landscape();
        service.lock_to_landscape_left();
        service.lock_to_landscape_right();
        service.unlock_all_orientations();

        assert_eq!(
            host.requested_orientations(),
            vec![
                LockState::LockedPortrait,
                LockState::LockedLandscape,
                LockState::LockedLandscapeLeft,
                LockState::LockedLandscapeRight,
                LockState::Unlocked,
            ]
        );
    }

    #[test]
    fn resume_pause_pause_does_not_raise() {
        let host = StubHost::portrait_phone();
        let (mut service, _) = service_with(&host);

        service.on_host_resume();
        assert!(service.is_subscribed());
        service.on_host_pause();
        service.on_host_pause();
        assert!(!service.is_subscribed());
        assert!(host.active_subscriptions().is_empty());
    }

    #[test]
    fn resume_destroy_does_not_raise() {
        let host = StubHost::portrait_phone();
        let (mut service, _) = service_with(&host);

        service.on_host_resume();
        service.on_host_destroy();
        service.on_host_destroy();
        assert!(!service.is_subscribed());
    }

    #[test]
    fn pause_without_resume_is_harmless() {
        let host = StubHost::new();
        let (mut service, _) = service_with(&host);
        service.on_host_pause();
        service.on_host_destroy();
        assert_eq!(host.subscribe_calls(), 0);
    }

    #[test]
    fn double_resume_keeps_one_subscription() {
        let host = StubHost::portrait_phone();
        let (mut service, _) = service_with(&host);

        service.on_host_resume();
        let first = service.subscription();
        service.on_host_resume();

        assert_eq!(service.subscription(), first);
        assert_eq!(host.subscribe_calls(), 1);
        assert_eq!(host.active_subscriptions().len(), 1);
    }

    #[test]
    fn externally_dropped_subscription_is_swallowed() {
        let host = StubHost::portrait_phone();
        let (mut service, _) = service_with(&host);

        service.on_host_resume();
        let id = service.subscription().expect("subscribed");
        host.unsubscribe(id).unwrap();

        service.on_host_pause();
        assert!(!service.is_subscribed());
    }

    #[test]
    fn host_query_failure_is_unknown() {
        let host = StubHost::portrait_phone();
        host.fail_configuration(true);
        let (service, _) = service_with(&host);

        assert_eq!(service.orientation(), Ok(CoarseOrientation::Unknown));
        assert_eq!(service.initial_orientation(), Some(CoarseOrientation::Unknown));
        assert_eq!(
            serde_json::to_value(service.constants()).unwrap(),
            json!({ "initialOrientation": "UNKNOWN" })
        );

        host.fail_configuration(false);
        assert_eq!(service.orientation(), Ok(CoarseOrientation::Portrait));
    }

    #[test]
    fn failed_subscribe_stays_inactive_and_retries() {
        let host = StubHost::portrait_phone();
        let (mut service, sink) = service_with(&host);

        host.fail_subscribe(true);
        service.on_host_resume();
        assert!(!service.is_subscribed());
        assert!(host.active_subscriptions().is_empty());

        // Nothing registered, so pausing has nothing to release.
        service.on_host_pause();

        host.fail_subscribe(false);
        service.on_host_resume();
        assert!(service.is_subscribed());
        assert_eq!(host.subscribe_calls(), 2);

        deliver(&host, &service);
        assert_eq!(sink.events().len(), 1);
    }

    #[test]
    fn failed_lock_is_swallowed() {
        let host = StubHost::portrait_phone();
        let (service, _) = service_with(&host);

        host.fail_lock(true);
        service.lock_to_landscape();
        service.unlock_all_orientations();
        assert!(host.requested_orientations().is_empty());

        host.fail_lock(false);
        service.lock_to_portrait();
        assert_eq!(host.requested_orientations(), vec![LockState::LockedPortrait]);
    }

    #[test]
    fn broadcast_emits_specific_orientation() {
        let host = StubHost::portrait_phone();
        let (mut service, sink) = service_with(&host);
        service.on_host_resume();

        host.rotate(1, ScreenMetrics::new(2340, 1080));
        deliver(&host, &service);

        assert_eq!(
            sink.events(),
            vec![(
                "specificOrientationDidChange".to_string(),
                json!({ "specificOrientation": "LANDSCAPE-LEFT" })
            )]
        );
    }

    #[test]
    fn broadcast_without_activity_emits_unknown() {
        let host = StubHost::portrait_phone();
        let (mut service, sink) = service_with(&host);
        service.on_host_resume();

        host.set_activity(None);
        deliver(&host, &service);

        assert_eq!(sink.events()[0].1, json!({ "specificOrientation": "UNKNOWN" }));
    }

    #[test]
    fn dead_bridge_skips_emission() {
        let host = StubHost::portrait_phone();
        let (mut service, sink) = service_with(&host);
        service.on_host_resume();

        sink.set_live(false);
        deliver(&host, &service);
        assert!(sink.events().is_empty());

        sink.set_live(true);
        deliver(&host, &service);
        assert_eq!(sink.events().len(), 1);
    }

    #[test]
    fn broadcasts_are_ignored_while_inactive() {
        let host = StubHost::portrait_phone();
        let (mut service, sink) = service_with(&host);

        service.on_host_resume();
        let stale = service.subscription().expect("subscribed");
        service.on_host_pause();

        service.on_configuration_changed(stale, ConfigurationChange::default());
        assert!(sink.events().is_empty());

        service.on_host_resume();
        service.on_configuration_changed(stale, ConfigurationChange::default());
        assert!(sink.events().is_empty());
    }

    #[test]
    fn custom_event_and_action_names() {
        let host = StubHost::portrait_phone();
        let sink = RecordingSink::new();
        let config = BridgeConfig {
            event_name: "orientationChanged".into(),
            broadcast_action: "com.example.CONFIG".into(),
            ..BridgeConfig::default()
        };
        let mut service =
            OrientationService::new(Box::new(host.clone()), Arc::new(sink.clone()), config);

        service.on_host_resume();
        let ids = host.subscribers_for("com.example.CONFIG");
        assert_eq!(ids.len(), 1);
        service.on_configuration_changed(ids[0], ConfigurationChange::default());

        assert_eq!(sink.events()[0].0, "orientationChanged");
    }
}
