// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Drehwerk: orientation service and native platform hosts.
//!
//! [`OrientationService`] is what the host runtime registers as the
//! `Orientation` module. It talks to the operating system through the
//! [`traits::PlatformHost`] abstraction and to application code through an
//! injected [`traits::EventSink`], so the same service runs against the
//! Android SDK (JNI) on devices and an in-memory stub on desktop/CI.

pub mod dispatch;
pub mod registry;
pub mod service;
pub mod stub;
pub mod traits;

#[cfg(target_os = "android")]
pub mod android;

pub use dispatch::{MethodCall, Reply};
pub use service::OrientationService;

/// Retrieves the platform host for the target operating system.
///
/// RETURNS: a boxed trait object (`dyn PlatformHost`) that abstracts away the
/// underlying native SDK details.
pub fn platform_host() -> Box<dyn traits::PlatformHost> {
    #[cfg(target_os = "android")]
    {
        // Android: uses `jni-rs` to invoke methods on the JVM/ART.
        Box::new(android::AndroidHost::new())
    }
    #[cfg(not(target_os = "android"))]
    {
        // DESKTOP/CI: in-memory host so non-native builds can run the service.
        Box::new(stub::StubHost::new())
    }
}

#[cfg(all(test, not(target_os = "android")))]
mod tests {
    use super::*;
    use crate::traits::HostLifecycle;

    #[test]
    fn desktop_builds_get_the_stub() {
        let host = platform_host();
        assert_eq!(host.platform_name(), "Desktop (stub)");
        assert!(host.current_activity().is_none());
    }

    #[test]
    fn service_runs_on_the_target_host() {
        let mut service = OrientationService::new(
            platform_host(),
            std::sync::Arc::new(stub::RecordingSink::new()),
            drehwerk_core::config::BridgeConfig::default(),
        );
        assert_eq!(
            service.initial_orientation(),
            Some(drehwerk_core::types::CoarseOrientation::Unknown)
        );
        service.on_host_resume();
        assert!(service.is_subscribed());
        service.on_host_destroy();
        assert!(!service.is_subscribed());
    }
}
