// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bookkeeping for platform receiver handles keyed by subscription id.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use drehwerk_core::error::{DrehwerkError, Result};
use drehwerk_core::types::SubscriptionId;

/// Receiver handles a host has registered with the platform.
///
/// A handle is forgotten only when the platform confirms it is no longer
/// registered: the unregister call succeeded, or it reported the receiver
/// unknown (`NotSubscribed`). Any other failure keeps the handle.
#[derive(Debug)]
pub struct ReceiverRegistry<H> {
    handles: Mutex<HashMap<SubscriptionId, H>>,
}

impl<H> Default for ReceiverRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> ReceiverRegistry<H> {
    pub fn new() -> Self {
        Self {
            handles: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SubscriptionId, H>> {
        self.handles.lock().expect("receiver registry lock poisoned")
    }

    pub fn insert(&self, id: SubscriptionId, handle: H) {
        self.lock().insert(id, handle);
    }

    pub fn contains(&self, id: SubscriptionId) -> bool {
        self.lock().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Hand the handle for `id` to `unregister` and settle the entry on its
    /// outcome. An id with no handle is `NotSubscribed` without calling
    /// `unregister`.
    pub fn release<F>(&self, id: SubscriptionId, unregister: F) -> Result<()>
    where
        F: FnOnce(&H) -> Result<()>,
    {
        let mut handles = self.lock();
        let Some(handle) = handles.get(&id) else {
            return Err(DrehwerkError::NotSubscribed(id.to_string()));
        };

        let result = unregister(handle);
        if matches!(result, Ok(()) | Err(DrehwerkError::NotSubscribed(_))) {
            handles.remove(&id);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_forgets_on_success() {
        let registry = ReceiverRegistry::new();
        let id = SubscriptionId::new();
        registry.insert(id, "receiver");

        let mut seen = None;
        registry
            .release(id, |handle| {
                seen = Some(*handle);
                Ok(())
            })
            .unwrap();
        assert_eq!(seen, Some("receiver"));
        assert!(registry.is_empty());
    }

    #[test]
    fn platform_failure_keeps_handle_for_retry() {
        let registry = ReceiverRegistry::new();
        let id = SubscriptionId::new();
        registry.insert(id, ());

        let err = registry
            .release(id, |_| Err(DrehwerkError::Bridge("failed to attach JNI thread".into())))
            .unwrap_err();
        assert!(matches!(err, DrehwerkError::Bridge(_)));
        assert!(registry.contains(id));

        registry.release(id, |_| Ok(())).unwrap();
        assert!(!registry.contains(id));
    }

    #[test]
    fn platform_not_registered_forgets_handle() {
        let registry = ReceiverRegistry::new();
        let id = SubscriptionId::new();
        registry.insert(id, ());

        let err = registry
            .release(id, |_| Err(DrehwerkError::NotSubscribed(id.to_string())))
            .unwrap_err();
        assert!(matches!(err, DrehwerkError::NotSubscribed(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn unknown_id_skips_platform_call() {
        let registry: ReceiverRegistry<()> = ReceiverRegistry::new();
        let other = SubscriptionId::new();
        registry.insert(SubscriptionId::new(), ());

        let err = registry
            .release(other, |_| panic!("platform must not be asked"))
            .unwrap_err();
        assert!(matches!(err, DrehwerkError::NotSubscribed(_)));
        assert_eq!(registry.len(), 1);
    }
}
