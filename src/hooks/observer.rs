// src/hooks/observer.rs

//! Defines `SocketObserver`, a consumer's live view of the current connection.

use crate::core::broadcast::Subscription;
use crate::core::registry::{LifecycleRegistry, SocketSlot};
use crate::core::transport::{SocketHandle, same_handle};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

type ChangeCallback = dyn Fn(Option<&SocketHandle>) + Send + Sync;

/// Resolves to the current connection, or to `None` while there is none.
///
/// The observer reads the registry when it is created and then follows every
/// announcement for as long as it lives, so a consumer created before the
/// connection exists sees it as soon as it is announced. Dropping the
/// observer removes its broadcaster listener.
pub struct SocketObserver {
    resolved: Arc<Mutex<SocketSlot>>,
    _subscription: Subscription,
}

impl fmt::Debug for SocketObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SocketObserver")
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

impl SocketObserver {
    pub(crate) fn new(registry: &LifecycleRegistry) -> Self {
        Self::watch(registry, |_| {})
    }

    /// Creates an observer that also calls `on_change` whenever the resolved
    /// connection changes identity, including once at creation if a
    /// connection already exists.
    pub(crate) fn watch(
        registry: &LifecycleRegistry,
        on_change: impl Fn(Option<&SocketHandle>) + Send + Sync + 'static,
    ) -> Self {
        let resolved: Arc<Mutex<SocketSlot>> = Arc::new(Mutex::new(None));
        let on_change: Arc<ChangeCallback> = Arc::new(on_change);

        let subscription = {
            let resolved = Arc::clone(&resolved);
            let on_change = Arc::clone(&on_change);
            registry
                .broadcaster()
                .subscribe(move |next: &SocketSlot| {
                    if replace_if_changed(&resolved, next) {
                        on_change(next.as_ref());
                    }
                })
        };

        let current = registry.current();
        if replace_if_changed(&resolved, &current) {
            on_change(current.as_ref());
        }

        Self {
            resolved,
            _subscription: subscription,
        }
    }

    /// The resolved connection. Calls without an intervening registry update
    /// return the same handle.
    pub fn current(&self) -> SocketSlot {
        self.resolved.lock().clone()
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.lock().is_some()
    }
}

/// Stores `next` unless it is the handle already held. Returns whether it changed.
fn replace_if_changed(slot: &Mutex<SocketSlot>, next: &SocketSlot) -> bool {
    let mut current = slot.lock();
    if same_handle(current.as_ref(), next.as_ref()) {
        return false;
    }
    *current = next.clone();
    true
}
