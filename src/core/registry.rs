// src/core/registry.rs

//! The lifecycle registry: a single slot holding the current connection, paired
//! with the broadcaster that announces every change to that slot.

use crate::core::broadcast::Broadcaster;
use crate::core::transport::SocketHandle;
use parking_lot::Mutex;
use std::fmt;
use tracing::debug;

/// The payload carried by the registry's broadcaster.
pub type SocketSlot = Option<SocketHandle>;

/// Holds at most one current connection for one hooks instance.
///
/// Only the initializer writes to the slot; every other consumer reads it or
/// listens to the broadcaster.
pub struct LifecycleRegistry {
    current: Mutex<SocketSlot>,
    broadcaster: Broadcaster<SocketSlot>,
}

impl Default for LifecycleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LifecycleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleRegistry")
            .field("connected", &self.is_connected())
            .field("broadcaster", &self.broadcaster)
            .finish()
    }
}

impl LifecycleRegistry {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(None),
            broadcaster: Broadcaster::new(),
        }
    }

    /// Replaces the current connection and notifies every listener before
    /// returning. Returns the handle that was replaced.
    pub fn set_current(&self, handle: SocketSlot) -> SocketSlot {
        let previous = std::mem::replace(&mut *self.current.lock(), handle.clone());
        debug!(
            "Socket registry updated (present: {} -> {})",
            previous.is_some(),
            handle.is_some()
        );
        self.broadcaster.announce(handle);
        previous
    }

    /// The current connection, if any.
    pub fn current(&self) -> SocketSlot {
        self.current.lock().clone()
    }

    pub fn is_connected(&self) -> bool {
        self.current.lock().is_some()
    }

    pub fn broadcaster(&self) -> &Broadcaster<SocketSlot> {
        &self.broadcaster
    }
}
