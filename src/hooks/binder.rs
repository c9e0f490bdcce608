// src/hooks/binder.rs

//! Defines `EventBinding`, which keeps a listener attached to an event on
//! whatever connection is current.

use crate::core::events::Listener;
use crate::core::registry::LifecycleRegistry;
use crate::core::transport::SocketHandle;
use crate::hooks::observer::SocketObserver;
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::debug;

/// How a binding attaches its listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindMode {
    /// Stays attached until the binding is updated or dropped.
    Persistent,
    /// The transport detaches the listener after its first delivery. The
    /// binding still detaches it on drop in case the event never fired.
    Once,
}

#[derive(Clone)]
struct Target {
    event: String,
    listener: Listener,
}

struct BindingState {
    mode: BindMode,
    target: Target,
    /// The connection and the listener actually registered on it. For a
    /// once-binding that is a wrapper that clears this slot when it fires.
    bound: Option<(SocketHandle, Target)>,
    /// Bumped on every rebind so a once-wrapper from an older attachment
    /// cannot clear a newer one.
    generation: u64,
    torn_down: bool,
}

/// A mounted event binding.
///
/// The listener is attached to the current connection, moved to the new
/// connection whenever the current one changes, and detached when the binding
/// is dropped. With no connection the binding is idle.
pub struct EventBinding {
    state: Arc<Mutex<BindingState>>,
    observer: SocketObserver,
}

impl fmt::Debug for EventBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("EventBinding")
            .field("event", &state.target.event)
            .field("mode", &state.mode)
            .field("bound", &state.bound.is_some())
            .finish()
    }
}

impl EventBinding {
    pub(crate) fn mount(
        registry: &LifecycleRegistry,
        mode: BindMode,
        event: String,
        listener: Listener,
    ) -> Self {
        let state = Arc::new(Mutex::new(BindingState {
            mode,
            target: Target { event, listener },
            bound: None,
            generation: 0,
            torn_down: false,
        }));

        let observer = {
            let state = Arc::clone(&state);
            SocketObserver::watch(registry, move |socket| rebind(&state, socket.cloned()))
        };

        Self { state, observer }
    }

    /// Re-runs the binding with a new event name or listener. If both are
    /// unchanged (the listener compared by identity) nothing happens.
    pub fn update(&mut self, event: impl Into<String>, listener: Listener) {
        let event = event.into();
        {
            let mut state = self.state.lock();
            if state.target.event == event && state.target.listener == listener {
                return;
            }
            state.target = Target { event, listener };
        }
        rebind(&self.state, self.observer.current());
    }

    /// The event name the binding is configured for.
    pub fn event(&self) -> String {
        self.state.lock().target.event.clone()
    }

    pub fn mode(&self) -> BindMode {
        self.state.lock().mode
    }

    /// Whether the listener is currently attached to a connection. A
    /// once-binding stops being bound after its event has been delivered,
    /// until the next connection change re-attaches it.
    pub fn is_bound(&self) -> bool {
        self.state.lock().bound.is_some()
    }

    /// Detaches the listener now instead of at drop.
    pub fn unbind(self) {
        drop(self);
    }
}

impl Drop for EventBinding {
    fn drop(&mut self) {
        let stale = {
            let mut state = self.state.lock();
            state.torn_down = true;
            state.bound.take()
        };
        if let Some((socket, target)) = stale {
            debug!("Unbinding listener from '{}' on teardown", target.event);
            socket.off(&target.event, &target.listener);
        }
    }
}

/// Detaches from the previous connection and attaches to `socket`. The
/// transport is called with no lock held, since listeners it runs may re-enter
/// the binding.
fn rebind(shared: &Arc<Mutex<BindingState>>, socket: Option<SocketHandle>) {
    let (stale, fresh, mode) = {
        let mut state = shared.lock();
        if state.torn_down {
            return;
        }
        state.generation += 1;
        let stale = state.bound.take();
        let fresh = socket.map(|socket| {
            let target = match state.mode {
                BindMode::Persistent => state.target.clone(),
                BindMode::Once => once_target(shared, &state.target, state.generation),
            };
            (socket, target)
        });
        state.bound = fresh.clone();
        (stale, fresh, state.mode)
    };

    if let Some((socket, target)) = stale {
        socket.off(&target.event, &target.listener);
    }
    if let Some((socket, target)) = fresh {
        debug!("Binding listener to '{}' ({:?})", target.event, mode);
        match mode {
            BindMode::Persistent => socket.on(&target.event, target.listener),
            BindMode::Once => socket.once(&target.event, target.listener),
        }
    }
}

/// Wraps a once-listener so that its delivery marks the binding unbound.
fn once_target(shared: &Arc<Mutex<BindingState>>, target: &Target, generation: u64) -> Target {
    let state: Weak<Mutex<BindingState>> = Arc::downgrade(shared);
    let listener = target.listener.clone();
    Target {
        event: target.event.clone(),
        listener: Listener::new(move |args| {
            if let Some(state) = state.upgrade() {
                let mut state = state.lock();
                if state.generation == generation {
                    state.bound = None;
                }
            }
            listener.call(args);
        }),
    }
}
