// src/hooks/emitter.rs

//! Defines the emitter hooks: a stable send function that queues until a
//! connection is available, and the effect-style variants built on it.

use crate::core::events::EventArgs;
use crate::core::registry::LifecycleRegistry;
use crate::core::transport::SocketHandle;
use crate::hooks::observer::SocketObserver;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::mem;
use std::sync::Arc;
use tracing::debug;

/// An emission waiting for a connection.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEmit {
    pub event: String,
    pub args: EventArgs,
}

#[derive(Default)]
struct EmitState {
    /// The connection this emitter last observed.
    socket: Option<SocketHandle>,
    queue: VecDeque<PendingEmit>,
    /// Set while the queue is being drained so that emissions made from
    /// inside the drain line up behind it.
    flushing: bool,
    detached: bool,
}

/// The cloneable send function handed out by an [`Emitter`].
///
/// Every clone shares one pending queue. Emissions go straight to the
/// connection when one is available and nothing is queued ahead of them;
/// otherwise they are queued and flushed, in order and exactly once, when a
/// connection appears.
#[derive(Clone)]
pub struct EmitSender {
    state: Arc<Mutex<EmitState>>,
}

impl fmt::Debug for EmitSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("EmitSender")
            .field("connected", &state.socket.is_some())
            .field("pending", &state.queue.len())
            .field("detached", &state.detached)
            .finish()
    }
}

impl EmitSender {
    /// Sends `event` now if possible, otherwise queues it.
    pub fn emit(&self, event: impl Into<String>, args: EventArgs) {
        let event = event.into();
        let socket = {
            let mut state = self.state.lock();
            if state.detached {
                debug!("Dropping emit of '{}' from an unmounted emitter", event);
                return;
            }
            match &state.socket {
                Some(socket) if !state.flushing && state.queue.is_empty() => Arc::clone(socket),
                _ => {
                    debug!("No socket yet; queueing emit of '{}'", event);
                    state.queue.push_back(PendingEmit { event, args });
                    return;
                }
            }
        };
        socket.emit(&event, args);
    }

    /// Number of emissions waiting for a connection.
    pub fn pending_len(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// A snapshot of the queued emissions, oldest first.
    pub fn pending(&self) -> Vec<PendingEmit> {
        self.state.lock().queue.iter().cloned().collect()
    }
}

/// Records the newly observed connection and, if there is one, drains the queue
/// through it.
fn on_socket_change(state: &Mutex<EmitState>, socket: Option<&SocketHandle>) {
    {
        let mut guard = state.lock();
        guard.socket = socket.cloned();
        if guard.socket.is_none() || guard.flushing {
            return;
        }
        guard.flushing = true;
    }
    flush(state);
}

fn flush(state: &Mutex<EmitState>) {
    let mut flushed = 0usize;
    loop {
        let (socket, batch) = {
            let mut guard = state.lock();
            let socket = match &guard.socket {
                Some(socket) if !guard.queue.is_empty() => Arc::clone(socket),
                _ => {
                    guard.flushing = false;
                    break;
                }
            };
            (socket, mem::take(&mut guard.queue))
        };
        flushed += batch.len();
        for pending in batch {
            socket.emit(&pending.event, pending.args);
        }
    }
    if flushed > 0 {
        debug!("Flushed {} queued emits", flushed);
    }
}

/// A mounted emitter.
///
/// Owns the observer that drives flushing. Dropping the emitter detaches every
/// [`EmitSender`] cloned from it; later emissions through them are discarded.
pub struct Emitter {
    sender: EmitSender,
    _observer: SocketObserver,
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("sender", &self.sender)
            .finish()
    }
}

impl Emitter {
    pub(crate) fn mount(registry: &LifecycleRegistry) -> Self {
        let state: Arc<Mutex<EmitState>> = Arc::default();
        let observer = {
            let state = Arc::clone(&state);
            SocketObserver::watch(registry, move |socket| on_socket_change(&state, socket))
        };
        Self {
            sender: EmitSender { state },
            _observer: observer,
        }
    }

    /// The stable send function.
    pub fn sender(&self) -> EmitSender {
        self.sender.clone()
    }

    pub fn emit(&self, event: impl Into<String>, args: EventArgs) {
        self.sender.emit(event, args)
    }

    pub fn pending_len(&self) -> usize {
        self.sender.pending_len()
    }
}

impl Drop for Emitter {
    fn drop(&mut self) {
        let mut state = self.sender.state.lock();
        state.detached = true;
        state.socket = None;
        if !state.queue.is_empty() {
            debug!(
                "Emitter unmounted with {} emits still queued; discarding them",
                state.queue.len()
            );
            state.queue.clear();
        }
    }
}

/// Emits once when mounted and again each time its dependencies change.
///
/// The emission goes through the effect's own [`Emitter`], so it is queued if
/// no connection exists yet.
pub struct EmitEffect<D> {
    emitter: Emitter,
    deps: D,
    event: String,
    args: EventArgs,
}

/// An [`EmitEffect`] with no dependencies: it emits exactly once per mount.
pub type ImmediateEmit = EmitEffect<()>;

impl<D: fmt::Debug> fmt::Debug for EmitEffect<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmitEffect")
            .field("deps", &self.deps)
            .field("event", &self.event)
            .field("emitter", &self.emitter)
            .finish()
    }
}

impl<D: PartialEq> EmitEffect<D> {
    pub(crate) fn mount(
        registry: &LifecycleRegistry,
        deps: D,
        event: String,
        args: EventArgs,
    ) -> Self {
        let emitter = Emitter::mount(registry);
        emitter.emit(event.clone(), args.clone());
        Self {
            emitter,
            deps,
            event,
            args,
        }
    }

    /// Re-runs the effect. Emits `args` only if `deps` differ from the
    /// previous run; returns whether an emission happened.
    pub fn update(&mut self, deps: D, args: EventArgs) -> bool {
        self.args = args;
        if deps == self.deps {
            return false;
        }
        self.deps = deps;
        self.emitter.emit(self.event.clone(), self.args.clone());
        true
    }

    pub fn deps(&self) -> &D {
        &self.deps
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    pub fn pending_len(&self) -> usize {
        self.emitter.pending_len()
    }
}

impl EmitEffect<()> {
    /// Re-running an immediate emit never emits again.
    pub fn rerun(&mut self) -> bool {
        self.update((), self.args.clone())
    }
}
