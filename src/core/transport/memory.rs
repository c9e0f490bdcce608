// src/core/transport/memory.rs

//! An in-process transport that records everything the hooks do to it.
//!
//! `MemoryTransport` backs the demo binary and the test-suite. Each `connect`
//! produces a [`MemorySocket`] that keeps a listener table, logs every
//! emission, and lets the caller push events at it with
//! [`dispatch`](MemorySocket::dispatch) as if they came from the server.

use crate::core::events::{EventArgs, Listener, ReservedEvent};
use crate::core::options::ConnectOptions;
use crate::core::transport::{Connection, SocketHandle, Transport};
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// The reason reported with `disconnect` when the client closes the socket.
pub const CLIENT_DISCONNECT_REASON: &str = "io client disconnect";

/// An emission recorded by a [`MemorySocket`].
#[derive(Debug, Clone, PartialEq)]
pub struct EmittedEvent {
    pub event: String,
    pub args: EventArgs,
}

/// Records connections opened through it.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    sockets: Arc<Mutex<Vec<Arc<MemorySocket>>>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every socket created so far, oldest first.
    pub fn sockets(&self) -> Vec<Arc<MemorySocket>> {
        self.sockets.lock().clone()
    }

    /// The most recently created socket.
    pub fn last_socket(&self) -> Option<Arc<MemorySocket>> {
        self.sockets.lock().last().cloned()
    }

    pub fn connect_count(&self) -> usize {
        self.sockets.lock().len()
    }

    /// Number of sockets that have not been disconnected.
    pub fn live_count(&self) -> usize {
        self.sockets
            .lock()
            .iter()
            .filter(|socket| socket.is_connected())
            .count()
    }
}

impl Transport for MemoryTransport {
    fn connect(&self, uri: &str, options: &ConnectOptions) -> SocketHandle {
        let socket = Arc::new(MemorySocket::new(uri, options.clone()));
        debug!("Memory transport opened socket to {}", uri);
        self.sockets.lock().push(Arc::clone(&socket));
        socket
    }
}

struct Registration {
    event: String,
    listener: Listener,
    once: bool,
}

/// A fake connection. Listener registration honours `on`/`once`/`off` the way
/// a real event-emitting socket does.
pub struct MemorySocket {
    uri: String,
    options: ConnectOptions,
    connected: AtomicBool,
    listeners: Mutex<Vec<Registration>>,
    emitted: Mutex<Vec<EmittedEvent>>,
}

impl std::fmt::Debug for MemorySocket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySocket")
            .field("uri", &self.uri)
            .field("connected", &self.is_connected())
            .field("listeners", &self.listeners.lock().len())
            .field("emitted", &self.emitted.lock().len())
            .finish()
    }
}

impl MemorySocket {
    pub fn new(uri: impl Into<String>, options: ConnectOptions) -> Self {
        Self {
            uri: uri.into(),
            options,
            connected: AtomicBool::new(true),
            listeners: Mutex::new(Vec::new()),
            emitted: Mutex::new(Vec::new()),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The options this socket was opened with, after merging.
    pub fn options(&self) -> &ConnectOptions {
        &self.options
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Everything emitted through this socket, in order.
    pub fn emitted(&self) -> Vec<EmittedEvent> {
        self.emitted.lock().clone()
    }

    /// Number of listeners attached to `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners
            .lock()
            .iter()
            .filter(|reg| reg.event == event)
            .count()
    }

    /// Delivers `event` to its listeners as if the server had sent it.
    /// Single-shot listeners are detached before they run. Returns the number
    /// of listeners invoked.
    pub fn dispatch(&self, event: &str, args: EventArgs) -> usize {
        let targets: Vec<Listener> = {
            let mut listeners = self.listeners.lock();
            let targets = listeners
                .iter()
                .filter(|reg| reg.event == event)
                .map(|reg| reg.listener.clone())
                .collect();
            listeners.retain(|reg| !(reg.once && reg.event == event));
            targets
        };

        for listener in &targets {
            listener.call(&args);
        }
        targets.len()
    }

    /// Fires the reserved `connect` event.
    pub fn simulate_connect(&self) -> usize {
        self.connected.store(true, Ordering::Release);
        self.dispatch(ReservedEvent::Connect.name(), Vec::new())
    }

    /// Fires the reserved `connect_error` event with `message` as its payload.
    pub fn simulate_connect_error(&self, message: &str) -> usize {
        self.dispatch(
            ReservedEvent::ConnectError.name(),
            vec![json!({ "message": message })],
        )
    }

    fn register(&self, event: &str, listener: Listener, once: bool) {
        self.listeners.lock().push(Registration {
            event: event.to_string(),
            listener,
            once,
        });
    }
}

impl Connection for MemorySocket {
    fn on(&self, event: &str, listener: Listener) {
        self.register(event, listener, false);
    }

    fn once(&self, event: &str, listener: Listener) {
        self.register(event, listener, true);
    }

    fn off(&self, event: &str, listener: &Listener) {
        self.listeners
            .lock()
            .retain(|reg| !(reg.event == event && reg.listener == *listener));
    }

    fn emit(&self, event: &str, args: EventArgs) {
        self.emitted.lock().push(EmittedEvent {
            event: event.to_string(),
            args,
        });
    }

    fn disconnect(&self) {
        if self.connected.swap(false, Ordering::AcqRel) {
            debug!("Memory socket to {} disconnected", self.uri);
            self.dispatch(
                ReservedEvent::Disconnect.name(),
                vec![Value::from(CLIENT_DISCONNECT_REASON)],
            );
        }
    }
}
