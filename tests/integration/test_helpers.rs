// tests/integration/test_helpers.rs

//! Test helpers and utilities for integration tests

use parking_lot::Mutex;
use serde_json::Value;
use socket_hooks::core::EventArgs;
use socket_hooks::core::transport::{MemorySocket, MemoryTransport};
use socket_hooks::hooks::SocketInitializer;
use socket_hooks::{ConnectOptions, InitParams, Listener, SocketHooks};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// TestContext bundles a hooks instance with the in-memory transport behind it
pub struct TestContext {
    pub transport: MemoryTransport,
    pub hooks: SocketHooks,
}

impl TestContext {
    /// Creates a new test context with a base URI
    pub fn new() -> Self {
        Self::with_base_uri(Some(super::fixtures::TEST_URI))
    }

    /// Creates a new test context with a custom (or no) base URI
    pub fn with_base_uri(uri: Option<&str>) -> Self {
        // Initialize tracing (ignore error if already initialized)
        let _ = tracing_subscriber::registry()
            .with(EnvFilter::new("warn"))
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .try_init();

        let transport = MemoryTransport::new();
        let hooks = SocketHooks::new(
            transport.clone(),
            uri.map(str::to_string),
            ConnectOptions::default(),
        );
        Self { transport, hooks }
    }

    /// Mounts an enabled initializer with default params
    pub fn connect(&self) -> SocketInitializer {
        self.hooks
            .init_socket(InitParams::new())
            .expect("initializer should mount")
    }

    /// The most recently opened socket
    pub fn socket(&self) -> Arc<MemorySocket> {
        self.transport
            .last_socket()
            .expect("a socket should have been opened")
    }

    /// Names of everything emitted through the most recent socket
    pub fn emitted_names(&self) -> Vec<String> {
        self.socket()
            .emitted()
            .into_iter()
            .map(|e| e.event)
            .collect()
    }
}

/// Records every invocation of its listener
#[derive(Clone)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<EventArgs>>>,
    listener: Listener,
}

impl Recorder {
    pub fn new() -> Self {
        let calls: Arc<Mutex<Vec<EventArgs>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        let listener = Listener::new(move |args: &[Value]| sink.lock().push(args.to_vec()));
        Self { calls, listener }
    }

    pub fn listener(&self) -> Listener {
        self.listener.clone()
    }

    pub fn calls(&self) -> Vec<EventArgs> {
        self.calls.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.calls.lock().len()
    }
}
