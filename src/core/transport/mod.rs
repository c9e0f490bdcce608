// src/core/transport/mod.rs

//! The boundary between the hooks and the network transport.
//!
//! The hooks never speak a wire protocol. They create one connection through a
//! [`Transport`], hand out [`SocketHandle`]s to consumers, and call the
//! registration and emission methods of [`Connection`]. All of these calls are
//! expected to return immediately; delivery of events may happen later, on
//! whatever schedule the transport uses.

use crate::core::events::{EventArgs, Listener};
use crate::core::options::ConnectOptions;
use std::sync::Arc;

pub mod memory;

pub use memory::{EmittedEvent, MemorySocket, MemoryTransport};

/// One live connection.
pub trait Connection: Send + Sync {
    /// Attaches `listener` to `event` until it is removed with [`off`](Connection::off).
    fn on(&self, event: &str, listener: Listener);

    /// Attaches `listener` to `event` for a single delivery.
    fn once(&self, event: &str, listener: Listener);

    /// Detaches `listener` from `event`. Unknown pairs are ignored.
    fn off(&self, event: &str, listener: &Listener);

    /// Sends `event` with `args` to the remote peer.
    fn emit(&self, event: &str, args: EventArgs);

    /// Closes the connection.
    fn disconnect(&self);
}

/// A shared reference to the current connection.
pub type SocketHandle = Arc<dyn Connection>;

/// Factory for connections.
pub trait Transport: Send + Sync {
    /// Opens a connection to `uri`. Failures to reach the peer are reported by
    /// the connection as `connect_error` events, not as a return value.
    fn connect(&self, uri: &str, options: &ConnectOptions) -> SocketHandle;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn connect(&self, uri: &str, options: &ConnectOptions) -> SocketHandle {
        (**self).connect(uri, options)
    }
}

/// Identity comparison for optional handles. Two handles are the same only if
/// they point at the same connection.
pub fn same_handle(a: Option<&SocketHandle>, b: Option<&SocketHandle>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}
