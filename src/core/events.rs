// src/core/events.rs

//! Event names, argument lists and listener callbacks shared by the hooks and
//! the transport boundary.

use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// The argument list carried by an emission or a delivered event.
pub type EventArgs = Vec<Value>;

/// The callback signature of an event listener.
pub type ListenerFn = dyn Fn(&[Value]) + Send + Sync;

/// Lifecycle events the transport emits on its own, in addition to the
/// caller-declared event contract.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum ReservedEvent {
    /// Fired by the transport once the connection is established.
    Connect,
    /// Fired when establishing the connection fails. Carries the error payload verbatim.
    ConnectError,
    /// Fired when the connection closes. Carries the reason.
    Disconnect,
}

impl ReservedEvent {
    /// Returns true if `name` is one of the reserved lifecycle event names.
    pub fn is_reserved(name: &str) -> bool {
        Self::from_str(name).is_ok()
    }

    /// The wire name of this event.
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

impl From<ReservedEvent> for String {
    fn from(event: ReservedEvent) -> Self {
        event.name().to_string()
    }
}

/// A shareable event listener.
///
/// Equality is identity: clones of one `Listener` compare equal, while two
/// listeners built from identical closures do not. Bindings use this to decide
/// whether a listener actually changed between updates.
#[derive(Clone)]
pub struct Listener(Arc<ListenerFn>);

impl Listener {
    pub fn new(callback: impl Fn(&[Value]) + Send + Sync + 'static) -> Self {
        Self(Arc::new(callback))
    }

    /// Invokes the listener with an event's arguments.
    pub fn call(&self, args: &[Value]) {
        (self.0)(args)
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Listener")
            .field(&Arc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}
