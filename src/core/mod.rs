// src/core/mod.rs

//! The building blocks shared by every hook: the broadcaster, the lifecycle
//! registry, the transport boundary and the event vocabulary.

pub mod broadcast;
pub mod errors;
pub mod events;
pub mod options;
pub mod registry;
pub mod transport;

pub use broadcast::{Broadcaster, ListenerId, Subscription};
pub use errors::HooksError;
pub use events::{EventArgs, Listener, ReservedEvent};
pub use options::ConnectOptions;
pub use registry::{LifecycleRegistry, SocketSlot};
pub use transport::{Connection, SocketHandle, Transport, same_handle};
