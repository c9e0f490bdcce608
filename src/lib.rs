// src/lib.rs

pub mod config;
pub mod core;
pub mod hooks;

// Re-export
pub use crate::core::{ConnectOptions, HooksError, Listener, ReservedEvent};
pub use crate::hooks::{InitParams, SocketHooks};
