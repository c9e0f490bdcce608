// src/core/errors.rs

//! Defines the error type surfaced by the hooks.
//!
//! Only misconfiguration is an error. A missing connection is a normal state
//! and is handled by each hook (idle binding, queued emission), while
//! transport-level failures arrive as ordinary `connect_error` events.

use thiserror::Error;

/// Errors returned synchronously to the caller that mounts an initializer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HooksError {
    /// The initializer was enabled but neither the hooks nor the call supplied a URI.
    #[error("provide a uri in either the socket hooks constructor or in init_socket")]
    MissingUri,
}
