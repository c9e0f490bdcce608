// src/hooks/initializer.rs

//! Defines `SocketInitializer`, which owns the connection for as long as it is
//! mounted.

use crate::core::errors::HooksError;
use crate::core::options::ConnectOptions;
use crate::core::transport::{SocketHandle, same_handle};
use crate::hooks::HooksInner;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Inputs of an initializer. A change to any of them tears the old connection
/// down and opens a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct InitParams {
    /// Overrides the base URI given to the hooks.
    pub uri: Option<String>,
    /// Shallow-merged over the base options given to the hooks.
    pub options: Option<ConnectOptions>,
    /// When false the initializer does nothing, not even URI validation.
    pub enabled: bool,
}

impl Default for InitParams {
    fn default() -> Self {
        Self {
            uri: None,
            options: None,
            enabled: true,
        }
    }
}

impl InitParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn options(mut self, options: ConnectOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// The mounted initializer.
///
/// While it lives and is enabled, it holds exactly one connection and keeps it
/// published in the registry. Dropping it (or calling
/// [`unmount`](SocketInitializer::unmount)) clears the registry, announces the
/// clearing and then disconnects.
///
/// Because the clearing is announced first, bindings detach from the handle
/// before it disconnects. A listener bound to `disconnect` through the hooks
/// therefore sees server-side disconnects but not this client-side teardown;
/// consumers that need to react to teardown should watch for the handle
/// becoming `None`.
pub struct SocketInitializer {
    hooks: Arc<HooksInner>,
    params: InitParams,
    active: Option<SocketHandle>,
}

impl fmt::Debug for SocketInitializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SocketInitializer")
            .field("params", &self.params)
            .field("active", &self.active.is_some())
            .finish()
    }
}

impl SocketInitializer {
    pub(crate) fn mount(hooks: Arc<HooksInner>, params: InitParams) -> Result<Self, HooksError> {
        let mut initializer = Self {
            hooks,
            params: params.clone(),
            active: None,
        };
        initializer.activate(&params)?;
        Ok(initializer)
    }

    /// Re-runs the initializer with new inputs. Equal inputs are a no-op;
    /// otherwise the current connection is fully torn down before a new one
    /// is opened.
    pub fn update(&mut self, params: InitParams) -> Result<(), HooksError> {
        if params == self.params {
            return Ok(());
        }
        self.teardown();
        self.params = params.clone();
        self.activate(&params)
    }

    /// The connection this initializer opened, if it is active.
    pub fn socket(&self) -> Option<SocketHandle> {
        self.active.clone()
    }

    pub fn params(&self) -> &InitParams {
        &self.params
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Tears the connection down now instead of at drop.
    pub fn unmount(mut self) {
        self.teardown();
    }

    fn activate(&mut self, params: &InitParams) -> Result<(), HooksError> {
        if !params.enabled {
            debug!("Socket initializer is disabled; skipping connection.");
            return Ok(());
        }

        let uri = params
            .uri
            .as_deref()
            .or(self.hooks.base_uri.as_deref())
            .ok_or(HooksError::MissingUri)?;
        let options = self.hooks.base_options.merged(params.options.as_ref());

        if let Some(displaced) = self.hooks.registry.current() {
            warn!("A socket was already active for these hooks; disconnecting the older one.");
            displaced.disconnect();
        }

        debug!("Opening socket connection to {}", uri);
        let handle = self.hooks.transport.connect(uri, &options);
        self.active = Some(Arc::clone(&handle));
        self.hooks.registry.set_current(Some(handle));
        Ok(())
    }

    fn teardown(&mut self) {
        let Some(handle) = self.active.take() else {
            return;
        };

        let registry = &self.hooks.registry;
        if same_handle(registry.current().as_ref(), Some(&handle)) {
            registry.set_current(None);
        } else {
            debug!("Socket was superseded by another initializer; leaving the registry alone.");
        }
        handle.disconnect();
        debug!("Socket connection torn down.");
    }
}

impl Drop for SocketInitializer {
    fn drop(&mut self) {
        self.teardown();
    }
}
