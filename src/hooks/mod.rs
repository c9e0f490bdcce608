// src/hooks/mod.rs

//! The hooks bundle: one shared connection, many independent consumers.
//!
//! A [`SocketHooks`] instance owns its own lifecycle registry and broadcaster,
//! so several instances never interfere with one another. Each consumer it
//! hands out models a mounted component: creating it is the mount, its
//! `update` method is a re-render with new inputs, and dropping it is the
//! unmount.

mod binder;
mod emitter;
mod initializer;
mod observer;

pub use binder::{BindMode, EventBinding};
pub use emitter::{EmitEffect, EmitSender, Emitter, ImmediateEmit, PendingEmit};
pub use initializer::{InitParams, SocketInitializer};
pub use observer::SocketObserver;

use crate::config::HooksConfig;
use crate::core::broadcast::Broadcaster;
use crate::core::errors::HooksError;
use crate::core::events::{EventArgs, Listener};
use crate::core::options::ConnectOptions;
use crate::core::registry::{LifecycleRegistry, SocketSlot};
use crate::core::transport::{SocketHandle, Transport};
use std::fmt;
use std::sync::Arc;

/// State shared by every clone of a [`SocketHooks`] and every consumer it creates.
pub(crate) struct HooksInner {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) base_uri: Option<String>,
    pub(crate) base_options: ConnectOptions,
    pub(crate) registry: LifecycleRegistry,
}

impl fmt::Debug for HooksInner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HooksInner")
            .field("base_uri", &self.base_uri)
            .field("base_options", &self.base_options)
            .field("registry", &self.registry)
            .finish()
    }
}

/// The adapter bundle. Cheap to clone; all clones share one registry.
#[derive(Clone, Debug)]
pub struct SocketHooks {
    inner: Arc<HooksInner>,
}

impl SocketHooks {
    /// Creates hooks over `transport` with an optional base URI and base options.
    pub fn new(
        transport: impl Transport + 'static,
        base_uri: Option<String>,
        base_options: ConnectOptions,
    ) -> Self {
        Self {
            inner: Arc::new(HooksInner {
                transport: Arc::new(transport),
                base_uri,
                base_options,
                registry: LifecycleRegistry::new(),
            }),
        }
    }

    pub fn builder(transport: impl Transport + 'static) -> SocketHooksBuilder {
        SocketHooksBuilder {
            transport: Arc::new(transport),
            base_uri: None,
            base_options: ConnectOptions::default(),
        }
    }

    /// Creates hooks whose base URI and options come from a loaded config.
    pub fn from_config(config: &HooksConfig, transport: impl Transport + 'static) -> Self {
        Self::new(transport, config.uri.clone(), config.options.clone())
    }

    /// Mounts an initializer. Fails if it is enabled and no URI can be resolved.
    pub fn init_socket(&self, params: InitParams) -> Result<SocketInitializer, HooksError> {
        SocketInitializer::mount(Arc::clone(&self.inner), params)
    }

    /// Mounts an observer of the current connection.
    pub fn observe(&self) -> SocketObserver {
        SocketObserver::new(&self.inner.registry)
    }

    /// Keeps `listener` attached to `event` on the current connection.
    pub fn on(&self, event: impl Into<String>, listener: Listener) -> EventBinding {
        EventBinding::mount(
            &self.inner.registry,
            BindMode::Persistent,
            event.into(),
            listener,
        )
    }

    /// Attaches `listener` to the next delivery of `event`.
    pub fn once(&self, event: impl Into<String>, listener: Listener) -> EventBinding {
        EventBinding::mount(&self.inner.registry, BindMode::Once, event.into(), listener)
    }

    /// Mounts an emitter with its own pending queue.
    pub fn emitter(&self) -> Emitter {
        Emitter::mount(&self.inner.registry)
    }

    /// Emits `event` once for the lifetime of the returned guard.
    pub fn immediate_emit(&self, event: impl Into<String>, args: EventArgs) -> ImmediateEmit {
        EmitEffect::mount(&self.inner.registry, (), event.into(), args)
    }

    /// Emits `event` now and again whenever the dependencies passed to
    /// [`EmitEffect::update`] change.
    pub fn emit_effect<D: PartialEq>(
        &self,
        deps: D,
        event: impl Into<String>,
        args: EventArgs,
    ) -> EmitEffect<D> {
        EmitEffect::mount(&self.inner.registry, deps, event.into(), args)
    }

    /// The last-known connection.
    pub fn socket(&self) -> Option<SocketHandle> {
        self.inner.registry.current()
    }

    /// The broadcaster that announces every connection change.
    pub fn broadcaster(&self) -> &Broadcaster<SocketSlot> {
        self.inner.registry.broadcaster()
    }

    pub fn base_uri(&self) -> Option<&str> {
        self.inner.base_uri.as_deref()
    }

    pub fn base_options(&self) -> &ConnectOptions {
        &self.inner.base_options
    }
}

/// Builder for [`SocketHooks`].
pub struct SocketHooksBuilder {
    transport: Arc<dyn Transport>,
    base_uri: Option<String>,
    base_options: ConnectOptions,
}

impl SocketHooksBuilder {
    pub fn base_uri(mut self, uri: impl Into<String>) -> Self {
        self.base_uri = Some(uri.into());
        self
    }

    pub fn base_options(mut self, options: ConnectOptions) -> Self {
        self.base_options = options;
        self
    }

    pub fn build(self) -> SocketHooks {
        SocketHooks {
            inner: Arc::new(HooksInner {
                transport: self.transport,
                base_uri: self.base_uri,
                base_options: self.base_options,
                registry: LifecycleRegistry::new(),
            }),
        }
    }
}
