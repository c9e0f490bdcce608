// src/core/broadcast.rs

//! A typed, synchronous publish/subscribe primitive.
//!
//! The `Broadcaster` decouples the producer of "connection changed" notices
//! (the initializer) from any number of consumers. Fan-out happens on the
//! caller's thread before `announce` returns, and no internal lock is held
//! while listeners run, so listeners are free to subscribe, unsubscribe or
//! announce again from inside a callback.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// Identifies a listener registered with [`Broadcaster::listen`].
pub type ListenerId = u64;

type Callback<T> = dyn Fn(&T) + Send + Sync;

/// A registered listener. `active` is cleared on removal so a listener that is
/// unsubscribed in the middle of a fan-out round is skipped for the rest of it.
struct Entry<T> {
    id: ListenerId,
    active: AtomicBool,
    callback: Box<Callback<T>>,
}

struct Inner<T> {
    listeners: Mutex<Vec<Arc<Entry<T>>>>,
    /// Values waiting to be fanned out. Only the outermost `announce` drains it.
    pending: Mutex<VecDeque<T>>,
    delivering: AtomicBool,
    next_id: AtomicU64,
}

/// A cloneable handle to one shared listener list.
///
/// Every value passed to [`announce`](Broadcaster::announce) reaches every
/// listener registered at that time, in announcement order. An `announce`
/// issued from inside a listener is queued and delivered once the current
/// value has reached all listeners.
pub struct Broadcaster<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Broadcaster<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Broadcaster<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Broadcaster")
            .field("listeners", &self.inner.listeners.lock().len())
            .field("pending", &self.inner.pending.lock().len())
            .finish()
    }
}

impl<T: Clone + Send + Sync + 'static> Default for Broadcaster<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync + 'static> Broadcaster<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                listeners: Mutex::new(Vec::new()),
                pending: Mutex::new(VecDeque::new()),
                delivering: AtomicBool::new(false),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Registers `callback` and returns its id for a later [`unlisten`](Self::unlisten).
    pub fn listen(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> ListenerId {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners.lock().push(Arc::new(Entry {
            id,
            active: AtomicBool::new(true),
            callback: Box::new(callback),
        }));
        id
    }

    /// Removes a listener. Unknown ids are ignored, so this is safe to call twice.
    pub fn unlisten(&self, id: ListenerId) {
        remove_listener(&self.inner, id);
    }

    /// Registers `callback` and returns a guard that removes it when dropped.
    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let id = self.listen(callback);
        let inner: Weak<Inner<T>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = inner.upgrade() {
                remove_listener(&inner, id);
            }
        })
    }

    /// Delivers `value` to every registered listener.
    pub fn announce(&self, value: T) {
        {
            let mut pending = self.inner.pending.lock();
            pending.push_back(value);
            // A fan-out is already running further up the stack; it will pick this up.
            if self.inner.delivering.swap(true, Ordering::AcqRel) {
                return;
            }
        }

        let _guard = DeliveryGuard(&self.inner);
        loop {
            let value = {
                let mut pending = self.inner.pending.lock();
                match pending.pop_front() {
                    Some(value) => value,
                    None => {
                        self.inner.delivering.store(false, Ordering::Release);
                        return;
                    }
                }
            };

            let snapshot: Vec<Arc<Entry<T>>> = self.inner.listeners.lock().clone();
            for entry in snapshot {
                if entry.active.load(Ordering::Acquire) {
                    (entry.callback)(&value);
                }
            }
        }
    }

    /// Number of currently registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }
}

fn remove_listener<T>(inner: &Inner<T>, id: ListenerId) {
    let mut listeners = inner.listeners.lock();
    if let Some(pos) = listeners.iter().position(|entry| entry.id == id) {
        let entry = listeners.remove(pos);
        entry.active.store(false, Ordering::Release);
    }
}

/// Resets the fan-out state if a listener panics mid round: values queued by
/// the aborted round are dropped and the delivering flag is cleared, so the
/// next announcement delivers only its own value.
struct DeliveryGuard<'a, T>(&'a Inner<T>);

impl<T> Drop for DeliveryGuard<'_, T> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            let mut pending = self.0.pending.lock();
            pending.clear();
            self.0.delivering.store(false, Ordering::Release);
        }
    }
}

/// An RAII guard for a registration. Dropping it (or calling
/// [`unsubscribe`](Subscription::unsubscribe)) removes the registration
/// immediately.
#[must_use = "dropping a Subscription unsubscribes it immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub(crate) fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
