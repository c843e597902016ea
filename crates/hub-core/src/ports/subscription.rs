//! Subscription handles and listener fan-out.
//!
//! A [`Subscription`] is the receiving end of a backend notification
//! channel. Dropping it unsubscribes: the producer's cancel hook runs and
//! the listener is removed, so a torn-down view never keeps a backend
//! listener alive.

use std::collections::HashMap;
use std::fmt;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;

type CancelHook = Box<dyn FnOnce() + Send>;

/// Live, unbounded sequence of notifications.
pub struct Subscription<T> {
    receiver: mpsc::UnboundedReceiver<T>,
    on_cancel: Option<CancelHook>,
}

impl<T> Subscription<T> {
    /// Wrap a receiver; `on_cancel` runs exactly once when the handle is dropped.
    pub fn new(
        receiver: mpsc::UnboundedReceiver<T>,
        on_cancel: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            receiver,
            on_cancel: Some(Box::new(on_cancel)),
        }
    }

    /// Wait for the next notification. `None` once the producer is gone.
    pub async fn next(&mut self) -> Option<T> {
        self.receiver.recv().await
    }

    /// Take a notification that is already queued, without waiting.
    pub fn try_next(&mut self) -> Option<T> {
        self.receiver.try_recv().ok()
    }

    /// Stop listening. Same as dropping the handle.
    pub fn unsubscribe(self) {}
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(cancel) = self.on_cancel.take() {
            cancel();
        }
    }
}

impl<T> Stream for Subscription<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.receiver.poll_recv(cx)
    }
}

impl<T> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.on_cancel.is_some())
            .finish()
    }
}

struct ListenerSet<T> {
    next_id: u64,
    senders: HashMap<u64, mpsc::UnboundedSender<T>>,
}

/// Fan-out registry used by notification producers.
///
/// Every listener gets its own unbounded queue, so no notification is
/// coalesced or dropped for a slow consumer.
pub struct Listeners<T> {
    inner: Arc<Mutex<ListenerSet<T>>>,
}

impl<T> Clone for Listeners<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for Listeners<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Listeners<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ListenerSet {
                next_id: 0,
                senders: HashMap::new(),
            })),
        }
    }

    /// Number of live listeners.
    pub fn len(&self) -> usize {
        lock(&self.inner).senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send + 'static> Listeners<T> {
    /// Register a listener. `initial` is queued before any later notification.
    pub fn subscribe(&self, initial: Option<T>) -> Subscription<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = {
            let mut set = lock(&self.inner);
            let id = set.next_id;
            set.next_id += 1;
            if let Some(value) = initial {
                // The receiver is alive right here.
                let _ = tx.send(value);
            }
            set.senders.insert(id, tx);
            id
        };

        let registry: Weak<Mutex<ListenerSet<T>>> = Arc::downgrade(&self.inner);
        Subscription::new(rx, move || {
            if let Some(registry) = registry.upgrade() {
                lock(&registry).senders.remove(&id);
                tracing::debug!(listener = id, "Listener removed");
            }
        })
    }

    /// Deliver `value` to every listener. Returns how many received it.
    pub fn notify(&self, value: &T) -> usize {
        let mut set = lock(&self.inner);
        set.senders.retain(|_, tx| tx.send(value.clone()).is_ok());
        set.senders.len()
    }
}

/// Lock a std mutex, recovering the data if a holder panicked.
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
