use crate::error::EventBusError;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::fmt;
use std::hash::Hash;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Weak};
use tokio::sync::broadcast;
use tracing::{debug, trace, warn};

/// Buffer size of the async notice stream.
/// Views only need the latest "something changed", so a small ring is plenty.
pub const DEFAULT_STREAM_CAPACITY: usize = 128;
const MIN_CAPACITY: usize = 1;

/// A payload that can travel across a [`NotificationBus`].
///
/// The topic decides which handlers run; wildcard handlers see every notice.
pub trait Notice: Send + Sync + 'static {
    /// Routing key handlers subscribe to.
    type Topic: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static;

    /// Returns the topic this notice is dispatched under.
    fn topic(&self) -> Self::Topic;
}

type Handler<N> = Arc<dyn Fn(&N) + Send + Sync>;

/// Which handler list a subscription lives in.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Slot<T> {
    Topic(T),
    Wildcard,
}

struct Registry<N: Notice> {
    next_id: u64,
    topics: FxHashMap<N::Topic, Vec<(u64, Handler<N>)>>,
    wildcard: Vec<(u64, Handler<N>)>,
}

impl<N: Notice> Registry<N> {
    fn new() -> Self {
        Self { next_id: 0, topics: FxHashMap::default(), wildcard: Vec::new() }
    }

    fn insert(&mut self, slot: &Slot<N::Topic>, handler: Handler<N>) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        match slot {
            Slot::Topic(topic) => self.topics.entry(topic.clone()).or_default().push((id, handler)),
            Slot::Wildcard => self.wildcard.push((id, handler)),
        }
        id
    }

    fn remove(&mut self, slot: &Slot<N::Topic>, id: u64) -> bool {
        match slot {
            Slot::Topic(topic) => {
                let Some(handlers) = self.topics.get_mut(topic) else {
                    return false;
                };
                let before = handlers.len();
                handlers.retain(|(hid, _)| *hid != id);
                let removed = handlers.len() != before;
                if handlers.is_empty() {
                    self.topics.remove(topic);
                }
                removed
            },
            Slot::Wildcard => {
                let before = self.wildcard.len();
                self.wildcard.retain(|(hid, _)| *hid != id);
                self.wildcard.len() != before
            },
        }
    }

    fn snapshot(&self, topic: &N::Topic) -> Vec<Handler<N>> {
        self.topics
            .get(topic)
            .into_iter()
            .flatten()
            .chain(self.wildcard.iter())
            .map(|(_, handler)| Arc::clone(handler))
            .collect()
    }

    fn len(&self) -> usize {
        self.topics.values().map(Vec::len).sum::<usize>() + self.wildcard.len()
    }
}

struct BusInner<N: Notice> {
    registry: RwLock<Registry<N>>,
    stream: RwLock<Option<broadcast::Sender<Arc<N>>>>,
    capacity: usize,
}

/// A thread-safe, synchronous publish/subscribe hub.
///
/// Cloning is cheap; every clone shares the same handler registry.
pub struct NotificationBus<N: Notice> {
    inner: Arc<BusInner<N>>,
}

impl<N: Notice> Clone for NotificationBus<N> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<N: Notice> Default for NotificationBus<N> {
    fn default() -> Self {
        Self::from_capacity(DEFAULT_STREAM_CAPACITY)
    }
}

impl<N: Notice> fmt::Debug for NotificationBus<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationBus")
            .field("handlers", &self.inner.registry.read().len())
            .field("stream_capacity", &self.inner.capacity)
            .field("open", &self.inner.stream.read().is_some())
            .finish()
    }
}

impl<N: Notice> NotificationBus<N> {
    /// Creates an empty bus with the default stream capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty bus whose async stream buffers `capacity` notices per receiver.
    ///
    /// # Errors
    /// Returns [`EventBusError::InvalidCapacity`] if `capacity` is zero.
    ///
    /// # Examples
    /// ```rust
    /// use vitrine_event_bus::{Notice, NotificationBus};
    ///
    /// #[derive(Debug)]
    /// struct Tick;
    /// impl Notice for Tick {
    ///     type Topic = ();
    ///     fn topic(&self) {}
    /// }
    ///
    /// assert!(NotificationBus::<Tick>::with_capacity(0).is_err());
    /// assert!(NotificationBus::<Tick>::with_capacity(4).is_ok());
    /// ```
    pub fn with_capacity(capacity: usize) -> Result<Self, EventBusError> {
        if capacity < MIN_CAPACITY {
            return Err(EventBusError::InvalidCapacity {
                message: format!("capacity must be >= {MIN_CAPACITY}").into(),
                context: None,
            });
        }
        Ok(Self::from_capacity(capacity))
    }

    fn from_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            inner: Arc::new(BusInner {
                registry: RwLock::new(Registry::new()),
                stream: RwLock::new(Some(tx)),
                capacity,
            }),
        }
    }

    /// Registers `handler` for notices published under `topic`.
    ///
    /// The returned guard unsubscribes when dropped; call [`Subscription::detach`] to keep
    /// the handler for the lifetime of the bus.
    #[must_use = "dropping the subscription unsubscribes the handler immediately"]
    pub fn subscribe<F>(&self, topic: N::Topic, handler: F) -> Subscription<N>
    where
        F: Fn(&N) + Send + Sync + 'static,
    {
        trace!(?topic, "Subscribing handler");
        self.attach(Slot::Topic(topic), Arc::new(handler))
    }

    /// Registers `handler` for every notice regardless of topic.
    #[must_use = "dropping the subscription unsubscribes the handler immediately"]
    pub fn subscribe_all<F>(&self, handler: F) -> Subscription<N>
    where
        F: Fn(&N) + Send + Sync + 'static,
    {
        trace!("Subscribing wildcard handler");
        self.attach(Slot::Wildcard, Arc::new(handler))
    }

    /// Returns a receiver that yields every notice published after this call.
    ///
    /// After [`NotificationBus::shutdown`] the returned receiver is already closed.
    #[must_use]
    pub fn subscribe_stream(&self) -> broadcast::Receiver<Arc<N>> {
        if let Some(tx) = self.inner.stream.read().as_ref() {
            return tx.subscribe();
        }
        let (tx, rx) = broadcast::channel(MIN_CAPACITY);
        drop(tx);
        rx
    }

    /// Dispatches `notice` to every handler currently subscribed to its topic, then to
    /// wildcard handlers, then to async streams.
    ///
    /// Handlers run on the caller's thread, outside the registry lock, so a handler may
    /// subscribe or unsubscribe without deadlocking. A panicking handler is logged and
    /// skipped.
    ///
    /// Returns the number of handlers that completed without panicking.
    pub fn publish(&self, notice: N) -> usize {
        let topic = notice.topic();
        let handlers = self.inner.registry.read().snapshot(&topic);

        let mut delivered = 0usize;
        for handler in &handlers {
            match catch_unwind(AssertUnwindSafe(|| handler(&notice))) {
                Ok(()) => delivered += 1,
                Err(payload) => {
                    let reason = panic_message(payload.as_ref());
                    warn!(?topic, reason, "Notification handler panicked; continuing delivery");
                },
            }
        }

        let streams = self
            .inner
            .stream
            .read()
            .as_ref()
            .and_then(|tx| tx.send(Arc::new(notice)).ok())
            .unwrap_or(0);

        trace!(?topic, handlers = handlers.len(), delivered, streams, "Notice dispatched");
        delivered
    }

    /// Number of handlers currently registered, wildcard included.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.inner.registry.read().len()
    }

    /// Drops every handler and closes all async streams.
    ///
    /// Returns the number of handlers that were removed. Publishing afterwards is a no-op.
    #[must_use]
    pub fn shutdown(&self) -> usize {
        let removed = {
            let mut registry = self.inner.registry.write();
            let count = registry.len();
            registry.topics.clear();
            registry.wildcard.clear();
            count
        };
        self.inner.stream.write().take();
        debug!(removed, "Notification bus shut down");
        removed
    }

    fn attach(&self, slot: Slot<N::Topic>, handler: Handler<N>) -> Subscription<N> {
        let id = self.inner.registry.write().insert(&slot, handler);
        Subscription { bus: Arc::downgrade(&self.inner), slot, id, active: true }
    }
}

/// Guard returned by [`NotificationBus::subscribe`] and [`NotificationBus::subscribe_all`].
pub struct Subscription<N: Notice> {
    bus: Weak<BusInner<N>>,
    slot: Slot<N::Topic>,
    id: u64,
    active: bool,
}

impl<N: Notice> Subscription<N> {
    /// Removes the handler. Returns `false` if it was already gone (bus shut down or dropped).
    pub fn unsubscribe(mut self) -> bool {
        self.release()
    }

    /// Keeps the handler registered for as long as the bus lives.
    pub fn detach(mut self) {
        self.active = false;
    }

    fn release(&mut self) -> bool {
        if !std::mem::replace(&mut self.active, false) {
            return false;
        }
        self.bus.upgrade().is_some_and(|inner| inner.registry.write().remove(&self.slot, self.id))
    }
}

impl<N: Notice> Drop for Subscription<N> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<N: Notice> fmt::Debug for Subscription<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("slot", &self.slot)
            .field("id", &self.id)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&'static str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct Ping(u8);

    impl Notice for Ping {
        type Topic = u8;
        fn topic(&self) -> u8 {
            self.0
        }
    }

    #[test]
    fn registry_drops_empty_topic_lists() {
        let bus = NotificationBus::<Ping>::new();
        let sub = bus.subscribe(1, |_| {});
        assert_eq!(bus.handler_count(), 1);
        assert!(sub.unsubscribe());
        assert!(bus.inner.registry.read().topics.is_empty());
    }

    #[test]
    fn handler_may_subscribe_during_dispatch() {
        let bus = NotificationBus::<Ping>::new();
        let nested = Arc::new(AtomicUsize::new(0));
        let inner_bus = bus.clone();
        let counter = Arc::clone(&nested);
        bus.subscribe(1, move |_| {
            let c = Arc::clone(&counter);
            inner_bus.subscribe(2, move |_| {
                c.fetch_add(1, Ordering::SeqCst);
            })
            .detach();
        })
        .detach();

        assert_eq!(bus.publish(Ping(1)), 1);
        assert_eq!(bus.publish(Ping(2)), 1);
        assert_eq!(nested.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn subscription_outliving_bus_is_harmless() {
        let bus = NotificationBus::<Ping>::new();
        let sub = bus.subscribe(3, |_| {});
        drop(bus);
        assert!(!sub.unsubscribe());
    }
}
