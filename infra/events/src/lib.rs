//! # Notification Bus
//!
//! A process-wide publish/subscribe channel that tells live views "re-resolve now".
//!
//! ## Overview
//!
//! [`NotificationBus`] dispatches every published [`Notice`] synchronously to the handlers
//! subscribed to its topic, plus any wildcard handlers. There is no persistence and no
//! buffering: a handler attached after a publish never sees it.
//!
//! ## Features
//!
//! * **Topic routing**: handlers are keyed by [`Notice::Topic`].
//! * **Isolation**: a panicking handler is caught and logged; delivery continues.
//! * **Scoped subscriptions**: [`Subscription`] unsubscribes on drop or explicitly.
//! * **Async streams**: [`NotificationBus::subscribe_stream`] hands out a `tokio` broadcast
//!   receiver for views that prefer to `await` changes.
//! * **Intra-process only**: nothing crosses process (or browser tab) boundaries.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use vitrine_event_bus::{Notice, NotificationBus};
//!
//! #[derive(Clone, Debug)]
//! struct PageChanged(&'static str);
//!
//! impl Notice for PageChanged {
//!     type Topic = &'static str;
//!     fn topic(&self) -> Self::Topic { self.0 }
//! }
//!
//! let bus = NotificationBus::new();
//! let hits = Arc::new(AtomicUsize::new(0));
//! let seen = Arc::clone(&hits);
//! let subscription = bus.subscribe("homepage", move |_: &PageChanged| {
//!     seen.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! assert_eq!(bus.publish(PageChanged("homepage")), 1);
//! assert_eq!(bus.publish(PageChanged("news")), 0);
//! subscription.unsubscribe();
//! assert_eq!(bus.publish(PageChanged("homepage")), 0);
//! assert_eq!(hits.load(Ordering::SeqCst), 1);
//! ```

mod bus;
mod error;
mod receiver;

pub use bus::{DEFAULT_STREAM_CAPACITY, Notice, NotificationBus, Subscription};
pub use error::{EventBusError, EventBusErrorExt};
pub use receiver::EventReceiverExt;
