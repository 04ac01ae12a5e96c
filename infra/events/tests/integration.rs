use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use vitrine_event_bus::*;

#[derive(Clone, Debug, PartialEq, Eq)]
struct PageChanged {
    page: &'static str,
    revision: u32,
}

impl PageChanged {
    const fn new(page: &'static str, revision: u32) -> Self {
        Self { page, revision }
    }
}

impl Notice for PageChanged {
    type Topic = &'static str;

    fn topic(&self) -> Self::Topic {
        self.page
    }
}

fn counter() -> (Arc<AtomicUsize>, impl Fn(&PageChanged) + Send + Sync + 'static) {
    let hits = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&hits);
    (hits, move |_: &PageChanged| {
        seen.fetch_add(1, Ordering::SeqCst);
    })
}

#[test]
fn publish_reaches_only_matching_topic() {
    let bus = NotificationBus::new();
    let (home_hits, home) = counter();
    let (news_hits, news) = counter();
    let _home = bus.subscribe("homepage", home);
    let _news = bus.subscribe("news", news);

    assert_eq!(bus.publish(PageChanged::new("homepage", 1)), 1);
    assert_eq!(home_hits.load(Ordering::SeqCst), 1);
    assert_eq!(news_hits.load(Ordering::SeqCst), 0);
}

#[test]
fn publish_without_subscribers_returns_zero() {
    let bus = NotificationBus::<PageChanged>::new();
    assert_eq!(bus.publish(PageChanged::new("homepage", 1)), 0);
}

#[test]
fn late_subscriber_sees_nothing_from_the_past() {
    let bus = NotificationBus::new();
    bus.publish(PageChanged::new("homepage", 1));

    let (hits, handler) = counter();
    let _sub = bus.subscribe("homepage", handler);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[test]
fn unsubscribe_stops_delivery() {
    let bus = NotificationBus::new();
    let (hits, handler) = counter();
    let sub = bus.subscribe("homepage", handler);

    bus.publish(PageChanged::new("homepage", 1));
    assert!(sub.unsubscribe());
    bus.publish(PageChanged::new("homepage", 2));

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(bus.handler_count(), 0);
}

#[test]
fn dropping_the_guard_unsubscribes_but_detach_keeps_it() {
    let bus = NotificationBus::new();
    let (dropped_hits, dropped) = counter();
    let (kept_hits, kept) = counter();

    drop(bus.subscribe("homepage", dropped));
    bus.subscribe("homepage", kept).detach();

    assert_eq!(bus.publish(PageChanged::new("homepage", 1)), 1);
    assert_eq!(dropped_hits.load(Ordering::SeqCst), 0);
    assert_eq!(kept_hits.load(Ordering::SeqCst), 1);
}

#[test]
fn panicking_handler_does_not_block_others() {
    let bus = NotificationBus::new();
    let (before_hits, before) = counter();
    let (after_hits, after) = counter();

    let _a = bus.subscribe("homepage", before);
    let _b = bus.subscribe("homepage", |_: &PageChanged| panic!("view exploded"));
    let _c = bus.subscribe("homepage", after);

    assert_eq!(bus.publish(PageChanged::new("homepage", 1)), 2, "panicking handler not counted");
    assert_eq!(before_hits.load(Ordering::SeqCst), 1);
    assert_eq!(after_hits.load(Ordering::SeqCst), 1);
}

#[test]
fn wildcard_handlers_see_every_topic_in_order() {
    let bus = NotificationBus::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    let _all = bus.subscribe_all(move |n: &PageChanged| {
        sink.lock().unwrap().push((n.page, n.revision));
    });

    bus.publish(PageChanged::new("homepage", 1));
    bus.publish(PageChanged::new("news", 2));
    bus.publish(PageChanged::new("homepage", 3));

    assert_eq!(*log.lock().unwrap(), vec![("homepage", 1), ("news", 2), ("homepage", 3)]);
}

#[test]
fn handlers_run_on_the_publishing_thread() {
    let bus = NotificationBus::new();
    let caller = std::thread::current().id();
    let same_thread = Arc::new(AtomicUsize::new(0));
    let flag = Arc::clone(&same_thread);
    let _sub = bus.subscribe("homepage", move |_: &PageChanged| {
        if std::thread::current().id() == caller {
            flag.fetch_add(1, Ordering::SeqCst);
        }
    });

    bus.publish(PageChanged::new("homepage", 1));
    assert_eq!(same_thread.load(Ordering::SeqCst), 1);
}

#[test]
fn concurrent_publishers_deliver_every_notice() {
    let bus = NotificationBus::new();
    let (hits, handler) = counter();
    bus.subscribe("homepage", handler).detach();

    std::thread::scope(|scope| {
        for revision in 0..8 {
            let bus = bus.clone();
            scope.spawn(move || {
                for _ in 0..50 {
                    bus.publish(PageChanged::new("homepage", revision));
                }
            });
        }
    });

    assert_eq!(hits.load(Ordering::SeqCst), 400);
}

#[test]
fn shutdown_removes_all_handlers() {
    let bus = NotificationBus::new();
    let (hits, handler) = counter();
    let sub = bus.subscribe("homepage", handler);
    bus.subscribe_all(|_: &PageChanged| {}).detach();

    assert_eq!(bus.shutdown(), 2);
    assert_eq!(bus.publish(PageChanged::new("homepage", 1)), 0);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert!(!sub.unsubscribe(), "already removed by shutdown");
}

#[test]
fn zero_capacity_is_rejected() {
    let err = NotificationBus::<PageChanged>::with_capacity(0).unwrap_err();
    assert!(matches!(err, EventBusError::InvalidCapacity { .. }));
}

#[tokio::test]
async fn stream_receives_published_notices() {
    let bus = NotificationBus::new();
    let mut rx = bus.subscribe_stream();

    bus.publish(PageChanged::new("news", 7));

    let got = rx.next_notice().await.unwrap();
    assert_eq!(*got, PageChanged::new("news", 7));
}

#[tokio::test]
async fn stream_recovers_from_lag() {
    let capacity = 2u32;
    let bus = NotificationBus::with_capacity(capacity as usize).unwrap();
    let mut rx = bus.subscribe_stream();

    let total = 50u32;
    for revision in 0..total {
        bus.publish(PageChanged::new("homepage", revision));
    }

    let first = rx.next_notice().await.unwrap();
    assert!(first.revision >= total - capacity, "skipped to the retained tail");
    let second = rx.next_notice().await.unwrap();
    assert_eq!(second.revision, first.revision + 1);
}

#[tokio::test]
async fn stream_closes_on_shutdown() {
    let bus = NotificationBus::<PageChanged>::new();
    let mut rx = bus.subscribe_stream();
    let _ = bus.shutdown();

    let closed = tokio::time::timeout(Duration::from_secs(1), rx.next_notice()).await.unwrap();
    assert!(closed.is_none());

    let mut late = bus.subscribe_stream();
    assert!(late.next_notice().await.is_none());
}
