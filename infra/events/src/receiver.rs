use crate::bus::Notice;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Lag-tolerant receive for notice streams obtained from
/// [`NotificationBus::subscribe_stream`](crate::NotificationBus::subscribe_stream).
///
/// A slow view that falls behind skips to the oldest retained notice instead of erroring;
/// for "re-resolve now" signals only the fact that something changed matters.
pub trait EventReceiverExt<N> {
    /// Receive the next notice, returning `None` once the bus is shut down or dropped.
    fn next_notice(&mut self) -> impl Future<Output = Option<Arc<N>>> + Send;
}

impl<N: Notice> EventReceiverExt<N> for broadcast::Receiver<Arc<N>> {
    async fn next_notice(&mut self) -> Option<Arc<N>> {
        let mut skipped = 0u64;

        loop {
            match self.recv().await {
                Ok(notice) => {
                    if skipped > 0 {
                        warn!(
                            notice = std::any::type_name::<N>(),
                            skipped, "Notice stream lagged; continuing from oldest retained notice"
                        );
                    }
                    return Some(notice);
                },
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    skipped = skipped.saturating_add(n);
                    debug!(
                        notice = std::any::type_name::<N>(),
                        skipped = n,
                        total_skipped = skipped,
                        "Notice stream lagged; accumulating skipped notices"
                    );
                },
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
