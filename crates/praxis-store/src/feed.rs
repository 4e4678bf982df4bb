use futures::StreamExt;
use praxis_core::models::change::{ChangeEvent, ChangeScope};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::store::{BoxFuture, ChangeFeed, ChangeStream, FeedItem, StoreResult};

const DEFAULT_CAPACITY: usize = 256;

/// In-process change feed over a tokio broadcast channel.
#[derive(Clone)]
pub struct BroadcastFeed {
    tx: broadcast::Sender<ChangeEvent>,
}

impl Default for BroadcastFeed {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl BroadcastFeed {
    /// A zero `capacity` is raised to one.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn publish(&self, event: ChangeEvent) {
        // No receivers is not an error: nobody is mounted.
        if self.tx.send(event).is_err() {
            tracing::trace!("change event dropped, no subscribers");
        }
    }

    /// Number of open subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn stream(&self, scope: ChangeScope) -> ChangeStream {
        let rx = self.tx.subscribe();
        futures::stream::unfold((rx, scope), |(mut rx, scope)| async move {
            loop {
                match rx.recv().await {
                    Ok(event) if scope.matches(&event) => {
                        return Some((FeedItem::Event(event), (rx, scope)));
                    }
                    Ok(_) => continue,
                    Err(RecvError::Lagged(missed)) => {
                        return Some((FeedItem::Missed(missed), (rx, scope)));
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        })
        .boxed()
    }
}

impl ChangeFeed for BroadcastFeed {
    fn subscribe(&self, scope: ChangeScope) -> BoxFuture<'_, StoreResult<ChangeStream>> {
        let stream = self.stream(scope);
        Box::pin(async move { Ok(stream) })
    }
}
