//! Change notifications to cache invalidation.
//!
//! While mounted for a therapist, every change event on that therapist's
//! instances triggers a full re-fetch into the session cache. Event
//! payloads are ignored.

use std::sync::Arc;

use futures::StreamExt;
use praxis_core::models::change::ChangeScope;
use praxis_store::store::{ChangeFeed, ChangeStream, FeedItem};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::EngineError;
use crate::session::TherapistSession;

struct ActiveSubscription {
    therapist_id: Uuid,
    task: JoinHandle<()>,
}

/// Holds at most one open subscription.
pub struct ChangeBridge {
    session: Arc<TherapistSession>,
    feed: Arc<dyn ChangeFeed>,
    active: Mutex<Option<ActiveSubscription>>,
}

impl ChangeBridge {
    pub fn new(session: Arc<TherapistSession>, feed: Arc<dyn ChangeFeed>) -> Self {
        Self {
            session,
            feed,
            active: Mutex::new(None),
        }
    }

    /// Subscribe to `therapist_id`'s instance changes. Any subscription for
    /// a different therapist is closed first; mounting the same therapist
    /// again keeps the open one.
    pub async fn mount(&self, therapist_id: Uuid) -> Result<(), EngineError> {
        let mut active = self.active.lock().await;
        if let Some(current) = active.as_ref()
            && current.therapist_id == therapist_id
            && !current.task.is_finished()
        {
            return Ok(());
        }
        if let Some(previous) = active.take() {
            teardown(previous).await;
        }

        let stream = self
            .feed
            .subscribe(ChangeScope::instances_of(therapist_id))
            .await
            .map_err(EngineError::from_store)?;
        let task = tokio::spawn(relay(Arc::clone(&self.session), therapist_id, stream));
        *active = Some(ActiveSubscription { therapist_id, task });

        tracing::info!(therapist_id = %therapist_id, "change subscription opened");
        Ok(())
    }

    /// Close the open subscription, if any.
    pub async fn unmount(&self) {
        if let Some(previous) = self.active.lock().await.take() {
            teardown(previous).await;
        }
    }

    pub async fn mounted_therapist(&self) -> Option<Uuid> {
        self.active.lock().await.as_ref().map(|a| a.therapist_id)
    }
}

impl Drop for ChangeBridge {
    fn drop(&mut self) {
        if let Some(active) = self.active.get_mut().take() {
            active.task.abort();
        }
    }
}

async fn teardown(subscription: ActiveSubscription) {
    subscription.task.abort();
    // Wait for the task to be dropped so its stream is released.
    let _ = subscription.task.await;
    tracing::info!(
        therapist_id = %subscription.therapist_id,
        "change subscription closed"
    );
}

async fn relay(session: Arc<TherapistSession>, therapist_id: Uuid, mut stream: ChangeStream) {
    while let Some(item) = stream.next().await {
        match &item {
            FeedItem::Event(event) => tracing::debug!(
                therapist_id = %therapist_id,
                kind = ?event.kind,
                record_id = %event.record_id,
                "instance change received"
            ),
            FeedItem::Missed(count) => tracing::debug!(
                therapist_id = %therapist_id,
                missed = count,
                "change feed lagged"
            ),
        }

        if session.cache().therapist_id() == Some(therapist_id) {
            session.load(therapist_id).await;
        } else {
            tracing::debug!(therapist_id = %therapist_id, "change for a therapist not on screen");
        }
    }
    tracing::debug!(therapist_id = %therapist_id, "change feed closed");
}
