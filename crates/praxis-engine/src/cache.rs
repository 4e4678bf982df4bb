//! Session cache of a therapist's instance list.
//!
//! Every commit replaces the whole list. Each fetch holds a [`FetchToken`];
//! starting a newer fetch supersedes all older tokens, and a superseded
//! token's commit is dropped so a slow response for a previous therapist
//! can never overwrite a newer one.

use std::sync::{Arc, Mutex};

use praxis_core::models::instance::InstanceView;
use tokio::sync::watch;
use uuid::Uuid;

use crate::error::EngineError;

#[derive(Debug, Clone, Default)]
pub struct CacheSnapshot {
    pub therapist_id: Option<Uuid>,
    pub instances: Arc<Vec<InstanceView>>,
    /// Failure of the last committed fetch. Cleared by the next success.
    pub error: Option<EngineError>,
    pub loading: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchToken {
    generation: u64,
    therapist_id: Uuid,
}

impl FetchToken {
    pub fn therapist_id(&self) -> Uuid {
        self.therapist_id
    }
}

pub struct InstanceCache {
    generation: Mutex<u64>,
    tx: watch::Sender<CacheSnapshot>,
}

impl Default for InstanceCache {
    fn default() -> Self {
        let (tx, _) = watch::channel(CacheSnapshot::default());
        Self {
            generation: Mutex::new(0),
            tx,
        }
    }
}

impl InstanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fetch for `therapist_id`, superseding any fetch in flight.
    /// Switching therapist drops the previous therapist's list at once.
    pub fn begin(&self, therapist_id: Uuid) -> FetchToken {
        let mut generation = self.lock();
        *generation += 1;
        self.tx.send_modify(|snapshot| {
            if snapshot.therapist_id != Some(therapist_id) {
                *snapshot = CacheSnapshot {
                    therapist_id: Some(therapist_id),
                    ..CacheSnapshot::default()
                };
            }
            snapshot.loading = true;
        });
        FetchToken {
            generation: *generation,
            therapist_id,
        }
    }

    pub fn is_current(&self, token: &FetchToken) -> bool {
        *self.lock() == token.generation
    }

    /// Publish a fetch result. Returns `false`, and changes nothing, when
    /// the token has been superseded. A failed fetch leaves an empty list.
    pub fn commit(
        &self,
        token: FetchToken,
        result: Result<Vec<InstanceView>, EngineError>,
    ) -> bool {
        let generation = self.lock();
        if *generation != token.generation {
            tracing::debug!(
                therapist_id = %token.therapist_id,
                "discarding result of superseded fetch"
            );
            return false;
        }

        let (instances, error) = match result {
            Ok(instances) => (instances, None),
            Err(e) => (Vec::new(), Some(e)),
        };
        self.tx.send_replace(CacheSnapshot {
            therapist_id: Some(token.therapist_id),
            instances: Arc::new(instances),
            error,
            loading: false,
        });
        true
    }

    /// Give up on a fetch that will never commit. If it is still the
    /// current one, the snapshot stops loading and keeps its last list.
    pub fn abandon(&self, token: FetchToken) -> bool {
        let generation = self.lock();
        if *generation != token.generation {
            return false;
        }
        tracing::debug!(therapist_id = %token.therapist_id, "fetch abandoned before commit");
        self.tx.send_modify(|snapshot| snapshot.loading = false);
        true
    }

    /// Forget everything and supersede any fetch in flight.
    pub fn clear(&self) {
        let mut generation = self.lock();
        *generation += 1;
        self.tx.send_replace(CacheSnapshot::default());
    }

    pub fn snapshot(&self) -> CacheSnapshot {
        self.tx.borrow().clone()
    }

    pub fn therapist_id(&self) -> Option<Uuid> {
        self.tx.borrow().therapist_id
    }

    /// Receive every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<CacheSnapshot> {
        self.tx.subscribe()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, u64> {
        self.generation.lock().unwrap_or_else(|p| p.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn superseded_fetch_is_discarded() {
        let cache = InstanceCache::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        let stale = cache.begin(a);
        let fresh = cache.begin(b);
        assert!(!cache.is_current(&stale));

        assert!(cache.commit(fresh, Ok(Vec::new())));
        assert!(!cache.commit(stale, Err(EngineError::FetchFailed("late".to_string()))));

        let snapshot = cache.snapshot();
        assert_eq!(snapshot.therapist_id, Some(b));
        assert!(snapshot.error.is_none());
        assert!(!snapshot.loading);
    }

    #[test]
    fn failed_fetch_replaces_list_with_empty_and_error() {
        let cache = InstanceCache::new();
        let therapist = Uuid::new_v4();
        let token = cache.begin(therapist);
        let err = EngineError::Configuration("recursive policy".to_string());

        assert!(cache.commit(token, Err(err.clone())));

        let snapshot = cache.snapshot();
        assert!(snapshot.instances.is_empty());
        assert_eq!(snapshot.error, Some(err));
    }

    #[test]
    fn switching_therapist_drops_previous_list_immediately() {
        let cache = InstanceCache::new();
        let first = Uuid::new_v4();
        let token = cache.begin(first);
        cache.commit(token, Err(EngineError::FetchFailed("x".to_string())));

        cache.begin(Uuid::new_v4());
        let snapshot = cache.snapshot();
        assert!(snapshot.loading);
        assert!(snapshot.error.is_none());
        assert_ne!(snapshot.therapist_id, Some(first));
    }

    #[test]
    fn abandoned_fetch_stops_loading_and_keeps_list() {
        let cache = InstanceCache::new();
        let therapist = Uuid::new_v4();
        let first = cache.begin(therapist);
        cache.commit(first, Err(EngineError::FetchFailed("reset".to_string())));

        let second = cache.begin(therapist);
        assert!(cache.snapshot().loading);
        assert!(cache.abandon(second));

        let snapshot = cache.snapshot();
        assert!(!snapshot.loading);
        assert_eq!(snapshot.therapist_id, Some(therapist));
        assert!(snapshot.error.is_some());
    }

    #[test]
    fn abandoning_a_superseded_fetch_changes_nothing() {
        let cache = InstanceCache::new();
        let stale = cache.begin(Uuid::new_v4());
        cache.begin(Uuid::new_v4());

        assert!(!cache.abandon(stale));
        assert!(cache.snapshot().loading);
    }

    #[test]
    fn clear_supersedes_in_flight_fetch() {
        let cache = InstanceCache::new();
        let token = cache.begin(Uuid::new_v4());
        cache.clear();
        assert!(!cache.commit(token, Ok(Vec::new())));
        assert_eq!(cache.therapist_id(), None);
    }
}
