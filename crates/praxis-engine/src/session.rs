use std::sync::Arc;

use praxis_core::models::instance::{Instance, InstanceStatus};
use uuid::Uuid;

use crate::assignment::AssignmentOptions;
use crate::cache::{CacheSnapshot, FetchToken, InstanceCache};
use crate::engine::AssessmentEngine;
use crate::error::EngineError;

/// One dashboard session's view of a therapist's instances.
///
/// Only list fetches write the cache. Mutations go to the store and are
/// followed by a full re-fetch; there is no local patching.
pub struct TherapistSession {
    engine: Arc<AssessmentEngine>,
    cache: InstanceCache,
}

struct PendingFetch<'a> {
    cache: &'a InstanceCache,
    token: Option<FetchToken>,
}

impl Drop for PendingFetch<'_> {
    fn drop(&mut self) {
        if let Some(token) = self.token.take() {
            self.cache.abandon(token);
        }
    }
}

impl TherapistSession {
    pub fn new(engine: Arc<AssessmentEngine>) -> Self {
        Self {
            engine,
            cache: InstanceCache::new(),
        }
    }

    pub fn engine(&self) -> &AssessmentEngine {
        &self.engine
    }

    pub fn cache(&self) -> &InstanceCache {
        &self.cache
    }

    /// Fetch `therapist_id`'s instances into the cache. If another load
    /// starts before this one finishes, this one's result is dropped and the
    /// returned snapshot reflects whatever is current.
    ///
    /// A load dropped before it finishes (its task aborted, say) releases its
    /// token, so the cache does not stay loading.
    pub async fn load(&self, therapist_id: Uuid) -> CacheSnapshot {
        let mut pending = PendingFetch {
            cache: &self.cache,
            token: Some(self.cache.begin(therapist_id)),
        };
        let result = self.engine.list_instances_for_therapist(therapist_id).await;
        if let Err(e) = &result {
            tracing::warn!(therapist_id = %therapist_id, error = %e, "instance list unavailable");
        }
        if let Some(token) = pending.token.take() {
            self.cache.commit(token, result);
        }
        self.cache.snapshot()
    }

    /// Re-fetch the current therapist's list, if there is one.
    pub async fn refresh(&self) -> Option<CacheSnapshot> {
        let therapist_id = self.cache.therapist_id()?;
        Some(self.load(therapist_id).await)
    }

    pub async fn assign_template(
        &self,
        therapist_id: Uuid,
        template_id: Uuid,
        client_ids: &[Uuid],
        options: AssignmentOptions,
    ) -> Result<Vec<Instance>, EngineError> {
        let inserted = self
            .engine
            .assign_template(therapist_id, template_id, client_ids, options)
            .await?;
        self.refresh().await;
        Ok(inserted)
    }

    pub async fn set_status(
        &self,
        instance_id: Uuid,
        status: InstanceStatus,
    ) -> Result<Instance, EngineError> {
        let updated = self.engine.set_status(instance_id, status).await?;
        self.refresh().await;
        Ok(updated)
    }

    pub async fn delete_instance(&self, instance_id: Uuid) -> Result<(), EngineError> {
        self.engine.delete_instance(instance_id).await?;
        self.refresh().await;
        Ok(())
    }
}
