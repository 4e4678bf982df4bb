use std::future::Future;
use std::sync::Arc;

use praxis_store::error::{StoreError, StoreErrorKind};
use praxis_store::store::{AssessmentStore, StoreResult};

use crate::catalog::TemplateCatalog;
use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;

/// Stateless-per-therapist operations over one store. Session state (the
/// materialized instance list) lives in
/// [`TherapistSession`](crate::session::TherapistSession).
pub struct AssessmentEngine {
    pub(crate) store: Arc<dyn AssessmentStore>,
    pub(crate) catalog: TemplateCatalog,
    pub(crate) clock: Arc<dyn Clock>,
    config: EngineConfig,
}

impl AssessmentEngine {
    pub fn new(store: Arc<dyn AssessmentStore>) -> Self {
        Self {
            store,
            catalog: TemplateCatalog::default(),
            clock: Arc::new(SystemClock),
            config: EngineConfig::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    /// Run one store round trip under the configured timeout.
    pub(crate) async fn call<T>(
        &self,
        op: &'static str,
        fut: impl Future<Output = StoreResult<T>>,
    ) -> StoreResult<T> {
        let Some(limit) = self.config.request_timeout() else {
            return fut.await;
        };
        match tokio::time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(op, timeout_secs = limit.as_secs(), "store call timed out");
                Err(StoreError::new(
                    StoreErrorKind::Timeout,
                    format!("{op} did not complete within {}s", limit.as_secs()),
                ))
            }
        }
    }
}
