use praxis_core::models::instance::InstanceStatus;
use praxis_core::models::score::{InstanceResult, Score};
use praxis_store::store::ScoreFilter;
use uuid::Uuid;

use crate::engine::AssessmentEngine;
use crate::error::EngineError;

impl AssessmentEngine {
    /// The most recently calculated score for an instance, if any.
    pub async fn latest_score_for(&self, instance_id: Uuid) -> Result<Option<Score>, EngineError> {
        self.call("latest score", self.store.latest_score(instance_id))
            .await
            .map_err(EngineError::from_store)
    }

    /// A client's scored instances with their current scores, newest first.
    pub async fn results_for_client(
        &self,
        client_id: Uuid,
        status: Option<InstanceStatus>,
    ) -> Result<Vec<InstanceResult>, EngineError> {
        let filter = ScoreFilter {
            client_id: Some(client_id),
            status,
            ..ScoreFilter::default()
        };
        self.call("client results", self.store.latest_scores(filter))
            .await
            .map_err(EngineError::from_store)
    }
}
