use praxis_core::models::instance::{Instance, InstanceStatus};
use uuid::Uuid;

use crate::audit::AuditEvent;
use crate::engine::AssessmentEngine;
use crate::error::EngineError;

impl AssessmentEngine {
    /// Move an instance to `status`, writing the timestamp the transition
    /// carries. Rejected transitions write nothing.
    pub async fn set_status(
        &self,
        instance_id: Uuid,
        status: InstanceStatus,
    ) -> Result<Instance, EngineError> {
        let current = self
            .call("instance lookup", self.store.instance(instance_id))
            .await
            .map_err(EngineError::from_store)?
            .ok_or(EngineError::NotFound(instance_id))?;

        let patch = current.status.transition(status, self.clock.now())?;

        let updated = self
            .call("status update", self.store.update_status(instance_id, patch))
            .await
            .map_err(EngineError::from_store)?
            .ok_or(EngineError::NotFound(instance_id))?;

        tracing::info!(
            instance_id = %instance_id,
            from = %current.status,
            to = %updated.status,
            "instance status changed"
        );
        AuditEvent::new("set_status", "assessment_instance", instance_id, current.therapist_id)
            .with_details(serde_json::json!({
                "from": current.status,
                "to": updated.status,
            }))
            .emit();

        Ok(updated)
    }

    /// Therapist-initiated removal.
    pub async fn delete_instance(&self, instance_id: Uuid) -> Result<(), EngineError> {
        let current = self
            .call("instance lookup", self.store.instance(instance_id))
            .await
            .map_err(EngineError::from_store)?
            .ok_or(EngineError::NotFound(instance_id))?;

        let removed = self
            .call("instance delete", self.store.delete_instance(instance_id))
            .await
            .map_err(EngineError::from_store)?;
        if !removed {
            return Err(EngineError::NotFound(instance_id));
        }

        tracing::info!(instance_id = %instance_id, "instance deleted");
        AuditEvent::new("delete", "assessment_instance", instance_id, current.therapist_id)
            .with_details(serde_json::json!({ "status": current.status }))
            .emit();
        Ok(())
    }
}
