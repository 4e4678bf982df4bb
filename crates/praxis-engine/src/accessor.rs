//! Instance listing with join-then-degrade.
//!
//! The joined query (instances with template and client embedded) is one
//! round trip, but nested-relation access policies can make it fail on some
//! backends. When it does, the list is rebuilt from a bare instance fetch
//! and two batched lookups composed in memory.

use std::collections::{HashMap, HashSet};

use praxis_core::models::client::ClientSummary;
use praxis_core::models::instance::{Instance, InstanceView};
use praxis_core::models::template::TemplateSummary;
use uuid::Uuid;

use crate::engine::AssessmentEngine;
use crate::error::EngineError;

impl AssessmentEngine {
    /// A therapist's instances, each annotated with its template and client.
    pub async fn list_instances_for_therapist(
        &self,
        therapist_id: Uuid,
    ) -> Result<Vec<InstanceView>, EngineError> {
        match self
            .call("joined instance fetch", self.store.joined_instances(therapist_id))
            .await
        {
            Ok(views) => return Ok(views),
            Err(e) => {
                tracing::warn!(
                    therapist_id = %therapist_id,
                    error = %e,
                    "joined instance fetch failed, falling back to separate lookups"
                );
            }
        }
        self.degraded_fetch(therapist_id).await
    }

    async fn degraded_fetch(&self, therapist_id: Uuid) -> Result<Vec<InstanceView>, EngineError> {
        let rows = self
            .call("instance fetch", self.store.instances(therapist_id))
            .await
            .map_err(|e| {
                tracing::error!(therapist_id = %therapist_id, error = %e, "instance fetch failed");
                EngineError::from_store(e)
            })?;

        let template_ids = distinct(rows.iter().map(|i| i.template_id));
        let client_ids = distinct(rows.iter().map(|i| i.client_id));

        let (templates, clients) = tokio::join!(
            self.call("template lookup", self.store.template_summaries(&template_ids)),
            self.call("client lookup", self.store.client_summaries(&client_ids)),
        );
        let templates = templates.map_err(EngineError::from_store)?;
        let clients = clients.map_err(EngineError::from_store)?;

        tracing::debug!(
            therapist_id = %therapist_id,
            instances = rows.len(),
            templates = templates.len(),
            clients = clients.len(),
            "composed instances from separate lookups"
        );
        Ok(compose(rows, templates, clients))
    }
}

/// Attach templates and clients to instance rows by id. A reference that
/// is not among the lookups resolves to `None`.
pub fn compose(
    rows: Vec<Instance>,
    templates: Vec<TemplateSummary>,
    clients: Vec<ClientSummary>,
) -> Vec<InstanceView> {
    let templates: HashMap<Uuid, TemplateSummary> =
        templates.into_iter().map(|t| (t.id, t)).collect();
    let clients: HashMap<Uuid, ClientSummary> = clients.into_iter().map(|c| (c.id, c)).collect();

    rows.into_iter()
        .map(|instance| InstanceView {
            template: templates.get(&instance.template_id).cloned(),
            client: clients.get(&instance.client_id).cloned(),
            instance,
        })
        .collect()
}

/// Ids in first-seen order, without repeats.
fn distinct(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use praxis_core::models::instance::{InstanceStatus, ReminderFrequency};

    use super::*;

    fn row(template_id: Uuid, client_id: Uuid) -> Instance {
        Instance {
            id: Uuid::new_v4(),
            template_id,
            therapist_id: Uuid::nil(),
            client_id,
            case_id: None,
            title: "PHQ-9".to_string(),
            instructions: None,
            status: InstanceStatus::Assigned,
            reminder_frequency: ReminderFrequency::None,
            assigned_at: jiff::Timestamp::UNIX_EPOCH,
            due_date: None,
            started_at: None,
            completed_at: None,
            expires_at: None,
        }
    }

    #[test]
    fn compose_leaves_unknown_references_empty() {
        let known_template = TemplateSummary {
            id: Uuid::new_v4(),
            name: "GAD-7".to_string(),
            abbreviation: "GAD-7".to_string(),
            category: "anxiety".to_string(),
        };
        let known_client = ClientSummary {
            id: Uuid::new_v4(),
            first_name: "Ada".to_string(),
            last_name: "Byron".to_string(),
        };
        let rows = vec![
            row(known_template.id, known_client.id),
            row(Uuid::new_v4(), known_client.id),
            row(known_template.id, Uuid::new_v4()),
        ];

        let views = compose(rows, vec![known_template.clone()], vec![known_client.clone()]);

        assert_eq!(views[0].template.as_ref(), Some(&known_template));
        assert_eq!(views[0].client.as_ref(), Some(&known_client));
        assert!(views[1].template.is_none());
        assert_eq!(views[1].client.as_ref(), Some(&known_client));
        assert_eq!(views[2].template.as_ref(), Some(&known_template));
        assert!(views[2].client.is_none());
    }

    #[test]
    fn distinct_keeps_first_seen_order() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(distinct([a, b, a, b, a].into_iter()), vec![a, b]);
    }
}
