use std::collections::HashSet;

use jiff::civil::Date;
use praxis_core::models::instance::{Instance, InstanceStatus, NewInstance, ReminderFrequency};
use praxis_core::models::template::Template;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audit::AuditEvent;
use crate::engine::AssessmentEngine;
use crate::error::EngineError;

/// Per-assignment overrides. Anything left unset falls back to the
/// template (title, instructions) or to no reminders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignmentOptions {
    pub due_date: Option<Date>,
    pub instructions: Option<String>,
    pub reminder_frequency: Option<ReminderFrequency>,
    pub title_override: Option<String>,
    pub case_id: Option<Uuid>,
}

impl AssessmentEngine {
    /// Assign a loaded, active template to each client in one batch insert.
    ///
    /// The batch succeeds or fails as a whole; there is no per-client
    /// retry.
    pub async fn assign_template(
        &self,
        therapist_id: Uuid,
        template_id: Uuid,
        client_ids: &[Uuid],
        options: AssignmentOptions,
    ) -> Result<Vec<Instance>, EngineError> {
        if client_ids.is_empty() {
            return Err(EngineError::EmptyAssignment);
        }
        let template = self
            .catalog
            .find_active(template_id)
            .ok_or(EngineError::TemplateNotFound(template_id))?;

        let rows = build_assignment(&template, therapist_id, client_ids, &options);
        let requested = rows.len();

        let inserted = self
            .call("assignment insert", self.store.insert_instances(rows))
            .await
            .map_err(|e| {
                tracing::error!(
                    template_id = %template_id,
                    clients = requested,
                    error = %e,
                    "assignment batch insert failed"
                );
                EngineError::AssignmentFailed(e.message)
            })?;

        tracing::info!(
            therapist_id = %therapist_id,
            template = %template.abbreviation,
            clients = inserted.len(),
            "template assigned"
        );
        AuditEvent::new("assign", "assessment_template", template_id, therapist_id)
            .with_details(serde_json::json!({
                "instance_ids": inserted.iter().map(|i| i.id).collect::<Vec<_>>(),
                "due_date": options.due_date,
            }))
            .emit();

        Ok(inserted)
    }
}

/// One insert row per distinct client, in the order given.
pub fn build_assignment(
    template: &Template,
    therapist_id: Uuid,
    client_ids: &[Uuid],
    options: &AssignmentOptions,
) -> Vec<NewInstance> {
    let title = non_blank(options.title_override.as_deref())
        .unwrap_or(template.name.as_str())
        .to_string();
    let instructions = non_blank(options.instructions.as_deref())
        .or(template.instructions.as_deref())
        .map(str::to_string);

    let mut seen = HashSet::new();
    client_ids
        .iter()
        .filter(|id| seen.insert(**id))
        .map(|client_id| NewInstance {
            template_id: template.id,
            therapist_id,
            client_id: *client_id,
            case_id: options.case_id,
            title: title.clone(),
            instructions: instructions.clone(),
            status: InstanceStatus::Assigned,
            reminder_frequency: options.reminder_frequency.unwrap_or_default(),
            due_date: options.due_date,
        })
        .collect()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
