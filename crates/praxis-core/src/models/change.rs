use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::relations;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// A server-side mutation notice. Only its presence matters to the engine;
/// no row payload is carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub relation: String,
    pub therapist_id: Uuid,
    pub record_id: Uuid,
}

/// Which change events a subscription wants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeScope {
    pub relation: String,
    pub therapist_id: Uuid,
}

impl ChangeScope {
    pub fn instances_of(therapist_id: Uuid) -> Self {
        Self {
            relation: relations::INSTANCES.to_string(),
            therapist_id,
        }
    }

    pub fn matches(&self, event: &ChangeEvent) -> bool {
        event.relation == self.relation && event.therapist_id == self.therapist_id
    }
}
