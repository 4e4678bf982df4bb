use std::fmt;
use std::str::FromStr;

use jiff::Timestamp;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::client::ClientSummary;
use super::template::TemplateSummary;
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum InstanceStatus {
    Assigned,
    InProgress,
    Completed,
    Expired,
    Cancelled,
}

impl InstanceStatus {
    pub const ALL: [InstanceStatus; 5] = [
        InstanceStatus::Assigned,
        InstanceStatus::InProgress,
        InstanceStatus::Completed,
        InstanceStatus::Expired,
        InstanceStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InstanceStatus::Assigned => "assigned",
            InstanceStatus::InProgress => "in_progress",
            InstanceStatus::Completed => "completed",
            InstanceStatus::Expired => "expired",
            InstanceStatus::Cancelled => "cancelled",
        }
    }

    /// Completed, cancelled and expired instances never change status again.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            InstanceStatus::Completed | InstanceStatus::Expired | InstanceStatus::Cancelled
        )
    }

    /// Plan the write for moving from `self` to `to`.
    ///
    /// Only `in_progress` and `completed` carry a timestamp side effect.
    /// Anything not in the transition table, including every move out of a
    /// terminal state, is rejected.
    pub fn transition(self, to: InstanceStatus, now: Timestamp) -> Result<StatusPatch, CoreError> {
        use InstanceStatus::*;

        let patch = StatusPatch {
            status: to,
            started_at: None,
            completed_at: None,
        };

        match (self, to) {
            (Assigned, InProgress) => Ok(StatusPatch {
                started_at: Some(now),
                ..patch
            }),
            (Assigned | InProgress, Completed) => Ok(StatusPatch {
                completed_at: Some(now),
                ..patch
            }),
            (Assigned | InProgress, Cancelled | Expired) => Ok(patch),
            (from, to) => Err(CoreError::InvalidTransition { from, to }),
        }
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstanceStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InstanceStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::InvalidStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ReminderFrequency {
    #[default]
    None,
    Daily,
    Weekly,
    BeforeDue,
}

/// One assignment of a template to one client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Instance {
    pub id: Uuid,
    pub template_id: Uuid,
    pub therapist_id: Uuid,
    pub client_id: Uuid,
    pub case_id: Option<Uuid>,
    pub title: String,
    pub instructions: Option<String>,
    pub status: InstanceStatus,
    #[serde(default)]
    pub reminder_frequency: ReminderFrequency,
    pub assigned_at: Timestamp,
    pub due_date: Option<Date>,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
}

impl Instance {
    /// Status as it should be displayed at `now`.
    ///
    /// A non-terminal instance past its due date or expiry reads as expired.
    /// Advisory only: nothing is written back.
    pub fn effective_status(&self, now: Timestamp) -> InstanceStatus {
        if self.status.is_terminal() {
            return self.status;
        }
        if self.expires_at.is_some_and(|expires| expires <= now) {
            return InstanceStatus::Expired;
        }
        let today = now.to_zoned(jiff::tz::TimeZone::UTC).date();
        match self.due_date {
            Some(due) if due < today => InstanceStatus::Expired,
            _ => self.status,
        }
    }

    pub fn apply(&mut self, patch: &StatusPatch) {
        self.status = patch.status;
        if let Some(started_at) = patch.started_at {
            self.started_at = Some(started_at);
        }
        if let Some(completed_at) = patch.completed_at {
            self.completed_at = Some(completed_at);
        }
    }
}

/// Insert payload for one instance. `id` and `assigned_at` are set by the
/// store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewInstance {
    pub template_id: Uuid,
    pub therapist_id: Uuid,
    pub client_id: Uuid,
    pub case_id: Option<Uuid>,
    pub title: String,
    pub instructions: Option<String>,
    pub status: InstanceStatus,
    pub reminder_frequency: ReminderFrequency,
    pub due_date: Option<Date>,
}

/// The columns a status change writes. Absent timestamps are left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StatusPatch {
    pub status: InstanceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,
}

/// An instance with its template and client resolved. Either reference may
/// be missing when the store could not resolve it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InstanceView {
    #[serde(flatten)]
    pub instance: Instance,
    pub template: Option<TemplateSummary>,
    pub client: Option<ClientSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> Timestamp {
        "2025-01-10T12:00:00Z".parse().unwrap()
    }

    fn instance(status: InstanceStatus) -> Instance {
        Instance {
            id: Uuid::new_v4(),
            template_id: Uuid::new_v4(),
            therapist_id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            case_id: None,
            title: "GAD-7".to_string(),
            instructions: None,
            status,
            reminder_frequency: ReminderFrequency::None,
            assigned_at: "2025-01-01T09:00:00Z".parse().unwrap(),
            due_date: None,
            started_at: None,
            completed_at: None,
            expires_at: None,
        }
    }

    #[test]
    fn terminal_states_reject_every_transition() {
        for from in InstanceStatus::ALL.into_iter().filter(|s| s.is_terminal()) {
            for to in InstanceStatus::ALL {
                assert!(
                    from.transition(to, now()).is_err(),
                    "{from} -> {to} should be rejected"
                );
            }
        }
    }

    #[test]
    fn starting_sets_only_started_at() {
        let patch = InstanceStatus::Assigned
            .transition(InstanceStatus::InProgress, now())
            .unwrap();
        assert_eq!(patch.started_at, Some(now()));
        assert_eq!(patch.completed_at, None);
    }

    #[test]
    fn completing_sets_only_completed_at() {
        for from in [InstanceStatus::Assigned, InstanceStatus::InProgress] {
            let patch = from.transition(InstanceStatus::Completed, now()).unwrap();
            assert_eq!(patch.completed_at, Some(now()));
            assert_eq!(patch.started_at, None);
        }
    }

    #[test]
    fn cancel_and_expire_carry_no_timestamps() {
        for to in [InstanceStatus::Cancelled, InstanceStatus::Expired] {
            let patch = InstanceStatus::InProgress.transition(to, now()).unwrap();
            assert_eq!(patch.started_at, None);
            assert_eq!(patch.completed_at, None);
        }
    }

    #[test]
    fn unlisted_transitions_are_rejected() {
        assert!(InstanceStatus::InProgress.transition(InstanceStatus::Assigned, now()).is_err());
        assert!(InstanceStatus::InProgress.transition(InstanceStatus::InProgress, now()).is_err());
        assert!(InstanceStatus::Assigned.transition(InstanceStatus::Assigned, now()).is_err());
    }

    #[test]
    fn apply_keeps_existing_timestamps() {
        let mut started = instance(InstanceStatus::Assigned);
        let start = InstanceStatus::Assigned
            .transition(InstanceStatus::InProgress, now())
            .unwrap();
        started.apply(&start);

        let later: Timestamp = "2025-01-11T08:00:00Z".parse().unwrap();
        let complete = started.status.transition(InstanceStatus::Completed, later).unwrap();
        started.apply(&complete);

        assert_eq!(started.status, InstanceStatus::Completed);
        assert_eq!(started.started_at, Some(now()));
        assert_eq!(started.completed_at, Some(later));
    }

    #[test]
    fn overdue_instances_read_as_expired() {
        let mut overdue = instance(InstanceStatus::Assigned);
        overdue.due_date = Some(jiff::civil::date(2025, 1, 9));
        assert_eq!(overdue.effective_status(now()), InstanceStatus::Expired);
        assert_eq!(overdue.status, InstanceStatus::Assigned);

        let mut due_today = instance(InstanceStatus::InProgress);
        due_today.due_date = Some(jiff::civil::date(2025, 1, 10));
        assert_eq!(due_today.effective_status(now()), InstanceStatus::InProgress);

        let mut done = instance(InstanceStatus::Completed);
        done.due_date = Some(jiff::civil::date(2024, 12, 1));
        assert_eq!(done.effective_status(now()), InstanceStatus::Completed);
    }

    #[test]
    fn status_round_trips_through_its_wire_name() {
        for status in InstanceStatus::ALL {
            assert_eq!(status.as_str().parse::<InstanceStatus>().unwrap(), status);
        }
        assert!("archived".parse::<InstanceStatus>().is_err());
    }
}
