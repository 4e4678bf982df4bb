//! In-process store.
//!
//! Holds templates, client summaries, instances and score history in memory
//! and serves the same contract as a remote store, including a latest-score
//! projection and change events. Failures and latency can be injected per
//! operation to exercise the engine's degraded paths.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use praxis_core::models::change::{ChangeEvent, ChangeKind, ChangeScope};
use praxis_core::models::client::ClientSummary;
use praxis_core::models::instance::{Instance, InstanceView, NewInstance, StatusPatch};
use praxis_core::models::score::{self, InstanceResult, Score};
use praxis_core::models::template::{Template, TemplateSummary};
use praxis_core::relations;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;
use crate::feed::BroadcastFeed;
use crate::store::{
    AssessmentStore, BoxFuture, ChangeFeed, ChangeStream, ScoreFilter, StoreResult,
};

/// Store operations, for fault injection and call accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ActiveTemplates,
    TemplateSummaries,
    ClientSummaries,
    JoinedInstances,
    Instances,
    Instance,
    InsertInstances,
    UpdateStatus,
    DeleteInstance,
    LatestScore,
    LatestScores,
    Subscribe,
}

#[derive(Default)]
struct Tables {
    templates: Vec<Template>,
    clients: HashMap<Uuid, ClientSummary>,
    instances: Vec<Instance>,
    scores: Vec<Score>,
}

impl Tables {
    fn view(&self, instance: &Instance) -> InstanceView {
        InstanceView {
            instance: instance.clone(),
            template: self
                .templates
                .iter()
                .find(|t| t.id == instance.template_id)
                .map(Template::summary),
            client: self.clients.get(&instance.client_id).cloned(),
        }
    }

    fn instances_of(&self, therapist_id: Uuid) -> Vec<&Instance> {
        let mut rows: Vec<&Instance> = self
            .instances
            .iter()
            .filter(|i| i.therapist_id == therapist_id)
            .collect();
        rows.sort_by(|a, b| b.assigned_at.cmp(&a.assigned_at));
        rows
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    faults: Mutex<HashMap<Operation, StoreError>>,
    latency: Mutex<HashMap<Operation, Duration>>,
    calls: Mutex<Vec<Operation>>,
    feed: BroadcastFeed,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_templates(templates: Vec<Template>) -> Self {
        Self {
            tables: RwLock::new(Tables {
                templates,
                ..Tables::default()
            }),
            ..Self::default()
        }
    }

    pub fn feed(&self) -> &BroadcastFeed {
        &self.feed
    }

    pub async fn put_template(&self, template: Template) {
        let mut tables = self.tables.write().await;
        tables.templates.retain(|t| t.id != template.id);
        tables.templates.push(template);
    }

    pub async fn put_client(&self, client: ClientSummary) {
        self.tables.write().await.clients.insert(client.id, client);
    }

    /// Insert or replace an instance row as-is, bypassing id assignment.
    /// References are not checked.
    pub async fn put_instance(&self, instance: Instance) {
        let event = change(ChangeKind::Update, &instance);
        {
            let mut tables = self.tables.write().await;
            tables.instances.retain(|i| i.id != instance.id);
            tables.instances.push(instance);
        }
        self.feed.publish(event);
    }

    /// Append a score row, as the external scoring process would.
    pub async fn record_score(&self, score: Score) {
        self.tables.write().await.scores.push(score);
    }

    pub async fn all_instances(&self) -> Vec<Instance> {
        self.tables.read().await.instances.clone()
    }

    /// Make every call to `op` fail with `error` until cleared.
    pub fn fail(&self, op: Operation, error: StoreError) {
        lock(&self.faults).insert(op, error);
    }

    pub fn clear_fault(&self, op: Operation) {
        lock(&self.faults).remove(&op);
    }

    /// Delay every call to `op`.
    pub fn set_latency(&self, op: Operation, delay: Duration) {
        lock(&self.latency).insert(op, delay);
    }

    /// Operations called so far, in call order.
    pub fn calls(&self) -> Vec<Operation> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self, op: Operation) -> usize {
        lock(&self.calls).iter().filter(|c| **c == op).count()
    }

    async fn enter(&self, op: Operation) -> StoreResult<()> {
        lock(&self.calls).push(op);
        let delay = lock(&self.latency).get(&op).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let fault = lock(&self.faults).get(&op).cloned();
        match fault {
            Some(err) => {
                tracing::debug!(?op, error = %err, "injected store fault");
                Err(err)
            }
            None => Ok(()),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn change(kind: ChangeKind, instance: &Instance) -> ChangeEvent {
    ChangeEvent {
        kind,
        relation: relations::INSTANCES.to_string(),
        therapist_id: instance.therapist_id,
        record_id: instance.id,
    }
}

impl AssessmentStore for MemoryStore {
    fn active_templates(&self) -> BoxFuture<'_, StoreResult<Vec<Template>>> {
        Box::pin(async move {
            self.enter(Operation::ActiveTemplates).await?;
            let tables = self.tables.read().await;
            let mut templates: Vec<Template> = tables
                .templates
                .iter()
                .filter(|t| t.is_active)
                .cloned()
                .collect();
            templates.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(templates)
        })
    }

    fn template_summaries<'a>(
        &'a self,
        ids: &'a [Uuid],
    ) -> BoxFuture<'a, StoreResult<Vec<TemplateSummary>>> {
        Box::pin(async move {
            self.enter(Operation::TemplateSummaries).await?;
            let wanted: HashSet<&Uuid> = ids.iter().collect();
            let tables = self.tables.read().await;
            Ok(tables
                .templates
                .iter()
                .filter(|t| wanted.contains(&t.id))
                .map(Template::summary)
                .collect())
        })
    }

    fn client_summaries<'a>(
        &'a self,
        ids: &'a [Uuid],
    ) -> BoxFuture<'a, StoreResult<Vec<ClientSummary>>> {
        Box::pin(async move {
            self.enter(Operation::ClientSummaries).await?;
            let tables = self.tables.read().await;
            Ok(ids
                .iter()
                .filter_map(|id| tables.clients.get(id).cloned())
                .collect())
        })
    }

    fn joined_instances(&self, therapist_id: Uuid) -> BoxFuture<'_, StoreResult<Vec<InstanceView>>> {
        Box::pin(async move {
            self.enter(Operation::JoinedInstances).await?;
            let tables = self.tables.read().await;
            Ok(tables
                .instances_of(therapist_id)
                .into_iter()
                .map(|i| tables.view(i))
                .collect())
        })
    }

    fn instances(&self, therapist_id: Uuid) -> BoxFuture<'_, StoreResult<Vec<Instance>>> {
        Box::pin(async move {
            self.enter(Operation::Instances).await?;
            let tables = self.tables.read().await;
            Ok(tables
                .instances_of(therapist_id)
                .into_iter()
                .cloned()
                .collect())
        })
    }

    fn instance(&self, id: Uuid) -> BoxFuture<'_, StoreResult<Option<Instance>>> {
        Box::pin(async move {
            self.enter(Operation::Instance).await?;
            let tables = self.tables.read().await;
            Ok(tables.instances.iter().find(|i| i.id == id).cloned())
        })
    }

    fn insert_instances(&self, rows: Vec<NewInstance>) -> BoxFuture<'_, StoreResult<Vec<Instance>>> {
        Box::pin(async move {
            self.enter(Operation::InsertInstances).await?;
            let assigned_at = jiff::Timestamp::now();
            let inserted: Vec<Instance> = rows
                .into_iter()
                .map(|row| Instance {
                    id: Uuid::new_v4(),
                    template_id: row.template_id,
                    therapist_id: row.therapist_id,
                    client_id: row.client_id,
                    case_id: row.case_id,
                    title: row.title,
                    instructions: row.instructions,
                    status: row.status,
                    reminder_frequency: row.reminder_frequency,
                    assigned_at,
                    due_date: row.due_date,
                    started_at: None,
                    completed_at: None,
                    expires_at: None,
                })
                .collect();

            self.tables
                .write()
                .await
                .instances
                .extend(inserted.iter().cloned());

            for instance in &inserted {
                self.feed.publish(change(ChangeKind::Insert, instance));
            }
            Ok(inserted)
        })
    }

    fn update_status(
        &self,
        id: Uuid,
        patch: StatusPatch,
    ) -> BoxFuture<'_, StoreResult<Option<Instance>>> {
        Box::pin(async move {
            self.enter(Operation::UpdateStatus).await?;
            let updated = {
                let mut tables = self.tables.write().await;
                tables.instances.iter_mut().find(|i| i.id == id).map(|row| {
                    row.apply(&patch);
                    row.clone()
                })
            };
            if let Some(instance) = &updated {
                self.feed.publish(change(ChangeKind::Update, instance));
            }
            Ok(updated)
        })
    }

    fn delete_instance(&self, id: Uuid) -> BoxFuture<'_, StoreResult<bool>> {
        Box::pin(async move {
            self.enter(Operation::DeleteInstance).await?;
            let removed = {
                let mut tables = self.tables.write().await;
                let position = tables.instances.iter().position(|i| i.id == id);
                position.map(|pos| tables.instances.remove(pos))
            };
            match removed {
                Some(instance) => {
                    self.feed.publish(change(ChangeKind::Delete, &instance));
                    Ok(true)
                }
                None => Ok(false),
            }
        })
    }

    fn latest_score(&self, instance_id: Uuid) -> BoxFuture<'_, StoreResult<Option<Score>>> {
        Box::pin(async move {
            self.enter(Operation::LatestScore).await?;
            let tables = self.tables.read().await;
            Ok(score::latest(
                tables.scores.iter().filter(|s| s.instance_id == instance_id),
            )
            .cloned())
        })
    }

    fn latest_scores(&self, filter: ScoreFilter) -> BoxFuture<'_, StoreResult<Vec<InstanceResult>>> {
        Box::pin(async move {
            self.enter(Operation::LatestScores).await?;
            let tables = self.tables.read().await;
            let current = score::latest_by_instance(&tables.scores);
            let mut results: Vec<InstanceResult> = tables
                .instances
                .iter()
                .filter(|i| filter.therapist_id.is_none_or(|id| i.therapist_id == id))
                .filter(|i| filter.client_id.is_none_or(|id| i.client_id == id))
                .filter(|i| filter.status.is_none_or(|status| i.status == status))
                .filter_map(|i| {
                    current.get(&i.id).map(|s| InstanceResult {
                        instance: i.clone(),
                        score: (*s).clone(),
                    })
                })
                .collect();
            results.sort_by(|a, b| b.score.calculated_at.cmp(&a.score.calculated_at));
            Ok(results)
        })
    }
}

impl ChangeFeed for MemoryStore {
    fn subscribe(&self, scope: ChangeScope) -> BoxFuture<'_, StoreResult<ChangeStream>> {
        Box::pin(async move {
            self.enter(Operation::Subscribe).await?;
            Ok(self.feed.stream(scope))
        })
    }
}
