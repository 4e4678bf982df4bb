use std::future::Future;
use std::pin::Pin;

use futures::stream::BoxStream;
use praxis_core::models::change::{ChangeEvent, ChangeScope};
use praxis_core::models::client::ClientSummary;
use praxis_core::models::instance::{Instance, InstanceStatus, InstanceView, NewInstance, StatusPatch};
use praxis_core::models::score::{InstanceResult, Score};
use praxis_core::models::template::{Template, TemplateSummary};
use uuid::Uuid;

use crate::error::StoreError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub type StoreResult<T> = Result<T, StoreError>;

/// Narrowing for result listings over the latest-score projection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreFilter {
    pub therapist_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub status: Option<InstanceStatus>,
}

/// Requests the engine makes of the relational store.
///
/// Implementations classify their own failures into
/// [`StoreErrorKind`](crate::error::StoreErrorKind); callers never inspect
/// message text.
pub trait AssessmentStore: Send + Sync {
    /// Active templates ordered by name.
    fn active_templates(&self) -> BoxFuture<'_, StoreResult<Vec<Template>>>;

    fn template_summaries<'a>(
        &'a self,
        ids: &'a [Uuid],
    ) -> BoxFuture<'a, StoreResult<Vec<TemplateSummary>>>;

    fn client_summaries<'a>(
        &'a self,
        ids: &'a [Uuid],
    ) -> BoxFuture<'a, StoreResult<Vec<ClientSummary>>>;

    /// Instances of a therapist with template and client embedded, in one
    /// round trip. Newest assignment first.
    fn joined_instances(&self, therapist_id: Uuid) -> BoxFuture<'_, StoreResult<Vec<InstanceView>>>;

    /// Bare instance rows of a therapist. Same order as [`Self::joined_instances`].
    fn instances(&self, therapist_id: Uuid) -> BoxFuture<'_, StoreResult<Vec<Instance>>>;

    fn instance(&self, id: Uuid) -> BoxFuture<'_, StoreResult<Option<Instance>>>;

    /// Insert all rows as one batch. The store sets `id` and `assigned_at`.
    fn insert_instances(&self, rows: Vec<NewInstance>) -> BoxFuture<'_, StoreResult<Vec<Instance>>>;

    /// Write a status change. `None` when no row has this id.
    fn update_status(
        &self,
        id: Uuid,
        patch: StatusPatch,
    ) -> BoxFuture<'_, StoreResult<Option<Instance>>>;

    /// Remove an instance. `false` when no row has this id.
    fn delete_instance(&self, id: Uuid) -> BoxFuture<'_, StoreResult<bool>>;

    /// Row of the latest-score projection for one instance.
    fn latest_score(&self, instance_id: Uuid) -> BoxFuture<'_, StoreResult<Option<Score>>>;

    /// Latest scores joined with their instances, most recent first.
    fn latest_scores(&self, filter: ScoreFilter) -> BoxFuture<'_, StoreResult<Vec<InstanceResult>>>;
}

/// One item of a change subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedItem {
    Event(ChangeEvent),
    /// The subscriber fell behind and this many events were dropped.
    Missed(u64),
}

/// Dropping the stream ends the subscription.
pub type ChangeStream = BoxStream<'static, FeedItem>;

/// Push channel for server-side mutations.
pub trait ChangeFeed: Send + Sync {
    fn subscribe(&self, scope: ChangeScope) -> BoxFuture<'_, StoreResult<ChangeStream>>;
}
