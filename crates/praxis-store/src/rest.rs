//! PostgREST-style HTTP store.
//!
//! Speaks the REST dialect of a Postgres-backed data API: embedded selects
//! for the joined fetch, `in.(…)` filters for batched lookups and
//! `Prefer: return=representation` on writes. Error bodies are classified
//! into [`StoreErrorKind`] here so nothing upstream reads message text.

use praxis_core::models::change::ChangeScope;
use praxis_core::models::client::ClientSummary;
use praxis_core::models::instance::{Instance, InstanceView, NewInstance, StatusPatch};
use praxis_core::models::score::{InstanceResult, Score};
use praxis_core::models::template::{Template, TemplateSummary};
use praxis_core::relations;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{StoreError, StoreErrorKind};
use crate::store::{AssessmentStore, BoxFuture, ChangeFeed, ChangeStream, ScoreFilter, StoreResult};

/// SQLSTATE raised when row-level policies recurse into each other.
const POLICY_RECURSION_CODE: &str = "42P17";

/// SQLSTATE for insufficient privilege.
const INSUFFICIENT_PRIVILEGE_CODE: &str = "42501";

const RETURN_REPRESENTATION: &str = "return=representation";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestConfig {
    /// Project URL, without the `/rest/v1` suffix.
    pub base_url: String,
    pub api_key: String,
    /// Signed-in user's token. Falls back to the API key.
    #[serde(default)]
    pub access_token: Option<String>,
}

pub struct RestStore {
    http: reqwest::Client,
    config: RestConfig,
}

impl RestStore {
    pub fn new(config: RestConfig) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self { http, config })
    }

    fn endpoint(&self, relation: &str) -> String {
        format!(
            "{}/rest/v1/{relation}",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn request(&self, method: Method, relation: &str) -> RequestBuilder {
        let bearer = self
            .config
            .access_token
            .as_deref()
            .unwrap_or(&self.config.api_key);
        self.http
            .request(method, self.endpoint(relation))
            .header("apikey", &self.config.api_key)
            .bearer_auth(bearer)
    }

    async fn fetch<T: DeserializeOwned>(&self, req: RequestBuilder) -> StoreResult<T> {
        let resp = req.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json::<T>().await?);
        }
        let body = resp.text().await.unwrap_or_default();
        let err = classify(status.as_u16(), &body);
        tracing::debug!(status = status.as_u16(), error = %err, "store request failed");
        Err(err)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
    details: Option<String>,
}

/// Map an HTTP status and error body to a typed store error.
pub fn classify(status: u16, body: &str) -> StoreError {
    let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();
    let code = parsed.as_ref().and_then(|b| b.code.clone()).unwrap_or_default();
    let message = match parsed {
        Some(ErrorBody {
            message: Some(message),
            details,
            ..
        }) => match details {
            Some(details) if !details.is_empty() => format!("{message} ({details})"),
            _ => message,
        },
        _ if body.trim().is_empty() => format!("HTTP {status}"),
        _ => body.trim().to_string(),
    };

    let kind = if code == POLICY_RECURSION_CODE
        || message.to_lowercase().contains("infinite recursion detected in policy")
    {
        StoreErrorKind::PolicyRecursion
    } else if code == INSUFFICIENT_PRIVILEGE_CODE || matches!(status, 401 | 403) {
        StoreErrorKind::Unauthorized
    } else if status == 404 {
        StoreErrorKind::NotFound
    } else if status == 504 {
        StoreErrorKind::Timeout
    } else if matches!(status, 408 | 429) || status >= 500 {
        StoreErrorKind::Transient
    } else {
        StoreErrorKind::Rejected
    };

    StoreError::new(kind, message)
}

/// Row shape of the latest-score view with its instance embedded.
#[derive(Deserialize)]
struct ScoredRow {
    #[serde(flatten)]
    score: Score,
    instance: Instance,
}

impl AssessmentStore for RestStore {
    fn active_templates(&self) -> BoxFuture<'_, StoreResult<Vec<Template>>> {
        Box::pin(async move {
            let req = self.request(Method::GET, relations::TEMPLATES).query(&[
                ("select", "*".to_string()),
                ("is_active", relations::eq(true)),
                ("order", "name.asc".to_string()),
            ]);
            self.fetch(req).await
        })
    }

    fn template_summaries<'a>(
        &'a self,
        ids: &'a [Uuid],
    ) -> BoxFuture<'a, StoreResult<Vec<TemplateSummary>>> {
        Box::pin(async move {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            let req = self.request(Method::GET, relations::TEMPLATES).query(&[
                ("select", relations::TEMPLATE_SUMMARY_COLUMNS.to_string()),
                ("id", relations::in_list(ids)),
            ]);
            self.fetch(req).await
        })
    }

    fn client_summaries<'a>(
        &'a self,
        ids: &'a [Uuid],
    ) -> BoxFuture<'a, StoreResult<Vec<ClientSummary>>> {
        Box::pin(async move {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            let req = self.request(Method::GET, relations::CLIENTS).query(&[
                ("select", relations::CLIENT_SUMMARY_COLUMNS.to_string()),
                ("id", relations::in_list(ids)),
            ]);
            self.fetch(req).await
        })
    }

    fn joined_instances(&self, therapist_id: Uuid) -> BoxFuture<'_, StoreResult<Vec<InstanceView>>> {
        Box::pin(async move {
            let req = self.request(Method::GET, relations::INSTANCES).query(&[
                ("select", relations::joined_instance_select()),
                ("therapist_id", relations::eq(therapist_id)),
                ("order", "assigned_at.desc".to_string()),
            ]);
            self.fetch(req).await
        })
    }

    fn instances(&self, therapist_id: Uuid) -> BoxFuture<'_, StoreResult<Vec<Instance>>> {
        Box::pin(async move {
            let req = self.request(Method::GET, relations::INSTANCES).query(&[
                ("select", "*".to_string()),
                ("therapist_id", relations::eq(therapist_id)),
                ("order", "assigned_at.desc".to_string()),
            ]);
            self.fetch(req).await
        })
    }

    fn instance(&self, id: Uuid) -> BoxFuture<'_, StoreResult<Option<Instance>>> {
        Box::pin(async move {
            let req = self.request(Method::GET, relations::INSTANCES).query(&[
                ("select", "*".to_string()),
                ("id", relations::eq(id)),
                ("limit", "1".to_string()),
            ]);
            let rows: Vec<Instance> = self.fetch(req).await?;
            Ok(rows.into_iter().next())
        })
    }

    fn insert_instances(&self, rows: Vec<NewInstance>) -> BoxFuture<'_, StoreResult<Vec<Instance>>> {
        Box::pin(async move {
            if rows.is_empty() {
                return Ok(Vec::new());
            }
            let req = self
                .request(Method::POST, relations::INSTANCES)
                .header("Prefer", RETURN_REPRESENTATION)
                .json(&rows);
            self.fetch(req).await
        })
    }

    fn update_status(
        &self,
        id: Uuid,
        patch: StatusPatch,
    ) -> BoxFuture<'_, StoreResult<Option<Instance>>> {
        Box::pin(async move {
            let req = self
                .request(Method::PATCH, relations::INSTANCES)
                .query(&[("id", relations::eq(id))])
                .header("Prefer", RETURN_REPRESENTATION)
                .json(&patch);
            let rows: Vec<Instance> = self.fetch(req).await?;
            Ok(rows.into_iter().next())
        })
    }

    fn delete_instance(&self, id: Uuid) -> BoxFuture<'_, StoreResult<bool>> {
        Box::pin(async move {
            let req = self
                .request(Method::DELETE, relations::INSTANCES)
                .query(&[("id", relations::eq(id))])
                .header("Prefer", RETURN_REPRESENTATION);
            let rows: Vec<serde_json::Value> = self.fetch(req).await?;
            Ok(!rows.is_empty())
        })
    }

    fn latest_score(&self, instance_id: Uuid) -> BoxFuture<'_, StoreResult<Option<Score>>> {
        Box::pin(async move {
            let req = self.request(Method::GET, relations::LATEST_SCORES).query(&[
                ("select", "*".to_string()),
                ("instance_id", relations::eq(instance_id)),
                ("limit", "1".to_string()),
            ]);
            let rows: Vec<Score> = self.fetch(req).await?;
            Ok(rows.into_iter().next())
        })
    }

    fn latest_scores(&self, filter: ScoreFilter) -> BoxFuture<'_, StoreResult<Vec<InstanceResult>>> {
        Box::pin(async move {
            let mut query = vec![
                ("select", relations::scored_instance_select()),
                ("order", "calculated_at.desc".to_string()),
            ];
            if let Some(id) = filter.therapist_id {
                query.push(("instance.therapist_id", relations::eq(id)));
            }
            if let Some(id) = filter.client_id {
                query.push(("instance.client_id", relations::eq(id)));
            }
            if let Some(status) = filter.status {
                query.push(("instance.status", relations::eq(status)));
            }
            let req = self
                .request(Method::GET, relations::LATEST_SCORES)
                .query(&query);
            let rows: Vec<ScoredRow> = self.fetch(req).await?;
            Ok(rows
                .into_iter()
                .map(|row| InstanceResult {
                    instance: row.instance,
                    score: row.score,
                })
                .collect())
        })
    }
}

impl ChangeFeed for RestStore {
    /// The data API has no push channel of its own; realtime delivery is a
    /// separate collaborator.
    fn subscribe(&self, scope: ChangeScope) -> BoxFuture<'_, StoreResult<ChangeStream>> {
        Box::pin(async move {
            Err(StoreError::new(
                StoreErrorKind::Rejected,
                format!(
                    "no realtime channel configured for {} (therapist {})",
                    scope.relation, scope.therapist_id
                ),
            ))
        })
    }
}
