use axum::Json;
use axum::extract::{Path, Query, State};
use praxis_core::models::instance::InstanceStatus;
use praxis_core::models::score::{InstanceResult, Score};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn latest_score(
    State(state): State<AppState>,
    Path(instance_id): Path<Uuid>,
) -> Result<Json<Score>, ApiError> {
    state
        .engine
        .latest_score_for(instance_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("no score for instance {instance_id}")))
}

#[derive(Deserialize)]
pub struct ResultsQuery {
    pub status: Option<InstanceStatus>,
}

pub async fn client_results(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
    Query(query): Query<ResultsQuery>,
) -> Result<Json<Vec<InstanceResult>>, ApiError> {
    let results = state
        .engine
        .results_for_client(client_id, query.status)
        .await?;
    Ok(Json(results))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use praxis_core::models::instance::{InstanceStatus, NewInstance, ReminderFrequency};
    use praxis_core::models::score::Score;
    use praxis_store::store::AssessmentStore;
    use uuid::Uuid;

    use crate::routes::test_support::{app, send};

    fn score(instance_id: Uuid, raw: f64, at: &str) -> Score {
        Score {
            id: Uuid::new_v4(),
            instance_id,
            raw_score: Some(raw),
            scaled_score: None,
            percentile: None,
            t_score: None,
            z_score: None,
            interpretation_category: Some("Mild depression".to_string()),
            interpretation_description: None,
            clinical_significance: None,
            severity_level: Some("mild".to_string()),
            recommendations: None,
            calculated_at: at.parse().unwrap(),
        }
    }

    #[tokio::test]
    async fn latest_score_and_client_results() {
        let (store, app) = app();
        let client_id = Uuid::new_v4();
        let rows = vec![NewInstance {
            template_id: Uuid::new_v4(),
            therapist_id: Uuid::new_v4(),
            client_id,
            case_id: None,
            title: "PHQ-9".to_string(),
            instructions: None,
            status: InstanceStatus::Completed,
            reminder_frequency: ReminderFrequency::None,
            due_date: None,
        }];
        let id = store.insert_instances(rows).await.unwrap()[0].id;
        store.record_score(score(id, 7.0, "2025-01-03T00:00:00Z")).await;
        store.record_score(score(id, 6.0, "2025-01-04T00:00:00Z")).await;

        let (status, body) = send(&app, Method::GET, &format!("/instances/{id}/score"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["raw_score"], 6.0);

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/clients/{client_id}/results?status=completed"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (_, body) = send(
            &app,
            Method::GET,
            &format!("/clients/{client_id}/results?status=assigned"),
            None,
        )
        .await;
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unscored_instance_is_not_found() {
        let (_store, app) = app();

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/instances/{}/score", Uuid::new_v4()),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "not_found");
    }
}
