use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use praxis_core::models::instance::{Instance, InstanceStatus, InstanceView};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn list_for_therapist(
    State(state): State<AppState>,
    Path(therapist_id): Path<Uuid>,
) -> Result<Json<Vec<InstanceView>>, ApiError> {
    let views = state.engine.list_instances_for_therapist(therapist_id).await?;
    Ok(Json(views))
}

#[derive(Deserialize)]
pub struct StatusChange {
    pub status: InstanceStatus,
}

pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(change): Json<StatusChange>,
) -> Result<Json<Instance>, ApiError> {
    let updated = state.engine.set_status(id, change.status).await?;
    Ok(Json(updated))
}

pub async fn delete_instance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.engine.delete_instance(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
