use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use praxis_core::models::instance::Instance;
use praxis_engine::assignment::AssignmentOptions;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AssignRequest {
    pub template_id: Uuid,
    pub client_ids: Vec<Uuid>,
    #[serde(flatten)]
    pub options: AssignmentOptions,
}

pub async fn assign_template(
    State(state): State<AppState>,
    Path(therapist_id): Path<Uuid>,
    Json(req): Json<AssignRequest>,
) -> Result<(StatusCode, Json<Vec<Instance>>), ApiError> {
    // Each invocation may start with an empty catalog.
    if state.engine.catalog().find_active(req.template_id).is_none() {
        state.engine.list_active_templates().await?;
    }
    let created = state
        .engine
        .assign_template(therapist_id, req.template_id, &req.client_ids, req.options)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}
