use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};

use crate::middleware;
use crate::state::AppState;

pub mod assignments;
pub mod health;
pub mod instances;
pub mod scores;
pub mod templates;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/templates", get(templates::list_templates))
        .route(
            "/therapists/{id}/instances",
            get(instances::list_for_therapist),
        )
        .route(
            "/therapists/{id}/assignments",
            post(assignments::assign_template),
        )
        .route("/instances/{id}/status", put(instances::set_status))
        .route(
            "/instances/{id}",
            axum::routing::delete(instances::delete_instance),
        )
        .route("/instances/{id}/score", get(scores::latest_score))
        .route("/clients/{id}/results", get(scores::client_results))
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(cors)
        .with_state(state)
}
