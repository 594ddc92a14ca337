use axum::extract::DefaultBodyLimit;
use axum::routing::{post, put};
use axum::{Router, routing::get};

use super::handlers;
use super::handlers::analyses::MAX_UPLOAD_BYTES;
use super::handlers::probes::{healthz, livez};
use super::state::AppState;
use crate::prelude::Result;

pub async fn build_routes() -> Result<Router> {
    let state = AppState::new().await?;
    let app = Router::new()
        .route(
            "/analyses",
            post(handlers::analyses::analyze).layer(DefaultBodyLimit::max(2 * MAX_UPLOAD_BYTES)),
        )
        .route("/analyses", get(handlers::analyses::history))
        .route("/analyses/shortlisted", get(handlers::analyses::shortlisted))
        .route("/analyses/:id/shortlist", put(handlers::analyses::set_shortlist))
        .route("/healthz", get(healthz))
        .route("/livez", get(livez))
        .with_state(state);

    Ok(app)
}
