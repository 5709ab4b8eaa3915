//! API route definitions

pub mod leaderboard;
pub mod points;
pub mod profiles;

use crate::{ApiDoc, state::ApiState};
use axum::{
    Router,
    routing::{get, post},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use leaderboard::*;
use points::*;
use profiles::*;

/// Build the router with all API endpoints.
pub fn router(state: ApiState) -> Router {
    let api_routes = Router::new()
        .route("/calculate", post(calculate))
        .route("/params", get(params))
        .route("/leaderboard", get(leaderboard))
        .route("/sync", post(sync))
        .route("/profiles/:address", get(get_profile).put(put_profile));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(api_routes)
        .with_state(state)
}
