//! HTTP API for the points tracker

pub mod helpers;
pub mod routes;
pub mod state;
pub mod validation;

pub use api_types::ErrorResponse;
pub use routes::router;
pub use state::{ApiState, DEFAULT_MAX_REQUESTS, DEFAULT_RATE_PERIOD, MAX_LEADERBOARD_LIMIT};

use api_types::{
    CalculateRequest, HealthResponse, LeaderboardItem, LeaderboardResponse, ParamsResponse,
    PointsResponse, ProfileResponse, SyncResponse, UpdateProfileRequest,
};
use routes::{leaderboard::*, points::*, profiles::*};
use utoipa::OpenApi;
use validation::LeaderboardQuery;

/// `OpenAPI` documentation structure
#[derive(Debug, OpenApi)]
#[openapi(
    paths(calculate, params, leaderboard, sync, get_profile, put_profile),
    components(
        schemas(
            LeaderboardQuery,
            CalculateRequest,
            PointsResponse,
            ParamsResponse,
            LeaderboardItem,
            LeaderboardResponse,
            ProfileResponse,
            UpdateProfileRequest,
            SyncResponse,
            HealthResponse,
            ErrorResponse
        )
    ),
    tags(
        (name = "points", description = "Points calculation and leaderboard"),
        (name = "profiles", description = "Wallet display names")
    ),
    info(
        title = "Points Tracker API",
        description = "API for computing token holding points and serving the leaderboard",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
