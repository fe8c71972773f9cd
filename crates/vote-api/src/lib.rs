pub mod errors;
pub mod ranking;
pub mod routes;
pub mod state;

use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Request timeout applied to every route.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the vote service router.
///
/// Routes are CORS-enabled for any origin; preflight OPTIONS requests
/// succeed on both paths regardless of validation.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/vote",
            post(routes::toggle_vote_handler)
                .get(routes::missing_project_handler)
                .options(routes::preflight_handler),
        )
        .route(
            "/vote/{project_id}",
            get(routes::get_tally_handler).options(routes::preflight_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(cors)
        .with_state(state)
}
