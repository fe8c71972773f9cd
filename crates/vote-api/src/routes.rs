use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use vote_core::{ProjectId, UserId, toggle_vote};

use crate::errors::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub project_id: String,
    pub user_id: String,
    /// Optional client-supplied toggle time, epoch seconds.
    pub timestamp: Option<i64>,
}

#[derive(Serialize)]
pub struct VoteResponse {
    pub voted: bool,
    pub count: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TallyResponse {
    pub project_id: String,
    pub count: u64,
}

/// POST /vote
///
/// Toggles the caller's vote for a project: first call creates the vote and
/// bumps the tally up, the matching second call removes it and bumps the
/// tally down. The response reports the caller's new voted state and the
/// project's new count.
pub async fn toggle_vote_handler(
    State(state): State<AppState>,
    body: Result<Json<VoteRequest>, JsonRejection>,
) -> Result<Json<VoteResponse>, ApiError> {
    // A missing or malformed body is a validation failure, not a 422.
    let Json(request) = body.map_err(|e| ApiError::Validation(e.body_text()))?;

    let project = ProjectId::new(request.project_id)
        .map_err(|e| ApiError::Validation(format!("projectId: {e}")))?;
    let user = UserId::new(request.user_id)
        .map_err(|e| ApiError::Validation(format!("userId: {e}")))?;

    let voted_at = request.timestamp.unwrap_or_else(|| Utc::now().timestamp());

    let outcome = toggle_vote(state.store.as_ref(), &user, &project, voted_at).await?;

    // New votes feed the caller's hall-of-fame score; un-votes do not.
    // Fire-and-forget: the vote response never waits on the ranking service.
    if outcome.voted {
        if let Some(ranking) = state.ranking.clone() {
            let user_id = user.to_string();
            tokio::spawn(async move {
                if let Err(e) = ranking.award_vote_points(&user_id).await {
                    tracing::warn!(user = %user_id, "hall-of-fame award failed: {e}");
                }
            });
        }
    }

    Ok(Json(VoteResponse {
        voted: outcome.voted,
        count: outcome.count,
    }))
}

/// GET /vote/{projectId}
///
/// Returns the current tally for a project. A project nobody has voted for
/// reads as count 0, not as an error.
pub async fn get_tally_handler(
    State(state): State<AppState>,
    Path(project_str): Path<String>,
) -> Result<Json<TallyResponse>, ApiError> {
    let project = ProjectId::new(project_str)
        .map_err(|e| ApiError::Validation(format!("projectId: {e}")))?;

    let count = state.store.get_tally(&project).await?;

    Ok(Json(TallyResponse {
        project_id: project.to_string(),
        count,
    }))
}

/// GET /vote (no project id)
///
/// The tally route needs a projectId path segment; answer the bare path with
/// the usual validation error shape instead of a 405.
pub async fn missing_project_handler() -> ApiError {
    ApiError::Validation("projectId path parameter is required".to_string())
}

/// OPTIONS /vote and /vote/{projectId}
///
/// Browsers preflight cross-origin requests; always answer 200 with an empty
/// body, independent of path or body validity. The CORS layer fills in the
/// permissive headers.
pub async fn preflight_handler() -> StatusCode {
    StatusCode::OK
}
