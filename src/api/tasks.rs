use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use super::{internal_error, AppState};
use crate::auth::AdminUser;
use crate::error::AppError;
use crate::league;
use crate::tasks::Task;

/// Queue a score update for every finished match of a tournament.
pub(super) async fn update_scores(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(tournament_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    league::find_tournament(&state.db, tournament_id).await?;
    let finished = state.db.finished_match_ids(tournament_id).await?;
    for match_id in &finished {
        state.tasks.enqueue(Task::UpdateScores {
            tournament_id,
            match_id: *match_id,
        });
    }
    Ok(Json(json!({ "queued": finished.len() })))
}

pub(super) async fn status(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(json!(state.tasks.status())))
}

pub(super) async fn outbox(State(state): State<AppState>, _admin: AdminUser) -> impl IntoResponse {
    match state.db.list_outbox().await {
        Ok(messages) => (StatusCode::OK, Json(json!(messages))).into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}
