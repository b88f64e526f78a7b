use std::collections::BTreeMap;

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use super::{current_user, internal_error, json_error, AppState, SearchParams};
use crate::auth::{AdminUser, AuthUser, Claims};
use crate::error::AppError;
use crate::league;
use crate::metrics;
use crate::search::SearchKind;
use crate::tasks::is_valid_email;

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

fn is_self_or_admin(claims: &Claims, id: i64) -> bool {
    claims.sub == id || claims.is_admin()
}

pub(super) async fn list_users(State(state): State<AppState>, _admin: AdminUser) -> impl IntoResponse {
    match state.db.list_users().await {
        Ok(users) => (StatusCode::OK, Json(json!(users))).into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

pub(super) async fn get_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = league::find_user(&state.db, id).await?;
    let teams = state.db.user_teams(id).await?;
    let tournaments = state.db.user_tournaments(id).await?;
    Ok(Json(json!({
        "user": user,
        "teams": teams,
        "tournaments": tournaments,
    })))
}

pub(super) async fn update_user(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> impl IntoResponse {
    if !is_self_or_admin(&claims, id) {
        return json_error(StatusCode::FORBIDDEN, "You cannot edit this user").into_response();
    }
    if let Some(email) = &req.email {
        if !is_valid_email(email) {
            return json_error(StatusCode::BAD_REQUEST, "email is not valid").into_response();
        }
    }
    match state
        .db
        .update_user(id, req.name.as_deref(), req.email.as_deref())
        .await
    {
        Ok(Some(user)) => (StatusCode::OK, Json(json!(user))).into_response(),
        Ok(None) => json_error(StatusCode::NOT_FOUND, "User not found").into_response(),
        Err(e) if crate::db::is_unique_violation(&e) => {
            json_error(StatusCode::CONFLICT, "Email already taken").into_response()
        }
        Err(e) => internal_error(e).into_response(),
    }
}

pub(super) async fn delete_user(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    if !is_self_or_admin(&claims, id) {
        return json_error(StatusCode::FORBIDDEN, "You cannot delete this user").into_response();
    }
    match state.db.delete_user(id).await {
        Ok(true) => {
            tracing::info!(user_id = id, "User deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(false) => json_error(StatusCode::NOT_FOUND, "User not found").into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

/// Score history grouped by tournament.
pub(super) async fn user_scores(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    league::find_user(&state.db, id).await?;
    let mut by_tournament: BTreeMap<i64, Vec<_>> = BTreeMap::new();
    for entry in state.db.user_scores(id).await? {
        by_tournament.entry(entry.tournament_id).or_default().push(entry);
    }

    let ids: Vec<i64> = by_tournament.keys().copied().collect();
    let tournaments = state.db.tournaments_by_ids(&ids).await?;
    let mut out = Vec::with_capacity(tournaments.len());
    for t in tournaments {
        let entries = by_tournament.remove(&t.id).unwrap_or_default();
        let total: i64 = entries.iter().map(|e| e.points).sum();
        out.push(json!({
            "tournament_id": t.id,
            "tournament_name": t.name,
            "total": total,
            "scores": entries,
        }));
    }
    Ok(Json(json!(out)))
}

pub(super) async fn user_teams(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match state.db.user_teams(id).await {
        Ok(teams) => (StatusCode::OK, Json(json!(teams))).into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

pub(super) async fn user_tournaments(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match state.db.user_tournaments(id).await {
        Ok(tournaments) => (StatusCode::OK, Json(json!(tournaments))).into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

pub(super) async fn search_users(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, AppError> {
    metrics::SEARCHES_TOTAL
        .with_label_values(&[SearchKind::User.as_str()])
        .inc();
    let query = params.q.unwrap_or_default();
    let ids = state.db.search_ids(SearchKind::User, &query).await?;
    let users = state.db.users_by_ids(&ids).await?;
    Ok(Json(json!(users)))
}

// ── Invitations ──────────────────────────────────────────────────────

/// Pending team invitations, with the inviting team.
pub(super) async fn user_invitations(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !is_self_or_admin(&claims, id) {
        return Err(AppError::forbidden("You cannot see these invitations"));
    }
    let requests = state.db.user_invitations(id).await?;
    let team_ids: Vec<i64> = requests.iter().map(|r| r.team_id).collect();
    let teams = state.db.teams_by_ids(&team_ids).await?;
    Ok(Json(json!({
        "invitations": requests,
        "teams": teams,
    })))
}

pub(super) async fn accept_invitation(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(team_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = current_user(&state.db, &claims).await?;
    let team = league::accept_invitation(&state.db, &user, team_id).await?;
    Ok(Json(json!({
        "message": format!("You joined team {}", team.name),
        "team": team,
    })))
}

pub(super) async fn decline_invitation(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(team_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = current_user(&state.db, &claims).await?;
    league::decline_invitation(&state.db, &user, team_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
