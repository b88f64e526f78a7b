use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use super::{clamp_limit, current_user, internal_error, json_error, AppState, LimitParams, SearchParams};
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::league;
use crate::metrics;
use crate::search::SearchKind;

#[derive(Deserialize)]
pub struct TeamRequestBody {
    pub name: String,
    pub description: Option<String>,
    pub private: Option<bool>,
}

#[derive(Deserialize)]
pub struct PriceRequest {
    pub description: String,
}

// ── Team CRUD ────────────────────────────────────────────────────────

pub(super) async fn list_teams(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.list_teams().await {
        Ok(teams) => (StatusCode::OK, Json(json!(teams))).into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

pub(super) async fn create_team(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<TeamRequestBody>,
) -> Result<impl IntoResponse, AppError> {
    let user = current_user(&state.db, &claims).await?;
    let team = league::create_team(
        &state.db,
        &user,
        &req.name,
        req.description.as_deref().unwrap_or_default(),
        req.private.unwrap_or(false),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(json!(team))))
}

pub(super) async fn get_team(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let team = league::find_team(&state.db, id).await?;
    let members = state.db.team_members(id).await?;
    let admins = state.db.team_admins(id).await?;
    let tournaments = state.db.team_tournaments(id).await?;
    Ok(Json(json!({
        "team": team,
        "members": members,
        "admins": admins,
        "tournaments": tournaments,
    })))
}

pub(super) async fn update_team(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<TeamRequestBody>,
) -> Result<impl IntoResponse, AppError> {
    let user = current_user(&state.db, &claims).await?;
    let current = league::find_team(&state.db, id).await?;
    let team = league::update_team(
        &state.db,
        &user,
        id,
        &req.name,
        req.description.as_deref().unwrap_or(&current.description),
        req.private.unwrap_or(current.private),
    )
    .await?;
    Ok(Json(json!(team)))
}

pub(super) async fn delete_team(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = current_user(&state.db, &claims).await?;
    league::delete_team(&state.db, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn search_teams(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, AppError> {
    metrics::SEARCHES_TOTAL
        .with_label_values(&[SearchKind::Team.as_str()])
        .inc();
    let query = params.q.unwrap_or_default();
    let ids = state.db.search_ids(SearchKind::Team, &query).await?;
    Ok(Json(json!(state.db.teams_by_ids(&ids).await?)))
}

// ── Membership ───────────────────────────────────────────────────────

pub(super) async fn join_team(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = current_user(&state.db, &claims).await?;
    let team = league::join_team(&state.db, &user, id).await?;
    Ok(Json(json!({
        "message": format!("You joined team {}", team.name),
        "team": team,
    })))
}

pub(super) async fn leave_team(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = current_user(&state.db, &claims).await?;
    let team = league::leave_team(&state.db, &user, id).await?;
    Ok(Json(json!({
        "message": format!("You left team {}", team.name),
        "team": team,
    })))
}

pub(super) async fn members(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    match state.db.team_members(id).await {
        Ok(users) => (StatusCode::OK, Json(json!(users))).into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

/// Members by score, best first.
pub(super) async fn ranking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<LimitParams>,
) -> Result<impl IntoResponse, AppError> {
    league::find_team(&state.db, id).await?;
    let users = state.db.team_ranking(id, clamp_limit(params.limit)).await?;
    Ok(Json(json!(users)))
}

// ── Requests and invitations ─────────────────────────────────────────

pub(super) async fn request_join(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = current_user(&state.db, &claims).await?;
    let request = league::request_join(&state.db, &user, id).await?;
    Ok((StatusCode::CREATED, Json(json!(request))))
}

pub(super) async fn list_requests(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = current_user(&state.db, &claims).await?;
    league::find_team(&state.db, id).await?;
    league::require_team_admin(&state.db, id, &user).await?;
    Ok(Json(json!(state.db.team_requests(id).await?)))
}

pub(super) async fn allow_request(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(request_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = current_user(&state.db, &claims).await?;
    let request = league::allow_team_request(&state.db, &user, request_id).await?;
    Ok(Json(json!({
        "message": format!("{} joined team {}", request.user_name, request.team_name),
        "request": request,
    })))
}

pub(super) async fn deny_request(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(request_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = current_user(&state.db, &claims).await?;
    league::deny_team_request(&state.db, &user, request_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn invite_user(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path((id, user_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let admin = current_user(&state.db, &claims).await?;
    let request = league::invite_user(&state.db, &admin, id, user_id).await?;
    Ok((StatusCode::CREATED, Json(json!(request))))
}

pub(super) async fn invited_users(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    match state.db.invited_users(id).await {
        Ok(users) => (StatusCode::OK, Json(json!(users))).into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

// ── Accuracies and prices ────────────────────────────────────────────

pub(super) async fn accuracies(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    match state.db.team_accuracies(id).await {
        Ok(series) => (StatusCode::OK, Json(json!(series))).into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

pub(super) async fn accuracy(
    State(state): State<AppState>,
    Path((id, tournament_id)): Path<(i64, i64)>,
) -> impl IntoResponse {
    match state.db.team_accuracy(id, tournament_id).await {
        Ok(Some(series)) => (StatusCode::OK, Json(json!(series))).into_response(),
        Ok(None) => json_error(StatusCode::NOT_FOUND, "Accuracy not found").into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

pub(super) async fn prices(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    match state.db.team_prices(id).await {
        Ok(prices) => (StatusCode::OK, Json(json!(prices))).into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

pub(super) async fn price(
    State(state): State<AppState>,
    Path((id, tournament_id)): Path<(i64, i64)>,
) -> impl IntoResponse {
    match state.db.get_price(id, tournament_id).await {
        Ok(Some(price)) => (StatusCode::OK, Json(json!(price))).into_response(),
        Ok(None) => json_error(StatusCode::NOT_FOUND, "Price not found").into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

pub(super) async fn update_price(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path((id, tournament_id)): Path<(i64, i64)>,
    Json(req): Json<PriceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = current_user(&state.db, &claims).await?;
    let price = league::update_price(&state.db, &user, id, tournament_id, &req.description).await?;
    Ok(Json(json!(price)))
}

// ── Admins ───────────────────────────────────────────────────────────

pub(super) async fn add_admin(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path((id, user_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let user = current_user(&state.db, &claims).await?;
    league::add_team_admin(&state.db, &user, id, user_id).await?;
    Ok(Json(json!(state.db.team_admins(id).await?)))
}

pub(super) async fn remove_admin(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path((id, user_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let user = current_user(&state.db, &claims).await?;
    league::remove_team_admin(&state.db, &user, id, user_id).await?;
    Ok(Json(json!(state.db.team_admins(id).await?)))
}
