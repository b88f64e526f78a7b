use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::matches::match_views;
use super::{clamp_limit, current_user, internal_error, AppState, SearchParams};
use crate::auth::{AdminUser, AuthUser};
use crate::db::{GroupStanding, Tournament};
use crate::error::AppError;
use crate::league;
use crate::metrics;
use crate::search::SearchKind;
use crate::tournament::{group_by_day, group_by_phase, progress, rank_group, Phase, Standing, TournamentKind};

#[derive(Deserialize)]
pub struct CreateTournamentRequest {
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Deserialize)]
pub struct UpdateTournamentRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Deserialize)]
pub struct CalendarParams {
    pub group_by: Option<String>,
}

#[derive(Deserialize)]
pub struct RankingParams {
    pub rank_by: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct TTeamRequest {
    pub name: String,
    pub iso: String,
}

#[derive(Serialize)]
struct TournamentView {
    #[serde(flatten)]
    tournament: Tournament,
    progress: f64,
}

impl From<Tournament> for TournamentView {
    fn from(tournament: Tournament) -> Self {
        let progress = progress(
            tournament.start_date,
            tournament.end_date,
            Utc::now().naive_utc(),
        );
        Self {
            tournament,
            progress,
        }
    }
}

fn parse_phase(name: &str) -> Result<Phase, AppError> {
    Phase::from_str_name(name).ok_or_else(|| AppError::bad_request(format!("unknown phase {name}")))
}

fn parse_seeded_kind(name: &str) -> Result<TournamentKind, AppError> {
    TournamentKind::from_str_name(name)
        .filter(|k| TournamentKind::SEEDED.contains(k))
        .ok_or(AppError::NotFound("Tournament kind"))
}

// ── Tournament CRUD ──────────────────────────────────────────────────

pub(super) async fn list_tournaments(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.list_tournaments().await {
        Ok(tournaments) => {
            let views: Vec<TournamentView> = tournaments.into_iter().map(TournamentView::from).collect();
            (StatusCode::OK, Json(json!(views))).into_response()
        }
        Err(e) => internal_error(e).into_response(),
    }
}

pub(super) async fn create_tournament(
    State(state): State<AppState>,
    AdminUser(claims): AdminUser,
    Json(req): Json<CreateTournamentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let admin = current_user(&state.db, &claims).await?;
    let tournament = league::create_tournament(
        &state.db,
        &admin,
        &req.name,
        req.description.as_deref().unwrap_or_default(),
        req.start_date,
        req.end_date,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(json!(TournamentView::from(tournament)))))
}

pub(super) async fn get_tournament(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let tournament = league::find_tournament(&state.db, id).await?;
    let participants = state.db.participants(id).await?;
    let teams = state.db.tournament_teams(id).await?;
    Ok(Json(json!({
        "tournament": TournamentView::from(tournament),
        "participants": participants,
        "teams": teams,
    })))
}

pub(super) async fn update_tournament(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTournamentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = current_user(&state.db, &claims).await?;
    let current = league::find_tournament(&state.db, id).await?;
    let tournament = league::update_tournament(
        &state.db,
        &user,
        id,
        req.name.as_deref().unwrap_or(&current.name),
        req.description.as_deref().unwrap_or(&current.description),
        req.start_date.unwrap_or(current.start_date),
        req.end_date.unwrap_or(current.end_date),
    )
    .await?;
    Ok(Json(json!(TournamentView::from(tournament))))
}

pub(super) async fn delete_tournament(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = current_user(&state.db, &claims).await?;
    league::delete_tournament(&state.db, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn search_tournaments(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, AppError> {
    metrics::SEARCHES_TOTAL
        .with_label_values(&[SearchKind::Tournament.as_str()])
        .inc();
    let query = params.q.unwrap_or_default();
    let ids = state.db.search_ids(SearchKind::Tournament, &query).await?;
    let views: Vec<TournamentView> = state
        .db
        .tournaments_by_ids(&ids)
        .await?
        .into_iter()
        .map(TournamentView::from)
        .collect();
    Ok(Json(json!(views)))
}

// ── Participants and teams ───────────────────────────────────────────

pub(super) async fn participants(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    match state.db.participants(id).await {
        Ok(users) => (StatusCode::OK, Json(json!(users))).into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

pub(super) async fn teams(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    match state.db.tournament_teams(id).await {
        Ok(teams) => (StatusCode::OK, Json(json!(teams))).into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

/// The caller's admin teams, flagged with whether each already joined.
pub(super) async fn candidates(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    league::find_tournament(&state.db, id).await?;
    let open: Vec<i64> = state
        .db
        .tournament_candidates(id, claims.sub)
        .await?
        .into_iter()
        .map(|t| t.id)
        .collect();
    let teams: Vec<_> = state
        .db
        .admin_teams(claims.sub)
        .await?
        .into_iter()
        .map(|team| {
            let joined = !open.contains(&team.id);
            json!({ "team": team, "joined": joined })
        })
        .collect();
    Ok(Json(json!(teams)))
}

pub(super) async fn join(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = current_user(&state.db, &claims).await?;
    let tournament = league::join_tournament(&state.db, &user, id).await?;
    Ok(Json(json!({
        "message": format!("You joined tournament {}", tournament.name),
        "tournament": tournament,
    })))
}

pub(super) async fn leave(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = current_user(&state.db, &claims).await?;
    let tournament = league::leave_tournament(&state.db, &user, id).await?;
    Ok(Json(json!({
        "message": format!("You left tournament {}", tournament.name),
        "tournament": tournament,
    })))
}

pub(super) async fn join_as_team(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path((id, team_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let user = current_user(&state.db, &claims).await?;
    let team = league::join_tournament_as_team(&state.db, &user, id, team_id).await?;
    Ok(Json(json!({
        "message": format!("Team {} joined the tournament", team.name),
        "team": team,
    })))
}

pub(super) async fn leave_as_team(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path((id, team_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let user = current_user(&state.db, &claims).await?;
    let team = league::leave_tournament_as_team(&state.db, &user, id, team_id).await?;
    Ok(Json(json!({
        "message": format!("Team {} left the tournament", team.name),
        "team": team,
    })))
}

pub(super) async fn add_admin(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path((id, user_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let user = current_user(&state.db, &claims).await?;
    league::add_tournament_admin(&state.db, &user, id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn remove_admin(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path((id, user_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let user = current_user(&state.db, &claims).await?;
    league::remove_tournament_admin(&state.db, &user, id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── Seeded tournaments ───────────────────────────────────────────────

pub(super) async fn create_world_cup(
    State(state): State<AppState>,
    AdminUser(claims): AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let admin = current_user(&state.db, &claims).await?;
    let tournament = league::create_world_cup(&state.db, &admin).await?;
    Ok((StatusCode::CREATED, Json(json!(TournamentView::from(tournament)))))
}

pub(super) async fn get_world_cup(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let tournament = league::get_world_cup(&state.db).await?;
    Ok(Json(json!(TournamentView::from(tournament))))
}

/// Kinds that can be created from seed data, with whether each exists yet.
pub(super) async fn seeded_kinds(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let mut kinds = Vec::new();
    for kind in TournamentKind::SEEDED {
        let existing = match league::get_seeded(&state.db, kind).await {
            Ok(t) => Some(t.id),
            Err(AppError::NotFound(_)) => None,
            Err(e) => return Err(e),
        };
        kinds.push(json!({ "kind": kind, "tournament_id": existing }));
    }
    Ok(Json(json!(kinds)))
}

pub(super) async fn create_seeded(
    State(state): State<AppState>,
    AdminUser(claims): AdminUser,
    Path(kind): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let kind = parse_seeded_kind(&kind)?;
    let admin = current_user(&state.db, &claims).await?;
    let tournament = league::create_seeded(&state.db, &admin, kind).await?;
    Ok((StatusCode::CREATED, Json(json!(TournamentView::from(tournament)))))
}

pub(super) async fn get_seeded(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let kind = parse_seeded_kind(&kind)?;
    let tournament = league::get_seeded(&state.db, kind).await?;
    Ok(Json(json!(TournamentView::from(tournament))))
}

// ── Structure views ──────────────────────────────────────────────────

/// Group tables in ranked order.
pub(super) async fn groups(State(state): State<AppState>, Path(id): Path<i64>) -> Result<impl IntoResponse, AppError> {
    league::find_tournament(&state.db, id).await?;
    let mut out = Vec::new();
    for group in state.db.list_groups(id).await? {
        let rows = state.db.group_standings(group.id).await?;
        let standings: Vec<Standing> = rows
            .iter()
            .map(|r| Standing {
                points: r.points,
                goals_for: r.goals_for,
                goals_against: r.goals_against,
            })
            .collect();
        let ranked: Vec<&GroupStanding> = rank_group(&standings).into_iter().map(|i| &rows[i]).collect();
        out.push(json!({ "id": group.id, "name": group.name, "teams": ranked }));
    }
    Ok(Json(json!(out)))
}

pub(super) async fn calendar(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
    Query(params): Query<CalendarParams>,
) -> Result<impl IntoResponse, AppError> {
    let tournament = league::find_tournament(&state.db, id).await?;
    let matches = state.db.list_matches(id).await?;
    let views = match_views(&state.db, id, matches, Some(claims.sub)).await?;
    match params.group_by.as_deref().unwrap_or("day") {
        "day" => Ok(Json(json!(group_by_day(&views)))),
        "phase" => Ok(Json(json!(group_by_phase(&views, tournament.kind)))),
        other => Err(AppError::bad_request(format!("cannot group calendar by {other}"))),
    }
}

pub(super) async fn ranking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<RankingParams>,
) -> Result<impl IntoResponse, AppError> {
    league::find_tournament(&state.db, id).await?;
    let limit = clamp_limit(params.limit);
    match params.rank_by.as_deref().unwrap_or("user") {
        "user" => Ok(Json(json!({ "users": state.db.ranking_by_user(id, limit).await? }))),
        "team" => Ok(Json(json!({ "teams": state.db.ranking_by_team(id, limit).await? }))),
        other => Err(AppError::bad_request(format!("cannot rank by {other}"))),
    }
}

// ── Admin operations ─────────────────────────────────────────────────

pub(super) async fn reset(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = current_user(&state.db, &claims).await?;
    league::require_tournament_admin(&state.db, id, &user).await?;
    league::reset_tournament(&state.db, id).await?;
    Ok(Json(json!({ "message": "Tournament has been reset" })))
}

pub(super) async fn activate_phase(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path((id, phase)): Path<(i64, String)>,
) -> Result<impl IntoResponse, AppError> {
    let user = current_user(&state.db, &claims).await?;
    let phase = parse_phase(&phase)?;
    league::require_tournament_admin(&state.db, id, &user).await?;
    let count = league::activate_phase(&state.db, id, phase).await?;
    Ok(Json(json!({ "phase": phase, "activated": count })))
}

pub(super) async fn simulate_phase(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path((id, phase)): Path<(i64, String)>,
) -> Result<impl IntoResponse, AppError> {
    let user = current_user(&state.db, &claims).await?;
    let phase = parse_phase(&phase)?;
    let tournament = league::find_tournament(&state.db, id).await?;
    league::require_tournament_admin(&state.db, id, &user).await?;
    let matches = league::simulate_phase(&state.db, &state.tasks, &tournament, phase).await?;
    Ok(Json(json!({ "phase": phase, "matches": matches })))
}

pub(super) async fn update_tteam(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path((id, tteam_id)): Path<(i64, i64)>,
    Json(req): Json<TTeamRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = current_user(&state.db, &claims).await?;
    league::require_tournament_admin(&state.db, id, &user).await?;
    if req.name.trim().is_empty() {
        return Err(AppError::bad_request("name is required"));
    }
    let tteam = state
        .db
        .update_tteam(id, tteam_id, req.name.trim(), req.iso.trim())
        .await?
        .ok_or(AppError::NotFound("Team"))?;
    Ok(Json(json!(tteam)))
}
