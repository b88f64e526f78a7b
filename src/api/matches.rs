use std::collections::HashMap;

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{current_user, AppState};
use crate::auth::AuthUser;
use crate::db::{Database, Match, Predict, TTeam};
use crate::error::AppError;
use crate::league;
use crate::tournament::Scheduled;

#[derive(Deserialize)]
pub struct ResultRequest {
    pub result1: i64,
    pub result2: i64,
}

#[derive(Deserialize)]
pub struct MatchFilter {
    /// `first` for the group stage, `second` for the knockout rounds.
    pub filter: Option<String>,
}

/// A match with its national teams and the caller's prediction.
#[derive(Debug, Clone, Serialize)]
pub(super) struct MatchView {
    #[serde(flatten)]
    pub m: Match,
    pub team1: Option<TTeam>,
    pub team2: Option<TTeam>,
    pub predict: Option<Predict>,
}

impl Scheduled for MatchView {
    fn id_number(&self) -> i64 {
        self.m.id_number
    }

    fn date(&self) -> NaiveDate {
        self.m.match_date
    }
}

/// Decorate matches with team rows and, when a user is given, their predictions.
pub(super) async fn match_views(
    db: &Database,
    tournament_id: i64,
    matches: Vec<Match>,
    user_id: Option<i64>,
) -> Result<Vec<MatchView>, AppError> {
    let tteams: HashMap<i64, TTeam> = db
        .list_tteams(tournament_id)
        .await?
        .into_iter()
        .map(|t| (t.id, t))
        .collect();
    let predicts: HashMap<i64, Predict> = match user_id {
        Some(uid) => db
            .user_predicts(uid, tournament_id)
            .await?
            .into_iter()
            .map(|p| (p.match_id, p))
            .collect(),
        None => HashMap::new(),
    };

    Ok(matches
        .into_iter()
        .map(|m| MatchView {
            team1: m.team1_id.and_then(|id| tteams.get(&id).cloned()),
            team2: m.team2_id.and_then(|id| tteams.get(&id).cloned()),
            predict: predicts.get(&m.id).cloned(),
            m,
        })
        .collect())
}

pub(super) async fn list_matches(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
    Query(params): Query<MatchFilter>,
) -> Result<impl IntoResponse, AppError> {
    let tournament = league::find_tournament(&state.db, id).await?;
    let matches: Vec<Match> = state
        .db
        .list_matches(id)
        .await?
        .into_iter()
        .filter(|m| match params.filter.as_deref() {
            Some("first") => tournament.kind.is_group_match(m.id_number),
            Some("second") => !tournament.kind.is_group_match(m.id_number),
            _ => true,
        })
        .collect();
    let views = match_views(&state.db, id, matches, Some(claims.sub)).await?;
    Ok(Json(json!(views)))
}

pub(super) async fn get_match(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path((id, id_number)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let m = state
        .db
        .get_match_by_number(id, id_number)
        .await?
        .ok_or(AppError::NotFound("Match"))?;
    let mut views = match_views(&state.db, id, vec![m], Some(claims.sub)).await?;
    Ok(Json(json!(views.pop())))
}

pub(super) async fn predict(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path((id, id_number)): Path<(i64, i64)>,
    Json(req): Json<ResultRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = current_user(&state.db, &claims).await?;
    let tournament = league::find_tournament(&state.db, id).await?;
    let (predict, created) =
        league::predict(&state.db, &user, &tournament, id_number, req.result1, req.result2).await?;
    let (status, message) = if created {
        (StatusCode::CREATED, "Your prediction was saved")
    } else {
        (StatusCode::OK, "Your prediction was updated")
    };
    Ok((status, Json(json!({ "message": message, "predict": predict }))))
}

pub(super) async fn set_result(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path((id, id_number)): Path<(i64, i64)>,
    Json(req): Json<ResultRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = current_user(&state.db, &claims).await?;
    let tournament = league::find_tournament(&state.db, id).await?;
    league::require_tournament_admin(&state.db, id, &user).await?;
    let m = league::set_result(
        &state.db,
        &state.tasks,
        &tournament,
        id_number,
        req.result1,
        req.result2,
    )
    .await?;
    Ok(Json(json!(m)))
}

pub(super) async fn block(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path((id, id_number)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let user = current_user(&state.db, &claims).await?;
    league::find_tournament(&state.db, id).await?;
    league::require_tournament_admin(&state.db, id, &user).await?;
    let m = league::block_match(&state.db, id, id_number).await?;
    Ok(Json(json!(m)))
}
