// HTTP API routes (users, teams, tournaments, matches, activities, invites).

mod activities;
mod invite;
mod matches;
mod tasks;
mod teams;
mod tournaments;
mod users;

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{Json, Request},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use crate::auth::{self, Claims};
use crate::config::Config;
use crate::db::{Database, User};
use crate::error::AppError;
use crate::metrics;
use crate::tasks::TaskQueue;

// ── Shared application state ─────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub tasks: TaskQueue,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: Arc<Database>, tasks: TaskQueue, config: Config) -> Self {
        Self {
            db,
            tasks,
            config: Arc::new(config),
        }
    }
}

// ── Error helpers ────────────────────────────────────────────────────

pub(crate) fn json_error(status: StatusCode, msg: &str) -> impl IntoResponse {
    (status, Json(json!({ "error": msg })))
}

pub(crate) fn internal_error(e: sqlx::Error) -> impl IntoResponse {
    tracing::error!("Database error: {e}");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

/// The user behind a token. Tokens outlive deleted accounts.
pub(crate) async fn current_user(db: &Database, claims: &Claims) -> Result<User, AppError> {
    db.get_user(claims.sub)
        .await?
        .ok_or(AppError::NotFound("User"))
}

// ── Shared query params ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

pub(crate) const DEFAULT_LIMIT: i64 = 10;
pub(crate) const MAX_LIMIT: i64 = 100;

pub(crate) fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

// ── Router ────────────────────────────────────────────────────────────

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "gonawin-backend" }))
}

async fn metrics_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::gather_metrics(),
    )
}

async fn track_metrics(req: Request<Body>, next: Next) -> Response {
    let method = req.method().to_string();
    let endpoint = metrics::normalize_path(req.uri().path());
    let start = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    metrics::API_REQUESTS_TOTAL
        .with_label_values(&[&method, &endpoint, &status])
        .inc();
    metrics::API_REQUEST_DURATION_SECONDS
        .with_label_values(&[&endpoint])
        .observe(start.elapsed().as_secs_f64());
    response
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        // Users
        .route("/api/users", get(users::list_users))
        .route("/api/users/search", get(users::search_users))
        .route(
            "/api/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/api/users/{id}/scores", get(users::user_scores))
        .route("/api/users/{id}/teams", get(users::user_teams))
        .route("/api/users/{id}/tournaments", get(users::user_tournaments))
        .route("/api/users/{id}/invitations", get(users::user_invitations))
        .route("/api/users/allow/{team_id}", post(users::accept_invitation))
        .route("/api/users/deny/{team_id}", post(users::decline_invitation))
        // Teams
        .route("/api/teams", get(teams::list_teams).post(teams::create_team))
        .route("/api/teams/search", get(teams::search_teams))
        .route(
            "/api/teams/{id}",
            get(teams::get_team)
                .put(teams::update_team)
                .delete(teams::delete_team),
        )
        .route("/api/teams/{id}/join", post(teams::join_team))
        .route("/api/teams/{id}/leave", post(teams::leave_team))
        .route(
            "/api/teams/{id}/requests",
            get(teams::list_requests).post(teams::request_join),
        )
        .route(
            "/api/teams/requests/{request_id}/allow",
            post(teams::allow_request),
        )
        .route(
            "/api/teams/requests/{request_id}/deny",
            post(teams::deny_request),
        )
        .route("/api/teams/{id}/invite/{user_id}", post(teams::invite_user))
        .route("/api/teams/{id}/invited", get(teams::invited_users))
        .route("/api/teams/{id}/members", get(teams::members))
        .route("/api/teams/{id}/ranking", get(teams::ranking))
        .route("/api/teams/{id}/accuracies", get(teams::accuracies))
        .route(
            "/api/teams/{id}/accuracies/{tournament_id}",
            get(teams::accuracy),
        )
        .route("/api/teams/{id}/prices", get(teams::prices))
        .route(
            "/api/teams/{id}/prices/{tournament_id}",
            get(teams::price).put(teams::update_price),
        )
        .route(
            "/api/teams/{id}/admins/{user_id}",
            post(teams::add_admin).delete(teams::remove_admin),
        )
        // Tournaments
        .route(
            "/api/tournaments",
            get(tournaments::list_tournaments).post(tournaments::create_tournament),
        )
        .route("/api/tournaments/search", get(tournaments::search_tournaments))
        .route(
            "/api/tournaments/worldcup",
            get(tournaments::get_world_cup).post(tournaments::create_world_cup),
        )
        .route("/api/tournaments/seeded", get(tournaments::seeded_kinds))
        .route(
            "/api/tournaments/seeded/{kind}",
            get(tournaments::get_seeded).post(tournaments::create_seeded),
        )
        .route(
            "/api/tournaments/{id}",
            get(tournaments::get_tournament)
                .put(tournaments::update_tournament)
                .delete(tournaments::delete_tournament),
        )
        .route(
            "/api/tournaments/{id}/participants",
            get(tournaments::participants),
        )
        .route("/api/tournaments/{id}/teams", get(tournaments::teams))
        .route(
            "/api/tournaments/{id}/candidates",
            get(tournaments::candidates),
        )
        .route("/api/tournaments/{id}/join", post(tournaments::join))
        .route("/api/tournaments/{id}/leave", post(tournaments::leave))
        .route(
            "/api/tournaments/{id}/teams/{team_id}/join",
            post(tournaments::join_as_team),
        )
        .route(
            "/api/tournaments/{id}/teams/{team_id}/leave",
            post(tournaments::leave_as_team),
        )
        .route(
            "/api/tournaments/{id}/admins/{user_id}",
            post(tournaments::add_admin).delete(tournaments::remove_admin),
        )
        .route("/api/tournaments/{id}/groups", get(tournaments::groups))
        .route("/api/tournaments/{id}/calendar", get(tournaments::calendar))
        .route("/api/tournaments/{id}/ranking", get(tournaments::ranking))
        .route("/api/tournaments/{id}/reset", post(tournaments::reset))
        .route(
            "/api/tournaments/{id}/tteams/{tteam_id}",
            put(tournaments::update_tteam),
        )
        .route(
            "/api/tournaments/{id}/phases/{phase}/activate",
            post(tournaments::activate_phase),
        )
        .route(
            "/api/tournaments/{id}/phases/{phase}/simulate",
            post(tournaments::simulate_phase),
        )
        // Matches
        .route("/api/tournaments/{id}/matches", get(matches::list_matches))
        .route(
            "/api/tournaments/{id}/matches/{id_number}",
            get(matches::get_match),
        )
        .route(
            "/api/tournaments/{id}/matches/{id_number}/predict",
            post(matches::predict),
        )
        .route(
            "/api/tournaments/{id}/matches/{id_number}/result",
            post(matches::set_result),
        )
        .route(
            "/api/tournaments/{id}/matches/{id_number}/block",
            post(matches::block),
        )
        // Activities
        .route("/api/activities", get(activities::feed))
        // Invites and tasks
        .route("/api/invite", post(invite::invite))
        .route(
            "/api/tasks/update-scores/{tournament_id}",
            post(tasks::update_scores),
        )
        .route("/api/tasks/status", get(tasks::status))
        .route("/api/tasks/outbox", get(tasks::outbox))
        .layer(middleware::from_fn(track_metrics))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

