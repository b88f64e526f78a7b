use axum::{
    extract::{Json, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use super::AppState;
use crate::auth::AuthUser;
use crate::error::AppError;

#[derive(Deserialize)]
pub struct FeedParams {
    pub count: Option<i64>,
    pub page: Option<i64>,
}

/// One page of the caller's feed, newest first.
pub(super) async fn feed(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Query(params): Query<FeedParams>,
) -> Result<impl IntoResponse, AppError> {
    let count = params.count.unwrap_or(20);
    let page = params.page.unwrap_or(1);
    if count <= 0 || page <= 0 {
        return Err(AppError::bad_request("count and page must be positive"));
    }
    let total = state.db.feed_size(claims.sub).await?;
    let activities = state.db.feed_page(claims.sub, count, page).await?;
    Ok(Json(json!({
        "results": activities,
        "total": total,
        "count": count,
        "page": page,
    })))
}
