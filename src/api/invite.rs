use axum::{
    extract::{Json, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use super::{current_user, AppState};
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::tasks::{invite_body, parse_emails, Task};

const SIGN_IN_URL: &str = "http://www.gonawin.com";

#[derive(Deserialize)]
pub struct InviteRequest {
    /// Comma separated addresses.
    pub emails: String,
    /// Shown as the inviter; defaults to the caller's name.
    pub name: Option<String>,
}

pub(super) async fn invite(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<InviteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (emails, invalid) = parse_emails(&req.emails);
    if emails.is_empty() {
        return Err(AppError::bad_request("no email address given"));
    }
    if !invalid.is_empty() {
        return Err(AppError::bad_request(format!(
            "invalid email addresses: {}",
            invalid.join(", ")
        )));
    }

    let name = match req.name.filter(|n| !n.trim().is_empty()) {
        Some(name) => name,
        None => current_user(&state.db, &claims).await?.name,
    };
    for email in &emails {
        state.tasks.enqueue(Task::SendInvite {
            email: email.clone(),
            name: name.clone(),
            body: invite_body(SIGN_IN_URL),
        });
    }
    tracing::info!(user_id = claims.sub, count = emails.len(), "Invites queued");

    Ok(Json(json!({
        "message": "Your invitations have been sent",
        "queued": emails.len(),
    })))
}
