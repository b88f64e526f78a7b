// Authentication: password hashing, JWT tokens, auth keys and extractors.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{FromRequestParts, State},
    http::{request::Parts, StatusCode},
    response::IntoResponse,
    Json,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::api::{internal_error, json_error, AppState};
use crate::db::{is_unique_violation, User};

// ── JWT ──────────────────────────────────────────────────────────────

/// JWT secret – in production this should come from an env var.
fn jwt_secret() -> Vec<u8> {
    std::env::var("JWT_SECRET")
        .unwrap_or_else(|_| "gonawin-dev-secret-change-in-production".to_string())
        .into_bytes()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: i64, // user id
    pub username: String,
    pub role: String,
    pub exp: usize, // expiry (unix timestamp)
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

pub fn create_token(user_id: i64, username: &str, role: &str) -> Result<String, String> {
    let expiration = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::hours(24))
        .ok_or_else(|| "expiry out of range".to_string())?
        .timestamp() as usize;

    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        role: role.to_string(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(&jwt_secret()),
    )
    .map_err(|e| format!("Failed to create token: {e}"))
}

pub fn verify_token(token: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(&jwt_secret()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| format!("Invalid token: {e}"))
}

// ── Password hashing and auth keys ───────────────────────────────────

pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| format!("Failed to hash password: {e}"))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, String> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| format!("Invalid password hash: {e}"))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Random per-user key: SHA-256 hex digest of a fresh UUID.
pub fn generate_auth_key() -> String {
    let mut hasher = Sha256::new();
    hasher.update(uuid::Uuid::new_v4().as_bytes());
    hex::encode(hasher.finalize())
}

// ── Axum extractors ──────────────────────────────────────────────────

type Rejection = (StatusCode, Json<serde_json::Value>);

fn reject(status: StatusCode, msg: &str) -> Rejection {
    (status, Json(json!({ "error": msg })))
}

fn bearer_claims(parts: &Parts) -> Result<Claims, Rejection> {
    let auth_header = parts
        .headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Missing Authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Invalid Authorization header format"))?;

    verify_token(token).map_err(|_| reject(StatusCode::UNAUTHORIZED, "Invalid token"))
}

/// Extracts the authenticated user from the Authorization header.
/// Usage: `AuthUser(claims)` in handler parameters.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Rejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        bearer_claims(parts).map(AuthUser)
    }
}

/// Like `AuthUser`, but only site admins get through.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Claims);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = Rejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = bearer_claims(parts)?;
        if !claims.is_admin() {
            return Err(reject(StatusCode::FORBIDDEN, "Admin rights required"));
        }
        Ok(AdminUser(claims))
    }
}

// ── Auth API handlers ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

fn token_response(status: StatusCode, user: User) -> axum::response::Response {
    match create_token(user.id, &user.username, &user.role) {
        Ok(token) => (status, Json(json!(AuthResponse { token, user }))).into_response(),
        Err(e) => {
            tracing::error!("Token creation error: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
        }
    }
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> impl IntoResponse {
    if req.username.is_empty() || req.password.is_empty() || req.email.is_empty() {
        return json_error(
            StatusCode::BAD_REQUEST,
            "username, email, and password are required",
        )
        .into_response();
    }

    if req.username.len() < 3 || req.username.len() > 30 {
        return json_error(StatusCode::BAD_REQUEST, "username must be 3-30 characters")
            .into_response();
    }

    if req.password.len() < 8 {
        return json_error(
            StatusCode::BAD_REQUEST,
            "password must be at least 8 characters",
        )
        .into_response();
    }

    if !crate::tasks::is_valid_email(&req.email) {
        return json_error(StatusCode::BAD_REQUEST, "email is not valid").into_response();
    }

    let password_hash = match hash_password(&req.password) {
        Ok(h) => h,
        Err(e) => {
            tracing::error!("Password hash error: {e}");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response();
        }
    };

    let name = req.name.unwrap_or_else(|| req.username.clone());
    let role = if state.config.is_admin_username(&req.username) {
        "admin"
    } else {
        "user"
    };

    match state
        .db
        .create_user(
            &req.username,
            &req.email,
            Some(&password_hash),
            &name,
            role,
            &generate_auth_key(),
        )
        .await
    {
        Ok(user) => {
            tracing::info!(user_id = user.id, role, "User registered");
            token_response(StatusCode::CREATED, user)
        }
        Err(e) if is_unique_violation(&e) => {
            json_error(StatusCode::CONFLICT, "Username or email already taken").into_response()
        }
        Err(e) => internal_error(e).into_response(),
    }
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    let user = match state.db.get_user_by_username(&req.username).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            return json_error(StatusCode::UNAUTHORIZED, "Invalid username or password")
                .into_response();
        }
        Err(e) => return internal_error(e).into_response(),
    };

    let Some(ref password_hash) = user.password_hash else {
        return json_error(StatusCode::UNAUTHORIZED, "This account has no password")
            .into_response();
    };

    match verify_password(&req.password, password_hash) {
        Ok(true) => {}
        Ok(false) => {
            return json_error(StatusCode::UNAUTHORIZED, "Invalid username or password")
                .into_response();
        }
        Err(e) => {
            tracing::error!("Password verify error: {e}");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response();
        }
    }

    token_response(StatusCode::OK, user)
}

pub async fn me(AuthUser(claims): AuthUser, State(state): State<AppState>) -> impl IntoResponse {
    match state.db.get_user(claims.sub).await {
        Ok(Some(user)) => (StatusCode::OK, Json(json!(user))).into_response(),
        Ok(None) => json_error(StatusCode::NOT_FOUND, "User not found").into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}
