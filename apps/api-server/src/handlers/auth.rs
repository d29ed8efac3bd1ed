//! Authentication handlers.

use actix_web::{HttpResponse, web};

use quill_core::DomainError;
use quill_core::domain::User;
use quill_core::ports::AuthError;
use quill_shared::ApiResponse;
use quill_shared::dto::{AuthResponse, LoginRequest, SignupRequest};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::middleware::validation::ValidatedJson;
use crate::state::AppState;

use super::views::user_response;

fn issue_token(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let token = state.tokens.issue(user)?;

    Ok(AuthResponse {
        user: user_response(user),
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.lifetime_secs(),
    })
}

/// POST /api/auth/signup (also mounted at /register)
pub async fn signup(
    state: web::Data<AppState>,
    body: ValidatedJson<SignupRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if state.users.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let password_hash = state.passwords.hash_password(&req.password)?;
    let user = state
        .users
        .insert(User::new(req.name, req.email, password_hash))
        .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(HttpResponse::Created().json(ApiResponse::ok(issue_token(&state, &user)?)))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: ValidatedJson<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .find_by_email(&req.email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !state.passwords.check_password(&req.password, &user.password_hash)? {
        return Err(AuthError::InvalidCredentials.into());
    }

    Ok(HttpResponse::Ok().json(ApiResponse::ok(issue_token(&state, &user)?)))
}

/// GET /api/auth/me - Protected route
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or(DomainError::not_found("User"))?;

    tracing::debug!(user_id = %user.id, role = %identity.role, "Resolved current user");

    Ok(HttpResponse::Ok().json(ApiResponse::ok(user_response(&user))))
}
