/// Authentication endpoint handlers
use axum::{extract::State, Json};

use crate::error::AuthError;
use crate::middleware::{AuthUser, BearerToken};
use crate::models::{
    AccessTokenResponse, LoginRequest, LogoutResponse, RefreshRequest, TokenPairResponse, User,
};
use crate::AppState;

/// Login endpoint handler
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenPairResponse>, AuthError> {
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(AuthError::BadCredentials);
    }

    let tokens = state.auth.login(&payload.email, &payload.password).await?;
    Ok(Json(tokens))
}

/// Refresh endpoint handler
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AccessTokenResponse>, AuthError> {
    let token = state.auth.refresh(&payload.refresh_token).await?;
    Ok(Json(token))
}

/// Logout endpoint handler. Accepts either token type; an invalid token still
/// logs out successfully.
pub async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<LogoutResponse>, AuthError> {
    state.auth.logout(&token).await?;
    Ok(Json(LogoutResponse {
        message: "Successfully logged out".to_string(),
    }))
}

/// Current-user endpoint handler
pub async fn me(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}
