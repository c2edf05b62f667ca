/// Per-client rate limiting layer
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::AuthError;
use crate::AppState;

/// Reject requests from clients that exceeded their sliding window. Keyed by
/// client IP; an authenticated key would need the token decoded first, and
/// rate limiting must run before any expensive work.
pub async fn rate_limit(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let client_key = addr.ip().to_string();
    if !state.limiter.allow(&client_key) {
        tracing::warn!(client = %client_key, "Rate limit exceeded");
        return Err(AuthError::TooManyRequests);
    }

    Ok(next.run(req).await)
}
