/// Session authentication and authorization
///
/// Orchestrates the token codec, revocation registry and user store to turn a
/// bearer token into an authenticated identity. Every failure is terminal for
/// the request; nothing is retried here.
use std::sync::Arc;

use crate::db::UserStore;
use crate::error::{AuthError, Result};
use crate::models::{AccessTokenResponse, TokenPairResponse, User, UserRole};
use crate::security::revocation::RevocationRegistry;
use crate::security::token::{ExtraClaims, TokenCodec, TokenType};
use crate::security::verify_password;

pub struct AuthService {
    users: Arc<dyn UserStore>,
    codec: TokenCodec,
    revoked: RevocationRegistry,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, codec: TokenCodec, revoked: RevocationRegistry) -> Self {
        Self {
            users,
            codec,
            revoked,
        }
    }

    /// Verify credentials and issue an access/refresh token pair. The access
    /// token echoes email and role so handlers can check them without a
    /// lookup; the refresh token carries the bare subject.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPairResponse> {
        let user = self
            .users
            .get_by_email(email)
            .await?
            .ok_or(AuthError::NotFound)?;

        verify_password(password, &user.password_hash)?;

        let access_token = self.issue_access_token(&user)?;
        let refresh_token = self.codec.issue(
            &user.id.to_string(),
            TokenType::Refresh,
            None,
            ExtraClaims::default(),
        )?;

        tracing::info!(user_id = user.id, "User logged in");

        Ok(TokenPairResponse {
            access_token,
            refresh_token,
            token_type: "bearer",
        })
    }

    /// Mint a new access token from a refresh token. The identity is
    /// re-loaded so a deleted account cannot keep minting access tokens from
    /// an old refresh token. The refresh token itself is not rotated.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AccessTokenResponse> {
        let claims = self.codec.decode(refresh_token, Some(TokenType::Refresh))?;
        if self.revoked.is_revoked(refresh_token) {
            return Err(AuthError::Revoked);
        }

        let user_id = parse_subject(&claims.sub)?;
        let user = self
            .users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::NotFound)?;

        let access_token = self.issue_access_token(&user)?;

        tracing::info!(user_id = user.id, "Access token refreshed");

        Ok(AccessTokenResponse {
            access_token,
            token_type: "bearer",
        })
    }

    /// Blacklist a token (either type) until its natural expiry. Logging out
    /// with an already-invalid token is not an error; the decode failure is
    /// swallowed.
    pub async fn logout(&self, raw: &str) -> Result<()> {
        match self.codec.decode(raw, None) {
            Ok(claims) => {
                self.revoked.revoke(raw, claims.exp);
                tracing::info!(jti = %claims.jti, "Token revoked on logout");
            }
            Err(_) => {
                tracing::debug!("Logout with invalid token ignored");
            }
        }
        Ok(())
    }

    /// Resolve a bearer access token into its identity: signature and expiry
    /// via the codec, then revocation, then the live account state.
    pub async fn authenticate(&self, raw: &str) -> Result<User> {
        let claims = self.codec.decode(raw, Some(TokenType::Access))?;
        if self.revoked.is_revoked(raw) {
            return Err(AuthError::Revoked);
        }

        let user_id = parse_subject(&claims.sub)?;
        let user = self
            .users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::UnknownSubject)?;

        if !user.is_active {
            return Err(AuthError::InactiveAccount);
        }

        Ok(user)
    }

    fn issue_access_token(&self, user: &User) -> Result<String> {
        self.codec.issue(
            &user.id.to_string(),
            TokenType::Access,
            None,
            ExtraClaims {
                email: Some(user.email.clone()),
                role: Some(user.role),
            },
        )
    }
}

/// Role-gated guard. Passes the identity through unchanged iff its role is in
/// the allowed set; composes after `authenticate` to wrap any handler.
pub fn authorize<'a>(user: &'a User, allowed_roles: &[UserRole]) -> Result<&'a User> {
    if allowed_roles.contains(&user.role) {
        Ok(user)
    } else {
        Err(AuthError::InsufficientRole {
            required: allowed_roles.to_vec(),
        })
    }
}

fn parse_subject(sub: &str) -> Result<i64> {
    sub.parse::<i64>().map_err(|_| AuthError::MalformedClaims)
}
