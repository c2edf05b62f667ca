/// Token issuance and validation
///
/// Tokens are compact, self-contained credentials signed with a symmetric
/// secret. The codec verifies signatures and expiry only; revocation is the
/// caller's responsibility (see `RevocationRegistry`).
use std::str::FromStr;
use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::{AuthError, Result};
use crate::models::UserRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed-shape claim set. `email` and `role` are a bounded extension echoed
/// into access tokens so handlers can make fast checks without a user lookup;
/// they are advisory only and re-verified against the store on authenticate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id as string)
    pub sub: String,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiration time (Unix seconds)
    pub exp: i64,
    /// Token id, `"{type}-{millis}"`
    pub jti: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

/// Optional claims carried alongside the standard set.
#[derive(Debug, Default, Clone)]
pub struct ExtraClaims {
    pub email: Option<String>,
    pub role: Option<UserRole>,
}

pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    access_ttl: Duration,
    refresh_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &self.algorithm)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Build a codec from the configured secret and algorithm name. Only the
    /// HMAC family is supported, matching the symmetric secret; anything else
    /// is a misconfiguration and surfaces as an internal error, not a 401.
    pub fn new(
        secret: &str,
        algorithm: &str,
        access_ttl: Duration,
        refresh_ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let algorithm = Algorithm::from_str(algorithm)
            .map_err(|_| AuthError::Internal(format!("Unknown JWT algorithm: {algorithm}")))?;
        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(AuthError::Internal(format!(
                "JWT algorithm {algorithm:?} requires an asymmetric key pair"
            )));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            access_ttl,
            refresh_ttl,
            clock,
        })
    }

    /// Issue a signed token for `subject`. `ttl` falls back to the
    /// type-specific default (short for access, long for refresh).
    pub fn issue(
        &self,
        subject: &str,
        token_type: TokenType,
        ttl: Option<Duration>,
        extra: ExtraClaims,
    ) -> Result<String> {
        let now = self.clock.now();
        let ttl = ttl.unwrap_or(match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        });

        let claims = Claims {
            sub: subject.to_string(),
            token_type,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            // Unique within a millisecond; collisions across instances are
            // accepted at this scope.
            jti: format!("{}-{}", token_type, now.timestamp_millis()),
            email: extra.email,
            role: extra.role,
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|_| AuthError::Internal("Failed to sign token".to_string()))
    }

    /// Verify the signature and parse the claims. When `expect_type` is given
    /// the claim's type must match. Expiry is compared against the injected
    /// clock after the type check, mirroring issuance.
    pub fn decode(&self, raw: &str, expect_type: Option<TokenType>) -> Result<Claims> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["sub", "exp"]);

        let data = decode::<Claims>(raw, &self.decoding_key, &validation)
            .map_err(map_decode_error)?;
        let claims = data.claims;

        if let Some(expected) = expect_type {
            if claims.token_type != expected {
                return Err(AuthError::WrongTokenType {
                    expected: expected.as_str(),
                });
            }
        }

        if claims.exp < self.clock.now().timestamp() {
            return Err(AuthError::Expired);
        }

        Ok(claims)
    }
}

fn map_decode_error(err: jsonwebtoken::errors::Error) -> AuthError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        ErrorKind::ExpiredSignature => AuthError::Expired,
        ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::InvalidKeyFormat => {
            AuthError::Internal("JWT codec misconfiguration".to_string())
        }
        _ => AuthError::MalformedClaims,
    }
}
