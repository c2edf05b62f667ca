// Auth Service Library

use std::sync::Arc;

pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod security;
pub mod services;

pub use error::{AuthError, Result};

// Re-export commonly used types
pub use models::{User, UserRole};
pub use security::{RateLimiter, RevocationRegistry, TokenCodec, TokenType};
pub use services::{authorize, AuthService};

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub limiter: Arc<RateLimiter>,
}
