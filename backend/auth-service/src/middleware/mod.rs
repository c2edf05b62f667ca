pub mod jwt_auth;
pub mod rate_limit;

pub use jwt_auth::{AdminUser, AuthUser, BearerToken};
pub use rate_limit::rate_limit;
