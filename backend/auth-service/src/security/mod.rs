/// Security module for authentication
/// Provides password hashing, token issuance/validation, revocation tracking
/// and request rate limiting.

pub mod password;
pub mod rate_limit;
pub mod revocation;
pub mod token;

pub use password::{hash_password, verify_password};
pub use rate_limit::RateLimiter;
pub use revocation::RevocationRegistry;
pub use token::{Claims, TokenCodec, TokenType};
