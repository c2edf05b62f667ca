pub mod auth_service;

pub use auth_service::{authorize, AuthService};
