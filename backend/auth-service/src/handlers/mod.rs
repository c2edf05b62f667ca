pub mod auth;

pub use auth::{login, logout, me, refresh};
