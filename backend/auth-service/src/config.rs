/// Configuration management
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub server_host: String,
    #[serde(default = "default_port")]
    pub server_port: u16,
    pub database_url: String,

    /// Symmetric signing secret. Rotating it invalidates every token issued
    /// before the rotation; there is no key versioning.
    pub jwt_secret: String,
    #[serde(default = "default_algorithm")]
    pub jwt_algorithm: String,
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_minutes: i64,
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl_minutes: i64,

    #[serde(default = "default_rate_limit")]
    pub rate_limit_max_requests: u32,
    #[serde(default = "default_rate_window")]
    pub rate_limit_window_seconds: i64,
    #[serde(default = "default_sweep_interval")]
    pub revocation_sweep_interval_seconds: i64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

fn default_access_ttl() -> i64 {
    30
}

fn default_refresh_ttl() -> i64 {
    60 * 24 * 7 // 7 days
}

fn default_rate_limit() -> u32 {
    100
}

fn default_rate_window() -> i64 {
    60
}

fn default_sweep_interval() -> i64 {
    3600
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let config: Config = envy::from_iter(vec![
            ("DATABASE_URL".to_string(), "postgres://localhost/app".to_string()),
            ("JWT_SECRET".to_string(), "test-secret".to_string()),
        ])
        .expect("minimal env should deserialize");

        assert_eq!(config.server_port, 8000);
        assert_eq!(config.jwt_algorithm, "HS256");
        assert_eq!(config.access_token_ttl_minutes, 30);
        assert_eq!(config.refresh_token_ttl_minutes, 60 * 24 * 7);
        assert_eq!(config.rate_limit_max_requests, 100);
        assert_eq!(config.rate_limit_window_seconds, 60);
        assert_eq!(config.revocation_sweep_interval_seconds, 3600);
    }
}
