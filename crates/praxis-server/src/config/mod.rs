use std::time::Duration;

pub const CONFIG_SCHEMA_VERSION: &str = "1";

/// Server configuration, populated from `PRAXIS_*` environment variables
/// in `main`. Defaults mirror the development fixtures of the reference
/// deployment; the JWT secret MUST be overridden outside development.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub jwt_secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub two_fa_setup_code1: String,
    pub two_fa_setup_code2: String,
    pub two_fa_login_code: String,
    pub max_body_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "praxis-dev-secret".to_string(),
            access_ttl: Duration::from_secs(30 * 60),
            refresh_ttl: Duration::from_secs(7 * 24 * 60 * 60),
            two_fa_setup_code1: "123456".to_string(),
            two_fa_setup_code2: "789012".to_string(),
            two_fa_login_code: "112233".to_string(),
            max_body_bytes: 256 * 1024,
        }
    }
}
