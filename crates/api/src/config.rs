use catalog_core::webhook::WebhookSecret;

use crate::auth::jwt::JwtConfig;
use crate::media::MediaConfig;

/// Server configuration loaded from environment variables.
///
/// Bind, CORS and timeout settings have defaults suitable for local
/// development. Auth and webhook secrets have no defaults.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Session-token validation settings.
    pub jwt: JwtConfig,
    /// Secret used to verify identity-provisioning webhooks.
    pub webhook_secret: WebhookSecret,
    /// Media host settings.
    pub media: MediaConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                    |
    /// |--------------------------|----------------------------|
    /// | `HOST`                   | `0.0.0.0`                  |
    /// | `PORT`                   | `3000`                     |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                       |
    /// | `WEBHOOK_SIGNING_SECRET` | required                   |
    ///
    /// See [`JwtConfig::from_env`] and [`MediaConfig::from_env`] for the
    /// auth and media variables.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let webhook_secret = std::env::var("WEBHOOK_SIGNING_SECRET")
            .expect("WEBHOOK_SIGNING_SECRET must be set in the environment");
        let webhook_secret = WebhookSecret::parse(&webhook_secret)
            .unwrap_or_else(|e| panic!("WEBHOOK_SIGNING_SECRET is invalid: {e}"));

        let jwt = JwtConfig::from_env();
        let media = MediaConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            webhook_secret,
            media,
        }
    }
}
