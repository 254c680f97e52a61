use serde::Deserialize;

use ladle_core::config::Config;

/// Api service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct ApiConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3210). Env var: `API_PORT`.
    #[serde(default = "default_api_port")]
    pub api_port: u16,
}

fn default_api_port() -> u16 {
    3210
}

impl Config for ApiConfig {}
