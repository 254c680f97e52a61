//! Contract harness configuration loaded from environment variables.

/// All configuration for the Docker-based contract harness.
///
/// Loaded from env vars after `dotenv::dotenv().ok()`; no CLI parsing.
/// All values have safe defaults suitable for local development.
#[derive(Debug)]
pub struct ContractHarnessConfig {
    /// Docker daemon URL (`DOCKER_HOST`).
    /// default: `"unix:///var/run/docker.sock"`
    pub docker_host: String,
    /// PostgreSQL image to run fixtures against (`CONTRACT_POSTGRES_IMAGE`).
    /// default: `"postgres:18"`
    pub postgres_image: String,
    /// Skip container teardown after the run (`CONTRACT_KEEP_CONTAINERS=1`),
    /// for poking at the database when fixtures fail.
    pub keep_containers: bool,
}

impl ContractHarnessConfig {
    pub fn from_env() -> Self {
        Self {
            docker_host: std::env::var("DOCKER_HOST")
                .unwrap_or_else(|_| "unix:///var/run/docker.sock".to_owned()),
            postgres_image: std::env::var("CONTRACT_POSTGRES_IMAGE")
                .unwrap_or_else(|_| "postgres:18".to_owned()),
            keep_containers: matches!(
                std::env::var("CONTRACT_KEEP_CONTAINERS").as_deref(),
                Ok("1") | Ok("true")
            ),
        }
    }
}
