/// Trait for loading service configuration from environment variables.
///
/// Implementors derive `serde::Deserialize`; field names map to upper-case
/// env var names (`database_url` reads `DATABASE_URL`).
pub trait Config: Sized + serde::de::DeserializeOwned {
    /// Load configuration at startup.
    ///
    /// # Panics
    ///
    /// Panics if any required env var is missing or cannot be deserialized.
    /// Services fail fast here rather than limp along half-configured.
    fn from_env() -> Self {
        Self::try_from_env().expect("failed to load config from environment")
    }

    fn try_from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }
}
