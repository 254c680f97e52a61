//! Per-service contract runners.

/// Infrastructure URLs for test containers.
pub struct InfraUrls {
    pub database_url: String,
}

#[cfg(feature = "api")]
pub mod api;
