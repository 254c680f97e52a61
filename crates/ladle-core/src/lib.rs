//! Cross-cutting service plumbing: config loading, health endpoints,
//! request-id middleware, tracing setup, and shared serde helpers.
//!
//! Nothing in here knows about the domain. Import from `main.rs`,
//! `router.rs`, and response types; never from `usecase/`.

pub mod config;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
