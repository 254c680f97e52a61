//! Contract harness library: fixture loading, HTTP assertion running, and
//! Docker orchestration for disposable test infrastructure.
//!
//! The `contract-harness` binary wires these pieces into two modes: running
//! fixtures against an already-running base URL, or booting the services
//! in-process against fresh containers (behind per-service cargo features).

pub mod config;
pub mod docker;
pub mod fixture;
pub mod reporter;
pub mod runner;
pub mod services;
