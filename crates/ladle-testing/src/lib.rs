//! Test utilities for the Ladle API.
//!
//! Provides `MockAuth` header injection and the contract fixture loader.
//! Import in `#[cfg(test)]` blocks only — never in production code.

pub mod auth;
pub mod fixture;
