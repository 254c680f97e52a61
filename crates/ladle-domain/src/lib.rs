//! Domain types shared across the Ladle workspace.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod limits;
pub mod pagination;
