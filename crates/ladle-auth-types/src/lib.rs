//! Auth types shared across the Ladle workspace.
//!
//! Token issuance and validation live in the gateway; services only consume
//! the identity headers it injects, via the extractors in [`identity`].

pub mod identity;
