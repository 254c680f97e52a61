//! Sea-ORM entities for the Ladle API database.
//!
//! Column shapes mirror the migrations in `ladle-api-migration`; keep the two
//! in sync when altering tables.

pub mod cart_entries;
pub mod favorites;
pub mod follows;
pub mod ingredients;
pub mod recipe_ingredients;
pub mod recipe_tags;
pub mod recipes;
pub mod tags;
pub mod users;
