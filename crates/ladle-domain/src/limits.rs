//! Bounded-value constants shared by validation and the HTTP surface.
//!
//! The same bounds apply at every layer: request validation rejects values
//! outside these ranges before anything reaches the database.

/// Minimum cooking time in minutes (inclusive).
pub const MIN_COOKING_TIME: i32 = 1;

/// Maximum cooking time in minutes (inclusive).
pub const MAX_COOKING_TIME: i32 = 1000;

/// Minimum per-ingredient amount in a recipe (inclusive).
pub const MIN_INGREDIENT_AMOUNT: i32 = 1;

/// Maximum per-ingredient amount in a recipe (inclusive).
pub const MAX_INGREDIENT_AMOUNT: i32 = 1000;

/// Maximum length of recipe, tag, and ingredient names, tag slugs, and
/// measurement units.
pub const MAX_NAME_LEN: usize = 200;

/// Maximum length of a user email address.
pub const MAX_EMAIL_LEN: usize = 254;

/// Maximum length of username, first name, and last name.
pub const MAX_USER_FIELD_LEN: usize = 150;

/// Exact length of a tag color in `#rrggbb` form.
pub const COLOR_LEN: usize = 7;
