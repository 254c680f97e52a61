pub mod cart;
pub mod favorite;
pub mod ingredient;
pub mod recipe;
pub mod subscription;
pub mod tag;
pub mod user;

use serde::de::DeserializeOwned;

use crate::domain::types::FieldError;
use crate::error::ApiServiceError;

/// Parse an optional raw query string with serde_qs (bracket syntax for
/// multi-value params). Malformed input maps to a field-keyed 400.
pub(crate) fn parse_query<T>(raw_query: Option<&str>) -> Result<T, ApiServiceError>
where
    T: DeserializeOwned + Default,
{
    raw_query
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|_| {
            ApiServiceError::Validation(vec![FieldError::new("query", "malformed query string")])
        })
        .map(|query| query.unwrap_or_default())
}
