use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::domain::types::FieldError;

/// Api service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum ApiServiceError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error("cannot follow yourself")]
    SelfFollow,
    #[error("user not found")]
    UserNotFound,
    #[error("recipe not found")]
    RecipeNotFound,
    #[error("tag not found")]
    TagNotFound,
    #[error("ingredient not found")]
    IngredientNotFound,
    #[error("follow not found")]
    FollowNotFound,
    #[error("favorite not found")]
    FavoriteNotFound,
    #[error("cart entry not found")]
    CartEntryNotFound,
    #[error("forbidden")]
    Forbidden,
    #[error("email already taken")]
    EmailTaken,
    #[error("username already taken")]
    UsernameTaken,
    #[error("already following")]
    AlreadyFollowing,
    #[error("recipe already favorited")]
    AlreadyFavorited,
    #[error("recipe already in shopping cart")]
    AlreadyInCart,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::SelfFollow => "SELF_FOLLOW",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::RecipeNotFound => "RECIPE_NOT_FOUND",
            Self::TagNotFound => "TAG_NOT_FOUND",
            Self::IngredientNotFound => "INGREDIENT_NOT_FOUND",
            Self::FollowNotFound => "FOLLOW_NOT_FOUND",
            Self::FavoriteNotFound => "FAVORITE_NOT_FOUND",
            Self::CartEntryNotFound => "CART_ENTRY_NOT_FOUND",
            Self::Forbidden => "FORBIDDEN",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::AlreadyFollowing => "ALREADY_FOLLOWING",
            Self::AlreadyFavorited => "ALREADY_FAVORITED",
            Self::AlreadyInCart => "ALREADY_IN_CART",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for ApiServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_) | Self::SelfFollow => StatusCode::BAD_REQUEST,
            Self::UserNotFound
            | Self::RecipeNotFound
            | Self::TagNotFound
            | Self::IngredientNotFound
            | Self::FollowNotFound
            | Self::FavoriteNotFound
            | Self::CartEntryNotFound => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::EmailTaken
            | Self::UsernameTaken
            | Self::AlreadyFollowing
            | Self::AlreadyFavorited
            | Self::AlreadyInCart => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let mut body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        if let Self::Validation(ref errors) = self {
            let mut grouped: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
            for error in errors {
                grouped.entry(error.field).or_default().push(&error.message);
            }
            body["errors"] = serde_json::json!(grouped);
        }
        (status, axum::Json(body)).into_response()
    }
}
