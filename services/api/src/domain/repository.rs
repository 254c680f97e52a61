#![allow(async_fn_in_trait)]

use std::collections::HashSet;

use uuid::Uuid;

use ladle_domain::pagination::PageRequest;

use crate::domain::types::{
    Follow, Ingredient, Recipe, RecipeDetails, RecipeDraft, RecipeFilter, ShoppingListLine, Tag,
    User,
};
use crate::error::ApiServiceError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiServiceError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiServiceError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiServiceError>;

    /// List accounts in username order.
    async fn list(&self, page: PageRequest) -> Result<Vec<User>, ApiServiceError>;

    async fn create(&self, user: &User) -> Result<(), ApiServiceError>;
}

/// Repository for subscription edges.
pub trait FollowRepository: Send + Sync {
    /// Insert a follow edge. Returns `false` when the pair already exists.
    async fn insert(&self, follow: &Follow) -> Result<bool, ApiServiceError>;

    /// Delete a follow edge. Returns `true` if a row was deleted.
    async fn delete(&self, subscriber_id: Uuid, author_id: Uuid)
    -> Result<bool, ApiServiceError>;

    /// Authors the subscriber follows, in username order.
    async fn list_authors(
        &self,
        subscriber_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<User>, ApiServiceError>;

    /// The subset of `author_ids` that `subscriber_id` follows.
    async fn followed_ids(
        &self,
        subscriber_id: Uuid,
        author_ids: &[Uuid],
    ) -> Result<HashSet<Uuid>, ApiServiceError>;
}

/// Repository for the tag catalog (read-only over HTTP; rows are seeded).
pub trait TagRepository: Send + Sync {
    /// All tags in name order.
    async fn list(&self) -> Result<Vec<Tag>, ApiServiceError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Tag>, ApiServiceError>;

    /// The subset of `ids` present in the catalog.
    async fn existing_ids(&self, ids: &[i32]) -> Result<HashSet<i32>, ApiServiceError>;
}

/// Repository for the ingredient catalog (read-only over HTTP; rows are seeded).
pub trait IngredientRepository: Send + Sync {
    /// Ingredients in name order, optionally filtered by a case-insensitive
    /// name substring.
    async fn list(&self, name_contains: Option<&str>) -> Result<Vec<Ingredient>, ApiServiceError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Ingredient>, ApiServiceError>;

    /// The subset of `ids` present in the catalog.
    async fn existing_ids(&self, ids: &[i32]) -> Result<HashSet<i32>, ApiServiceError>;
}

/// Repository for recipes and their tag/ingredient link rows.
pub trait RecipeRepository: Send + Sync {
    /// Filtered page of materialized recipes, newest first (id desc).
    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<Vec<RecipeDetails>, ApiServiceError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Recipe>, ApiServiceError>;

    async fn find_details(&self, id: i32) -> Result<Option<RecipeDetails>, ApiServiceError>;

    /// Insert the recipe and its link rows in one transaction. Returns the
    /// new recipe id.
    async fn create(&self, author_id: Uuid, draft: &RecipeDraft) -> Result<i32, ApiServiceError>;

    /// Replace scalars, tag links, and ingredient links in one transaction.
    async fn replace(&self, id: i32, draft: &RecipeDraft) -> Result<(), ApiServiceError>;

    /// Delete a recipe (link rows, favorites, and cart entries cascade).
    /// Returns `true` if a row was deleted.
    async fn delete(&self, id: i32) -> Result<bool, ApiServiceError>;

    /// Recipes by one author, newest first, capped at `limit` when given.
    async fn list_by_author(
        &self,
        author_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<Recipe>, ApiServiceError>;

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, ApiServiceError>;
}

/// Repository for favorite (user, recipe) pairs.
pub trait FavoriteRepository: Send + Sync {
    /// Insert a favorite. Returns `false` when the pair already exists.
    async fn insert(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, ApiServiceError>;

    /// Delete a favorite. Returns `true` if a row was deleted.
    async fn delete(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, ApiServiceError>;

    /// The subset of `recipe_ids` the user has favorited.
    async fn favorited_ids(
        &self,
        user_id: Uuid,
        recipe_ids: &[i32],
    ) -> Result<HashSet<i32>, ApiServiceError>;
}

/// Repository for shopping-cart (user, recipe) pairs and the aggregate export.
pub trait CartRepository: Send + Sync {
    /// Insert a cart entry. Returns `false` when the pair already exists.
    async fn insert(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, ApiServiceError>;

    /// Delete a cart entry. Returns `true` if a row was deleted.
    async fn delete(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, ApiServiceError>;

    /// The subset of `recipe_ids` currently in the user's cart.
    async fn in_cart_ids(
        &self,
        user_id: Uuid,
        recipe_ids: &[i32],
    ) -> Result<HashSet<i32>, ApiServiceError>;

    /// Sum ingredient amounts across every recipe in the user's cart,
    /// grouped by (ingredient name, measurement unit), ordered by name.
    async fn shopping_list(&self, user_id: Uuid) -> Result<Vec<ShoppingListLine>, ApiServiceError>;
}
