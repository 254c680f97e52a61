use uuid::Uuid;

use crate::domain::repository::{FavoriteRepository, RecipeRepository};
use crate::domain::types::Recipe;
use crate::error::ApiServiceError;

// ── AddFavorite ──────────────────────────────────────────────────────────────

pub struct AddFavoriteUseCase<R: RecipeRepository, F: FavoriteRepository> {
    pub recipe_repo: R,
    pub favorite_repo: F,
}

impl<R: RecipeRepository, F: FavoriteRepository> AddFavoriteUseCase<R, F> {
    /// Favorite a recipe and return its short card.
    pub async fn execute(&self, user_id: Uuid, recipe_id: i32) -> Result<Recipe, ApiServiceError> {
        let recipe = self
            .recipe_repo
            .find_by_id(recipe_id)
            .await?
            .ok_or(ApiServiceError::RecipeNotFound)?;

        if !self.favorite_repo.insert(user_id, recipe_id).await? {
            return Err(ApiServiceError::AlreadyFavorited);
        }
        Ok(recipe)
    }
}

// ── RemoveFavorite ───────────────────────────────────────────────────────────

pub struct RemoveFavoriteUseCase<R: RecipeRepository, F: FavoriteRepository> {
    pub recipe_repo: R,
    pub favorite_repo: F,
}

impl<R: RecipeRepository, F: FavoriteRepository> RemoveFavoriteUseCase<R, F> {
    pub async fn execute(&self, user_id: Uuid, recipe_id: i32) -> Result<(), ApiServiceError> {
        self.recipe_repo
            .find_by_id(recipe_id)
            .await?
            .ok_or(ApiServiceError::RecipeNotFound)?;

        if !self.favorite_repo.delete(user_id, recipe_id).await? {
            return Err(ApiServiceError::FavoriteNotFound);
        }
        Ok(())
    }
}
