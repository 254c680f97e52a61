use uuid::Uuid;

use crate::domain::repository::{CartRepository, RecipeRepository};
use crate::domain::types::{Recipe, render_shopping_list};
use crate::error::ApiServiceError;

// ── AddCartEntry ─────────────────────────────────────────────────────────────

pub struct AddCartEntryUseCase<R: RecipeRepository, C: CartRepository> {
    pub recipe_repo: R,
    pub cart_repo: C,
}

impl<R: RecipeRepository, C: CartRepository> AddCartEntryUseCase<R, C> {
    /// Put a recipe in the shopping cart and return its short card.
    pub async fn execute(&self, user_id: Uuid, recipe_id: i32) -> Result<Recipe, ApiServiceError> {
        let recipe = self
            .recipe_repo
            .find_by_id(recipe_id)
            .await?
            .ok_or(ApiServiceError::RecipeNotFound)?;

        if !self.cart_repo.insert(user_id, recipe_id).await? {
            return Err(ApiServiceError::AlreadyInCart);
        }
        Ok(recipe)
    }
}

// ── RemoveCartEntry ──────────────────────────────────────────────────────────

pub struct RemoveCartEntryUseCase<R: RecipeRepository, C: CartRepository> {
    pub recipe_repo: R,
    pub cart_repo: C,
}

impl<R: RecipeRepository, C: CartRepository> RemoveCartEntryUseCase<R, C> {
    pub async fn execute(&self, user_id: Uuid, recipe_id: i32) -> Result<(), ApiServiceError> {
        self.recipe_repo
            .find_by_id(recipe_id)
            .await?
            .ok_or(ApiServiceError::RecipeNotFound)?;

        if !self.cart_repo.delete(user_id, recipe_id).await? {
            return Err(ApiServiceError::CartEntryNotFound);
        }
        Ok(())
    }
}

// ── DownloadShoppingList ─────────────────────────────────────────────────────

/// Aggregate the cart into one ingredient list and render it as the plain
/// text attachment served by the download endpoint.
pub struct DownloadShoppingListUseCase<C: CartRepository> {
    pub cart_repo: C,
}

impl<C: CartRepository> DownloadShoppingListUseCase<C> {
    pub async fn execute(&self, user_id: Uuid) -> Result<String, ApiServiceError> {
        let lines = self.cart_repo.shopping_list(user_id).await?;
        Ok(render_shopping_list(&lines))
    }
}
