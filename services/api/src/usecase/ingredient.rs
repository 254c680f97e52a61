use crate::domain::repository::IngredientRepository;
use crate::domain::types::Ingredient;
use crate::error::ApiServiceError;

// ── GetIngredients ───────────────────────────────────────────────────────────

/// List ingredients, optionally narrowed by a case-insensitive substring match
/// on the name. Used by the recipe form's autocomplete.
pub struct GetIngredientsUseCase<R: IngredientRepository> {
    pub ingredient_repo: R,
}

impl<R: IngredientRepository> GetIngredientsUseCase<R> {
    pub async fn execute(
        &self,
        name_contains: Option<&str>,
    ) -> Result<Vec<Ingredient>, ApiServiceError> {
        self.ingredient_repo.list(name_contains).await
    }
}

// ── GetIngredient ────────────────────────────────────────────────────────────

pub struct GetIngredientUseCase<R: IngredientRepository> {
    pub ingredient_repo: R,
}

impl<R: IngredientRepository> GetIngredientUseCase<R> {
    pub async fn execute(&self, ingredient_id: i32) -> Result<Ingredient, ApiServiceError> {
        self.ingredient_repo
            .find_by_id(ingredient_id)
            .await?
            .ok_or(ApiServiceError::IngredientNotFound)
    }
}
