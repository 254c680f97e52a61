use anyhow::anyhow;
use ladle_domain::pagination::PageRequest;
use uuid::Uuid;

use crate::domain::repository::{IngredientRepository, RecipeRepository, TagRepository};
use crate::domain::types::{
    FieldError, RecipeDetails, RecipeDraft, RecipeFilter, validate_recipe_draft,
};
use crate::error::ApiServiceError;

/// Check every referenced tag and ingredient id against the catalogs.
/// Runs only after the draft passed its syntactic validation.
async fn check_references<T: TagRepository, I: IngredientRepository>(
    tag_repo: &T,
    ingredient_repo: &I,
    draft: &RecipeDraft,
) -> Result<(), ApiServiceError> {
    let mut errors = Vec::new();

    let known_tags = tag_repo.existing_ids(&draft.tag_ids).await?;
    let mut seen = std::collections::HashSet::new();
    for id in &draft.tag_ids {
        if seen.insert(*id) && !known_tags.contains(id) {
            errors.push(FieldError::new("tags", format!("unknown tag id {id}")));
        }
    }

    let ingredient_ids: Vec<i32> = draft
        .ingredients
        .iter()
        .map(|line| line.ingredient_id)
        .collect();
    let known_ingredients = ingredient_repo.existing_ids(&ingredient_ids).await?;
    seen.clear();
    for id in &ingredient_ids {
        if seen.insert(*id) && !known_ingredients.contains(id) {
            errors.push(FieldError::new(
                "ingredients",
                format!("unknown ingredient id {id}"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiServiceError::Validation(errors))
    }
}

// ── CreateRecipe ─────────────────────────────────────────────────────────────

pub struct CreateRecipeUseCase<R: RecipeRepository, T: TagRepository, I: IngredientRepository> {
    pub recipe_repo: R,
    pub tag_repo: T,
    pub ingredient_repo: I,
}

impl<R: RecipeRepository, T: TagRepository, I: IngredientRepository> CreateRecipeUseCase<R, T, I> {
    pub async fn execute(
        &self,
        author_id: Uuid,
        draft: RecipeDraft,
    ) -> Result<RecipeDetails, ApiServiceError> {
        let errors = validate_recipe_draft(&draft);
        if !errors.is_empty() {
            return Err(ApiServiceError::Validation(errors));
        }
        check_references(&self.tag_repo, &self.ingredient_repo, &draft).await?;

        let recipe_id = self.recipe_repo.create(author_id, &draft).await?;
        self.recipe_repo
            .find_details(recipe_id)
            .await?
            .ok_or_else(|| anyhow!("recipe {recipe_id} missing right after insert").into())
    }
}

// ── UpdateRecipe ─────────────────────────────────────────────────────────────

/// Full replace of a recipe. The stored tag and ingredient sets become
/// exactly the draft's sets. Only the author may update.
pub struct UpdateRecipeUseCase<R: RecipeRepository, T: TagRepository, I: IngredientRepository> {
    pub recipe_repo: R,
    pub tag_repo: T,
    pub ingredient_repo: I,
}

impl<R: RecipeRepository, T: TagRepository, I: IngredientRepository> UpdateRecipeUseCase<R, T, I> {
    pub async fn execute(
        &self,
        requester_id: Uuid,
        recipe_id: i32,
        draft: RecipeDraft,
    ) -> Result<RecipeDetails, ApiServiceError> {
        let recipe = self
            .recipe_repo
            .find_by_id(recipe_id)
            .await?
            .ok_or(ApiServiceError::RecipeNotFound)?;
        if recipe.author_id != requester_id {
            return Err(ApiServiceError::Forbidden);
        }

        let errors = validate_recipe_draft(&draft);
        if !errors.is_empty() {
            return Err(ApiServiceError::Validation(errors));
        }
        check_references(&self.tag_repo, &self.ingredient_repo, &draft).await?;

        self.recipe_repo.replace(recipe_id, &draft).await?;
        self.recipe_repo
            .find_details(recipe_id)
            .await?
            .ok_or_else(|| anyhow!("recipe {recipe_id} missing right after update").into())
    }
}

// ── DeleteRecipe ─────────────────────────────────────────────────────────────

pub struct DeleteRecipeUseCase<R: RecipeRepository> {
    pub recipe_repo: R,
}

impl<R: RecipeRepository> DeleteRecipeUseCase<R> {
    pub async fn execute(&self, requester_id: Uuid, recipe_id: i32) -> Result<(), ApiServiceError> {
        let recipe = self
            .recipe_repo
            .find_by_id(recipe_id)
            .await?
            .ok_or(ApiServiceError::RecipeNotFound)?;
        if recipe.author_id != requester_id {
            return Err(ApiServiceError::Forbidden);
        }

        if !self.recipe_repo.delete(recipe_id).await? {
            return Err(ApiServiceError::RecipeNotFound);
        }
        Ok(())
    }
}

// ── GetRecipe ────────────────────────────────────────────────────────────────

pub struct GetRecipeUseCase<R: RecipeRepository> {
    pub recipe_repo: R,
}

impl<R: RecipeRepository> GetRecipeUseCase<R> {
    pub async fn execute(&self, recipe_id: i32) -> Result<RecipeDetails, ApiServiceError> {
        self.recipe_repo
            .find_details(recipe_id)
            .await?
            .ok_or(ApiServiceError::RecipeNotFound)
    }
}

// ── GetRecipes ───────────────────────────────────────────────────────────────

pub struct GetRecipesUseCase<R: RecipeRepository> {
    pub recipe_repo: R,
}

impl<R: RecipeRepository> GetRecipesUseCase<R> {
    pub async fn execute(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<Vec<RecipeDetails>, ApiServiceError> {
        self.recipe_repo.list(filter, page).await
    }
}
