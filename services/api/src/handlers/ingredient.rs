use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::domain::types::Ingredient;
use crate::error::ApiServiceError;
use crate::handlers::parse_query;
use crate::state::AppState;
use crate::usecase::ingredient::{GetIngredientUseCase, GetIngredientsUseCase};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct IngredientResponse {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
}

impl From<Ingredient> for IngredientResponse {
    fn from(ingredient: Ingredient) -> Self {
        IngredientResponse {
            id: ingredient.id,
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
        }
    }
}

// ── GET /ingredients ─────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct IngredientListQuery {
    pub name: Option<String>,
}

pub async fn get_ingredients(
    State(state): State<AppState>,
    axum::extract::RawQuery(raw_query): axum::extract::RawQuery,
) -> Result<Json<Vec<IngredientResponse>>, ApiServiceError> {
    let query: IngredientListQuery = parse_query(raw_query.as_deref())?;

    let usecase = GetIngredientsUseCase {
        ingredient_repo: state.ingredient_repo(),
    };
    let ingredients = usecase.execute(query.name.as_deref()).await?;
    Ok(Json(
        ingredients.into_iter().map(IngredientResponse::from).collect(),
    ))
}

// ── GET /ingredients/{id} ────────────────────────────────────────────────────

pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(ingredient_id): Path<i32>,
) -> Result<Json<IngredientResponse>, ApiServiceError> {
    let usecase = GetIngredientUseCase {
        ingredient_repo: state.ingredient_repo(),
    };
    let ingredient = usecase.execute(ingredient_id).await?;
    Ok(Json(IngredientResponse::from(ingredient)))
}
