use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ladle_auth_types::identity::{IdentityHeaders, MaybeIdentity};
use ladle_domain::pagination::PageRequest;

use crate::domain::types::{
    IngredientAmount, Recipe, RecipeDetails, RecipeDraft, RecipeFilter, RecipeIngredient,
    ViewerFlags,
};
use crate::error::ApiServiceError;
use crate::handlers::parse_query;
use crate::handlers::tag::TagResponse;
use crate::handlers::user::UserResponse;
use crate::state::AppState;
use crate::usecase::flags::LoadViewerFlagsUseCase;
use crate::usecase::recipe::{
    CreateRecipeUseCase, DeleteRecipeUseCase, GetRecipeUseCase, GetRecipesUseCase,
    UpdateRecipeUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct RecipeResponse {
    pub id: i32,
    pub tags: Vec<TagResponse>,
    pub author: UserResponse,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: Option<String>,
    pub text: String,
    pub cooking_time: i32,
    #[serde(serialize_with = "ladle_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize)]
pub struct RecipeIngredientResponse {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

impl From<RecipeIngredient> for RecipeIngredientResponse {
    fn from(line: RecipeIngredient) -> Self {
        RecipeIngredientResponse {
            id: line.id,
            name: line.name,
            measurement_unit: line.measurement_unit,
            amount: line.amount,
        }
    }
}

/// Short recipe card used by favorite, cart, and subscription responses.
#[derive(Serialize)]
pub struct RecipeShortResponse {
    pub id: i32,
    pub name: String,
    pub image: Option<String>,
    pub cooking_time: i32,
}

impl From<Recipe> for RecipeShortResponse {
    fn from(recipe: Recipe) -> Self {
        RecipeShortResponse {
            id: recipe.id,
            name: recipe.name,
            image: recipe.image,
            cooking_time: recipe.cooking_time,
        }
    }
}

pub(crate) fn recipe_response(details: RecipeDetails, flags: &ViewerFlags) -> RecipeResponse {
    let RecipeDetails {
        recipe,
        author,
        tags,
        ingredients,
    } = details;
    let author_subscribed = flags.is_subscribed(author.id);
    RecipeResponse {
        id: recipe.id,
        tags: tags.into_iter().map(TagResponse::from).collect(),
        author: UserResponse::new(author, author_subscribed),
        ingredients: ingredients
            .into_iter()
            .map(RecipeIngredientResponse::from)
            .collect(),
        is_favorited: flags.is_favorited(recipe.id),
        is_in_shopping_cart: flags.is_in_cart(recipe.id),
        name: recipe.name,
        image: recipe.image,
        text: recipe.text,
        cooking_time: recipe.cooking_time,
        created_at: recipe.created_at,
    }
}

async fn viewer_flags(
    state: &AppState,
    requester: Option<Uuid>,
    details: &[RecipeDetails],
) -> Result<ViewerFlags, ApiServiceError> {
    let recipe_ids: Vec<i32> = details.iter().map(|d| d.recipe.id).collect();
    let author_ids: Vec<Uuid> = details.iter().map(|d| d.author.id).collect();
    LoadViewerFlagsUseCase {
        favorites: state.favorite_repo(),
        cart: state.cart_repo(),
        follows: state.follow_repo(),
    }
    .execute(requester, &recipe_ids, &author_ids)
    .await
}

// ── Request payload ──────────────────────────────────────────────────────────

/// Shared by create and update. All fields default so that an incomplete
/// body flows into field-keyed validation instead of a body rejection.
#[derive(Deserialize)]
pub struct RecipePayload {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub cooking_time: i32,
    #[serde(default)]
    pub tags: Vec<i32>,
    #[serde(default)]
    pub ingredients: Vec<IngredientAmountPayload>,
}

#[derive(Deserialize)]
pub struct IngredientAmountPayload {
    pub id: i32,
    pub amount: i32,
}

impl RecipePayload {
    fn into_draft(self) -> RecipeDraft {
        RecipeDraft {
            name: self.name,
            text: self.text,
            image: self.image,
            cooking_time: self.cooking_time,
            tag_ids: self.tags,
            ingredients: self
                .ingredients
                .into_iter()
                .map(|line| IngredientAmount {
                    ingredient_id: line.id,
                    amount: line.amount,
                })
                .collect(),
        }
    }
}

// ── GET /recipes ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct RecipeListQuery {
    #[serde(rename = "per-page")]
    pub per_page: Option<u32>,
    pub page: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author: Option<Uuid>,
    #[serde(default)]
    pub is_favorited: bool,
    #[serde(default)]
    pub is_in_shopping_cart: bool,
}

pub async fn get_recipes(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    axum::extract::RawQuery(raw_query): axum::extract::RawQuery,
) -> Result<Json<Vec<RecipeResponse>>, ApiServiceError> {
    let query: RecipeListQuery = parse_query(raw_query.as_deref())?;
    let page = PageRequest {
        per_page: query.per_page.unwrap_or(25),
        page: query.page.unwrap_or(1),
    };

    let requester = identity.user_id();
    // Flag filters only apply for authenticated requesters; anonymous requests
    // leave them unset.
    let filter = RecipeFilter {
        tag_slugs: query.tags,
        author_id: query.author,
        favorited_by: if query.is_favorited { requester } else { None },
        in_cart_of: if query.is_in_shopping_cart {
            requester
        } else {
            None
        },
    };

    let usecase = GetRecipesUseCase {
        recipe_repo: state.recipe_repo(),
    };
    let details = usecase.execute(&filter, page).await?;

    let flags = viewer_flags(&state, requester, &details).await?;
    Ok(Json(
        details
            .into_iter()
            .map(|details| recipe_response(details, &flags))
            .collect(),
    ))
}

// ── GET /recipes/{id} ────────────────────────────────────────────────────────

pub async fn get_recipe(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Path(recipe_id): Path<i32>,
) -> Result<Json<RecipeResponse>, ApiServiceError> {
    let usecase = GetRecipeUseCase {
        recipe_repo: state.recipe_repo(),
    };
    let details = usecase.execute(recipe_id).await?;

    let flags = viewer_flags(&state, identity.user_id(), std::slice::from_ref(&details)).await?;
    Ok(Json(recipe_response(details, &flags)))
}

// ── POST /recipes ────────────────────────────────────────────────────────────

pub async fn create_recipe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<RecipePayload>,
) -> Result<(StatusCode, Json<RecipeResponse>), ApiServiceError> {
    let usecase = CreateRecipeUseCase {
        recipe_repo: state.recipe_repo(),
        tag_repo: state.tag_repo(),
        ingredient_repo: state.ingredient_repo(),
    };
    let details = usecase.execute(identity.user_id, body.into_draft()).await?;

    let flags = viewer_flags(
        &state,
        Some(identity.user_id),
        std::slice::from_ref(&details),
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(recipe_response(details, &flags)),
    ))
}

// ── PUT/PATCH /recipes/{id} ──────────────────────────────────────────────────

pub async fn update_recipe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(recipe_id): Path<i32>,
    Json(body): Json<RecipePayload>,
) -> Result<Json<RecipeResponse>, ApiServiceError> {
    let usecase = UpdateRecipeUseCase {
        recipe_repo: state.recipe_repo(),
        tag_repo: state.tag_repo(),
        ingredient_repo: state.ingredient_repo(),
    };
    let details = usecase
        .execute(identity.user_id, recipe_id, body.into_draft())
        .await?;

    let flags = viewer_flags(
        &state,
        Some(identity.user_id),
        std::slice::from_ref(&details),
    )
    .await?;
    Ok(Json(recipe_response(details, &flags)))
}

// ── DELETE /recipes/{id} ─────────────────────────────────────────────────────

pub async fn delete_recipe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(recipe_id): Path<i32>,
) -> Result<StatusCode, ApiServiceError> {
    let usecase = DeleteRecipeUseCase {
        recipe_repo: state.recipe_repo(),
    };
    usecase.execute(identity.user_id, recipe_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
