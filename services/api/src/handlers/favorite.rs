use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use ladle_auth_types::identity::IdentityHeaders;

use crate::error::ApiServiceError;
use crate::handlers::recipe::RecipeShortResponse;
use crate::state::AppState;
use crate::usecase::favorite::{AddFavoriteUseCase, RemoveFavoriteUseCase};

// ── POST /recipes/{id}/favorite ──────────────────────────────────────────────

pub async fn add_favorite(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(recipe_id): Path<i32>,
) -> Result<(StatusCode, Json<RecipeShortResponse>), ApiServiceError> {
    let usecase = AddFavoriteUseCase {
        recipe_repo: state.recipe_repo(),
        favorite_repo: state.favorite_repo(),
    };
    let recipe = usecase.execute(identity.user_id, recipe_id).await?;
    Ok((StatusCode::CREATED, Json(RecipeShortResponse::from(recipe))))
}

// ── DELETE /recipes/{id}/favorite ────────────────────────────────────────────

pub async fn remove_favorite(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(recipe_id): Path<i32>,
) -> Result<StatusCode, ApiServiceError> {
    let usecase = RemoveFavoriteUseCase {
        recipe_repo: state.recipe_repo(),
        favorite_repo: state.favorite_repo(),
    };
    usecase.execute(identity.user_id, recipe_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
