use anyhow::Context as _;
use axum::{
    Json,
    body::Body,
    extract::{Path, State},
    http::{StatusCode, header},
    response::Response,
};

use ladle_auth_types::identity::IdentityHeaders;

use crate::error::ApiServiceError;
use crate::handlers::recipe::RecipeShortResponse;
use crate::state::AppState;
use crate::usecase::cart::{
    AddCartEntryUseCase, DownloadShoppingListUseCase, RemoveCartEntryUseCase,
};

// ── POST /recipes/{id}/shopping_cart ─────────────────────────────────────────

pub async fn add_cart_entry(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(recipe_id): Path<i32>,
) -> Result<(StatusCode, Json<RecipeShortResponse>), ApiServiceError> {
    let usecase = AddCartEntryUseCase {
        recipe_repo: state.recipe_repo(),
        cart_repo: state.cart_repo(),
    };
    let recipe = usecase.execute(identity.user_id, recipe_id).await?;
    Ok((StatusCode::CREATED, Json(RecipeShortResponse::from(recipe))))
}

// ── DELETE /recipes/{id}/shopping_cart ───────────────────────────────────────

pub async fn remove_cart_entry(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(recipe_id): Path<i32>,
) -> Result<StatusCode, ApiServiceError> {
    let usecase = RemoveCartEntryUseCase {
        recipe_repo: state.recipe_repo(),
        cart_repo: state.cart_repo(),
    };
    usecase.execute(identity.user_id, recipe_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /recipes/download_shopping_cart ──────────────────────────────────────

pub async fn download_shopping_list(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Response, ApiServiceError> {
    let usecase = DownloadShoppingListUseCase {
        cart_repo: state.cart_repo(),
    };
    let text = usecase.execute(identity.user_id).await?;

    let response = Response::builder()
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"shopping_cart.txt\"",
        )
        .body(Body::from(text))
        .context("build shopping list response")?;
    Ok(response)
}
