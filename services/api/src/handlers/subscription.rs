use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ladle_auth_types::identity::IdentityHeaders;
use ladle_domain::pagination::PageRequest;

use crate::domain::types::AuthorPreview;
use crate::error::ApiServiceError;
use crate::handlers::parse_query;
use crate::handlers::recipe::RecipeShortResponse;
use crate::state::AppState;
use crate::usecase::subscription::{
    GetSubscriptionsUseCase, SubscribeUseCase, UnsubscribeUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

/// A followed author with a capped recipe preview. `is_subscribed` is always
/// true here: these responses only describe authors the requester follows.
#[derive(Serialize)]
pub struct SubscriptionResponse {
    pub email: String,
    pub id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
    pub recipes: Vec<RecipeShortResponse>,
    pub recipes_count: u64,
}

impl From<AuthorPreview> for SubscriptionResponse {
    fn from(preview: AuthorPreview) -> Self {
        SubscriptionResponse {
            email: preview.user.email,
            id: preview.user.id.to_string(),
            username: preview.user.username,
            first_name: preview.user.first_name,
            last_name: preview.user.last_name,
            is_subscribed: true,
            recipes: preview
                .recipes
                .into_iter()
                .map(RecipeShortResponse::from)
                .collect(),
            recipes_count: preview.recipes_count,
        }
    }
}

// ── GET /users/subscriptions ─────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct SubscriptionListQuery {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
    pub recipes_limit: Option<u64>,
}

pub async fn get_subscriptions(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    axum::extract::RawQuery(raw_query): axum::extract::RawQuery,
) -> Result<Json<Vec<SubscriptionResponse>>, ApiServiceError> {
    let query: SubscriptionListQuery = parse_query(raw_query.as_deref())?;
    let page = PageRequest {
        per_page: query.per_page.unwrap_or(25),
        page: query.page.unwrap_or(1),
    };

    let usecase = GetSubscriptionsUseCase {
        follow_repo: state.follow_repo(),
        recipe_repo: state.recipe_repo(),
    };
    let previews = usecase
        .execute(identity.user_id, page, query.recipes_limit)
        .await?;
    Ok(Json(
        previews.into_iter().map(SubscriptionResponse::from).collect(),
    ))
}

// ── POST /users/{id}/subscribe ───────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct SubscribeQuery {
    pub recipes_limit: Option<u64>,
}

pub async fn subscribe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(author_id): Path<Uuid>,
    axum::extract::RawQuery(raw_query): axum::extract::RawQuery,
) -> Result<(StatusCode, Json<SubscriptionResponse>), ApiServiceError> {
    let query: SubscribeQuery = parse_query(raw_query.as_deref())?;

    let usecase = SubscribeUseCase {
        user_repo: state.user_repo(),
        follow_repo: state.follow_repo(),
        recipe_repo: state.recipe_repo(),
    };
    let preview = usecase
        .execute(identity.user_id, author_id, query.recipes_limit)
        .await?;
    Ok((StatusCode::CREATED, Json(SubscriptionResponse::from(preview))))
}

// ── DELETE /users/{id}/subscribe ─────────────────────────────────────────────

pub async fn unsubscribe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(author_id): Path<Uuid>,
) -> Result<StatusCode, ApiServiceError> {
    let usecase = UnsubscribeUseCase {
        user_repo: state.user_repo(),
        follow_repo: state.follow_repo(),
    };
    usecase.execute(identity.user_id, author_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
