use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ladle_auth_types::identity::IdentityHeaders;
use ladle_domain::pagination::PageRequest;

use crate::domain::types::{User, UserDraft};
use crate::error::ApiServiceError;
use crate::handlers::parse_query;
use crate::state::AppState;
use crate::usecase::flags::LoadViewerFlagsUseCase;
use crate::usecase::user::{CreateUserUseCase, GetUserUseCase, GetUsersUseCase};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UserResponse {
    pub email: String,
    pub id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

impl UserResponse {
    pub fn new(user: User, is_subscribed: bool) -> Self {
        UserResponse {
            email: user.email,
            id: user.id.to_string(),
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
        }
    }
}

// ── POST /users ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub password: String,
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiServiceError> {
    let usecase = CreateUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(UserDraft {
            email: body.email,
            username: body.username,
            first_name: body.first_name,
            last_name: body.last_name,
            password: body.password,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(UserResponse::new(user, false))))
}

// ── GET /users ───────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct UserListQuery {
    #[serde(rename = "per-page")]
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

pub async fn get_users(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    axum::extract::RawQuery(raw_query): axum::extract::RawQuery,
) -> Result<Json<Vec<UserResponse>>, ApiServiceError> {
    let query: UserListQuery = parse_query(raw_query.as_deref())?;
    let page = PageRequest {
        per_page: query.per_page.unwrap_or(25),
        page: query.page.unwrap_or(1),
    };

    let usecase = GetUsersUseCase {
        repo: state.user_repo(),
    };
    let users = usecase.execute(page).await?;

    let author_ids: Vec<Uuid> = users.iter().map(|user| user.id).collect();
    let flags = LoadViewerFlagsUseCase {
        favorites: state.favorite_repo(),
        cart: state.cart_repo(),
        follows: state.follow_repo(),
    }
    .execute(Some(identity.user_id), &[], &author_ids)
    .await?;

    Ok(Json(
        users
            .into_iter()
            .map(|user| {
                let is_subscribed = flags.is_subscribed(user.id);
                UserResponse::new(user, is_subscribed)
            })
            .collect(),
    ))
}

// ── GET /users/me ────────────────────────────────────────────────────────────

pub async fn get_me(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiServiceError> {
    let usecase = GetUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(identity.user_id).await?;
    Ok(Json(UserResponse::new(user, false)))
}

// ── GET /users/{id} ──────────────────────────────────────────────────────────

pub async fn get_user(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiServiceError> {
    let usecase = GetUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(user_id).await?;

    let flags = LoadViewerFlagsUseCase {
        favorites: state.favorite_repo(),
        cart: state.cart_repo(),
        follows: state.follow_repo(),
    }
    .execute(Some(identity.user_id), &[], &[user.id])
    .await?;

    let is_subscribed = flags.is_subscribed(user.id);
    Ok(Json(UserResponse::new(user, is_subscribed)))
}
