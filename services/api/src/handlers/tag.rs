use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::domain::types::Tag;
use crate::error::ApiServiceError;
use crate::state::AppState;
use crate::usecase::tag::{GetTagUseCase, GetTagsUseCase};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct TagResponse {
    pub id: i32,
    pub name: String,
    pub color: String,
    pub slug: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        TagResponse {
            id: tag.id,
            name: tag.name,
            color: tag.color,
            slug: tag.slug,
        }
    }
}

// ── GET /tags ────────────────────────────────────────────────────────────────

pub async fn get_tags(
    State(state): State<AppState>,
) -> Result<Json<Vec<TagResponse>>, ApiServiceError> {
    let usecase = GetTagsUseCase {
        tag_repo: state.tag_repo(),
    };
    let tags = usecase.execute().await?;
    Ok(Json(tags.into_iter().map(TagResponse::from).collect()))
}

// ── GET /tags/{id} ───────────────────────────────────────────────────────────

pub async fn get_tag(
    State(state): State<AppState>,
    Path(tag_id): Path<i32>,
) -> Result<Json<TagResponse>, ApiServiceError> {
    let usecase = GetTagUseCase {
        tag_repo: state.tag_repo(),
    };
    let tag = usecase.execute(tag_id).await?;
    Ok(Json(TagResponse::from(tag)))
}
