use crate::domain::repository::TagRepository;
use crate::domain::types::Tag;
use crate::error::ApiServiceError;

// ── GetTags ──────────────────────────────────────────────────────────────────

pub struct GetTagsUseCase<R: TagRepository> {
    pub tag_repo: R,
}

impl<R: TagRepository> GetTagsUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<Tag>, ApiServiceError> {
        self.tag_repo.list().await
    }
}

// ── GetTag ───────────────────────────────────────────────────────────────────

pub struct GetTagUseCase<R: TagRepository> {
    pub tag_repo: R,
}

impl<R: TagRepository> GetTagUseCase<R> {
    pub async fn execute(&self, tag_id: i32) -> Result<Tag, ApiServiceError> {
        self.tag_repo
            .find_by_id(tag_id)
            .await?
            .ok_or(ApiServiceError::TagNotFound)
    }
}
