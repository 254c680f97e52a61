use chrono::Utc;
use ladle_domain::pagination::PageRequest;
use uuid::Uuid;

use crate::domain::repository::{FollowRepository, RecipeRepository, UserRepository};
use crate::domain::types::{AuthorPreview, Follow};
use crate::error::ApiServiceError;

async fn author_preview<R: RecipeRepository>(
    recipe_repo: &R,
    author: crate::domain::types::User,
    recipes_limit: Option<u64>,
) -> Result<AuthorPreview, ApiServiceError> {
    let recipes = recipe_repo.list_by_author(author.id, recipes_limit).await?;
    let recipes_count = recipe_repo.count_by_author(author.id).await?;
    Ok(AuthorPreview {
        user: author,
        recipes,
        recipes_count,
    })
}

// ── Subscribe ────────────────────────────────────────────────────────────────

pub struct SubscribeUseCase<U: UserRepository, F: FollowRepository, R: RecipeRepository> {
    pub user_repo: U,
    pub follow_repo: F,
    pub recipe_repo: R,
}

impl<U: UserRepository, F: FollowRepository, R: RecipeRepository> SubscribeUseCase<U, F, R> {
    /// Follow `author_id` on behalf of `subscriber_id` and return the author
    /// card shown in the subscriptions feed.
    pub async fn execute(
        &self,
        subscriber_id: Uuid,
        author_id: Uuid,
        recipes_limit: Option<u64>,
    ) -> Result<AuthorPreview, ApiServiceError> {
        let author = self
            .user_repo
            .find_by_id(author_id)
            .await?
            .ok_or(ApiServiceError::UserNotFound)?;

        if subscriber_id == author_id {
            return Err(ApiServiceError::SelfFollow);
        }

        let follow = Follow {
            subscriber_id,
            author_id,
            created_at: Utc::now(),
        };
        if !self.follow_repo.insert(&follow).await? {
            return Err(ApiServiceError::AlreadyFollowing);
        }

        author_preview(&self.recipe_repo, author, recipes_limit).await
    }
}

// ── Unsubscribe ──────────────────────────────────────────────────────────────

pub struct UnsubscribeUseCase<U: UserRepository, F: FollowRepository> {
    pub user_repo: U,
    pub follow_repo: F,
}

impl<U: UserRepository, F: FollowRepository> UnsubscribeUseCase<U, F> {
    pub async fn execute(
        &self,
        subscriber_id: Uuid,
        author_id: Uuid,
    ) -> Result<(), ApiServiceError> {
        self.user_repo
            .find_by_id(author_id)
            .await?
            .ok_or(ApiServiceError::UserNotFound)?;

        if !self.follow_repo.delete(subscriber_id, author_id).await? {
            return Err(ApiServiceError::FollowNotFound);
        }
        Ok(())
    }
}

// ── GetSubscriptions ─────────────────────────────────────────────────────────

/// Page through the authors the requester follows, each annotated with a
/// capped recipe preview and the author's total recipe count.
pub struct GetSubscriptionsUseCase<F: FollowRepository, R: RecipeRepository> {
    pub follow_repo: F,
    pub recipe_repo: R,
}

impl<F: FollowRepository, R: RecipeRepository> GetSubscriptionsUseCase<F, R> {
    pub async fn execute(
        &self,
        subscriber_id: Uuid,
        page: PageRequest,
        recipes_limit: Option<u64>,
    ) -> Result<Vec<AuthorPreview>, ApiServiceError> {
        let authors = self.follow_repo.list_authors(subscriber_id, page).await?;

        let mut previews = Vec::with_capacity(authors.len());
        for author in authors {
            previews.push(author_preview(&self.recipe_repo, author, recipes_limit).await?);
        }
        Ok(previews)
    }
}
