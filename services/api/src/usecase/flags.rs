use uuid::Uuid;

use crate::domain::repository::{CartRepository, FavoriteRepository, FollowRepository};
use crate::domain::types::ViewerFlags;
use crate::error::ApiServiceError;

// ── LoadViewerFlags ──────────────────────────────────────────────────────────

/// Assemble the per-requester annotation sets for one response: which of the
/// page's recipes the requester favorited / carted, which of its authors they
/// follow. One bulk query per set, anonymous requesters short-circuit to the
/// all-false default.
pub struct LoadViewerFlagsUseCase<F: FavoriteRepository, C: CartRepository, S: FollowRepository> {
    pub favorites: F,
    pub cart: C,
    pub follows: S,
}

impl<F: FavoriteRepository, C: CartRepository, S: FollowRepository>
    LoadViewerFlagsUseCase<F, C, S>
{
    pub async fn execute(
        &self,
        requester: Option<Uuid>,
        recipe_ids: &[i32],
        author_ids: &[Uuid],
    ) -> Result<ViewerFlags, ApiServiceError> {
        let Some(user_id) = requester else {
            return Ok(ViewerFlags::default());
        };
        let mut flags = ViewerFlags::default();
        if !recipe_ids.is_empty() {
            flags.favorited = self.favorites.favorited_ids(user_id, recipe_ids).await?;
            flags.in_cart = self.cart.in_cart_ids(user_id, recipe_ids).await?;
        }
        if !author_ids.is_empty() {
            flags.followed = self.follows.followed_ids(user_id, author_ids).await?;
        }
        Ok(flags)
    }
}
