use std::collections::{HashMap, HashSet};

use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    sea_query::{Expr, OnConflict, Query, extension::postgres::PgExpr},
};
use uuid::Uuid;

use ladle_api_schema::{
    cart_entries, favorites, follows, ingredients, recipe_ingredients, recipe_tags, recipes, tags,
    users,
};
use ladle_domain::pagination::PageRequest;

use crate::domain::repository::{
    CartRepository, FavoriteRepository, FollowRepository, IngredientRepository, RecipeRepository,
    TagRepository, UserRepository,
};
use crate::domain::types::{
    Follow, Ingredient, Recipe, RecipeDetails, RecipeDraft, RecipeFilter, RecipeIngredient,
    ShoppingListLine, Tag, User,
};
use crate::error::ApiServiceError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
            .context("find user by username")?;
        Ok(model.map(user_from_model))
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<User>, ApiServiceError> {
        let page = page.clamped();
        let models = users::Entity::find()
            .order_by_asc(users::Column::Username)
            .offset(page.offset())
            .limit(page.per_page as u64)
            .all(&self.db)
            .await
            .context("list users")?;
        Ok(models.into_iter().map(user_from_model).collect())
    }

    async fn create(&self, user: &User) -> Result<(), ApiServiceError> {
        users::ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            username: Set(user.username.clone()),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            password_hash: Set(user.password_hash.clone()),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create user")?;
        Ok(())
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        username: model.username,
        first_name: model.first_name,
        last_name: model.last_name,
        password_hash: model.password_hash,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Follow repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbFollowRepository {
    pub db: DatabaseConnection,
}

impl FollowRepository for DbFollowRepository {
    async fn insert(&self, follow: &Follow) -> Result<bool, ApiServiceError> {
        let inserted = follows::Entity::insert(follows::ActiveModel {
            subscriber_id: Set(follow.subscriber_id),
            author_id: Set(follow.author_id),
            created_at: Set(follow.created_at),
        })
        .on_conflict(
            OnConflict::columns([follows::Column::SubscriberId, follows::Column::AuthorId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .context("insert follow")?;
        Ok(inserted > 0)
    }

    async fn delete(
        &self,
        subscriber_id: Uuid,
        author_id: Uuid,
    ) -> Result<bool, ApiServiceError> {
        let result = follows::Entity::delete_many()
            .filter(follows::Column::SubscriberId.eq(subscriber_id))
            .filter(follows::Column::AuthorId.eq(author_id))
            .exec(&self.db)
            .await
            .context("delete follow")?;
        Ok(result.rows_affected > 0)
    }

    async fn list_authors(
        &self,
        subscriber_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<User>, ApiServiceError> {
        let page = page.clamped();
        let models = users::Entity::find()
            .filter(
                users::Column::Id.in_subquery(
                    Query::select()
                        .column(follows::Column::AuthorId)
                        .from(follows::Entity)
                        .and_where(Expr::col(follows::Column::SubscriberId).eq(subscriber_id))
                        .to_owned(),
                ),
            )
            .order_by_asc(users::Column::Username)
            .offset(page.offset())
            .limit(page.per_page as u64)
            .all(&self.db)
            .await
            .context("list followed authors")?;
        Ok(models.into_iter().map(user_from_model).collect())
    }

    async fn followed_ids(
        &self,
        subscriber_id: Uuid,
        author_ids: &[Uuid],
    ) -> Result<HashSet<Uuid>, ApiServiceError> {
        let models = follows::Entity::find()
            .filter(follows::Column::SubscriberId.eq(subscriber_id))
            .filter(follows::Column::AuthorId.is_in(author_ids.iter().copied()))
            .all(&self.db)
            .await
            .context("list follows by author ids")?;
        Ok(models.into_iter().map(|model| model.author_id).collect())
    }
}

// ── Tag repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTagRepository {
    pub db: DatabaseConnection,
}

impl TagRepository for DbTagRepository {
    async fn list(&self) -> Result<Vec<Tag>, ApiServiceError> {
        let models = tags::Entity::find()
            .order_by_asc(tags::Column::Name)
            .all(&self.db)
            .await
            .context("list tags")?;
        Ok(models.into_iter().map(tag_from_model).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Tag>, ApiServiceError> {
        let model = tags::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find tag by id")?;
        Ok(model.map(tag_from_model))
    }

    async fn existing_ids(&self, ids: &[i32]) -> Result<HashSet<i32>, ApiServiceError> {
        let models = tags::Entity::find()
            .filter(tags::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .context("find tags by ids")?;
        Ok(models.into_iter().map(|model| model.id).collect())
    }
}

fn tag_from_model(model: tags::Model) -> Tag {
    Tag {
        id: model.id,
        name: model.name,
        slug: model.slug,
        color: model.color,
    }
}

// ── Ingredient repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbIngredientRepository {
    pub db: DatabaseConnection,
}

impl IngredientRepository for DbIngredientRepository {
    async fn list(&self, name_contains: Option<&str>) -> Result<Vec<Ingredient>, ApiServiceError> {
        let mut query = ingredients::Entity::find();
        if let Some(needle) = name_contains {
            query = query
                .filter(Expr::col(ingredients::Column::Name).ilike(format!("%{}%", escape_like(needle))));
        }
        let models = query
            .order_by_asc(ingredients::Column::Name)
            .all(&self.db)
            .await
            .context("list ingredients")?;
        Ok(models.into_iter().map(ingredient_from_model).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Ingredient>, ApiServiceError> {
        let model = ingredients::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find ingredient by id")?;
        Ok(model.map(ingredient_from_model))
    }

    async fn existing_ids(&self, ids: &[i32]) -> Result<HashSet<i32>, ApiServiceError> {
        let models = ingredients::Entity::find()
            .filter(ingredients::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .context("find ingredients by ids")?;
        Ok(models.into_iter().map(|model| model.id).collect())
    }
}

fn ingredient_from_model(model: ingredients::Model) -> Ingredient {
    Ingredient {
        id: model.id,
        name: model.name,
        measurement_unit: model.measurement_unit,
    }
}

/// Escape LIKE wildcards so user input matches literally.
fn escape_like(needle: &str) -> String {
    needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

// ── Recipe repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRecipeRepository {
    pub db: DatabaseConnection,
}

impl RecipeRepository for DbRecipeRepository {
    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<Vec<RecipeDetails>, ApiServiceError> {
        let page = page.clamped();
        let mut query = recipes::Entity::find();

        if let Some(author_id) = filter.author_id {
            query = query.filter(recipes::Column::AuthorId.eq(author_id));
        }
        if !filter.tag_slugs.is_empty() {
            let tag_ids: Vec<i32> = tags::Entity::find()
                .filter(tags::Column::Slug.is_in(filter.tag_slugs.iter().cloned()))
                .all(&self.db)
                .await
                .context("find tags by slug")?
                .into_iter()
                .map(|tag| tag.id)
                .collect();
            query = query.filter(
                recipes::Column::Id.in_subquery(
                    Query::select()
                        .column(recipe_tags::Column::RecipeId)
                        .from(recipe_tags::Entity)
                        .and_where(Expr::col(recipe_tags::Column::TagId).is_in(tag_ids))
                        .to_owned(),
                ),
            );
        }
        if let Some(user_id) = filter.favorited_by {
            query = query.filter(
                recipes::Column::Id.in_subquery(
                    Query::select()
                        .column(favorites::Column::RecipeId)
                        .from(favorites::Entity)
                        .and_where(Expr::col(favorites::Column::UserId).eq(user_id))
                        .to_owned(),
                ),
            );
        }
        if let Some(user_id) = filter.in_cart_of {
            query = query.filter(
                recipes::Column::Id.in_subquery(
                    Query::select()
                        .column(cart_entries::Column::RecipeId)
                        .from(cart_entries::Entity)
                        .and_where(Expr::col(cart_entries::Column::UserId).eq(user_id))
                        .to_owned(),
                ),
            );
        }

        let models = query
            .order_by_desc(recipes::Column::Id)
            .offset(page.offset())
            .limit(page.per_page as u64)
            .all(&self.db)
            .await
            .context("list recipes")?;
        materialize(&self.db, models).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Recipe>, ApiServiceError> {
        let model = recipes::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find recipe by id")?;
        Ok(model.map(recipe_from_model))
    }

    async fn find_details(&self, id: i32) -> Result<Option<RecipeDetails>, ApiServiceError> {
        let Some(model) = recipes::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find recipe for details")?
        else {
            return Ok(None);
        };
        let details = materialize(&self.db, vec![model]).await?;
        Ok(details.into_iter().next())
    }

    async fn create(&self, author_id: Uuid, draft: &RecipeDraft) -> Result<i32, ApiServiceError> {
        let recipe_id = self
            .db
            .transaction::<_, i32, sea_orm::DbErr>(|txn| {
                let draft = draft.clone();
                Box::pin(async move {
                    let now = Utc::now();
                    let recipe = recipes::ActiveModel {
                        author_id: Set(author_id),
                        name: Set(draft.name.clone()),
                        text: Set(draft.text.clone()),
                        image: Set(draft.image.clone()),
                        cooking_time: Set(draft.cooking_time),
                        created_at: Set(now),
                        updated_at: Set(now),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;

                    insert_links(txn, recipe.id, &draft).await?;
                    Ok(recipe.id)
                })
            })
            .await
            .context("create recipe")?;
        Ok(recipe_id)
    }

    async fn replace(&self, id: i32, draft: &RecipeDraft) -> Result<(), ApiServiceError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let draft = draft.clone();
                Box::pin(async move {
                    recipes::ActiveModel {
                        id: Set(id),
                        name: Set(draft.name.clone()),
                        text: Set(draft.text.clone()),
                        image: Set(draft.image.clone()),
                        cooking_time: Set(draft.cooking_time),
                        updated_at: Set(Utc::now()),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;

                    recipe_tags::Entity::delete_many()
                        .filter(recipe_tags::Column::RecipeId.eq(id))
                        .exec(txn)
                        .await?;
                    recipe_ingredients::Entity::delete_many()
                        .filter(recipe_ingredients::Column::RecipeId.eq(id))
                        .exec(txn)
                        .await?;

                    insert_links(txn, id, &draft).await?;
                    Ok(())
                })
            })
            .await
            .context("replace recipe")?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiServiceError> {
        let result = recipes::Entity::delete_many()
            .filter(recipes::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("delete recipe")?;
        Ok(result.rows_affected > 0)
    }

    async fn list_by_author(
        &self,
        author_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<Recipe>, ApiServiceError> {
        let mut query = recipes::Entity::find()
            .filter(recipes::Column::AuthorId.eq(author_id))
            .order_by_desc(recipes::Column::Id);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        let models = query
            .all(&self.db)
            .await
            .context("list recipes by author")?;
        Ok(models.into_iter().map(recipe_from_model).collect())
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, ApiServiceError> {
        let count = recipes::Entity::find()
            .filter(recipes::Column::AuthorId.eq(author_id))
            .count(&self.db)
            .await
            .context("count recipes by author")?;
        Ok(count)
    }
}

/// Insert the link rows for a recipe draft inside an open transaction.
async fn insert_links(
    txn: &DatabaseTransaction,
    recipe_id: i32,
    draft: &RecipeDraft,
) -> Result<(), sea_orm::DbErr> {
    if !draft.tag_ids.is_empty() {
        let rows = draft.tag_ids.iter().map(|tag_id| recipe_tags::ActiveModel {
            recipe_id: Set(recipe_id),
            tag_id: Set(*tag_id),
        });
        recipe_tags::Entity::insert_many(rows)
            .exec_without_returning(txn)
            .await?;
    }
    if !draft.ingredients.is_empty() {
        let rows = draft
            .ingredients
            .iter()
            .map(|line| recipe_ingredients::ActiveModel {
                recipe_id: Set(recipe_id),
                ingredient_id: Set(line.ingredient_id),
                amount: Set(line.amount),
            });
        recipe_ingredients::Entity::insert_many(rows)
            .exec_without_returning(txn)
            .await?;
    }
    Ok(())
}

/// Expand recipe rows into [`RecipeDetails`]: authors are fetched in one
/// query, tags and ingredient lines per recipe.
async fn materialize(
    db: &DatabaseConnection,
    models: Vec<recipes::Model>,
) -> Result<Vec<RecipeDetails>, ApiServiceError> {
    let author_ids: Vec<Uuid> = models.iter().map(|model| model.author_id).collect();
    let authors: HashMap<Uuid, users::Model> = users::Entity::find()
        .filter(users::Column::Id.is_in(author_ids))
        .all(db)
        .await
        .context("list recipe authors")?
        .into_iter()
        .map(|model| (model.id, model))
        .collect();

    let mut results = Vec::with_capacity(models.len());
    for model in models {
        let author = authors
            .get(&model.author_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("author {} missing for recipe {}", model.author_id, model.id))?;
        let tags = tags_for(db, model.id).await?;
        let ingredients = ingredient_lines_for(db, model.id).await?;
        results.push(RecipeDetails {
            recipe: recipe_from_model(model),
            author: user_from_model(author),
            tags,
            ingredients,
        });
    }
    Ok(results)
}

async fn tags_for(db: &DatabaseConnection, recipe_id: i32) -> Result<Vec<Tag>, ApiServiceError> {
    let models = tags::Entity::find()
        .filter(
            tags::Column::Id.in_subquery(
                Query::select()
                    .column(recipe_tags::Column::TagId)
                    .from(recipe_tags::Entity)
                    .and_where(Expr::col(recipe_tags::Column::RecipeId).eq(recipe_id))
                    .to_owned(),
            ),
        )
        .order_by_asc(tags::Column::Name)
        .all(db)
        .await
        .context("list recipe tags")?;
    Ok(models.into_iter().map(tag_from_model).collect())
}

async fn ingredient_lines_for(
    db: &DatabaseConnection,
    recipe_id: i32,
) -> Result<Vec<RecipeIngredient>, ApiServiceError> {
    let links = recipe_ingredients::Entity::find()
        .filter(recipe_ingredients::Column::RecipeId.eq(recipe_id))
        .order_by_asc(recipe_ingredients::Column::IngredientId)
        .all(db)
        .await
        .context("list recipe ingredient links")?;

    let ingredient_ids: Vec<i32> = links.iter().map(|link| link.ingredient_id).collect();
    let catalog: HashMap<i32, ingredients::Model> = ingredients::Entity::find()
        .filter(ingredients::Column::Id.is_in(ingredient_ids))
        .all(db)
        .await
        .context("list recipe ingredients")?
        .into_iter()
        .map(|model| (model.id, model))
        .collect();

    let mut lines = Vec::with_capacity(links.len());
    for link in links {
        let ingredient = catalog.get(&link.ingredient_id).ok_or_else(|| {
            anyhow::anyhow!(
                "ingredient {} missing for recipe {}",
                link.ingredient_id,
                recipe_id
            )
        })?;
        lines.push(RecipeIngredient {
            id: ingredient.id,
            name: ingredient.name.clone(),
            measurement_unit: ingredient.measurement_unit.clone(),
            amount: link.amount,
        });
    }
    Ok(lines)
}

fn recipe_from_model(model: recipes::Model) -> Recipe {
    Recipe {
        id: model.id,
        author_id: model.author_id,
        name: model.name,
        text: model.text,
        image: model.image,
        cooking_time: model.cooking_time,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Favorite repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbFavoriteRepository {
    pub db: DatabaseConnection,
}

impl FavoriteRepository for DbFavoriteRepository {
    async fn insert(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, ApiServiceError> {
        let inserted = favorites::Entity::insert(favorites::ActiveModel {
            user_id: Set(user_id),
            recipe_id: Set(recipe_id),
            created_at: Set(Utc::now()),
        })
        .on_conflict(
            OnConflict::columns([favorites::Column::UserId, favorites::Column::RecipeId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .context("insert favorite")?;
        Ok(inserted > 0)
    }

    async fn delete(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, ApiServiceError> {
        let result = favorites::Entity::delete_many()
            .filter(favorites::Column::UserId.eq(user_id))
            .filter(favorites::Column::RecipeId.eq(recipe_id))
            .exec(&self.db)
            .await
            .context("delete favorite")?;
        Ok(result.rows_affected > 0)
    }

    async fn favorited_ids(
        &self,
        user_id: Uuid,
        recipe_ids: &[i32],
    ) -> Result<HashSet<i32>, ApiServiceError> {
        let models = favorites::Entity::find()
            .filter(favorites::Column::UserId.eq(user_id))
            .filter(favorites::Column::RecipeId.is_in(recipe_ids.iter().copied()))
            .all(&self.db)
            .await
            .context("list favorites by recipe ids")?;
        Ok(models.into_iter().map(|model| model.recipe_id).collect())
    }
}

// ── Cart repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCartRepository {
    pub db: DatabaseConnection,
}

impl CartRepository for DbCartRepository {
    async fn insert(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, ApiServiceError> {
        let inserted = cart_entries::Entity::insert(cart_entries::ActiveModel {
            user_id: Set(user_id),
            recipe_id: Set(recipe_id),
            created_at: Set(Utc::now()),
        })
        .on_conflict(
            OnConflict::columns([
                cart_entries::Column::UserId,
                cart_entries::Column::RecipeId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .context("insert cart entry")?;
        Ok(inserted > 0)
    }

    async fn delete(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, ApiServiceError> {
        let result = cart_entries::Entity::delete_many()
            .filter(cart_entries::Column::UserId.eq(user_id))
            .filter(cart_entries::Column::RecipeId.eq(recipe_id))
            .exec(&self.db)
            .await
            .context("delete cart entry")?;
        Ok(result.rows_affected > 0)
    }

    async fn in_cart_ids(
        &self,
        user_id: Uuid,
        recipe_ids: &[i32],
    ) -> Result<HashSet<i32>, ApiServiceError> {
        let models = cart_entries::Entity::find()
            .filter(cart_entries::Column::UserId.eq(user_id))
            .filter(cart_entries::Column::RecipeId.is_in(recipe_ids.iter().copied()))
            .all(&self.db)
            .await
            .context("list cart entries by recipe ids")?;
        Ok(models.into_iter().map(|model| model.recipe_id).collect())
    }

    async fn shopping_list(&self, user_id: Uuid) -> Result<Vec<ShoppingListLine>, ApiServiceError> {
        use sea_orm::{ConnectionTrait, FromQueryResult, Statement};

        let sql = r#"
            SELECT i.name AS name, i.measurement_unit AS measurement_unit,
                   SUM(ri.amount) AS total_amount
            FROM cart_entries c
            INNER JOIN recipe_ingredients ri ON ri.recipe_id = c.recipe_id
            INNER JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE c.user_id = $1
            GROUP BY i.name, i.measurement_unit
            ORDER BY i.name
        "#;

        #[derive(Debug, FromQueryResult)]
        struct ShoppingRow {
            name: String,
            measurement_unit: String,
            total_amount: i64,
        }

        let rows = ShoppingRow::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            sql,
            [user_id.into()],
        ))
        .all(&self.db)
        .await
        .context("aggregate shopping list")?;

        Ok(rows
            .into_iter()
            .map(|row| ShoppingListLine {
                name: row.name,
                measurement_unit: row.measurement_unit,
                total_amount: row.total_amount,
            })
            .collect())
    }
}
