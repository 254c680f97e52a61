use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use ladle_api::domain::repository::{
    CartRepository, FavoriteRepository, FollowRepository, IngredientRepository, RecipeRepository,
    TagRepository, UserRepository,
};
use ladle_api::domain::types::{
    Follow, Ingredient, IngredientAmount, Recipe, RecipeDetails, RecipeDraft, RecipeFilter,
    RecipeIngredient, ShoppingListLine, Tag, User,
};
use ladle_api::error::ApiServiceError;
use ladle_domain::pagination::PageRequest;

// ── MockUserRepo ─────────────────────────────────────────────────────────────

/// Clones share the same underlying rows, so one flow can drive several
/// usecases over the same data.
#[derive(Clone)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Returns a shared handle to the stored rows for post-execution inspection.
    pub fn users_handle(&self) -> Arc<Mutex<Vec<User>>> {
        Arc::clone(&self.users)
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiServiceError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<User>, ApiServiceError> {
        let page = page.clamped();
        let mut users = self.users.lock().unwrap().clone();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.per_page as usize)
            .collect())
    }

    async fn create(&self, user: &User) -> Result<(), ApiServiceError> {
        self.users.lock().unwrap().push(user.clone());
        Ok(())
    }
}

// ── MockFollowRepo ───────────────────────────────────────────────────────────

/// Clones share the same underlying rows.
#[derive(Clone)]
pub struct MockFollowRepo {
    pub follows: Arc<Mutex<Vec<Follow>>>,
    pub authors: Vec<User>,
}

impl MockFollowRepo {
    pub fn new(follows: Vec<Follow>, authors: Vec<User>) -> Self {
        Self {
            follows: Arc::new(Mutex::new(follows)),
            authors,
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![], vec![])
    }

    /// Returns a shared handle to the stored rows for post-execution inspection.
    pub fn follows_handle(&self) -> Arc<Mutex<Vec<Follow>>> {
        Arc::clone(&self.follows)
    }
}

impl FollowRepository for MockFollowRepo {
    async fn insert(&self, follow: &Follow) -> Result<bool, ApiServiceError> {
        let mut follows = self.follows.lock().unwrap();
        if follows
            .iter()
            .any(|f| f.subscriber_id == follow.subscriber_id && f.author_id == follow.author_id)
        {
            return Ok(false);
        }
        follows.push(follow.clone());
        Ok(true)
    }

    async fn delete(
        &self,
        subscriber_id: Uuid,
        author_id: Uuid,
    ) -> Result<bool, ApiServiceError> {
        let mut follows = self.follows.lock().unwrap();
        let before = follows.len();
        follows.retain(|f| !(f.subscriber_id == subscriber_id && f.author_id == author_id));
        Ok(follows.len() < before)
    }

    async fn list_authors(
        &self,
        subscriber_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<User>, ApiServiceError> {
        let page = page.clamped();
        let followed: HashSet<Uuid> = self
            .follows
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.subscriber_id == subscriber_id)
            .map(|f| f.author_id)
            .collect();
        let mut authors: Vec<User> = self
            .authors
            .iter()
            .filter(|u| followed.contains(&u.id))
            .cloned()
            .collect();
        authors.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(authors
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.per_page as usize)
            .collect())
    }

    async fn followed_ids(
        &self,
        subscriber_id: Uuid,
        author_ids: &[Uuid],
    ) -> Result<HashSet<Uuid>, ApiServiceError> {
        let follows = self.follows.lock().unwrap();
        Ok(author_ids
            .iter()
            .filter(|author_id| {
                follows
                    .iter()
                    .any(|f| f.subscriber_id == subscriber_id && f.author_id == **author_id)
            })
            .copied()
            .collect())
    }
}

// ── MockTagRepo ──────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockTagRepo {
    pub tags: Vec<Tag>,
}

impl MockTagRepo {
    pub fn new(tags: Vec<Tag>) -> Self {
        Self { tags }
    }
}

impl TagRepository for MockTagRepo {
    async fn list(&self) -> Result<Vec<Tag>, ApiServiceError> {
        let mut tags = self.tags.clone();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Tag>, ApiServiceError> {
        Ok(self.tags.iter().find(|t| t.id == id).cloned())
    }

    async fn existing_ids(&self, ids: &[i32]) -> Result<HashSet<i32>, ApiServiceError> {
        Ok(ids
            .iter()
            .filter(|id| self.tags.iter().any(|t| t.id == **id))
            .copied()
            .collect())
    }
}

// ── MockIngredientRepo ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockIngredientRepo {
    pub ingredients: Vec<Ingredient>,
}

impl MockIngredientRepo {
    pub fn new(ingredients: Vec<Ingredient>) -> Self {
        Self { ingredients }
    }
}

impl IngredientRepository for MockIngredientRepo {
    async fn list(&self, name_contains: Option<&str>) -> Result<Vec<Ingredient>, ApiServiceError> {
        let needle = name_contains.map(str::to_lowercase);
        let mut ingredients: Vec<Ingredient> = self
            .ingredients
            .iter()
            .filter(|i| match &needle {
                Some(needle) => i.name.to_lowercase().contains(needle),
                None => true,
            })
            .cloned()
            .collect();
        ingredients.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(ingredients)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Ingredient>, ApiServiceError> {
        Ok(self.ingredients.iter().find(|i| i.id == id).cloned())
    }

    async fn existing_ids(&self, ids: &[i32]) -> Result<HashSet<i32>, ApiServiceError> {
        Ok(ids
            .iter()
            .filter(|id| self.ingredients.iter().any(|i| i.id == **id))
            .copied()
            .collect())
    }
}

// ── MockRecipeRepo ───────────────────────────────────────────────────────────

/// In-memory recipe store. Drafts are materialized against the author, tag,
/// and ingredient catalogs given at construction. Clones share the same
/// underlying rows.
#[derive(Clone)]
pub struct MockRecipeRepo {
    pub authors: Vec<User>,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<Ingredient>,
    pub details: Arc<Mutex<Vec<RecipeDetails>>>,
    next_id: Arc<Mutex<i32>>,
}

impl MockRecipeRepo {
    pub fn new(authors: Vec<User>, tags: Vec<Tag>, ingredients: Vec<Ingredient>) -> Self {
        Self {
            authors,
            tags,
            ingredients,
            details: Arc::new(Mutex::new(vec![])),
            next_id: Arc::new(Mutex::new(1)),
        }
    }

    /// Returns a shared handle to the stored rows for post-execution inspection.
    pub fn details_handle(&self) -> Arc<Mutex<Vec<RecipeDetails>>> {
        Arc::clone(&self.details)
    }

    fn materialize(
        &self,
        id: i32,
        author_id: Uuid,
        draft: &RecipeDraft,
        created_at: DateTime<Utc>,
    ) -> RecipeDetails {
        let author = self
            .authors
            .iter()
            .find(|u| u.id == author_id)
            .cloned()
            .unwrap();
        let tags = self
            .tags
            .iter()
            .filter(|t| draft.tag_ids.contains(&t.id))
            .cloned()
            .collect();
        let mut lines = draft.ingredients.clone();
        lines.sort_by_key(|line| line.ingredient_id);
        let ingredients = lines
            .into_iter()
            .map(|line| {
                let ingredient = self
                    .ingredients
                    .iter()
                    .find(|i| i.id == line.ingredient_id)
                    .unwrap();
                RecipeIngredient {
                    id: ingredient.id,
                    name: ingredient.name.clone(),
                    measurement_unit: ingredient.measurement_unit.clone(),
                    amount: line.amount,
                }
            })
            .collect();
        RecipeDetails {
            recipe: Recipe {
                id,
                author_id,
                name: draft.name.clone(),
                text: draft.text.clone(),
                image: draft.image.clone(),
                cooking_time: draft.cooking_time,
                created_at,
                updated_at: Utc::now(),
            },
            author,
            tags,
            ingredients,
        }
    }
}

impl RecipeRepository for MockRecipeRepo {
    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<Vec<RecipeDetails>, ApiServiceError> {
        // favorited_by / in_cart_of are join filters; flows here never set them.
        let page = page.clamped();
        let mut rows: Vec<RecipeDetails> = self
            .details
            .lock()
            .unwrap()
            .iter()
            .filter(|d| filter.author_id.is_none_or(|author| d.recipe.author_id == author))
            .filter(|d| {
                filter.tag_slugs.is_empty()
                    || d.tags.iter().any(|t| filter.tag_slugs.contains(&t.slug))
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.recipe.id.cmp(&a.recipe.id));
        Ok(rows
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.per_page as usize)
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Recipe>, ApiServiceError> {
        Ok(self
            .details
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.recipe.id == id)
            .map(|d| d.recipe.clone()))
    }

    async fn find_details(&self, id: i32) -> Result<Option<RecipeDetails>, ApiServiceError> {
        Ok(self
            .details
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.recipe.id == id)
            .cloned())
    }

    async fn create(&self, author_id: Uuid, draft: &RecipeDraft) -> Result<i32, ApiServiceError> {
        let id = {
            let mut next_id = self.next_id.lock().unwrap();
            let id = *next_id;
            *next_id += 1;
            id
        };
        let row = self.materialize(id, author_id, draft, Utc::now());
        self.details.lock().unwrap().push(row);
        Ok(id)
    }

    async fn replace(&self, id: i32, draft: &RecipeDraft) -> Result<(), ApiServiceError> {
        let mut details = self.details.lock().unwrap();
        if let Some(row) = details.iter_mut().find(|d| d.recipe.id == id) {
            *row = self.materialize(id, row.recipe.author_id, draft, row.recipe.created_at);
        }
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiServiceError> {
        let mut details = self.details.lock().unwrap();
        let before = details.len();
        details.retain(|d| d.recipe.id != id);
        Ok(details.len() < before)
    }

    async fn list_by_author(
        &self,
        author_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<Recipe>, ApiServiceError> {
        let mut recipes: Vec<Recipe> = self
            .details
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.recipe.author_id == author_id)
            .map(|d| d.recipe.clone())
            .collect();
        recipes.sort_by(|a, b| b.id.cmp(&a.id));
        if let Some(limit) = limit {
            recipes.truncate(limit as usize);
        }
        Ok(recipes)
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, ApiServiceError> {
        Ok(self
            .details
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.recipe.author_id == author_id)
            .count() as u64)
    }
}

// ── MockFavoriteRepo ─────────────────────────────────────────────────────────

/// Clones share the same underlying rows.
#[derive(Clone)]
pub struct MockFavoriteRepo {
    pub pairs: Arc<Mutex<Vec<(Uuid, i32)>>>,
}

impl MockFavoriteRepo {
    pub fn empty() -> Self {
        Self {
            pairs: Arc::new(Mutex::new(vec![])),
        }
    }

    /// Returns a shared handle to the stored rows for post-execution inspection.
    pub fn pairs_handle(&self) -> Arc<Mutex<Vec<(Uuid, i32)>>> {
        Arc::clone(&self.pairs)
    }
}

impl FavoriteRepository for MockFavoriteRepo {
    async fn insert(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, ApiServiceError> {
        let mut pairs = self.pairs.lock().unwrap();
        if pairs.contains(&(user_id, recipe_id)) {
            return Ok(false);
        }
        pairs.push((user_id, recipe_id));
        Ok(true)
    }

    async fn delete(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, ApiServiceError> {
        let mut pairs = self.pairs.lock().unwrap();
        let before = pairs.len();
        pairs.retain(|pair| *pair != (user_id, recipe_id));
        Ok(pairs.len() < before)
    }

    async fn favorited_ids(
        &self,
        user_id: Uuid,
        recipe_ids: &[i32],
    ) -> Result<HashSet<i32>, ApiServiceError> {
        let pairs = self.pairs.lock().unwrap();
        Ok(recipe_ids
            .iter()
            .filter(|recipe_id| pairs.contains(&(user_id, **recipe_id)))
            .copied()
            .collect())
    }
}

// ── MockCartRepo ─────────────────────────────────────────────────────────────

/// Shares the recipe rows of a [`MockRecipeRepo`] (via `details_handle`) so
/// `shopping_list` can aggregate ingredient lines the way the SQL report does.
/// Clones share the same underlying rows.
#[derive(Clone)]
pub struct MockCartRepo {
    pub pairs: Arc<Mutex<Vec<(Uuid, i32)>>>,
    pub recipes: Arc<Mutex<Vec<RecipeDetails>>>,
}

impl MockCartRepo {
    pub fn new(recipes: Arc<Mutex<Vec<RecipeDetails>>>) -> Self {
        Self {
            pairs: Arc::new(Mutex::new(vec![])),
            recipes,
        }
    }

    pub fn empty() -> Self {
        Self::new(Arc::new(Mutex::new(vec![])))
    }

    /// Returns a shared handle to the stored rows for post-execution inspection.
    pub fn pairs_handle(&self) -> Arc<Mutex<Vec<(Uuid, i32)>>> {
        Arc::clone(&self.pairs)
    }
}

impl CartRepository for MockCartRepo {
    async fn insert(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, ApiServiceError> {
        let mut pairs = self.pairs.lock().unwrap();
        if pairs.contains(&(user_id, recipe_id)) {
            return Ok(false);
        }
        pairs.push((user_id, recipe_id));
        Ok(true)
    }

    async fn delete(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, ApiServiceError> {
        let mut pairs = self.pairs.lock().unwrap();
        let before = pairs.len();
        pairs.retain(|pair| *pair != (user_id, recipe_id));
        Ok(pairs.len() < before)
    }

    async fn in_cart_ids(
        &self,
        user_id: Uuid,
        recipe_ids: &[i32],
    ) -> Result<HashSet<i32>, ApiServiceError> {
        let pairs = self.pairs.lock().unwrap();
        Ok(recipe_ids
            .iter()
            .filter(|recipe_id| pairs.contains(&(user_id, **recipe_id)))
            .copied()
            .collect())
    }

    async fn shopping_list(&self, user_id: Uuid) -> Result<Vec<ShoppingListLine>, ApiServiceError> {
        let pairs = self.pairs.lock().unwrap();
        let recipes = self.recipes.lock().unwrap();
        let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();
        for (_, recipe_id) in pairs.iter().filter(|(u, _)| *u == user_id) {
            let Some(details) = recipes.iter().find(|d| d.recipe.id == *recipe_id) else {
                continue;
            };
            for line in &details.ingredients {
                *totals
                    .entry((line.name.clone(), line.measurement_unit.clone()))
                    .or_default() += i64::from(line.amount);
            }
        }
        Ok(totals
            .into_iter()
            .map(|((name, measurement_unit), total_amount)| ShoppingListLine {
                name,
                measurement_unit,
                total_amount,
            })
            .collect())
    }
}

// ── Test fixture helpers ─────────────────────────────────────────────────────

pub fn test_user() -> User {
    User {
        id: Uuid::parse_str("00000000-0000-0000-0000-000000000001").unwrap(),
        email: "alice@example.com".to_owned(),
        username: "alice".to_owned(),
        first_name: "Alice".to_owned(),
        last_name: "Liddell".to_owned(),
        password_hash: "$argon2id$placeholder".to_owned(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn test_author() -> User {
    User {
        id: Uuid::parse_str("00000000-0000-0000-0000-000000000002").unwrap(),
        email: "bob@example.com".to_owned(),
        username: "bob".to_owned(),
        first_name: "Bob".to_owned(),
        last_name: "Baker".to_owned(),
        password_hash: "$argon2id$placeholder".to_owned(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn catalog_tags() -> Vec<Tag> {
    vec![
        Tag {
            id: 1,
            name: "завтрак".to_owned(),
            slug: "breakfast".to_owned(),
            color: "#ffaa00".to_owned(),
        },
        Tag {
            id: 2,
            name: "ужин".to_owned(),
            slug: "dinner".to_owned(),
            color: "#4060ff".to_owned(),
        },
    ]
}

pub fn catalog_ingredients() -> Vec<Ingredient> {
    vec![
        Ingredient {
            id: 1,
            name: "Мука".to_owned(),
            measurement_unit: "г".to_owned(),
        },
        Ingredient {
            id: 2,
            name: "Яйца".to_owned(),
            measurement_unit: "шт.".to_owned(),
        },
        Ingredient {
            id: 3,
            name: "Молоко".to_owned(),
            measurement_unit: "мл".to_owned(),
        },
    ]
}

pub fn pancake_draft() -> RecipeDraft {
    RecipeDraft {
        name: "Блины".to_owned(),
        text: "Смешать и жарить.".to_owned(),
        image: Some("data:image/png;base64,iVBORw0KGgo=".to_owned()),
        cooking_time: 20,
        tag_ids: vec![1],
        ingredients: vec![
            IngredientAmount {
                ingredient_id: 1,
                amount: 200,
            },
            IngredientAmount {
                ingredient_id: 2,
                amount: 2,
            },
        ],
    }
}

pub fn omelet_draft() -> RecipeDraft {
    RecipeDraft {
        name: "Омлет".to_owned(),
        text: "Взбить и жарить.".to_owned(),
        image: None,
        cooking_time: 10,
        tag_ids: vec![2],
        ingredients: vec![
            IngredientAmount {
                ingredient_id: 2,
                amount: 3,
            },
            IngredientAmount {
                ingredient_id: 3,
                amount: 100,
            },
        ],
    }
}
