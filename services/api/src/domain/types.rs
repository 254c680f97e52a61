use std::collections::HashSet;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use ladle_domain::limits::{
    MAX_COOKING_TIME, MAX_EMAIL_LEN, MAX_INGREDIENT_AMOUNT, MAX_NAME_LEN, MAX_USER_FIELD_LEN,
    MIN_COOKING_TIME, MIN_INGREDIENT_AMOUNT,
};

/// User account owned by the api service.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Subscription of `subscriber_id` to recipes authored by `author_id`.
#[derive(Debug, Clone)]
pub struct Follow {
    pub subscriber_id: Uuid,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Recipe category tag.
#[derive(Debug, Clone)]
pub struct Tag {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub color: String,
}

/// Ingredient from the reference catalog.
#[derive(Debug, Clone)]
pub struct Ingredient {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
}

/// Recipe scalar fields. Tag and ingredient links live in [`RecipeDetails`].
#[derive(Debug, Clone)]
pub struct Recipe {
    pub id: i32,
    pub author_id: Uuid,
    pub name: String,
    pub text: String,
    pub image: Option<String>,
    pub cooking_time: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One ingredient line of a materialized recipe.
#[derive(Debug, Clone)]
pub struct RecipeIngredient {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// A recipe materialized with its author, tags, and ingredient lines.
#[derive(Debug, Clone)]
pub struct RecipeDetails {
    pub recipe: Recipe,
    pub author: User,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<RecipeIngredient>,
}

/// An (ingredient id, amount) pair in a recipe draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientAmount {
    pub ingredient_id: i32,
    pub amount: i32,
}

/// Recipe payload shared by create and update. Update is a full replace:
/// the stored tag and ingredient sets become exactly the draft's sets.
#[derive(Debug, Clone)]
pub struct RecipeDraft {
    pub name: String,
    pub text: String,
    pub image: Option<String>,
    pub cooking_time: i32,
    pub tag_ids: Vec<i32>,
    pub ingredients: Vec<IngredientAmount>,
}

/// Registration payload.
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

/// Recipe list filters. `favorited_by` / `in_cart_of` are set only when the
/// requester asked for them *and* is authenticated; anonymous requests leave
/// them `None` (filter is a no-op).
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    pub tag_slugs: Vec<String>,
    pub author_id: Option<Uuid>,
    pub favorited_by: Option<Uuid>,
    pub in_cart_of: Option<Uuid>,
}

/// A followed author annotated with their recipes for subscription listings.
#[derive(Debug, Clone)]
pub struct AuthorPreview {
    pub user: User,
    pub recipes: Vec<Recipe>,
    pub recipes_count: u64,
}

/// One aggregated line of a shopping list: total amount per
/// (ingredient name, measurement unit) group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListLine {
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}

/// Per-requester annotation sets for a page of recipes and users.
///
/// Computed at response-assembly time, never stored. `Default` is the
/// anonymous view: every flag reads false.
#[derive(Debug, Clone, Default)]
pub struct ViewerFlags {
    pub favorited: HashSet<i32>,
    pub in_cart: HashSet<i32>,
    pub followed: HashSet<Uuid>,
}

impl ViewerFlags {
    pub fn is_favorited(&self, recipe_id: i32) -> bool {
        self.favorited.contains(&recipe_id)
    }

    pub fn is_in_cart(&self, recipe_id: i32) -> bool {
        self.in_cart.contains(&recipe_id)
    }

    pub fn is_subscribed(&self, author_id: Uuid) -> bool {
        self.followed.contains(&author_id)
    }
}

/// A single field-keyed validation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a recipe draft. Collects every violation instead of stopping at
/// the first; an empty result means the draft is writable.
///
/// Existence of the referenced tag and ingredient ids is checked separately
/// by the usecase (it needs repository access).
pub fn validate_recipe_draft(draft: &RecipeDraft) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if draft.name.trim().is_empty() {
        errors.push(FieldError::new("name", "must not be empty"));
    }
    if draft.name.chars().count() > MAX_NAME_LEN {
        errors.push(FieldError::new(
            "name",
            format!("must be at most {MAX_NAME_LEN} characters"),
        ));
    }
    if draft.text.trim().is_empty() {
        errors.push(FieldError::new("text", "must not be empty"));
    }
    if !(MIN_COOKING_TIME..=MAX_COOKING_TIME).contains(&draft.cooking_time) {
        errors.push(FieldError::new(
            "cooking_time",
            format!("must be between {MIN_COOKING_TIME} and {MAX_COOKING_TIME}"),
        ));
    }

    if draft.tag_ids.is_empty() {
        errors.push(FieldError::new("tags", "must not be empty"));
    }
    let mut seen_tags = HashSet::new();
    for tag_id in &draft.tag_ids {
        if !seen_tags.insert(*tag_id) {
            errors.push(FieldError::new("tags", format!("duplicate tag id {tag_id}")));
        }
    }

    if draft.ingredients.is_empty() {
        errors.push(FieldError::new("ingredients", "must not be empty"));
    }
    let mut seen_ingredients = HashSet::new();
    for line in &draft.ingredients {
        if !seen_ingredients.insert(line.ingredient_id) {
            errors.push(FieldError::new(
                "ingredients",
                format!("duplicate ingredient id {}", line.ingredient_id),
            ));
        }
        if !(MIN_INGREDIENT_AMOUNT..=MAX_INGREDIENT_AMOUNT).contains(&line.amount) {
            errors.push(FieldError::new(
                "ingredients",
                format!(
                    "amount for ingredient id {} must be between {} and {}",
                    line.ingredient_id, MIN_INGREDIENT_AMOUNT, MAX_INGREDIENT_AMOUNT
                ),
            ));
        }
    }

    errors
}

/// Validate a registration payload. Uniqueness of email and username is
/// checked by the usecase against the repository.
pub fn validate_user_draft(draft: &UserDraft) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if draft.email.trim().is_empty() {
        errors.push(FieldError::new("email", "must not be empty"));
    } else if !draft.email.contains('@') {
        errors.push(FieldError::new("email", "must contain '@'"));
    }
    if draft.email.chars().count() > MAX_EMAIL_LEN {
        errors.push(FieldError::new(
            "email",
            format!("must be at most {MAX_EMAIL_LEN} characters"),
        ));
    }

    if draft.username.trim().is_empty() {
        errors.push(FieldError::new("username", "must not be empty"));
    } else if !draft
        .username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        errors.push(FieldError::new("username", "contains invalid characters"));
    }
    if draft.username.chars().count() > MAX_USER_FIELD_LEN {
        errors.push(FieldError::new(
            "username",
            format!("must be at most {MAX_USER_FIELD_LEN} characters"),
        ));
    }

    for (field, value) in [
        ("first_name", &draft.first_name),
        ("last_name", &draft.last_name),
    ] {
        if value.trim().is_empty() {
            errors.push(FieldError::new(field, "must not be empty"));
        }
        if value.chars().count() > MAX_USER_FIELD_LEN {
            errors.push(FieldError::new(
                field,
                format!("must be at most {MAX_USER_FIELD_LEN} characters"),
            ));
        }
    }

    if draft.password.chars().count() < 8 {
        errors.push(FieldError::new(
            "password",
            "must be at least 8 characters",
        ));
    } else if draft.password.chars().all(|c| c.is_ascii_digit()) {
        errors.push(FieldError::new("password", "must not be entirely numeric"));
    }

    errors
}

/// Validate a tag color: `#rrggbb` or `#rgb`, hex digits only.
pub fn validate_color(color: &str) -> bool {
    let Some(hex) = color.strip_prefix('#') else {
        return false;
    };
    matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// Render the shopping list report: a header line, then one line per
/// aggregated ingredient group. Line order follows the input slice.
pub fn render_shopping_list(lines: &[ShoppingListLine]) -> String {
    let mut report = String::from("Список покупок:\n");
    for line in lines {
        report.push_str(&format!(
            "\n{} - {}, {}",
            line.name, line.total_amount, line.measurement_unit
        ));
    }
    report
}
