use sea_orm::entity::prelude::*;

/// Recipe record. Tag and ingredient links live in `recipe_tags` /
/// `recipe_ingredients`; `image` is a nullable path into media storage.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "recipes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub author_id: Uuid,
    pub name: String,
    pub text: String,
    pub image: Option<String>,
    pub cooking_time: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AuthorId",
        to = "super::users::Column::Id"
    )]
    Author,
    #[sea_orm(has_many = "super::recipe_tags::Entity")]
    RecipeTags,
    #[sea_orm(has_many = "super::recipe_ingredients::Entity")]
    RecipeIngredients,
    #[sea_orm(has_many = "super::favorites::Entity")]
    Favorites,
    #[sea_orm(has_many = "super::cart_entries::Entity")]
    CartEntries,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::recipe_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecipeTags.def()
    }
}

impl Related<super::recipe_ingredients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecipeIngredients.def()
    }
}

impl Related<super::favorites::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Favorites.def()
    }
}

impl Related<super::cart_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CartEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
