use sea_orm::entity::prelude::*;

/// Recipe tag. The `(name, slug, color)` triple is unique (enforced by the
/// migration); individual columns are not.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub color: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::recipe_tags::Entity")]
    RecipeTags,
}

impl Related<super::recipe_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecipeTags.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
