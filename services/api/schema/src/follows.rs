use sea_orm::entity::prelude::*;

/// Subscription of one user (the subscriber) to another user's recipes.
///
/// Both columns reference `users`, so `Related<users::Entity>` would be
/// ambiguous — join via `Relation::Subscriber.def()` / `Relation::Author.def()`
/// explicitly where needed.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "follows")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub subscriber_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub author_id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::SubscriberId",
        to = "super::users::Column::Id"
    )]
    Subscriber,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AuthorId",
        to = "super::users::Column::Id"
    )]
    Author,
}

impl ActiveModelBehavior for ActiveModel {}
