use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CartEntries::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CartEntries::UserId).uuid().not_null())
                    .col(ColumnDef::new(CartEntries::RecipeId).integer().not_null())
                    .col(
                        ColumnDef::new(CartEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(CartEntries::UserId)
                            .col(CartEntries::RecipeId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CartEntries::Table, CartEntries::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CartEntries::Table, CartEntries::RecipeId)
                            .to(Recipes::Table, Recipes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CartEntries::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum CartEntries {
    Table,
    UserId,
    RecipeId,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Recipes {
    Table,
    Id,
}
