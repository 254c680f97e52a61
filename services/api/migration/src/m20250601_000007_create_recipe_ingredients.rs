use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RecipeIngredients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RecipeIngredients::RecipeId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecipeIngredients::IngredientId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecipeIngredients::Amount)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .primary_key(
                        Index::create()
                            .col(RecipeIngredients::RecipeId)
                            .col(RecipeIngredients::IngredientId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(RecipeIngredients::Table, RecipeIngredients::RecipeId)
                            .to(Recipes::Table, Recipes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(RecipeIngredients::Table, RecipeIngredients::IngredientId)
                            .to(Ingredients::Table, Ingredients::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RecipeIngredients::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum RecipeIngredients {
    Table,
    RecipeId,
    IngredientId,
    Amount,
}

#[derive(Iden)]
enum Recipes {
    Table,
    Id,
}

#[derive(Iden)]
enum Ingredients {
    Table,
    Id,
}
