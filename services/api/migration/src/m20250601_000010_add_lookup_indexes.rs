use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    // Composite primary keys already index their leading column; these cover
    // the reverse lookups (by author, tag, ingredient, recipe).
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .table(Recipes::Table)
                    .col(Recipes::AuthorId)
                    .name("idx_recipes_author_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Follows::Table)
                    .col(Follows::AuthorId)
                    .name("idx_follows_author_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(RecipeTags::Table)
                    .col(RecipeTags::TagId)
                    .name("idx_recipe_tags_tag_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(RecipeIngredients::Table)
                    .col(RecipeIngredients::IngredientId)
                    .name("idx_recipe_ingredients_ingredient_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Favorites::Table)
                    .col(Favorites::RecipeId)
                    .name("idx_favorites_recipe_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(CartEntries::Table)
                    .col(CartEntries::RecipeId)
                    .name("idx_cart_entries_recipe_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_cart_entries_recipe_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_favorites_recipe_id").to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_recipe_ingredients_ingredient_id")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(Index::drop().name("idx_recipe_tags_tag_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_follows_author_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_recipes_author_id").to_owned())
            .await
    }
}

#[derive(Iden)]
enum Recipes {
    Table,
    AuthorId,
}

#[derive(Iden)]
enum Follows {
    Table,
    AuthorId,
}

#[derive(Iden)]
enum RecipeTags {
    Table,
    TagId,
}

#[derive(Iden)]
enum RecipeIngredients {
    Table,
    IngredientId,
}

#[derive(Iden)]
enum Favorites {
    Table,
    RecipeId,
}

#[derive(Iden)]
enum CartEntries {
    Table,
    RecipeId,
}
