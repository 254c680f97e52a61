use ladle_api::domain::repository::RecipeRepository;
use ladle_api::error::ApiServiceError;
use ladle_api::usecase::cart::{
    AddCartEntryUseCase, DownloadShoppingListUseCase, RemoveCartEntryUseCase,
};
use ladle_api::usecase::favorite::{AddFavoriteUseCase, RemoveFavoriteUseCase};
use ladle_api::usecase::flags::LoadViewerFlagsUseCase;

use crate::helpers::{
    MockCartRepo, MockFavoriteRepo, MockFollowRepo, MockRecipeRepo, catalog_ingredients,
    catalog_tags, omelet_draft, pancake_draft, test_author, test_user,
};

// ── Favorites ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_flag_favorited_recipes_for_the_requester() {
    let viewer = test_user();
    let author = test_author();
    let recipes = MockRecipeRepo::new(vec![author.clone()], catalog_tags(), catalog_ingredients());
    let pancakes = recipes.create(author.id, &pancake_draft()).await.unwrap();
    let omelet = recipes.create(author.id, &omelet_draft()).await.unwrap();

    let favorites = MockFavoriteRepo::empty();
    let add = AddFavoriteUseCase {
        recipe_repo: recipes.clone(),
        favorite_repo: favorites.clone(),
    };
    let card = add.execute(viewer.id, pancakes).await.unwrap();
    assert_eq!(card.name, "Блины");

    let load = LoadViewerFlagsUseCase {
        favorites,
        cart: MockCartRepo::new(recipes.details_handle()),
        follows: MockFollowRepo::empty(),
    };
    let flags = load
        .execute(Some(viewer.id), &[pancakes, omelet], &[author.id])
        .await
        .unwrap();

    assert!(flags.is_favorited(pancakes));
    assert!(!flags.is_favorited(omelet));
    assert!(!flags.is_in_cart(pancakes));
    assert!(!flags.is_subscribed(author.id));
}

#[tokio::test]
async fn should_keep_single_favorite_row_when_adding_twice() {
    let viewer = test_user();
    let author = test_author();
    let recipes = MockRecipeRepo::new(vec![author.clone()], catalog_tags(), catalog_ingredients());
    let pancakes = recipes.create(author.id, &pancake_draft()).await.unwrap();

    let favorites = MockFavoriteRepo::empty();
    let pairs_handle = favorites.pairs_handle();

    let add = AddFavoriteUseCase {
        recipe_repo: recipes.clone(),
        favorite_repo: favorites.clone(),
    };
    add.execute(viewer.id, pancakes).await.unwrap();

    let again = AddFavoriteUseCase {
        recipe_repo: recipes,
        favorite_repo: favorites,
    };
    let result = again.execute(viewer.id, pancakes).await;

    assert!(
        matches!(result, Err(ApiServiceError::AlreadyFavorited)),
        "expected AlreadyFavorited, got {result:?}"
    );
    assert_eq!(pairs_handle.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_clear_flag_after_removing_favorite() {
    let viewer = test_user();
    let author = test_author();
    let recipes = MockRecipeRepo::new(vec![author.clone()], catalog_tags(), catalog_ingredients());
    let pancakes = recipes.create(author.id, &pancake_draft()).await.unwrap();

    let favorites = MockFavoriteRepo::empty();
    let add = AddFavoriteUseCase {
        recipe_repo: recipes.clone(),
        favorite_repo: favorites.clone(),
    };
    add.execute(viewer.id, pancakes).await.unwrap();

    let remove = RemoveFavoriteUseCase {
        recipe_repo: recipes.clone(),
        favorite_repo: favorites.clone(),
    };
    remove.execute(viewer.id, pancakes).await.unwrap();

    let load = LoadViewerFlagsUseCase {
        favorites,
        cart: MockCartRepo::new(recipes.details_handle()),
        follows: MockFollowRepo::empty(),
    };
    let flags = load
        .execute(Some(viewer.id), &[pancakes], &[])
        .await
        .unwrap();
    assert!(!flags.is_favorited(pancakes));
}

// ── Shopping cart ────────────────────────────────────────────────────────────

async fn shopping_list_after_adding(order: [i32; 2]) -> String {
    let viewer = test_user();
    let author = test_author();
    let recipes = MockRecipeRepo::new(vec![author.clone()], catalog_tags(), catalog_ingredients());
    recipes.create(author.id, &pancake_draft()).await.unwrap();
    recipes.create(author.id, &omelet_draft()).await.unwrap();

    let cart = MockCartRepo::new(recipes.details_handle());
    for recipe_id in order {
        let add = AddCartEntryUseCase {
            recipe_repo: recipes.clone(),
            cart_repo: cart.clone(),
        };
        add.execute(viewer.id, recipe_id).await.unwrap();
    }

    let download = DownloadShoppingListUseCase { cart_repo: cart };
    download.execute(viewer.id).await.unwrap()
}

#[tokio::test]
async fn should_aggregate_shopping_list_across_cart_recipes() {
    // Яйца appear in both recipes (2 + 3); the report sums them per
    // (name, unit) group, ordered by name.
    let text = shopping_list_after_adding([1, 2]).await;
    assert_eq!(
        text,
        "Список покупок:\n\nМолоко - 100, мл\n\nМука - 200, г\n\nЯйца - 5, шт."
    );
}

#[tokio::test]
async fn should_render_same_list_regardless_of_insertion_order() {
    let first = shopping_list_after_adding([1, 2]).await;
    let second = shopping_list_after_adding([2, 1]).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn should_keep_single_cart_row_when_adding_twice() {
    let viewer = test_user();
    let author = test_author();
    let recipes = MockRecipeRepo::new(vec![author.clone()], catalog_tags(), catalog_ingredients());
    let pancakes = recipes.create(author.id, &pancake_draft()).await.unwrap();

    let cart = MockCartRepo::new(recipes.details_handle());
    let pairs_handle = cart.pairs_handle();

    let add = AddCartEntryUseCase {
        recipe_repo: recipes.clone(),
        cart_repo: cart.clone(),
    };
    add.execute(viewer.id, pancakes).await.unwrap();

    let again = AddCartEntryUseCase {
        recipe_repo: recipes,
        cart_repo: cart,
    };
    let result = again.execute(viewer.id, pancakes).await;

    assert!(
        matches!(result, Err(ApiServiceError::AlreadyInCart)),
        "expected AlreadyInCart, got {result:?}"
    );
    assert_eq!(pairs_handle.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_render_header_only_after_cart_emptied() {
    let viewer = test_user();
    let author = test_author();
    let recipes = MockRecipeRepo::new(vec![author.clone()], catalog_tags(), catalog_ingredients());
    let pancakes = recipes.create(author.id, &pancake_draft()).await.unwrap();

    let cart = MockCartRepo::new(recipes.details_handle());
    let add = AddCartEntryUseCase {
        recipe_repo: recipes.clone(),
        cart_repo: cart.clone(),
    };
    add.execute(viewer.id, pancakes).await.unwrap();

    let remove = RemoveCartEntryUseCase {
        recipe_repo: recipes,
        cart_repo: cart.clone(),
    };
    remove.execute(viewer.id, pancakes).await.unwrap();

    let download = DownloadShoppingListUseCase { cart_repo: cart };
    let text = download.execute(viewer.id).await.unwrap();
    assert_eq!(text, "Список покупок:\n");
}
