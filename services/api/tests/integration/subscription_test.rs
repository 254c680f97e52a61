use ladle_api::domain::repository::RecipeRepository;
use ladle_api::domain::types::RecipeDraft;
use ladle_api::error::ApiServiceError;
use ladle_api::usecase::subscription::{
    GetSubscriptionsUseCase, SubscribeUseCase, UnsubscribeUseCase,
};
use ladle_domain::pagination::PageRequest;

use crate::helpers::{
    MockFollowRepo, MockRecipeRepo, MockUserRepo, catalog_ingredients, catalog_tags, omelet_draft,
    pancake_draft, test_author, test_user,
};

#[tokio::test]
async fn should_subscribe_list_and_unsubscribe() {
    let subscriber = test_user();
    let author = test_author();

    let users = MockUserRepo::new(vec![subscriber.clone(), author.clone()]);
    let follows = MockFollowRepo::new(vec![], vec![author.clone()]);
    let recipes = MockRecipeRepo::new(vec![author.clone()], catalog_tags(), catalog_ingredients());
    recipes.create(author.id, &pancake_draft()).await.unwrap();

    let subscribe = SubscribeUseCase {
        user_repo: users.clone(),
        follow_repo: follows.clone(),
        recipe_repo: recipes.clone(),
    };
    let preview = subscribe
        .execute(subscriber.id, author.id, None)
        .await
        .unwrap();
    assert_eq!(preview.user.id, author.id);
    assert_eq!(preview.recipes_count, 1);
    assert_eq!(preview.recipes.len(), 1);
    assert_eq!(preview.recipes[0].name, "Блины");

    let list = GetSubscriptionsUseCase {
        follow_repo: follows.clone(),
        recipe_repo: recipes.clone(),
    };
    let page = list
        .execute(subscriber.id, PageRequest::default(), None)
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].user.username, "bob");

    let unsubscribe = UnsubscribeUseCase {
        user_repo: users,
        follow_repo: follows.clone(),
    };
    unsubscribe.execute(subscriber.id, author.id).await.unwrap();

    let list = GetSubscriptionsUseCase {
        follow_repo: follows,
        recipe_repo: recipes,
    };
    let page = list
        .execute(subscriber.id, PageRequest::default(), None)
        .await
        .unwrap();
    assert!(page.is_empty());
}

#[tokio::test]
async fn should_keep_single_follow_row_when_subscribing_twice() {
    let subscriber = test_user();
    let author = test_author();

    let users = MockUserRepo::new(vec![subscriber.clone(), author.clone()]);
    let follows = MockFollowRepo::new(vec![], vec![author.clone()]);
    let follows_handle = follows.follows_handle();
    let recipes = MockRecipeRepo::new(vec![author.clone()], catalog_tags(), catalog_ingredients());

    let subscribe = SubscribeUseCase {
        user_repo: users.clone(),
        follow_repo: follows.clone(),
        recipe_repo: recipes.clone(),
    };
    subscribe
        .execute(subscriber.id, author.id, None)
        .await
        .unwrap();

    let again = SubscribeUseCase {
        user_repo: users,
        follow_repo: follows,
        recipe_repo: recipes,
    };
    let result = again.execute(subscriber.id, author.id, None).await;

    assert!(
        matches!(result, Err(ApiServiceError::AlreadyFollowing)),
        "expected AlreadyFollowing, got {result:?}"
    );
    assert_eq!(follows_handle.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_truncate_recipe_previews_to_recipes_limit() {
    let subscriber = test_user();
    let author = test_author();

    let users = MockUserRepo::new(vec![subscriber.clone(), author.clone()]);
    let follows = MockFollowRepo::new(vec![], vec![author.clone()]);
    let recipes = MockRecipeRepo::new(vec![author.clone()], catalog_tags(), catalog_ingredients());
    recipes.create(author.id, &pancake_draft()).await.unwrap();
    recipes.create(author.id, &omelet_draft()).await.unwrap();
    recipes
        .create(
            author.id,
            &RecipeDraft {
                name: "Сырники".to_owned(),
                ..pancake_draft()
            },
        )
        .await
        .unwrap();

    let subscribe = SubscribeUseCase {
        user_repo: users,
        follow_repo: follows,
        recipe_repo: recipes,
    };
    let preview = subscribe
        .execute(subscriber.id, author.id, Some(2))
        .await
        .unwrap();

    // Full count, but only the two newest previews.
    assert_eq!(preview.recipes_count, 3);
    let names: Vec<&str> = preview.recipes.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Сырники", "Омлет"]);
}
