use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, patch, post, put},
};
use tower_http::trace::TraceLayer;

use ladle_core::health::{db_ready, healthz};
use ladle_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    cart::{add_cart_entry, download_shopping_list, remove_cart_entry},
    favorite::{add_favorite, remove_favorite},
    ingredient::{get_ingredient, get_ingredients},
    recipe::{create_recipe, delete_recipe, get_recipe, get_recipes, update_recipe},
    subscription::{get_subscriptions, subscribe, unsubscribe},
    tag::{get_tag, get_tags},
    user::{create_user, get_me, get_user, get_users},
};
use crate::state::AppState;

/// Ready once the configured Postgres answers a ping.
async fn readyz(State(state): State<AppState>) -> StatusCode {
    db_ready(&state.db).await
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Users
        .route("/users", post(create_user))
        .route("/users", get(get_users))
        .route("/users/me", get(get_me))
        .route("/users/subscriptions", get(get_subscriptions))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}/subscribe", post(subscribe))
        .route("/users/{id}/subscribe", delete(unsubscribe))
        // Tags
        .route("/tags", get(get_tags))
        .route("/tags/{id}", get(get_tag))
        // Ingredients
        .route("/ingredients", get(get_ingredients))
        .route("/ingredients/{id}", get(get_ingredient))
        // Recipes
        .route("/recipes", get(get_recipes))
        .route("/recipes", post(create_recipe))
        .route("/recipes/download_shopping_cart", get(download_shopping_list))
        .route("/recipes/{id}", get(get_recipe))
        .route("/recipes/{id}", put(update_recipe))
        .route("/recipes/{id}", patch(update_recipe))
        .route("/recipes/{id}", delete(delete_recipe))
        // Favorites & shopping cart
        .route("/recipes/{id}/favorite", post(add_favorite))
        .route("/recipes/{id}/favorite", delete(remove_favorite))
        .route("/recipes/{id}/shopping_cart", post(add_cart_entry))
        .route("/recipes/{id}/shopping_cart", delete(remove_cart_entry))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
