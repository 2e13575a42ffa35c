pub mod create;
pub mod delete;
pub mod favorite;
pub mod get;
pub mod list;
pub mod shopping_cart;
mod store;
pub mod update;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

pub use store::RecipePayload;

/// Returns the router for /api/recipes endpoints (mounted at /api/recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_recipes).post(create::create_recipe))
        .route(
            "/{id}",
            get(get::get_recipe)
                .put(update::update_recipe)
                .delete(delete::delete_recipe),
        )
        .route(
            "/{id}/favorite",
            post(favorite::add_favorite).delete(favorite::remove_favorite),
        )
        .route(
            "/{id}/shopping-cart",
            post(shopping_cart::add_to_cart).delete(shopping_cart::remove_from_cart),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_recipe,
        list::list_recipes,
        get::get_recipe,
        update::update_recipe,
        delete::delete_recipe,
        favorite::add_favorite,
        favorite::remove_favorite,
        shopping_cart::add_to_cart,
        shopping_cart::remove_from_cart,
    ),
    components(schemas(
        store::RecipePayload,
        store::LineItemPayload,
        create::CreateRecipeResponse,
        update::UpdateRecipeResponse,
        list::ListRecipesResponse,
        list::RecipeSummary,
        list::PaginationMetadata,
        get::RecipeResponse,
        get::AuthorInfo,
        get::LineItemView,
        get::TagView,
        favorite::RecipeShort,
    ))
)]
pub struct ApiDoc;
