use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use axum::extract::{Query, RawQuery, State};
use axum::Json;
use chrono::{DateTime, Utc};
use diesel::pg::Pg;
use diesel::prelude::*;
use potluck_core::RecipeFilters;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::api::{ApiError, ErrorResponse};
use crate::auth::MaybeUser;
use crate::db::{get_conn, DbPool};
use crate::models::Recipe;
use crate::schema::{favorites, recipe_tags, recipes, shopping_cart, tags, users};

use super::get::AuthorInfo;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListRecipesParams {
    /// Number of items to return (default: 20, max: 100)
    pub limit: Option<i64>,
    /// Number of items to skip (default: 0)
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginationMetadata {
    /// Total number of matching recipes
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeSummary {
    pub id: Uuid,
    pub author: AuthorInfo,
    pub title: String,
    pub image: String,
    pub cooking_time_minutes: i32,
    pub created_at: DateTime<Utc>,
    /// Tag slugs
    pub tags: Vec<String>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListRecipesResponse {
    pub recipes: Vec<RecipeSummary>,
    pub pagination: PaginationMetadata,
}

/// Applies the recognized filters as AND-composed predicates. Membership
/// filters (tags, favorites, cart) become semi-joins on recipe id, so a
/// recipe carrying several matching tags still appears once.
fn filtered_recipes(
    filters: &RecipeFilters,
    viewer: Option<Uuid>,
) -> recipes::BoxedQuery<'static, Pg> {
    let mut query = recipes::table.into_boxed();

    if let Some(author) = filters.author {
        query = query.filter(recipes::author_id.eq(author));
    }

    if !filters.tags.is_empty() {
        // OR across the requested slugs
        let tagged = recipe_tags::table
            .inner_join(tags::table)
            .filter(tags::slug.eq_any(filters.tags.clone()))
            .select(recipe_tags::recipe_id);
        query = query.filter(recipes::id.eq_any(tagged));
    }

    // The handler rejects viewer-scoped filters for anonymous requests, so
    // a viewer is always present when either branch below is active.
    if filters.only_favorited {
        if let Some(viewer) = viewer {
            let favorited = favorites::table
                .filter(favorites::user_id.eq(viewer))
                .select(favorites::recipe_id);
            query = query.filter(recipes::id.eq_any(favorited));
        }
    }

    if filters.only_in_shopping_cart {
        if let Some(viewer) = viewer {
            let in_cart = shopping_cart::table
                .filter(shopping_cart::user_id.eq(viewer))
                .select(shopping_cart::recipe_id);
            query = query.filter(recipes::id.eq_any(in_cart));
        }
    }

    query
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(
        ListRecipesParams,
        ("author" = Option<Uuid>, Query, description = "Restrict to recipes by this author"),
        ("tags" = Option<Vec<String>>, Query, description = "Restrict to recipes carrying at least one of these tag slugs (repeatable)"),
        ("is_favorited" = Option<String>, Query, description = "1/true restricts to the viewer's favorites"),
        ("is_in_shopping_cart" = Option<String>, Query, description = "1/true restricts to the viewer's shopping cart"),
    ),
    responses(
        (status = 200, description = "Filtered recipe list, newest first", body = ListRecipesResponse),
        (status = 400, description = "Invalid filter value", body = ErrorResponse),
        (status = 401, description = "Invalid or expired token", body = ErrorResponse)
    )
)]
pub async fn list_recipes(
    MaybeUser(viewer): MaybeUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ListRecipesParams>,
    RawQuery(raw): RawQuery,
) -> Result<Json<ListRecipesResponse>, ApiError> {
    let limit = params.limit.unwrap_or(20).clamp(1, 100);
    let offset = params.offset.unwrap_or(0).max(0);

    // Unrecognized query keys (including limit/offset themselves) are
    // ignored by the filter parser.
    let filters = RecipeFilters::from_query(raw.as_deref().unwrap_or(""))?;

    let viewer_id = viewer.as_ref().map(|user| user.id);
    if filters.requires_viewer() && viewer_id.is_none() {
        return Err(potluck_core::Error::validation(
            "is_favorited and is_in_shopping_cart filters require authentication",
        )
        .into());
    }

    let mut conn = get_conn(&pool)?;

    let total: i64 = filtered_recipes(&filters, viewer_id)
        .count()
        .get_result(&mut conn)?;

    let page: Vec<Recipe> = filtered_recipes(&filters, viewer_id)
        .order((recipes::created_at.desc(), recipes::id.asc()))
        .limit(limit)
        .offset(offset)
        .select(Recipe::as_select())
        .load(&mut conn)?;

    let recipe_ids: Vec<Uuid> = page.iter().map(|recipe| recipe.id).collect();
    let author_ids: Vec<Uuid> = page.iter().map(|recipe| recipe.author_id).collect();

    let authors: HashMap<Uuid, String> = users::table
        .filter(users::id.eq_any(&author_ids))
        .select((users::id, users::username))
        .load::<(Uuid, String)>(&mut conn)?
        .into_iter()
        .collect();

    let mut tags_by_recipe: HashMap<Uuid, Vec<String>> = HashMap::new();
    let tag_rows: Vec<(Uuid, String)> = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(&recipe_ids))
        .order(tags::slug.asc())
        .select((recipe_tags::recipe_id, tags::slug))
        .load(&mut conn)?;
    for (recipe_id, slug) in tag_rows {
        tags_by_recipe.entry(recipe_id).or_default().push(slug);
    }

    let favorited: HashSet<Uuid> = match viewer_id {
        Some(viewer) => favorites::table
            .filter(favorites::user_id.eq(viewer))
            .filter(favorites::recipe_id.eq_any(&recipe_ids))
            .select(favorites::recipe_id)
            .load::<Uuid>(&mut conn)?
            .into_iter()
            .collect(),
        None => HashSet::new(),
    };

    let in_cart: HashSet<Uuid> = match viewer_id {
        Some(viewer) => shopping_cart::table
            .filter(shopping_cart::user_id.eq(viewer))
            .filter(shopping_cart::recipe_id.eq_any(&recipe_ids))
            .select(shopping_cart::recipe_id)
            .load::<Uuid>(&mut conn)?
            .into_iter()
            .collect(),
        None => HashSet::new(),
    };

    let recipes = page
        .into_iter()
        .map(|recipe| RecipeSummary {
            id: recipe.id,
            author: AuthorInfo {
                id: recipe.author_id,
                username: authors.get(&recipe.author_id).cloned().unwrap_or_default(),
            },
            title: recipe.title,
            image: recipe.image,
            cooking_time_minutes: recipe.cooking_time_minutes,
            created_at: recipe.created_at,
            tags: tags_by_recipe.remove(&recipe.id).unwrap_or_default(),
            is_favorited: favorited.contains(&recipe.id),
            is_in_shopping_cart: in_cart.contains(&recipe.id),
        })
        .collect();

    Ok(Json(ListRecipesResponse {
        recipes,
        pagination: PaginationMetadata {
            total,
            limit,
            offset,
        },
    }))
}
