pub mod error;
pub mod filter;
pub mod recipe;
pub mod registry;
pub mod shopping_list;

pub use error::Error;
pub use filter::{RecipeAttributes, RecipeFilters};
pub use recipe::{LineItemDraft, RecipeDraft};
pub use registry::IngredientSpec;
pub use shopping_list::{aggregate, render_text, CartLineItem, ShoppingListEntry};
