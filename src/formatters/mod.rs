pub mod json;
pub mod recipe_card;

pub use json::JsonFormatter;
pub use recipe_card::RecipeCardFormatter;
