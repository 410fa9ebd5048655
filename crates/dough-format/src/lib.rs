//! Output formatters for dough recipes.

mod record;
mod text;

use dough_recipe::Recipe;
use serde::Serialize;

pub use record::{to_pretty_json, SavedRecipe, DATE_FORMAT};
pub use text::{format_yeast_weight, render_text};

/// Output flavour for [`render_recipe`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RecipeFormat {
    Text,
    Json,
}

impl RecipeFormat {
    /// File extension used when the rendering is written to disk.
    pub fn extension(self) -> &'static str {
        match self {
            RecipeFormat::Text => "txt",
            RecipeFormat::Json => "json",
        }
    }
}

/// Render `recipe` in the requested format. Text output has no trailing newline.
pub fn render_recipe(recipe: &Recipe, format: RecipeFormat) -> serde_json::Result<String> {
    match format {
        RecipeFormat::Text => Ok(render_text(recipe)),
        RecipeFormat::Json => to_pretty_json(&RecipeReport::from_recipe(recipe)),
    }
}

/// Inputs and every derived value of a recipe.
#[derive(Clone, Debug, Serialize)]
pub struct RecipeReport<'a> {
    pub recipe: &'a dough_recipe::RecipeInputs,
    pub proofing_mode: &'static str,
    pub yeast_percentage: f64,
    pub weights: Weights,
}

#[derive(Clone, Debug, Serialize)]
pub struct Weights {
    pub flour: f64,
    pub water: f64,
    pub salt: f64,
    pub oil: f64,
    pub yeast: f64,
}

impl<'a> RecipeReport<'a> {
    pub fn from_recipe(recipe: &'a Recipe) -> Self {
        RecipeReport {
            recipe: recipe.inputs(),
            proofing_mode: recipe.proofing_mode().label(),
            yeast_percentage: recipe.yeast_percentage(),
            weights: Weights {
                flour: recipe.flour_weight(),
                water: recipe.water_weight(),
                salt: recipe.salt_weight(),
                oil: recipe.oil_weight(),
                yeast: recipe.yeast_weight(),
            },
        }
    }
}
