//! Dough recipe model with table-driven yeast calculation.
//!
//! A [`Recipe`] pairs user inputs with the [`DoughCalculator`] for its pizza
//! style and keeps the derived flour weight and yeast percentage in step with
//! every change.

mod calculator;
mod error;
mod proofing;
mod recipe;
mod registry;

pub use calculator::{DoughCalculator, NeapolitanCalculator};
pub use dough_config::BaseRecipe as RecipeInputs;
pub use error::{RecipeError, RecipeResult};
pub use proofing::{LegKind, LegSetting, ProofingMode};
pub use recipe::{Derived, Recipe, RecipeField, RecipeUpdate};
pub use registry::CalculatorRegistry;
