//! High-level operations shared by dough front ends.

mod error;
mod snap;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use dough_config::Config;
use dough_format::{render_text, RecipeFormat, SavedRecipe};
use dough_recipe::{CalculatorRegistry, LegKind, LegSetting, Recipe, RecipeInputs};
use dough_table::ReferenceTable;
use dough_utils::{atomic_write, unique_dated_path};
use tracing::info;

pub use error::{OperationError, OperationResult};

/// Table, calculators and configuration wired together for one process.
#[derive(Clone, Debug)]
pub struct Operations {
    config: Config,
    table: Arc<ReferenceTable>,
    registry: CalculatorRegistry,
}

impl Operations {
    /// Load the reference table named by `config` and register the built-in
    /// calculators against it.
    pub fn new(config: Config) -> OperationResult<Self> {
        let table = Arc::new(ReferenceTable::from_settings(&config.table)?);
        let registry = CalculatorRegistry::with_builtin(Arc::clone(&table));
        Ok(Self {
            config,
            table,
            registry,
        })
    }

    /// Recipe built from the configured base recipe.
    pub fn default_recipe(&self) -> OperationResult<Recipe> {
        self.recipe_from_inputs(self.config.recipe.clone())
    }

    pub fn recipe_from_inputs(&self, inputs: RecipeInputs) -> OperationResult<Recipe> {
        let calculator = self.registry.get(&inputs.pizza_style)?;
        Ok(Recipe::new(calculator, inputs)?)
    }

    /// Read a saved recipe record and rebuild the recipe it describes.
    pub fn load_recipe(&self, path: &Path) -> OperationResult<Recipe> {
        let text = fs::read_to_string(path).map_err(|err| OperationError::io(path, err))?;
        let saved = SavedRecipe::from_json(&text).map_err(|source| OperationError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "loaded recipe");
        self.recipe_from_inputs(saved.base_recipe)
    }

    /// Write `recipe` as a dated JSON record in `dir`. Returns the new file.
    pub fn save_recipe(&self, recipe: &Recipe, dir: &Path) -> OperationResult<PathBuf> {
        self.save_recipe_on(recipe, dir, today())
    }

    pub fn save_recipe_on(
        &self,
        recipe: &Recipe,
        dir: &Path,
        date: NaiveDate,
    ) -> OperationResult<PathBuf> {
        let record = SavedRecipe::new(date, recipe.inputs().clone());
        let json = record.to_json().map_err(|source| OperationError::Json {
            path: dir.to_path_buf(),
            source,
        })?;
        write_dated(dir, date, RecipeFormat::Json, &json)
    }

    /// Write the human-readable rendering of `recipe` to a dated text file in
    /// `dir`. Returns the new file.
    pub fn export_recipe(&self, recipe: &Recipe, dir: &Path) -> OperationResult<PathBuf> {
        self.export_recipe_on(recipe, dir, today())
    }

    pub fn export_recipe_on(
        &self,
        recipe: &Recipe,
        dir: &Path,
        date: NaiveDate,
    ) -> OperationResult<PathBuf> {
        write_dated(dir, date, RecipeFormat::Text, &render_text(recipe))
    }

    /// Move a leg onto the table grid and apply it.
    ///
    /// The temperature becomes the nearest table temperature and the hours the
    /// nearest whole-hour duration listed at that temperature. A zero
    /// temperature or zero hours is applied unchanged.
    pub fn snap_leg(
        &self,
        recipe: &mut Recipe,
        leg: LegKind,
        temperature: f64,
        hours: u32,
    ) -> OperationResult<LegSetting> {
        let setting = snap::snap_to_grid(&self.table, temperature, hours)?;
        recipe.set_leg(leg, setting)?;
        Ok(setting)
    }

    pub fn temperatures(&self) -> Vec<f64> {
        self.table.temperatures().collect()
    }

    /// Whole-hour durations available at the table temperature nearest to
    /// `temperature`.
    pub fn durations(&self, temperature: f64) -> OperationResult<Vec<u32>> {
        Ok(self.table.sorted_durations(temperature)?)
    }

    pub fn yeast_types(&self) -> &[String] {
        self.table.yeast_types()
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn write_dated(
    dir: &Path,
    date: NaiveDate,
    format: RecipeFormat,
    contents: &str,
) -> OperationResult<PathBuf> {
    fs::create_dir_all(dir).map_err(|err| OperationError::io(dir, err))?;
    let path = unique_dated_path(dir, date, format.extension());
    atomic_write(&path, contents).map_err(|err| OperationError::io(&path, err))?;
    info!(path = %path.display(), "wrote recipe");
    Ok(path)
}
