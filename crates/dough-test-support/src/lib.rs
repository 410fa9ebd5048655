//! Shared test harness utilities for dough crates.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dough_config::{BaseRecipe, Config, TableSettings};
use dough_table::ReferenceTable;

/// Returns a baseline configuration for tests.
pub fn test_config() -> Config {
    Config::builtin()
}

/// The embedded reference table with the default layout.
pub fn test_table() -> Arc<ReferenceTable> {
    let table = ReferenceTable::from_settings(&TableSettings::default())
        .expect("embedded table parses");
    Arc::new(table)
}

/// Default inputs with ADY yeast and the given legs as (temperature, hours).
pub fn schedule(room: (f64, u32), fridge: (f64, u32)) -> BaseRecipe {
    BaseRecipe {
        yeast_type: "ADY".into(),
        room_temperature: room.0,
        room_fermentation: room.1,
        fridge_temperature: fridge.0,
        fridge_fermentation: fridge.1,
        ..BaseRecipe::default()
    }
}

/// Writes `.dough.toml` into `dir` and returns its path.
pub fn write_config(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join(".dough.toml");
    fs::write(&path, body).expect("write config");
    path
}
