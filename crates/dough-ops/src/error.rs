use std::io;
use std::path::PathBuf;

use dough_config::ConfigError;
use dough_recipe::RecipeError;
use dough_table::TableError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Recipe(#[from] RecipeError),

    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid recipe file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl OperationError {
    /// Whether the failure comes from the recipe inputs rather than the
    /// environment. Front ends report these to the user as input errors.
    pub fn is_recipe_error(&self) -> bool {
        matches!(self, Self::Recipe(_) | Self::Table(_))
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type OperationResult<T> = Result<T, OperationError>;
