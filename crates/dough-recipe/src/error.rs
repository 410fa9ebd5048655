use dough_table::TableError;
use thiserror::Error;

use crate::proofing::LegKind;
use crate::recipe::RecipeField;

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("invalid configuration: {0} fermentation is not 0 while its temperature is 0")]
    MismatchFermentation(LegKind),

    #[error("missing temperature values: at least one temperature must be set for fermentation")]
    MissingTemperatures,

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("no calculator found for: {0}")]
    NoCalculatorFound(String),

    #[error("invalid recipe update '{0}'")]
    InvalidUpdate(String),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        field: RecipeField,
        reason: &'static str,
    },
}

pub type RecipeResult<T> = Result<T, RecipeError>;
