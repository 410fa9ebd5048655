//! Yeast reference table and the lookups that turn a fermentation schedule
//! into a yeast percentage.
//!
//! The table is a grid of temperature rows by duration columns, plus one row
//! per yeast type holding the percentage for each duration column. It is
//! loaded once and shared read-only by every lookup.

mod error;
mod lookup;
mod parse;
mod resolver;
mod table;

pub use error::{TableError, TableResult};
pub use lookup::YeastPercentageLookup;
pub use parse::Cell;
pub use resolver::{DurationResolver, Leg};
pub use table::{ReferenceTable, TemperatureMatch, NEAPOLITAN_TABLE};
