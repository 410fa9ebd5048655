use std::fs;
use std::path::Path;

use dough_config::TableSettings;
use tracing::{debug, info, warn};

use crate::error::{TableError, TableResult};
use crate::parse::{parse_rows, Cell};

/// Yeast table shipped with the crate, laid out for [`TableSettings::default`].
pub const NEAPOLITAN_TABLE: &str = include_str!("../data/neapolitan_yeast_table.csv");

static EMPTY: Cell = Cell::Empty;

/// How [`ReferenceTable::temperature_row`] treats temperatures missing from the table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TemperatureMatch {
    /// The temperature must equal a table temperature at one-decimal precision.
    Exact,
    /// Fall back to the closest table temperature, first in row order on ties.
    Nearest,
}

/// Immutable grid of yeast percentages and fermentation durations.
#[derive(Clone, Debug)]
pub struct ReferenceTable {
    rows: Vec<Vec<Cell>>,
    layout: TableSettings,
    temperatures: Vec<IndexedTemperature>,
}

#[derive(Clone, Copy, Debug)]
struct IndexedTemperature {
    row: usize,
    value: f64,
}

impl ReferenceTable {
    /// Parse delimited text and index its temperature rows.
    pub fn parse(contents: &str, layout: TableSettings) -> TableResult<Self> {
        let rows = parse_rows(contents);
        let temperatures = index_temperatures(&rows, &layout)?;
        debug!(
            rows = rows.len(),
            temperatures = temperatures.len(),
            "parsed reference table"
        );
        Ok(ReferenceTable {
            rows,
            layout,
            temperatures,
        })
    }

    /// Read and parse the table stored at `path`.
    pub fn load(path: &Path, layout: TableSettings) -> TableResult<Self> {
        let contents = fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::parse(&contents, layout)?;
        info!("loaded yeast table from {}", path.display());
        Ok(table)
    }

    /// Load the table named by `settings.path`, or the embedded Neapolitan table.
    pub fn from_settings(settings: &TableSettings) -> TableResult<Self> {
        match &settings.path {
            Some(path) => Self::load(path, settings.clone()),
            None => Self::parse(NEAPOLITAN_TABLE, settings.clone()),
        }
    }

    pub fn layout(&self) -> &TableSettings {
        &self.layout
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Raw cell access. Columns past the end of a ragged row read as empty.
    pub fn cell(&self, row: usize, column: usize) -> TableResult<&Cell> {
        let cells = self.row(row)?;
        Ok(cells.get(column).unwrap_or(&EMPTY))
    }

    /// Indexed temperatures in row order.
    pub fn temperatures(&self) -> impl Iterator<Item = f64> + '_ {
        self.temperatures.iter().map(|entry| entry.value)
    }

    pub fn temperature_row(&self, temperature: f64, mode: TemperatureMatch) -> TableResult<usize> {
        let key = tenths(temperature);
        if let Some(entry) = self.temperatures.iter().find(|entry| tenths(entry.value) == key) {
            return Ok(entry.row);
        }

        match mode {
            TemperatureMatch::Exact => Err(TableError::TemperatureNotFound { temperature }),
            TemperatureMatch::Nearest => {
                let mut closest = self.temperatures[0];
                for entry in &self.temperatures[1..] {
                    if (entry.value - temperature).abs() < (closest.value - temperature).abs() {
                        closest = *entry;
                    }
                }
                debug!(
                    requested = temperature,
                    selected = closest.value,
                    row = closest.row,
                    "nearest temperature row"
                );
                Ok(closest.row)
            }
        }
    }

    /// Numeric cells of `row` inside the configured duration columns, in column order.
    pub fn durations_for_row(&self, row: usize) -> Vec<f64> {
        let Some(cells) = self.rows.get(row) else {
            return Vec::new();
        };
        self.layout
            .duration_columns
            .clone()
            .filter_map(|column| cells.get(column).and_then(Cell::as_number))
            .collect()
    }

    /// First non-empty column of `row` at or after `start`, or 0 when there is none.
    pub fn first_non_empty_column(&self, row: usize, start: usize) -> TableResult<usize> {
        let cells = self.row(row)?;
        Ok((start..cells.len())
            .find(|&column| !cells[column].is_empty())
            .unwrap_or(0))
    }

    pub fn yeast_types(&self) -> &[String] {
        &self.layout.yeast_types
    }

    pub fn yeast_type_row(&self, yeast_type: &str) -> TableResult<usize> {
        self.layout
            .yeast_types
            .iter()
            .position(|name| name == yeast_type)
            .map(|index| self.layout.first_yeast_row + index)
            .ok_or_else(|| TableError::UnknownYeastType {
                yeast_type: yeast_type.to_string(),
                known: self.layout.yeast_types.clone(),
            })
    }

    /// Unique whole-hour durations available at the temperature nearest to
    /// `temperature`, ascending.
    pub fn sorted_durations(&self, temperature: f64) -> TableResult<Vec<u32>> {
        let row = self.temperature_row(temperature, TemperatureMatch::Nearest)?;
        let mut hours: Vec<u32> = self
            .durations_for_row(row)
            .into_iter()
            .map(|duration| duration.trunc() as u32)
            .collect();
        hours.sort_unstable();
        hours.dedup();
        Ok(hours)
    }

    fn row(&self, row: usize) -> TableResult<&[Cell]> {
        self.rows
            .get(row)
            .map(Vec::as_slice)
            .ok_or(TableError::OutOfRange {
                row,
                rows: self.rows.len(),
            })
    }
}

fn tenths(value: f64) -> i64 {
    (value * 10.0).round() as i64
}

fn index_temperatures(
    rows: &[Vec<Cell>],
    layout: &TableSettings,
) -> TableResult<Vec<IndexedTemperature>> {
    let mut temperatures: Vec<IndexedTemperature> = Vec::new();

    for row in layout.temperature_rows.clone() {
        let Some(cells) = rows.get(row) else {
            break;
        };
        match cells.get(layout.temperature_column).unwrap_or(&EMPTY) {
            Cell::Empty => warn!(row, "skipping row without a temperature"),
            Cell::Number(value) => {
                if temperatures
                    .iter()
                    .any(|entry| tenths(entry.value) == tenths(*value))
                {
                    return Err(TableError::DuplicateTemperature {
                        temperature: *value,
                        row,
                    });
                }
                temperatures.push(IndexedTemperature { row, value: *value });
            }
            Cell::Text(text) => {
                return Err(TableError::Load {
                    line: row + 1,
                    message: format!("temperature cell '{text}' is not a number"),
                })
            }
        }
    }

    if temperatures.is_empty() {
        return Err(TableError::EmptyTemperatureIndex {
            start: layout.temperature_rows.start,
            end: layout.temperature_rows.end,
        });
    }
    Ok(temperatures)
}
