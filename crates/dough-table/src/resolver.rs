use tracing::debug;

use crate::error::{TableError, TableResult};
use crate::table::{ReferenceTable, TemperatureMatch};

/// One fermentation phase: a temperature (°C) held for a number of hours.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Leg {
    pub temperature: f64,
    pub hours: f64,
}

impl Leg {
    pub fn new(temperature: f64, hours: f64) -> Self {
        Leg { temperature, hours }
    }
}

/// Maps fermentation legs onto duration columns of a [`ReferenceTable`].
#[derive(Clone, Copy, Debug)]
pub struct DurationResolver<'t> {
    table: &'t ReferenceTable,
}

impl<'t> DurationResolver<'t> {
    pub fn new(table: &'t ReferenceTable) -> Self {
        DurationResolver { table }
    }

    /// Column holding the duration closest to `duration` on the row of the
    /// table temperature nearest to `temperature`.
    ///
    /// When two durations are equally close the later column wins, which in
    /// an ascending row is the longer fermentation.
    pub fn closest_duration_column(&self, duration: f64, temperature: f64) -> TableResult<usize> {
        let row = self
            .table
            .temperature_row(temperature, TemperatureMatch::Nearest)?;
        let durations = self.table.durations_for_row(row);

        let mut closest: Option<(usize, f64)> = None;
        for (index, candidate) in durations.iter().enumerate() {
            let difference = (candidate - duration).abs();
            match closest {
                Some((_, best)) if difference > best => {}
                _ => closest = Some((index, difference)),
            }
        }
        let (index, _) = closest.ok_or(TableError::NoDurations { row })?;

        let first_column = self.table.layout().duration_columns.start;
        let column = index + self.table.first_non_empty_column(row, first_column)?;
        debug!(
            duration,
            temperature,
            row,
            selected = durations[index],
            column,
            "closest duration column"
        );
        Ok(column)
    }

    /// Total fridge-equivalent hours of a room leg followed by a fridge leg:
    /// the room leg's selected duration re-read on the fridge temperature row,
    /// plus the fridge hours.
    pub fn combined_duration(&self, room: Leg, fridge: Leg) -> TableResult<f64> {
        let room_column = self.closest_duration_column(room.hours, room.temperature)?;
        let fridge_row = self
            .table
            .temperature_row(fridge.temperature, TemperatureMatch::Nearest)?;
        let equivalent = self
            .table
            .cell(fridge_row, room_column)?
            .as_number()
            .ok_or(TableError::InvalidFermentation)?;

        let combined = equivalent + fridge.hours;
        debug!(
            room_column,
            fridge_row,
            equivalent,
            combined,
            "combined fermentation legs"
        );
        Ok(combined)
    }

    /// Column for a room leg followed by a fridge leg, searched at the fridge temperature.
    pub fn combined_duration_column(&self, room: Leg, fridge: Leg) -> TableResult<usize> {
        let combined = self.combined_duration(room, fridge)?;
        self.closest_duration_column(combined, fridge.temperature)
    }
}
