use dough_recipe::LegSetting;
use dough_table::{ReferenceTable, TableError, TableResult, TemperatureMatch};
use tracing::debug;

pub(crate) fn snap_to_grid(
    table: &ReferenceTable,
    temperature: f64,
    hours: u32,
) -> TableResult<LegSetting> {
    // A zeroed field is left alone so the leg can be switched off.
    if hours == 0 || temperature == 0.0 {
        return Ok(LegSetting::new(temperature, hours));
    }

    let row = table.temperature_row(temperature, TemperatureMatch::Nearest)?;
    let column = table.layout().temperature_column;
    let snapped_temperature = table
        .cell(row, column)?
        .as_number()
        .ok_or(TableError::NotANumber { row, column })?;

    let durations = table.sorted_durations(snapped_temperature)?;
    let snapped_hours = nearest_first(&durations, hours).ok_or(TableError::NoDurations { row })?;

    debug!(
        temperature,
        hours,
        snapped_temperature,
        snapped_hours,
        "snapped leg"
    );
    Ok(LegSetting::new(snapped_temperature, snapped_hours))
}

// Earliest candidate wins on ties.
fn nearest_first(candidates: &[u32], target: u32) -> Option<u32> {
    let mut best: Option<u32> = None;
    for &candidate in candidates {
        let closer = match best {
            None => true,
            Some(current) => candidate.abs_diff(target) < current.abs_diff(target),
        };
        if closer {
            best = Some(candidate);
        }
    }
    best
}
