use crate::error::{TableError, TableResult};
use crate::table::ReferenceTable;

/// Reads yeast percentages from the yeast-type rows of a [`ReferenceTable`].
#[derive(Clone, Copy, Debug)]
pub struct YeastPercentageLookup<'t> {
    table: &'t ReferenceTable,
}

impl<'t> YeastPercentageLookup<'t> {
    pub fn new(table: &'t ReferenceTable) -> Self {
        YeastPercentageLookup { table }
    }

    /// Percentage of `yeast_type` for a duration column already chosen by
    /// [`crate::DurationResolver`].
    pub fn percentage(&self, yeast_type: &str, duration_column: usize) -> TableResult<f64> {
        let row = self.table.yeast_type_row(yeast_type)?;
        self.table
            .cell(row, duration_column)?
            .as_number()
            .ok_or(TableError::NotANumber {
                row,
                column: duration_column,
            })
    }
}
