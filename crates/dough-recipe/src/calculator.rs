use std::fmt;
use std::sync::Arc;

use dough_config::DEFAULT_PIZZA_STYLE;
use dough_table::{DurationResolver, Leg, ReferenceTable, YeastPercentageLookup};
use tracing::debug;

use crate::error::{RecipeError, RecipeResult};
use crate::proofing::LegKind;
use crate::RecipeInputs;

/// Style-specific formulas behind a [`crate::Recipe`].
pub trait DoughCalculator: fmt::Debug + Send + Sync {
    /// Pizza style this calculator serves.
    fn style(&self) -> &str;

    /// Flour needed so that flour plus every baker's-percentage ingredient
    /// adds up to the total dough mass.
    fn flour_weight(&self, inputs: &RecipeInputs) -> f64 {
        let total_percentage =
            1.0 + (inputs.hydration + inputs.oil_percentage + inputs.salt_percentage) / 100.0;
        f64::from(inputs.number_of_balls) * inputs.ball_weight / total_percentage
    }

    fn yeast_percentage(&self, inputs: &RecipeInputs) -> RecipeResult<f64>;
}

/// Table-driven yeast calculation for Neapolitan-style dough.
#[derive(Clone, Debug)]
pub struct NeapolitanCalculator {
    table: Arc<ReferenceTable>,
}

impl NeapolitanCalculator {
    pub fn new(table: Arc<ReferenceTable>) -> Self {
        NeapolitanCalculator { table }
    }
}

impl DoughCalculator for NeapolitanCalculator {
    fn style(&self) -> &str {
        DEFAULT_PIZZA_STYLE
    }

    fn yeast_percentage(&self, inputs: &RecipeInputs) -> RecipeResult<f64> {
        validate_fermentation(inputs)?;

        let resolver = DurationResolver::new(&self.table);
        let room = Leg::new(inputs.room_temperature, f64::from(inputs.room_fermentation));
        let fridge = Leg::new(
            inputs.fridge_temperature,
            f64::from(inputs.fridge_fermentation),
        );

        let column = if inputs.room_fermentation == 0 {
            resolver.closest_duration_column(fridge.hours, fridge.temperature)?
        } else if inputs.fridge_fermentation == 0 {
            resolver.closest_duration_column(room.hours, room.temperature)?
        } else {
            resolver.combined_duration_column(room, fridge)?
        };

        let percentage =
            YeastPercentageLookup::new(&self.table).percentage(&inputs.yeast_type, column)?;
        debug!(
            yeast_type = %inputs.yeast_type,
            column,
            percentage,
            "yeast percentage"
        );
        Ok(percentage)
    }
}

fn validate_fermentation(inputs: &RecipeInputs) -> RecipeResult<()> {
    if inputs.room_temperature == 0.0 && inputs.room_fermentation != 0 {
        Err(RecipeError::MismatchFermentation(LegKind::Room))
    } else if inputs.fridge_temperature == 0.0 && inputs.fridge_fermentation != 0 {
        Err(RecipeError::MismatchFermentation(LegKind::Fridge))
    } else if inputs.room_temperature == 0.0 && inputs.fridge_temperature == 0.0 {
        Err(RecipeError::MissingTemperatures)
    } else {
        Ok(())
    }
}
