use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

use crate::calculator::DoughCalculator;
use crate::error::{RecipeError, RecipeResult};
use crate::proofing::{LegKind, LegSetting, ProofingMode};
use crate::RecipeInputs;

/// Derived values owned by a [`Recipe`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Derived {
    FlourWeight,
    YeastPercentage,
}

/// Settable recipe inputs.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RecipeField {
    SaltPercentage,
    OilPercentage,
    Hydration,
    BallWeight,
    NumberOfBalls,
    YeastType,
    RoomTemperature,
    RoomFermentation,
    FridgeTemperature,
    FridgeFermentation,
}

impl RecipeField {
    pub const ALL: &'static [RecipeField] = &[
        RecipeField::SaltPercentage,
        RecipeField::OilPercentage,
        RecipeField::Hydration,
        RecipeField::BallWeight,
        RecipeField::NumberOfBalls,
        RecipeField::YeastType,
        RecipeField::RoomTemperature,
        RecipeField::RoomFermentation,
        RecipeField::FridgeTemperature,
        RecipeField::FridgeFermentation,
    ];

    /// The derived value that must be recomputed when this field changes.
    pub fn derived(self) -> Derived {
        match self {
            RecipeField::SaltPercentage
            | RecipeField::OilPercentage
            | RecipeField::Hydration
            | RecipeField::BallWeight
            | RecipeField::NumberOfBalls => Derived::FlourWeight,
            RecipeField::YeastType
            | RecipeField::RoomTemperature
            | RecipeField::RoomFermentation
            | RecipeField::FridgeTemperature
            | RecipeField::FridgeFermentation => Derived::YeastPercentage,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecipeField::SaltPercentage => "salt_percentage",
            RecipeField::OilPercentage => "oil_percentage",
            RecipeField::Hydration => "hydration",
            RecipeField::BallWeight => "ball_weight",
            RecipeField::NumberOfBalls => "number_of_balls",
            RecipeField::YeastType => "yeast_type",
            RecipeField::RoomTemperature => "room_temperature",
            RecipeField::RoomFermentation => "room_fermentation",
            RecipeField::FridgeTemperature => "fridge_temperature",
            RecipeField::FridgeFermentation => "fridge_fermentation",
        }
    }
}

impl fmt::Display for RecipeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecipeField {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        RecipeField::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == value)
            .ok_or(())
    }
}

/// A new value for one recipe input.
#[derive(Clone, Debug, PartialEq)]
pub enum RecipeUpdate {
    SaltPercentage(f64),
    OilPercentage(f64),
    Hydration(f64),
    BallWeight(f64),
    NumberOfBalls(u32),
    YeastType(String),
    RoomTemperature(f64),
    RoomFermentation(u32),
    FridgeTemperature(f64),
    FridgeFermentation(u32),
}

impl RecipeUpdate {
    pub fn field(&self) -> RecipeField {
        match self {
            RecipeUpdate::SaltPercentage(_) => RecipeField::SaltPercentage,
            RecipeUpdate::OilPercentage(_) => RecipeField::OilPercentage,
            RecipeUpdate::Hydration(_) => RecipeField::Hydration,
            RecipeUpdate::BallWeight(_) => RecipeField::BallWeight,
            RecipeUpdate::NumberOfBalls(_) => RecipeField::NumberOfBalls,
            RecipeUpdate::YeastType(_) => RecipeField::YeastType,
            RecipeUpdate::RoomTemperature(_) => RecipeField::RoomTemperature,
            RecipeUpdate::RoomFermentation(_) => RecipeField::RoomFermentation,
            RecipeUpdate::FridgeTemperature(_) => RecipeField::FridgeTemperature,
            RecipeUpdate::FridgeFermentation(_) => RecipeField::FridgeFermentation,
        }
    }

    fn write_to(self, inputs: &mut RecipeInputs) {
        match self {
            RecipeUpdate::SaltPercentage(value) => inputs.salt_percentage = value,
            RecipeUpdate::OilPercentage(value) => inputs.oil_percentage = value,
            RecipeUpdate::Hydration(value) => inputs.hydration = value,
            RecipeUpdate::BallWeight(value) => inputs.ball_weight = value,
            RecipeUpdate::NumberOfBalls(value) => inputs.number_of_balls = value,
            RecipeUpdate::YeastType(value) => inputs.yeast_type = value,
            RecipeUpdate::RoomTemperature(value) => inputs.room_temperature = value,
            RecipeUpdate::RoomFermentation(value) => inputs.room_fermentation = value,
            RecipeUpdate::FridgeTemperature(value) => inputs.fridge_temperature = value,
            RecipeUpdate::FridgeFermentation(value) => inputs.fridge_fermentation = value,
        }
    }
}

/// Parses `field=value`, e.g. `hydration=62.5` or `yeast_type=IDY`.
impl FromStr for RecipeUpdate {
    type Err = RecipeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || RecipeError::InvalidUpdate(value.to_string());
        let (name, raw) = value.split_once('=').ok_or_else(invalid)?;
        let field: RecipeField = name.trim().parse().map_err(|_| invalid())?;
        let raw = raw.trim();

        let number = || raw.parse::<f64>().map_err(|_| invalid());
        let count = || raw.parse::<u32>().map_err(|_| invalid());

        Ok(match field {
            RecipeField::SaltPercentage => RecipeUpdate::SaltPercentage(number()?),
            RecipeField::OilPercentage => RecipeUpdate::OilPercentage(number()?),
            RecipeField::Hydration => RecipeUpdate::Hydration(number()?),
            RecipeField::BallWeight => RecipeUpdate::BallWeight(number()?),
            RecipeField::NumberOfBalls => RecipeUpdate::NumberOfBalls(count()?),
            RecipeField::YeastType if !raw.is_empty() => RecipeUpdate::YeastType(raw.to_string()),
            RecipeField::YeastType => return Err(invalid()),
            RecipeField::RoomTemperature => RecipeUpdate::RoomTemperature(number()?),
            RecipeField::RoomFermentation => RecipeUpdate::RoomFermentation(count()?),
            RecipeField::FridgeTemperature => RecipeUpdate::FridgeTemperature(number()?),
            RecipeField::FridgeFermentation => RecipeUpdate::FridgeFermentation(count()?),
        })
    }
}

/// Dough recipe whose derived values always match its inputs.
///
/// Every mutation goes through a setter that recomputes the affected derived
/// value before returning. If the recomputation fails the recipe is left
/// exactly as it was before the call.
#[derive(Clone, Debug)]
pub struct Recipe {
    inputs: RecipeInputs,
    calculator: Arc<dyn DoughCalculator>,
    flour_weight: f64,
    yeast_percentage: f64,
    recomputes: u64,
}

impl Recipe {
    pub fn new(calculator: Arc<dyn DoughCalculator>, inputs: RecipeInputs) -> RecipeResult<Self> {
        validate_inputs(&inputs)?;
        let flour_weight = calculator.flour_weight(&inputs);
        let yeast_percentage = calculator.yeast_percentage(&inputs)?;
        Ok(Recipe {
            inputs,
            calculator,
            flour_weight,
            yeast_percentage,
            recomputes: 2,
        })
    }

    pub fn inputs(&self) -> &RecipeInputs {
        &self.inputs
    }

    pub fn salt_percentage(&self) -> f64 {
        self.inputs.salt_percentage
    }

    pub fn oil_percentage(&self) -> f64 {
        self.inputs.oil_percentage
    }

    pub fn hydration(&self) -> f64 {
        self.inputs.hydration
    }

    pub fn ball_weight(&self) -> f64 {
        self.inputs.ball_weight
    }

    pub fn number_of_balls(&self) -> u32 {
        self.inputs.number_of_balls
    }

    pub fn yeast_type(&self) -> &str {
        &self.inputs.yeast_type
    }

    pub fn leg(&self, leg: LegKind) -> LegSetting {
        match leg {
            LegKind::Room => {
                LegSetting::new(self.inputs.room_temperature, self.inputs.room_fermentation)
            }
            LegKind::Fridge => LegSetting::new(
                self.inputs.fridge_temperature,
                self.inputs.fridge_fermentation,
            ),
        }
    }

    pub fn flour_weight(&self) -> f64 {
        self.flour_weight
    }

    pub fn yeast_percentage(&self) -> f64 {
        self.yeast_percentage
    }

    pub fn water_weight(&self) -> f64 {
        self.ingredient_weight(self.inputs.hydration)
    }

    pub fn salt_weight(&self) -> f64 {
        self.ingredient_weight(self.inputs.salt_percentage)
    }

    pub fn oil_weight(&self) -> f64 {
        self.ingredient_weight(self.inputs.oil_percentage)
    }

    pub fn yeast_weight(&self) -> f64 {
        self.ingredient_weight(self.yeast_percentage)
    }

    /// Number of derived-value computations run so far, including the two at
    /// construction and any that failed.
    pub fn recompute_count(&self) -> u64 {
        self.recomputes
    }

    pub fn proofing_mode(&self) -> ProofingMode {
        ProofingMode::from_hours(self.inputs.room_fermentation, self.inputs.fridge_fermentation)
    }

    /// Apply one update. Returns `Ok(false)` when the value was already set.
    pub fn apply(&mut self, update: RecipeUpdate) -> RecipeResult<bool> {
        let derived = update.field().derived();
        let mut candidate = self.inputs.clone();
        update.write_to(&mut candidate);
        self.commit(candidate, derived)
    }

    pub fn set_salt_percentage(&mut self, value: f64) -> RecipeResult<bool> {
        self.apply(RecipeUpdate::SaltPercentage(value))
    }

    pub fn set_oil_percentage(&mut self, value: f64) -> RecipeResult<bool> {
        self.apply(RecipeUpdate::OilPercentage(value))
    }

    pub fn set_hydration(&mut self, value: f64) -> RecipeResult<bool> {
        self.apply(RecipeUpdate::Hydration(value))
    }

    pub fn set_ball_weight(&mut self, value: f64) -> RecipeResult<bool> {
        self.apply(RecipeUpdate::BallWeight(value))
    }

    pub fn set_number_of_balls(&mut self, value: u32) -> RecipeResult<bool> {
        self.apply(RecipeUpdate::NumberOfBalls(value))
    }

    pub fn set_yeast_type(&mut self, value: impl Into<String>) -> RecipeResult<bool> {
        self.apply(RecipeUpdate::YeastType(value.into()))
    }

    pub fn set_room_temperature(&mut self, value: f64) -> RecipeResult<bool> {
        self.apply(RecipeUpdate::RoomTemperature(value))
    }

    pub fn set_room_fermentation(&mut self, hours: u32) -> RecipeResult<bool> {
        self.apply(RecipeUpdate::RoomFermentation(hours))
    }

    pub fn set_fridge_temperature(&mut self, value: f64) -> RecipeResult<bool> {
        self.apply(RecipeUpdate::FridgeTemperature(value))
    }

    pub fn set_fridge_fermentation(&mut self, hours: u32) -> RecipeResult<bool> {
        self.apply(RecipeUpdate::FridgeFermentation(hours))
    }

    /// Set both fields of one leg with a single recompute.
    pub fn set_leg(&mut self, leg: LegKind, setting: LegSetting) -> RecipeResult<bool> {
        let mut candidate = self.inputs.clone();
        write_leg(&mut candidate, leg, setting);
        self.commit(candidate, Derived::YeastPercentage)
    }

    /// Switch to `mode`, zeroing any leg the mode does not use and taking the
    /// used legs from `room` and `fridge`.
    pub fn apply_proofing_mode(
        &mut self,
        mode: ProofingMode,
        room: LegSetting,
        fridge: LegSetting,
    ) -> RecipeResult<bool> {
        let mut candidate = self.inputs.clone();
        for (leg, setting) in [(LegKind::Room, room), (LegKind::Fridge, fridge)] {
            let setting = if mode.uses(leg) {
                setting
            } else {
                LegSetting::OFF
            };
            write_leg(&mut candidate, leg, setting);
        }
        self.commit(candidate, Derived::YeastPercentage)
    }

    fn ingredient_weight(&self, percentage: f64) -> f64 {
        self.flour_weight * percentage / 100.0
    }

    fn commit(&mut self, candidate: RecipeInputs, derived: Derived) -> RecipeResult<bool> {
        if candidate == self.inputs {
            return Ok(false);
        }
        validate_inputs(&candidate)?;

        self.recomputes += 1;
        match derived {
            Derived::FlourWeight => {
                self.flour_weight = self.calculator.flour_weight(&candidate);
            }
            Derived::YeastPercentage => {
                self.yeast_percentage = self.calculator.yeast_percentage(&candidate)?;
            }
        }
        debug!(?derived, "recomputed recipe");
        self.inputs = candidate;
        Ok(true)
    }
}

/// Rejects values no calculator can work with: non-finite numbers, negative
/// percentages, and an empty or weightless batch.
fn validate_inputs(inputs: &RecipeInputs) -> RecipeResult<()> {
    let percentages = [
        (RecipeField::SaltPercentage, inputs.salt_percentage),
        (RecipeField::OilPercentage, inputs.oil_percentage),
        (RecipeField::Hydration, inputs.hydration),
    ];
    for (field, value) in percentages {
        if !value.is_finite() || value < 0.0 {
            return Err(invalid_value(field, "must be a non-negative number"));
        }
    }

    if !inputs.ball_weight.is_finite() || inputs.ball_weight <= 0.0 {
        return Err(invalid_value(
            RecipeField::BallWeight,
            "must be greater than 0",
        ));
    }
    if inputs.number_of_balls == 0 {
        return Err(invalid_value(
            RecipeField::NumberOfBalls,
            "must be greater than 0",
        ));
    }

    for (field, value) in [
        (RecipeField::RoomTemperature, inputs.room_temperature),
        (RecipeField::FridgeTemperature, inputs.fridge_temperature),
    ] {
        if !value.is_finite() {
            return Err(invalid_value(field, "must be a finite number"));
        }
    }
    Ok(())
}

fn invalid_value(field: RecipeField, reason: &'static str) -> RecipeError {
    RecipeError::InvalidValue { field, reason }
}

fn write_leg(inputs: &mut RecipeInputs, leg: LegKind, setting: LegSetting) {
    match leg {
        LegKind::Room => {
            inputs.room_temperature = setting.temperature;
            inputs.room_fermentation = setting.hours;
        }
        LegKind::Fridge => {
            inputs.fridge_temperature = setting.temperature;
            inputs.fridge_fermentation = setting.hours;
        }
    }
}
