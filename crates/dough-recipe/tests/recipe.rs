use dough_config::BaseRecipe;
use dough_recipe::{
    CalculatorRegistry, LegKind, LegSetting, ProofingMode, Recipe, RecipeError, RecipeField,
    RecipeInputs, RecipeUpdate,
};
use dough_table::TableError;
use dough_test_support::{schedule, test_table};
use pretty_assertions::assert_eq;

fn recipe(inputs: RecipeInputs) -> Recipe {
    let registry = CalculatorRegistry::with_builtin(test_table());
    let calculator = registry.get(&inputs.pizza_style).expect("builtin style");
    Recipe::new(calculator, inputs).expect("valid recipe")
}

#[test]
fn default_recipe_combines_both_legs() {
    let recipe = recipe(BaseRecipe::default());
    assert_eq!(recipe.yeast_type(), "IDY");
    assert_eq!(recipe.yeast_percentage(), 0.15);
    assert_eq!(recipe.proofing_mode(), ProofingMode::Both);
    assert_eq!(recipe.recompute_count(), 2);
}

#[test]
fn ingredient_weights_follow_flour() {
    let recipe = recipe(BaseRecipe {
        hydration: 65.0,
        oil_percentage: 2.0,
        salt_percentage: 2.5,
        ball_weight: 250.0,
        number_of_balls: 4,
        ..BaseRecipe::default()
    });

    assert_eq!(format!("{:.2}", recipe.flour_weight()), "589.97");
    assert_eq!(format!("{:.2}", recipe.water_weight()), "383.48");
    assert_eq!(format!("{:.2}", recipe.salt_weight()), "14.75");
    assert_eq!(format!("{:.2}", recipe.oil_weight()), "11.80");
    assert_eq!(format!("{:.3}", recipe.yeast_weight()), "0.885");

    let total = recipe.flour_weight()
        + recipe.water_weight()
        + recipe.salt_weight()
        + recipe.oil_weight();
    assert!((total - 1000.0).abs() < 1e-9);
}

#[test]
fn setting_an_unchanged_value_skips_recompute() {
    let mut recipe = recipe(BaseRecipe::default());
    let room = recipe.leg(LegKind::Room);
    let fridge = recipe.leg(LegKind::Fridge);
    let unchanged = vec![
        RecipeUpdate::SaltPercentage(recipe.salt_percentage()),
        RecipeUpdate::OilPercentage(recipe.oil_percentage()),
        RecipeUpdate::Hydration(recipe.hydration()),
        RecipeUpdate::BallWeight(recipe.ball_weight()),
        RecipeUpdate::NumberOfBalls(recipe.number_of_balls()),
        RecipeUpdate::YeastType(recipe.yeast_type().to_string()),
        RecipeUpdate::RoomTemperature(room.temperature),
        RecipeUpdate::RoomFermentation(room.hours),
        RecipeUpdate::FridgeTemperature(fridge.temperature),
        RecipeUpdate::FridgeFermentation(fridge.hours),
    ];
    let fields: Vec<RecipeField> = unchanged.iter().map(RecipeUpdate::field).collect();
    assert_eq!(fields, RecipeField::ALL);

    for update in unchanged {
        let field = update.field();
        assert!(!recipe.apply(update).unwrap(), "{field}");
    }
    assert!(!recipe.set_leg(LegKind::Room, room).unwrap());
    assert!(!recipe.set_leg(LegKind::Fridge, fridge).unwrap());
    assert!(!recipe
        .apply_proofing_mode(ProofingMode::Both, room, fridge)
        .unwrap());

    assert_eq!(recipe.recompute_count(), 2);
}

#[test]
fn out_of_range_values_are_rejected_without_recompute() {
    let mut recipe = recipe(schedule((20.0, 6), (0.0, 0)));
    let before = recipe.inputs().clone();
    let cases = [
        (RecipeUpdate::RoomTemperature(f64::NAN), RecipeField::RoomTemperature),
        (RecipeUpdate::FridgeTemperature(f64::INFINITY), RecipeField::FridgeTemperature),
        (RecipeUpdate::Hydration(f64::INFINITY), RecipeField::Hydration),
        (RecipeUpdate::Hydration(f64::NAN), RecipeField::Hydration),
        (RecipeUpdate::SaltPercentage(-0.5), RecipeField::SaltPercentage),
        (RecipeUpdate::OilPercentage(-1.0), RecipeField::OilPercentage),
        (RecipeUpdate::BallWeight(0.0), RecipeField::BallWeight),
        (RecipeUpdate::BallWeight(f64::NEG_INFINITY), RecipeField::BallWeight),
        (RecipeUpdate::NumberOfBalls(0), RecipeField::NumberOfBalls),
    ];

    for (update, expected) in cases {
        let err = recipe.apply(update.clone()).unwrap_err();
        assert!(
            matches!(err, RecipeError::InvalidValue { field, .. } if field == expected),
            "{update:?} gave {err}"
        );
    }

    assert_eq!(recipe.inputs(), &before);
    assert_eq!(recipe.yeast_percentage(), 0.3);
    assert_eq!(recipe.recompute_count(), 2);
}

#[test]
fn repeated_nan_is_rejected_every_time() {
    let mut recipe = recipe(BaseRecipe::default());
    let update: RecipeUpdate = "hydration=NaN".parse().unwrap();
    for _ in 0..2 {
        assert!(matches!(
            recipe.apply(update.clone()),
            Err(RecipeError::InvalidValue {
                field: RecipeField::Hydration,
                ..
            })
        ));
    }
    assert_eq!(recipe.recompute_count(), 2);
}

#[test]
fn invalid_inputs_are_rejected_at_construction() {
    let registry = CalculatorRegistry::with_builtin(test_table());
    let calculator = registry.get("Neo-Neapolitan").unwrap();
    let inputs = RecipeInputs {
        number_of_balls: 0,
        ..RecipeInputs::default()
    };
    let err = Recipe::new(calculator, inputs).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid value for number_of_balls: must be greater than 0"
    );
}

#[test]
fn each_setter_recomputes_only_its_derived_value() {
    let mut recipe = recipe(BaseRecipe::default());
    let yeast = recipe.yeast_percentage();
    let flour = recipe.flour_weight();

    assert!(recipe.set_hydration(70.0).unwrap());
    assert!(recipe.flour_weight() < flour);
    assert_eq!(recipe.yeast_percentage(), yeast);

    let flour = recipe.flour_weight();
    assert!(recipe.set_yeast_type("CY").unwrap());
    assert_eq!(recipe.flour_weight(), flour);
    assert_eq!(recipe.yeast_percentage(), 0.6);
    assert_eq!(recipe.recompute_count(), 4);
}

#[test]
fn failed_update_leaves_recipe_untouched() {
    let mut recipe = recipe(BaseRecipe::default());
    let before = recipe.inputs().clone();
    let yeast = recipe.yeast_percentage();

    let err = recipe.set_room_temperature(0.0).unwrap_err();
    assert!(matches!(err, RecipeError::MismatchFermentation(LegKind::Room)));
    assert_eq!(recipe.inputs(), &before);
    assert_eq!(recipe.yeast_percentage(), yeast);

    let err = recipe.set_yeast_type("Sourdough").unwrap_err();
    assert!(matches!(
        err,
        RecipeError::Table(TableError::UnknownYeastType { .. })
    ));
    assert_eq!(recipe.inputs(), &before);
    assert_eq!(recipe.recompute_count(), 4);
}

#[test]
fn room_leg_without_temperature_is_rejected_at_construction() {
    let registry = CalculatorRegistry::with_builtin(test_table());
    let calculator = registry.get("Neo-Neapolitan").unwrap();
    let err = Recipe::new(calculator, schedule((0.0, 6), (4.0, 8))).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid configuration: Room fermentation is not 0 while its temperature is 0"
    );
}

#[test]
fn proofing_mode_zeroes_the_unused_leg() {
    let mut recipe = recipe(BaseRecipe::default());

    recipe
        .apply_proofing_mode(
            ProofingMode::ColdOnly,
            LegSetting::new(20.0, 4),
            LegSetting::new(4.0, 8),
        )
        .unwrap();
    assert_eq!(recipe.proofing_mode(), ProofingMode::ColdOnly);
    assert_eq!(recipe.leg(LegKind::Room), LegSetting::OFF);
    assert_eq!(recipe.yeast_percentage(), 0.3);

    recipe
        .apply_proofing_mode(
            ProofingMode::RoomOnly,
            LegSetting::new(20.0, 6),
            LegSetting::new(4.0, 8),
        )
        .unwrap();
    assert_eq!(recipe.proofing_mode(), ProofingMode::RoomOnly);
    assert_eq!(recipe.leg(LegKind::Fridge), LegSetting::OFF);
    assert_eq!(recipe.yeast_percentage(), 0.225);
}

#[test]
fn set_leg_updates_both_fields_at_once() {
    let mut recipe = recipe(schedule((20.0, 6), (0.0, 0)));
    assert_eq!(recipe.yeast_percentage(), 0.3);

    // Setting hours first would fail validation against the zero temperature.
    recipe
        .set_leg(LegKind::Fridge, LegSetting::new(4.0, 20))
        .unwrap();
    assert_eq!(recipe.proofing_mode(), ProofingMode::Both);
    assert_eq!(recipe.recompute_count(), 3);
}

#[test]
fn parsed_updates_apply_like_setters() {
    let mut recipe = recipe(BaseRecipe::default());
    let update: RecipeUpdate = "number_of_balls=6".parse().unwrap();
    assert!(recipe.apply(update).unwrap());
    assert_eq!(recipe.number_of_balls(), 6);
    assert_eq!(format!("{:.1}", recipe.flour_weight()), "888.6");
}

#[test]
fn unknown_style_has_no_calculator() {
    let registry = CalculatorRegistry::with_builtin(test_table());
    let err = registry.get("New York").unwrap_err();
    assert!(matches!(err, RecipeError::NoCalculatorFound(style) if style == "New York"));
}
