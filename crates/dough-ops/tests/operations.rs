use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use dough_config::{Config, LoadOptions};
use dough_ops::{OperationError, Operations};
use dough_recipe::{LegKind, LegSetting, ProofingMode, RecipeError, RecipeField};
use dough_table::TableError;
use dough_test_support::{test_config, write_config};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn ops() -> Operations {
    Operations::new(test_config()).expect("builtin operations")
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

fn ops_in(dir: &Path) -> Operations {
    let working_dir = fs::canonicalize(dir).expect("canonicalize working dir");
    let config =
        Config::load(LoadOptions::default().with_working_dir(&working_dir)).expect("load config");
    Operations::new(config).expect("operations")
}

#[test]
fn default_recipe_comes_from_configuration() {
    let recipe = ops().default_recipe().unwrap();
    assert_eq!(recipe.yeast_percentage(), 0.15);

    let temp = TempDir::new().unwrap();
    write_config(
        temp.path(),
        r#"
        [recipe]
        yeast_type = "CY"
        fridge_fermentation = 48
        "#,
    );
    let recipe = ops_in(temp.path()).default_recipe().unwrap();
    assert_eq!(recipe.yeast_type(), "CY");
    assert_eq!(recipe.yeast_percentage(), 0.3);
}

#[test]
fn saved_recipes_get_unique_dated_names_and_load_back() {
    let temp = TempDir::new().unwrap();
    let ops = ops();
    let mut recipe = ops.default_recipe().unwrap();
    recipe.set_hydration(62.0).unwrap();

    let first = ops.save_recipe_on(&recipe, temp.path(), date()).unwrap();
    let second = ops.save_recipe_on(&recipe, temp.path(), date()).unwrap();
    assert_eq!(first, temp.path().join("2024-05-01.json"));
    assert_eq!(second, temp.path().join("2024-05-01_1.json"));

    let saved = fs::read_to_string(&first).unwrap();
    assert!(saved.contains("\n    \"info\": \"2024-05-01\",\n"));

    let loaded = ops.load_recipe(&first).unwrap();
    assert_eq!(loaded.inputs(), recipe.inputs());
    assert_eq!(loaded.flour_weight(), recipe.flour_weight());
    assert_eq!(loaded.yeast_percentage(), recipe.yeast_percentage());
}

#[test]
fn export_writes_text_rendering() {
    let temp = TempDir::new().unwrap();
    let ops = ops();
    let recipe = ops.default_recipe().unwrap();

    let path = ops
        .export_recipe_on(&recipe, &temp.path().join("out"), date())
        .unwrap();
    assert_eq!(path, temp.path().join("out").join("2024-05-01.txt"));

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("Flour: "));
    assert!(text.ends_with("Total: 4 dough balls, each weighing 250.0g"));
}

#[test]
fn load_reports_malformed_and_unsupported_records() {
    let temp = TempDir::new().unwrap();
    let ops = ops();

    let broken = temp.path().join("broken.json");
    fs::write(&broken, "{ not json").unwrap();
    let err = ops.load_recipe(&broken).unwrap_err();
    assert!(matches!(err, OperationError::Json { .. }));
    assert!(!err.is_recipe_error());

    let detroit = temp.path().join("detroit.json");
    let mut inputs = dough_recipe::RecipeInputs::default();
    inputs.pizza_style = "Detroit".into();
    fs::write(
        &detroit,
        dough_format::SavedRecipe::new(date(), inputs).to_json().unwrap(),
    )
    .unwrap();
    let err = ops.load_recipe(&detroit).unwrap_err();
    assert!(matches!(
        err,
        OperationError::Recipe(RecipeError::NoCalculatorFound(_))
    ));
    assert!(err.is_recipe_error());

    let err = ops.load_recipe(&temp.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, OperationError::Io { .. }));
}

#[test]
fn load_rejects_record_with_weightless_balls() {
    let temp = TempDir::new().unwrap();
    let ops = ops();
    let path = temp.path().join("weightless.json");
    let inputs = dough_recipe::RecipeInputs {
        ball_weight: 0.0,
        ..dough_recipe::RecipeInputs::default()
    };
    fs::write(
        &path,
        dough_format::SavedRecipe::new(date(), inputs).to_json().unwrap(),
    )
    .unwrap();

    let err = ops.load_recipe(&path).unwrap_err();
    assert!(matches!(
        err,
        OperationError::Recipe(RecipeError::InvalidValue {
            field: RecipeField::BallWeight,
            ..
        })
    ));
    assert!(err.is_recipe_error());
}

#[test]
fn snapping_moves_legs_onto_the_table_grid() {
    let ops = ops();
    let mut recipe = ops.default_recipe().unwrap();

    let room = ops.snap_leg(&mut recipe, LegKind::Room, 21.0, 5).unwrap();
    assert_eq!(room, LegSetting::new(20.0, 4));

    let fridge = ops.snap_leg(&mut recipe, LegKind::Fridge, 5.0, 30).unwrap();
    assert_eq!(fridge, LegSetting::new(4.0, 24));
    assert_eq!(recipe.leg(LegKind::Fridge), fridge);

    let off = ops.snap_leg(&mut recipe, LegKind::Room, 0.0, 0).unwrap();
    assert_eq!(off, LegSetting::OFF);
    assert_eq!(recipe.leg(LegKind::Room), LegSetting::OFF);
    assert_eq!(recipe.proofing_mode(), ProofingMode::ColdOnly);
}

#[test]
fn unsupported_combination_keeps_previous_leg() {
    let ops = ops();
    let mut recipe = ops.default_recipe().unwrap();
    let before = recipe.leg(LegKind::Fridge);

    // 4h at 20°C has no equivalent on the 2°C row.
    let err = ops
        .snap_leg(&mut recipe, LegKind::Fridge, 2.0, 48)
        .unwrap_err();
    assert!(matches!(
        err,
        OperationError::Recipe(RecipeError::Table(TableError::InvalidFermentation))
    ));
    assert_eq!(recipe.leg(LegKind::Fridge), before);
}

#[test]
fn table_queries_expose_the_grid() {
    let ops = ops();
    assert_eq!(
        ops.temperatures(),
        vec![2.0, 4.0, 6.0, 8.0, 16.0, 18.0, 20.0, 22.0, 24.0, 26.0]
    );
    assert_eq!(
        ops.durations(4.4).unwrap(),
        vec![24, 36, 48, 60, 84, 108, 140]
    );
    assert_eq!(ops.yeast_types().to_vec(), vec!["ADY", "IDY", "CY"]);
}

#[test]
fn missing_table_file_fails_construction() {
    let temp = TempDir::new().unwrap();
    write_config(
        temp.path(),
        r#"
        [table]
        path = "tables/missing.csv"
        "#,
    );
    let working_dir = fs::canonicalize(temp.path()).unwrap();
    let config = Config::load(LoadOptions::default().with_working_dir(&working_dir)).unwrap();
    let err = Operations::new(config).unwrap_err();
    assert!(matches!(err, OperationError::Table(TableError::Io { .. })));
}
