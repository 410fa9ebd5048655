//! Configuration primitives and loader for the dough calculator.
//!
//! The loader resolves configuration using a fixed precedence stack:
//! built-in defaults → working directory → override flag.
//! Parsed settings are normalised into typed structures so downstream crates
//! never touch raw TOML.

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::ops::Range;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const CONFIG_FILE_NAME: &str = ".dough.toml";

/// Style served by the built-in calculator.
pub const DEFAULT_PIZZA_STYLE: &str = "Neo-Neapolitan";

/// Complete configuration resolved from defaults and on-disk overrides.
#[derive(Clone, Debug)]
pub struct Config {
    pub table: TableSettings,
    pub recipe: BaseRecipe,
    pub sources: ConfigSources,
}

/// Layout of the yeast reference table and where to read it from.
#[derive(Clone, Debug, PartialEq)]
pub struct TableSettings {
    /// Table file; `None` selects the table embedded in `dough-table`.
    pub path: Option<PathBuf>,
    pub yeast_types: Vec<String>,
    pub first_yeast_row: usize,
    pub temperature_column: usize,
    /// Half-open row range searched for temperatures.
    pub temperature_rows: Range<usize>,
    /// Half-open column range holding durations.
    pub duration_columns: Range<usize>,
}

impl Default for TableSettings {
    fn default() -> Self {
        TableSettings {
            path: None,
            yeast_types: vec!["ADY".into(), "IDY".into(), "CY".into()],
            first_yeast_row: 0,
            temperature_column: 0,
            temperature_rows: 4..14,
            duration_columns: 1..11,
        }
    }
}

/// Recipe parameters used when no saved recipe is supplied.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BaseRecipe {
    pub pizza_style: String,
    pub salt_percentage: f64,
    pub oil_percentage: f64,
    pub yeast_type: String,
    pub hydration: f64,
    pub ball_weight: f64,
    pub number_of_balls: u32,
    pub room_temperature: f64,
    pub room_fermentation: u32,
    pub fridge_temperature: f64,
    pub fridge_fermentation: u32,
}

impl Default for BaseRecipe {
    fn default() -> Self {
        BaseRecipe {
            pizza_style: DEFAULT_PIZZA_STYLE.into(),
            salt_percentage: 2.8,
            oil_percentage: 1.0,
            yeast_type: "IDY".into(),
            hydration: 65.0,
            ball_weight: 250.0,
            number_of_balls: 4,
            room_temperature: 20.0,
            room_fermentation: 4,
            fridge_temperature: 4.0,
            fridge_fermentation: 24,
        }
    }
}

/// Provenance information for resolved configuration.
#[derive(Clone, Debug)]
pub struct ConfigSources {
    pub working_directory: PathBuf,
    pub layers: Vec<ConfigSource>,
}

/// Specific layer of configuration (default/local/override).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigSource {
    pub kind: ConfigSourceKind,
    pub path: Option<PathBuf>,
    pub base_dir: PathBuf,
}

impl ConfigSource {
    fn default(base_dir: PathBuf) -> Self {
        ConfigSource {
            kind: ConfigSourceKind::Default,
            path: None,
            base_dir,
        }
    }

    fn for_file(kind: ConfigSourceKind, path: PathBuf) -> Self {
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        ConfigSource {
            kind,
            path: Some(path),
            base_dir,
        }
    }

    fn describe(&self) -> String {
        match (&self.kind, &self.path) {
            (ConfigSourceKind::Default, _) => "built-in defaults".to_owned(),
            (kind, Some(path)) => format!("{} at {}", kind, path.display()),
            (kind, None) => kind.to_string(),
        }
    }
}

/// Kinds of configuration sources, ordered from lowest to highest precedence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigSourceKind {
    Default,
    Local,
    Override,
}

impl fmt::Display for ConfigSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfigSourceKind::Default => "defaults",
            ConfigSourceKind::Local => "local config",
            ConfigSourceKind::Override => "override config",
        };
        f.write_str(label)
    }
}

/// Loader options, typically supplied by the CLI layer.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub override_path: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
}

impl LoadOptions {
    pub fn with_override_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    pub fn with_working_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(path.into());
        self
    }
}

/// Errors surfaced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to resolve working directory {attempted}: {source}")]
    WorkingDirectory {
        attempted: PathBuf,
        source: io::Error,
    },
    #[error("override config {path} not found")]
    OverrideNotFound { path: PathBuf },
    #[error("failed to read config {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("configuration validation failed:\n{0}")]
    Validation(ConfigValidationErrors),
}

impl Config {
    /// Loads configuration using the precedence rules and returns typed settings.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let working_dir = resolve_working_dir(options.working_dir)?;
        let override_path = options
            .override_path
            .map(|path| make_absolute(&path, &working_dir));

        if let Some(path) = &override_path {
            if !path.exists() {
                return Err(ConfigError::OverrideNotFound { path: path.clone() });
            }
        }

        let default_source = ConfigSource::default(working_dir.clone());
        let mut merged = PartialConfig::default();
        merged.merge(defaults_layer(default_source.clone()));

        let mut source_layers = vec![default_source];

        let local_config_path = working_dir.join(CONFIG_FILE_NAME);
        if local_config_path.exists() && Some(&local_config_path) != override_path.as_ref() {
            let source = ConfigSource::for_file(ConfigSourceKind::Local, local_config_path.clone());
            merged.merge(load_layer(&local_config_path, source.clone())?);
            source_layers.push(source);
        }

        if let Some(path) = override_path {
            let source = ConfigSource::for_file(ConfigSourceKind::Override, path.clone());
            merged.merge(load_layer(&path, source.clone())?);
            source_layers.push(source);
        }

        let (table, recipe) = merged.finalize().map_err(ConfigError::Validation)?;
        Ok(Config {
            table,
            recipe,
            sources: ConfigSources {
                working_directory: working_dir,
                layers: source_layers,
            },
        })
    }

    /// Configuration built purely from the built-in defaults, touching no files.
    pub fn builtin() -> Self {
        Config {
            table: TableSettings::default(),
            recipe: BaseRecipe::default(),
            sources: ConfigSources {
                working_directory: PathBuf::from("."),
                layers: vec![ConfigSource::default(PathBuf::from("."))],
            },
        }
    }
}

fn resolve_working_dir(override_dir: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    match override_dir {
        Some(path) => fs::canonicalize(&path).map_err(|source| ConfigError::WorkingDirectory {
            attempted: path,
            source,
        }),
        None => env::current_dir().map_err(|source| ConfigError::WorkingDirectory {
            attempted: PathBuf::from("."),
            source,
        }),
    }
}

fn make_absolute(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn load_layer(path: &Path, source: ConfigSource) -> Result<PartialConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.into(),
        source,
    })?;
    let raw: RawConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.into(),
        source,
    })?;
    Ok(raw.into_partial(source))
}

fn defaults_layer(source: ConfigSource) -> PartialConfig {
    let table = TableSettings::default();
    let recipe = BaseRecipe::default();

    PartialConfig {
        table: TablePartial {
            path: None,
            yeast_types: Some(Located::new(table.yeast_types, source.clone())),
            first_yeast_row: Some(Located::new(table.first_yeast_row, source.clone())),
            temperature_column: Some(Located::new(table.temperature_column, source.clone())),
            temperature_rows: Some(Located::new(
                [table.temperature_rows.start, table.temperature_rows.end],
                source.clone(),
            )),
            duration_columns: Some(Located::new(
                [table.duration_columns.start, table.duration_columns.end],
                source.clone(),
            )),
        },
        recipe: RecipePartial::from_base(recipe, &source),
    }
}

#[derive(Clone, Debug, Default)]
struct PartialConfig {
    table: TablePartial,
    recipe: RecipePartial,
}

impl PartialConfig {
    fn merge(&mut self, other: PartialConfig) {
        self.table.merge(other.table);
        self.recipe.merge(other.recipe);
    }

    fn finalize(self) -> Result<(TableSettings, BaseRecipe), ConfigValidationErrors> {
        let mut errors = Vec::new();
        let fallback = TableSettings::default();

        let yeast_types = self
            .table
            .yeast_types
            .map(|located| {
                if located.value.is_empty() {
                    errors.push(
                        ConfigValidationError::new(
                            Some(located.source.clone()),
                            "at least one yeast type is required".into(),
                        )
                        .with_context("table.yeast_types"),
                    );
                }
                for (idx, name) in located.value.iter().enumerate() {
                    if located.value[..idx].contains(name) {
                        errors.push(
                            ConfigValidationError::new(
                                Some(located.source.clone()),
                                format!("yeast type '{name}' is listed more than once"),
                            )
                            .with_context("table.yeast_types"),
                        );
                    }
                }
                located.value
            })
            .unwrap_or(fallback.yeast_types);

        let temperature_rows = self
            .table
            .temperature_rows
            .map(|located| checked_range(located, "table.temperature_rows", &mut errors))
            .unwrap_or(fallback.temperature_rows);
        let duration_columns = self
            .table
            .duration_columns
            .map(|located| checked_range(located, "table.duration_columns", &mut errors))
            .unwrap_or(fallback.duration_columns);

        let table = TableSettings {
            path: self.table.path.map(|located| resolve_path(&located)),
            yeast_types,
            first_yeast_row: self
                .table
                .first_yeast_row
                .map(|located| located.value)
                .unwrap_or(fallback.first_yeast_row),
            temperature_column: self
                .table
                .temperature_column
                .map(|located| located.value)
                .unwrap_or(fallback.temperature_column),
            temperature_rows,
            duration_columns,
        };

        let recipe = self.recipe.finalize(&mut errors);

        if !errors.is_empty() {
            return Err(ConfigValidationErrors(errors));
        }
        Ok((table, recipe))
    }
}

fn checked_range(
    located: Located<[usize; 2]>,
    context: &str,
    errors: &mut Vec<ConfigValidationError>,
) -> Range<usize> {
    let [start, end] = located.value;
    if start >= end {
        errors.push(
            ConfigValidationError::new(
                Some(located.source),
                format!("range [{start}, {end}) must contain at least one index"),
            )
            .with_context(context),
        );
    }
    start..end
}

#[derive(Clone, Debug, Default)]
struct TablePartial {
    path: Option<Located<PathBuf>>,
    yeast_types: Option<Located<Vec<String>>>,
    first_yeast_row: Option<Located<usize>>,
    temperature_column: Option<Located<usize>>,
    temperature_rows: Option<Located<[usize; 2]>>,
    duration_columns: Option<Located<[usize; 2]>>,
}

impl TablePartial {
    fn merge(&mut self, other: TablePartial) {
        take_newer(&mut self.path, other.path);
        take_newer(&mut self.yeast_types, other.yeast_types);
        take_newer(&mut self.first_yeast_row, other.first_yeast_row);
        take_newer(&mut self.temperature_column, other.temperature_column);
        take_newer(&mut self.temperature_rows, other.temperature_rows);
        take_newer(&mut self.duration_columns, other.duration_columns);
    }
}

#[derive(Clone, Debug, Default)]
struct RecipePartial {
    pizza_style: Option<Located<String>>,
    salt_percentage: Option<Located<f64>>,
    oil_percentage: Option<Located<f64>>,
    yeast_type: Option<Located<String>>,
    hydration: Option<Located<f64>>,
    ball_weight: Option<Located<f64>>,
    number_of_balls: Option<Located<u32>>,
    room_temperature: Option<Located<f64>>,
    room_fermentation: Option<Located<u32>>,
    fridge_temperature: Option<Located<f64>>,
    fridge_fermentation: Option<Located<u32>>,
}

impl RecipePartial {
    fn from_base(recipe: BaseRecipe, source: &ConfigSource) -> Self {
        let at = |value| Some(Located::new(value, source.clone()));
        RecipePartial {
            pizza_style: Some(Located::new(recipe.pizza_style, source.clone())),
            salt_percentage: at(recipe.salt_percentage),
            oil_percentage: at(recipe.oil_percentage),
            yeast_type: Some(Located::new(recipe.yeast_type, source.clone())),
            hydration: at(recipe.hydration),
            ball_weight: at(recipe.ball_weight),
            number_of_balls: Some(Located::new(recipe.number_of_balls, source.clone())),
            room_temperature: at(recipe.room_temperature),
            room_fermentation: Some(Located::new(recipe.room_fermentation, source.clone())),
            fridge_temperature: at(recipe.fridge_temperature),
            fridge_fermentation: Some(Located::new(recipe.fridge_fermentation, source.clone())),
        }
    }

    fn merge(&mut self, other: RecipePartial) {
        take_newer(&mut self.pizza_style, other.pizza_style);
        take_newer(&mut self.salt_percentage, other.salt_percentage);
        take_newer(&mut self.oil_percentage, other.oil_percentage);
        take_newer(&mut self.yeast_type, other.yeast_type);
        take_newer(&mut self.hydration, other.hydration);
        take_newer(&mut self.ball_weight, other.ball_weight);
        take_newer(&mut self.number_of_balls, other.number_of_balls);
        take_newer(&mut self.room_temperature, other.room_temperature);
        take_newer(&mut self.room_fermentation, other.room_fermentation);
        take_newer(&mut self.fridge_temperature, other.fridge_temperature);
        take_newer(&mut self.fridge_fermentation, other.fridge_fermentation);
    }

    fn finalize(self, errors: &mut Vec<ConfigValidationError>) -> BaseRecipe {
        let fallback = BaseRecipe::default();

        let mut percentage = |located: Option<Located<f64>>, field: &str, default: f64| {
            located
                .map(|located| {
                    if !located.value.is_finite() || located.value < 0.0 {
                        errors.push(
                            ConfigValidationError::new(
                                Some(located.source.clone()),
                                format!("must be a non-negative number (received {})", located.value),
                            )
                            .with_context(format!("recipe.{field}")),
                        );
                    }
                    located.value
                })
                .unwrap_or(default)
        };

        let salt_percentage =
            percentage(self.salt_percentage, "salt_percentage", fallback.salt_percentage);
        let oil_percentage =
            percentage(self.oil_percentage, "oil_percentage", fallback.oil_percentage);
        let hydration = percentage(self.hydration, "hydration", fallback.hydration);

        let ball_weight = self
            .ball_weight
            .map(|located| {
                if located.value.is_nan() || located.value <= 0.0 {
                    errors.push(
                        ConfigValidationError::new(
                            Some(located.source.clone()),
                            format!("must be greater than 0 (received {})", located.value),
                        )
                        .with_context("recipe.ball_weight"),
                    );
                }
                located.value
            })
            .unwrap_or(fallback.ball_weight);

        let number_of_balls = self
            .number_of_balls
            .map(|located| {
                if located.value == 0 {
                    errors.push(
                        ConfigValidationError::new(
                            Some(located.source.clone()),
                            "must be greater than 0".into(),
                        )
                        .with_context("recipe.number_of_balls"),
                    );
                }
                located.value
            })
            .unwrap_or(fallback.number_of_balls);

        BaseRecipe {
            pizza_style: value_or(self.pizza_style, fallback.pizza_style),
            salt_percentage,
            oil_percentage,
            yeast_type: value_or(self.yeast_type, fallback.yeast_type),
            hydration,
            ball_weight,
            number_of_balls,
            room_temperature: value_or(self.room_temperature, fallback.room_temperature),
            room_fermentation: value_or(self.room_fermentation, fallback.room_fermentation),
            fridge_temperature: value_or(self.fridge_temperature, fallback.fridge_temperature),
            fridge_fermentation: value_or(self.fridge_fermentation, fallback.fridge_fermentation),
        }
    }
}

fn take_newer<T>(slot: &mut Option<T>, other: Option<T>) {
    if other.is_some() {
        *slot = other;
    }
}

fn located<T>(value: Option<T>, source: &ConfigSource) -> Option<Located<T>> {
    value.map(|value| Located::new(value, source.clone()))
}

fn value_or<T>(located: Option<Located<T>>, fallback: T) -> T {
    located.map(|located| located.value).unwrap_or(fallback)
}

#[derive(Clone, Debug)]
struct Located<T> {
    value: T,
    source: ConfigSource,
}

impl<T> Located<T> {
    fn new(value: T, source: ConfigSource) -> Self {
        Located { value, source }
    }
}

fn resolve_path(located: &Located<PathBuf>) -> PathBuf {
    let path = &located.value;
    if path.is_absolute() {
        path.clone()
    } else {
        located.source.base_dir.join(path)
    }
}

/// Collection of validation failures reported together.
#[derive(Clone, Debug)]
pub struct ConfigValidationErrors(pub Vec<ConfigValidationError>);

impl fmt::Display for ConfigValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.0.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "- {err}")?;
        }
        Ok(())
    }
}

impl ConfigValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ConfigValidationError> {
        self.0.iter()
    }
}

/// Validation failure with optional provenance.
#[derive(Clone, Debug)]
pub struct ConfigValidationError {
    pub source: Option<ConfigSource>,
    pub message: String,
    pub context: Option<String>,
}

impl ConfigValidationError {
    fn new(source: Option<ConfigSource>, message: String) -> Self {
        ConfigValidationError {
            source,
            message,
            context: None,
        }
    }

    fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(f, "{}: {}", context, self.message)?;
        } else {
            write!(f, "{}", self.message)?;
        }
        if let Some(source) = &self.source {
            write!(f, " ({})", source.describe())?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    table: Option<RawTable>,
    #[serde(default)]
    recipe: Option<RawRecipe>,
}

impl RawConfig {
    fn into_partial(self, source: ConfigSource) -> PartialConfig {
        PartialConfig {
            table: self
                .table
                .map(|table| table.into_partial(&source))
                .unwrap_or_default(),
            recipe: self
                .recipe
                .map(|recipe| recipe.into_partial(&source))
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTable {
    #[serde(default)]
    path: Option<PathBuf>,
    #[serde(default)]
    yeast_types: Option<Vec<String>>,
    #[serde(default)]
    first_yeast_row: Option<usize>,
    #[serde(default)]
    temperature_column: Option<usize>,
    #[serde(default)]
    temperature_rows: Option<[usize; 2]>,
    #[serde(default)]
    duration_columns: Option<[usize; 2]>,
}

impl RawTable {
    fn into_partial(self, source: &ConfigSource) -> TablePartial {
        TablePartial {
            path: located(self.path, source),
            yeast_types: located(self.yeast_types, source),
            first_yeast_row: located(self.first_yeast_row, source),
            temperature_column: located(self.temperature_column, source),
            temperature_rows: located(self.temperature_rows, source),
            duration_columns: located(self.duration_columns, source),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRecipe {
    #[serde(default)]
    pizza_style: Option<String>,
    #[serde(default)]
    salt_percentage: Option<f64>,
    #[serde(default)]
    oil_percentage: Option<f64>,
    #[serde(default)]
    yeast_type: Option<String>,
    #[serde(default)]
    hydration: Option<f64>,
    #[serde(default)]
    ball_weight: Option<f64>,
    #[serde(default)]
    number_of_balls: Option<u32>,
    #[serde(default)]
    room_temperature: Option<f64>,
    #[serde(default)]
    room_fermentation: Option<u32>,
    #[serde(default)]
    fridge_temperature: Option<f64>,
    #[serde(default)]
    fridge_fermentation: Option<u32>,
}

impl RawRecipe {
    fn into_partial(self, source: &ConfigSource) -> RecipePartial {
        RecipePartial {
            pizza_style: located(self.pizza_style, source),
            salt_percentage: located(self.salt_percentage, source),
            oil_percentage: located(self.oil_percentage, source),
            yeast_type: located(self.yeast_type, source),
            hydration: located(self.hydration, source),
            ball_weight: located(self.ball_weight, source),
            number_of_balls: located(self.number_of_balls, source),
            room_temperature: located(self.room_temperature, source),
            room_fermentation: located(self.room_fermentation, source),
            fridge_temperature: located(self.fridge_temperature, source),
            fridge_fermentation: located(self.fridge_fermentation, source),
        }
    }
}
