use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use dough_config::{Config, LoadOptions};
use dough_format::{render_recipe, RecipeFormat};
use dough_ops::{OperationError, Operations};
use dough_recipe::{Recipe, RecipeError, RecipeUpdate};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

/// Exit code for recipe inputs the calculator rejects.
const EXIT_RECIPE: i32 = 2;

/// Entry point for CLI execution. Returns the desired exit code.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut options = LoadOptions::default();
    if let Some(path) = &cli.config {
        options = options.with_override_path(path);
    }
    let config = Config::load(options)?;
    debug!(layers = config.sources.layers.len(), "configuration loaded");
    let ops = Operations::new(config)?;

    let outcome = match cli.command {
        Command::Calc(args) => handle_calc(&ops, args),
        Command::Save(args) => handle_save(&ops, args),
        Command::Export(args) => handle_export(&ops, args),
        Command::Table(args) => handle_table(&ops, args),
    };

    match outcome {
        Err(err) if is_recipe_failure(&err) => {
            eprintln!("{err}");
            Ok(EXIT_RECIPE)
        }
        other => other,
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    // Already installed when run() is called more than once in-process.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn is_recipe_failure(err: &anyhow::Error) -> bool {
    if let Some(err) = err.downcast_ref::<OperationError>() {
        return err.is_recipe_error();
    }
    err.downcast_ref::<RecipeError>().is_some()
}

fn handle_calc(ops: &Operations, args: CalcArgs) -> Result<i32> {
    let CalcArgs { recipe, format } = args;
    let recipe = build_recipe(ops, recipe)?;

    let format = match format.unwrap_or(FormatValue::Text) {
        FormatValue::Text => RecipeFormat::Text,
        FormatValue::Json => RecipeFormat::Json,
    };
    emit(&render_recipe(&recipe, format)?)?;
    Ok(0)
}

fn handle_save(ops: &Operations, args: OutputArgs) -> Result<i32> {
    let OutputArgs { recipe, dir } = args;
    let recipe = build_recipe(ops, recipe)?;
    let path = ops.save_recipe(&recipe, &dir)?;
    emit(&path.display().to_string())?;
    Ok(0)
}

fn handle_export(ops: &Operations, args: OutputArgs) -> Result<i32> {
    let OutputArgs { recipe, dir } = args;
    let recipe = build_recipe(ops, recipe)?;
    let path = ops.export_recipe(&recipe, &dir)?;
    emit(&path.display().to_string())?;
    Ok(0)
}

fn handle_table(ops: &Operations, args: TableArgs) -> Result<i32> {
    let lines: Vec<String> = match args.query {
        TableQuery::Temperatures => ops
            .temperatures()
            .into_iter()
            .map(|temperature| format!("{temperature:.1}"))
            .collect(),
        TableQuery::Durations { temperature } => ops
            .durations(temperature)?
            .into_iter()
            .map(|hours| hours.to_string())
            .collect(),
        TableQuery::Yeasts => ops.yeast_types().to_vec(),
    };
    emit(&lines.join("\n"))?;
    Ok(0)
}

/// Start from the saved record (or the configured default) and apply each
/// `--set` override in order.
fn build_recipe(ops: &Operations, args: RecipeArgs) -> Result<Recipe> {
    let RecipeArgs { recipe, set } = args;
    let mut recipe = match recipe {
        Some(path) => ops.load_recipe(&path)?,
        None => ops.default_recipe()?,
    };
    for update in set {
        recipe.apply(update)?;
    }
    Ok(recipe)
}

fn emit(content: &str) -> Result<()> {
    print!("{}", content);
    if !content.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn parse_update(raw: &str) -> Result<RecipeUpdate, String> {
    raw.parse().map_err(|err: RecipeError| err.to_string())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Pizza dough calculator",
    propagate_version = true
)]
struct Cli {
    /// Configuration file layered over `.dough.toml`
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Log verbosity: -v info, -vv debug, -vvv trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print ingredient weights for a recipe
    Calc(CalcArgs),
    /// Save a recipe as a dated JSON record
    Save(OutputArgs),
    /// Write a recipe's shopping list to a dated text file
    Export(OutputArgs),
    /// Inspect the yeast reference table
    Table(TableArgs),
}

#[derive(Args)]
struct RecipeArgs {
    /// Saved recipe to start from instead of the configured default
    #[arg(long, value_name = "FILE")]
    recipe: Option<PathBuf>,
    /// Override a recipe field, e.g. `--set hydration=62`
    #[arg(
        long = "set",
        value_name = "FIELD=VALUE",
        value_parser = parse_update,
        action = ArgAction::Append
    )]
    set: Vec<RecipeUpdate>,
}

#[derive(Args)]
struct CalcArgs {
    #[command(flatten)]
    recipe: RecipeArgs,
    /// Output format
    #[arg(long, value_enum)]
    format: Option<FormatValue>,
}

#[derive(Args)]
struct OutputArgs {
    #[command(flatten)]
    recipe: RecipeArgs,
    /// Directory receiving the file
    #[arg(long, value_name = "DIR", default_value = ".")]
    dir: PathBuf,
}

#[derive(Args)]
struct TableArgs {
    #[command(subcommand)]
    query: TableQuery,
}

#[derive(Subcommand)]
enum TableQuery {
    /// List table temperatures in row order
    Temperatures,
    /// List whole-hour durations at the nearest table temperature
    Durations {
        #[arg(long, allow_negative_numbers = true)]
        temperature: f64,
    },
    /// List configured yeast types
    Yeasts,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatValue {
    Text,
    Json,
}
