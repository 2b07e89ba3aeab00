use clap::{Parser, Subcommand, ValueEnum};
use component_form::{apply_review, describe, render_text, review, review_schema, submit_edit};
use form_spec::{Dialect, FormConfig};
use serde_json::{Map, Value};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const DIALECT_ENV: &str = "FORM_SPEC_DIALECT";

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Metadata-driven form CLI",
    long_about = "Builds form schemas from metadata rows, applies edits and prints the resulting visibility review"
)]
struct Cli {
    /// Log criteria parsing and visibility passes to stderr.
    #[arg(long, global = true, alias = "debug")]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum RenderMode {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum DialectArg {
    Named,
    Positional,
}

impl From<DialectArg> for Dialect {
    fn from(value: DialectArg) -> Self {
        match value {
            DialectArg::Named => Dialect::Named,
            DialectArg::Positional => Dialect::Positional,
        }
    }
}

#[derive(clap::Args)]
struct SourceArgs {
    /// JSON file with the metadata rows (or an `{"error": ...}` object).
    #[arg(long, value_name = "ROWS")]
    rows: PathBuf,
    /// Optional JSON file with a form config.
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,
    /// Criteria dialect; overrides the config file and FORM_SPEC_DIALECT.
    #[arg(long, value_enum)]
    dialect: Option<DialectArg>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = RenderMode::Text)]
    format: RenderMode,
}

#[derive(Subcommand)]
enum Command {
    /// Build the schema and print the initial review.
    Build {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Apply edits in order and print the recomputed review.
    Edit {
        #[command(flatten)]
        source: SourceArgs,
        /// Stored values to seed before editing (JSON object).
        #[arg(long, value_name = "VALUES")]
        values: Option<PathBuf>,
        /// Edit as `field=value`; `true`/`false` set checkboxes, `null` clears.
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        edits: Vec<String>,
    },
    /// Apply a saved review payload and print the recomputed review.
    Apply {
        #[command(flatten)]
        source: SourceArgs,
        /// Review payload JSON produced by `build` or `edit`.
        #[arg(long, value_name = "REVIEW")]
        review: PathBuf,
    },
    /// Print the JSON Schema of the review payload.
    Schema,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.command {
        Command::Build { source } => run_build(source),
        Command::Edit {
            source,
            values,
            edits,
        } => run_edit(source, values, edits),
        Command::Apply { source, review } => run_apply(source, review),
        Command::Schema => {
            let schema = parse_component_result(&review_schema())?;
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_build(source: SourceArgs) -> CliResult<()> {
    let config_json = resolve_config(&source)?;
    let rows_json = fs::read_to_string(&source.rows)?;
    match source.format {
        RenderMode::Json => print_review(&describe(&config_json, &rows_json)),
        RenderMode::Text => print_text(&render_text(&config_json, &rows_json, "")),
    }
}

fn run_edit(source: SourceArgs, values: Option<PathBuf>, edits: Vec<String>) -> CliResult<()> {
    let config_json = resolve_config(&source)?;
    let rows_json = fs::read_to_string(&source.rows)?;
    let mut stored = match values {
        Some(path) => read_values(&path)?,
        None => Map::new(),
    };

    for edit in &edits {
        let (field, value) = parse_edit(edit)?;
        let values_json = Value::Object(stored.clone()).to_string();
        parse_component_result(&submit_edit(
            &config_json,
            &rows_json,
            &values_json,
            &field,
            &value.to_string(),
        ))?;
        stored.insert(field, value);
    }

    let values_json = Value::Object(stored).to_string();
    match source.format {
        RenderMode::Json => print_review(&review(&config_json, &rows_json, &values_json)),
        RenderMode::Text => print_text(&render_text(&config_json, &rows_json, &values_json)),
    }
}

fn run_apply(source: SourceArgs, review_path: PathBuf) -> CliResult<()> {
    let config_json = resolve_config(&source)?;
    let rows_json = fs::read_to_string(&source.rows)?;
    let review_json = fs::read_to_string(review_path)?;
    let result = apply_review(&config_json, &rows_json, &review_json);
    match source.format {
        RenderMode::Json => print_review(&result),
        RenderMode::Text => {
            let payload = parse_component_result(&result)?;
            let payload = serde_json::from_value(payload)?;
            println!("{}", form_spec::render_text(&payload));
            Ok(())
        }
    }
}

/// Layers the config file, the environment and the command line.
fn resolve_config(source: &SourceArgs) -> CliResult<String> {
    let mut config = match &source.config {
        Some(path) => FormConfig::from_json(&fs::read_to_string(path)?)?,
        None => FormConfig::default(),
    };
    if let Ok(raw) = env::var(DIALECT_ENV)
        && !raw.trim().is_empty()
    {
        config.dialect = raw.parse()?;
    }
    if let Some(dialect) = source.dialect {
        config.dialect = dialect.into();
    }
    if config.dialect == Dialect::Positional {
        tracing::debug!("using legacy positional criteria dialect");
    }
    Ok(serde_json::to_string(&config)?)
}

fn read_values(path: &Path) -> CliResult<Map<String, Value>> {
    let contents = fs::read_to_string(path)?;
    match serde_json::from_str(&contents)? {
        Value::Object(map) => Ok(map),
        _ => Err(format!("values file {} must contain a JSON object", path.display()).into()),
    }
}

fn parse_edit(raw: &str) -> CliResult<(String, Value)> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("edit '{}' must look like FIELD=VALUE", raw))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("edit '{}' is missing a field name", raw).into());
    }
    let value = match value.trim() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        text => Value::String(text.to_string()),
    };
    Ok((field.to_string(), value))
}

fn parse_component_result(raw: &str) -> CliResult<Value> {
    let value: Value = serde_json::from_str(raw)?;
    if let Some(error) = value.get("error").and_then(Value::as_str) {
        return Err(error.to_string().into());
    }
    Ok(value)
}

fn print_review(raw: &str) -> CliResult<()> {
    let value = parse_component_result(raw)?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn print_text(raw: &str) -> CliResult<()> {
    if raw.starts_with('{') {
        parse_component_result(raw)?;
    }
    println!("{}", raw);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_edit_maps_checkbox_and_null() {
        assert_eq!(
            parse_edit("Subscribe=true").expect("edit"),
            ("Subscribe".to_string(), Value::Bool(true))
        );
        assert_eq!(
            parse_edit(" Notes =null").expect("edit"),
            ("Notes".to_string(), Value::Null)
        );
        assert_eq!(
            parse_edit("Amount= 10").expect("edit"),
            ("Amount".to_string(), Value::String("10".into()))
        );
        assert!(parse_edit("novalue").is_err());
        assert!(parse_edit("=x").is_err());
    }
}
