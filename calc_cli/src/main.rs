//! # Tally CLI Application
//!
//! Command-line driver for the calculator catalog: list calculators, show a
//! descriptor, run a calculation or validate inputs.
//!
//! ```text
//! calc_cli list --category finance
//! calc_cli show calmar-ratio-calculator
//! calc_cli run ebitda-calculator --inputs '{"netIncome":100,"interest":20,"taxes":30,"depreciation":10,"amortization":5}'
//! calc_cli run mortgage-payment-calculator --example "30-year fixed" --format json
//! calc_cli validate roi-calculator --file inputs.json
//! ```
//!
//! Reports go to stdout; logs go to stderr (filter with `--log` or `CALC_LOG`).

mod report;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use calc_core::{catalog, Calculator, Category, Inputs, Registry};
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use report::Format;

/// Calculator catalog CLI
#[derive(Parser)]
#[command(name = "calc_cli")]
#[command(about = "List, inspect and run catalog calculators")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output format
    #[arg(long, global = true, value_enum, env = "CALC_FORMAT", default_value_t = Format::Text)]
    format: Format,

    /// Log filter, e.g. `debug` or `calc_core=debug`
    #[arg(long, global = true, env = "CALC_LOG", default_value = "warn")]
    log: String,
}

#[derive(Subcommand)]
enum Command {
    /// List registered calculators
    List {
        /// Only calculators in this category
        #[arg(long)]
        category: Option<Category>,
    },

    /// Show a calculator's description, tags and examples
    Show { id: String },

    /// Validate inputs and calculate
    Run {
        id: String,
        #[command(flatten)]
        source: InputSource,
    },

    /// Validate inputs without calculating (exit code 1 when invalid)
    Validate {
        id: String,
        #[command(flatten)]
        source: InputSource,
    },
}

/// Where the inputs come from; exactly one is required.
#[derive(Args)]
#[group(required = true, multiple = false)]
struct InputSource {
    /// Inputs as an inline JSON object
    #[arg(long)]
    inputs: Option<String>,

    /// Path to a JSON file with the inputs
    #[arg(long)]
    file: Option<PathBuf>,

    /// Name of one of the calculator's built-in examples
    #[arg(long)]
    example: Option<String>,
}

impl InputSource {
    fn load(&self, calculator: &dyn Calculator) -> Result<Inputs> {
        if let Some(json) = &self.inputs {
            return Inputs::from_json_str(json).context("could not parse --inputs");
        }
        if let Some(path) = &self.file {
            let json = fs::read_to_string(path)
                .with_context(|| format!("could not read {}", path.display()))?;
            return Inputs::from_json_str(&json)
                .with_context(|| format!("could not parse {}", path.display()));
        }
        if let Some(name) = &self.example {
            let descriptor = calculator.descriptor();
            return descriptor
                .example(name)
                .map(|example| example.inputs.clone())
                .ok_or_else(|| {
                    let available: Vec<_> =
                        descriptor.examples.iter().map(|e| e.name.as_str()).collect();
                    anyhow!(
                        "'{}' has no example named '{name}' (available: {})",
                        descriptor.id,
                        available.join(", ")
                    )
                });
        }
        Err(anyhow!("no input source given"))
    }
}

fn init_tracing(filter: &str) -> Result<()> {
    let filter =
        EnvFilter::try_new(filter).with_context(|| format!("invalid log filter '{filter}'"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    Ok(())
}

fn run(cli: &Cli, registry: &Registry) -> Result<ExitCode> {
    let format = cli.format;

    match &cli.command {
        Command::List { category } => {
            let descriptors: Vec<_> = registry
                .descriptors()
                .into_iter()
                .filter(|d| category.map_or(true, |c| d.category == c))
                .collect();
            print!("{}", report::list(&descriptors, format)?);
        }
        Command::Show { id } => {
            let calculator = registry.lookup(id)?;
            print!("{}", report::descriptor(calculator.descriptor(), format)?);
        }
        Command::Run { id, source } => {
            let calculator = registry.lookup(id)?;
            let inputs = source.load(calculator.as_ref())?;
            debug!(calculator = %id, fields = inputs.len(), "Running calculation");

            match calculator.evaluate(&inputs) {
                Ok(calc) => print!("{}", report::calculation(&calc, format)?),
                Err(err) => {
                    let rendered = report::error(&err, format)?;
                    match format {
                        Format::Json => print!("{rendered}"),
                        Format::Text => eprint!("{rendered}"),
                    }
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Command::Validate { id, source } => {
            let calculator = registry.lookup(id)?;
            let inputs = source.load(calculator.as_ref())?;
            let result = calculator.check(&inputs);
            print!("{}", report::validation(id, &result, format)?);
            if !result.is_valid() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_tracing(&cli.log) {
        eprintln!("error: {err:#}");
        return ExitCode::FAILURE;
    }

    let outcome = catalog::builtin()
        .context("could not build the calculator catalog")
        .and_then(|registry| run(&cli, registry));

    match outcome {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_input_sources_are_exclusive() {
        let parsed = Cli::try_parse_from([
            "calc_cli",
            "run",
            "roi-calculator",
            "--inputs",
            "{}",
            "--example",
            "x",
        ]);
        assert!(parsed.is_err());

        let missing = Cli::try_parse_from(["calc_cli", "validate", "roi-calculator"]);
        assert!(missing.is_err());
    }

    #[test]
    fn test_category_filter_parses() {
        let cli = Cli::try_parse_from(["calc_cli", "list", "--category", "Finance"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::List {
                category: Some(Category::Finance)
            }
        ));
    }

    #[test]
    fn test_example_source() {
        let registry = catalog::builtin().unwrap();
        let calculator = registry.lookup("ebitda-calculator").unwrap();
        let source = InputSource {
            inputs: None,
            file: None,
            example: Some("profitable company".to_string()),
        };
        let inputs = source.load(calculator.as_ref()).unwrap();
        assert_eq!(inputs.number("netIncome"), Some(100.0));

        let unknown = InputSource {
            inputs: None,
            file: None,
            example: Some("nope".to_string()),
        };
        let err = unknown.load(calculator.as_ref()).unwrap_err();
        assert!(err.to_string().contains("available: Profitable company, With revenue"));
    }
}
