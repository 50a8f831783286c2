use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use crate::config::AppConfig;
use crate::data::error::error_chain;
use crate::data::{validate_catalogs, DataRegistry};
use crate::recovery::write_table_csv;
use crate::server;
use crate::server::api::{calculate_payload, table_payload, CalculateRequest};

/// Quick-reference notebook backend: data catalogs and the recovery calculator
#[derive(Debug, Parser)]
#[command(name = "quickref", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the notebook and its JSON API
    Serve,
    /// Run the recovery calculator for one character
    Calculate(CalculateArgs),
    /// Recovery amounts for every effect combination
    Table(TableArgs),
    /// Check the effect and character catalogs
    Validate(DataArgs),
}

#[derive(Debug, Args)]
pub struct DataArgs {
    /// Directory holding effects and characters catalogs (defaults to QUICKREF_DATA_DIR or ./data)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct CalculateArgs {
    #[arg(long)]
    pub character: String,
    #[arg(long)]
    pub ally: Option<String>,
    /// Effect ids, comma separated (e.g. 1,2,6)
    #[arg(long, value_delimiter = ',')]
    pub effects: Vec<u32>,
    /// Print the step trace and amounts instead of JSON
    #[arg(long)]
    pub text: bool,
    #[command(flatten)]
    pub data: DataArgs,
}

#[derive(Debug, Args)]
pub struct TableArgs {
    /// Limit the table to one character
    #[arg(long)]
    pub character: Option<String>,
    #[arg(long)]
    pub csv: bool,
    #[command(flatten)]
    pub data: DataArgs,
}

pub fn run_with_args(args: &[String]) -> i32 {
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return err.exit_code();
        }
    };

    match cli.command {
        Command::Serve => handle_serve(),
        Command::Calculate(args) => handle_calculate(&args),
        Command::Table(args) => handle_table(&args),
        Command::Validate(args) => handle_validate(&args),
    }
}

fn resolve_data_dir(args: &DataArgs) -> PathBuf {
    args.data_dir
        .clone()
        .unwrap_or_else(|| AppConfig::from_env().data_dir)
}

fn load_registry(dir: &Path) -> Option<Arc<DataRegistry>> {
    match DataRegistry::load(dir) {
        Ok(registry) => Some(registry),
        Err(err) => {
            eprintln!("failed to load data from '{}': {}", dir.display(), error_chain(&err));
            None
        }
    }
}

fn handle_serve() -> i32 {
    let config = AppConfig::from_env();
    match server::run_server(&config) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {}", error_chain(&err));
            1
        }
    }
}

fn handle_calculate(args: &CalculateArgs) -> i32 {
    let Some(registry) = load_registry(&resolve_data_dir(&args.data)) else {
        return 1;
    };
    let request = CalculateRequest {
        character: args.character.clone(),
        ally: args.ally.clone(),
        effects: args.effects.clone(),
    };

    let result = match calculate_payload(&registry, &request) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("calculation failed: {err}");
            return 1;
        }
    };

    if args.text {
        for step in &result.steps {
            println!("{step}");
        }
        println!("self health: {} ({})", result.self_health_amount, result.self_health_percent);
        println!("self focus: {} ({})", result.self_focus_amount, result.self_focus_percent);
        println!("ally health: {} ({})", result.ally_health_amount, result.ally_health_percent);
        println!("ally focus: {} ({})", result.ally_focus_amount, result.ally_focus_percent);
        return 0;
    }

    match serde_json::to_string_pretty(&result) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize calculation result: {err}");
            1
        }
    }
}

fn handle_table(args: &TableArgs) -> i32 {
    let Some(registry) = load_registry(&resolve_data_dir(&args.data)) else {
        return 1;
    };
    let table = match table_payload(&registry, args.character.as_deref()) {
        Ok(table) => table,
        Err(err) => {
            eprintln!("table failed: {err}");
            return 1;
        }
    };

    if args.csv {
        return match write_table_csv(&table.rows, io::stdout().lock()) {
            Ok(()) => 0,
            Err(err) => {
                eprintln!("failed to write csv: {err}");
                1
            }
        };
    }

    match serde_json::to_string_pretty(&table) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize recovery table: {err}");
            1
        }
    }
}

fn handle_validate(args: &DataArgs) -> i32 {
    let Some(registry) = load_registry(&resolve_data_dir(args)) else {
        return 1;
    };

    let report = validate_catalogs(&registry.effects, &registry.characters);
    for diagnostic in &report.diagnostics {
        eprintln!("- {diagnostic}");
    }
    if report.has_errors() {
        eprintln!(
            "validation failed: {} issue(s)",
            report.diagnostics.len()
        );
        1
    } else {
        println!("validation passed: {}", registry.data_dir.display());
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn calculate_effects_split_on_commas() {
        let cli = Cli::try_parse_from(args(&[
            "quickref",
            "calculate",
            "--character",
            "Ranger",
            "--effects",
            "6,3,4",
        ]))
        .unwrap();
        let Command::Calculate(calc) = cli.command else {
            panic!("expected calculate");
        };
        assert_eq!(calc.effects, vec![6, 3, 4]);
        assert!(calc.ally.is_none());
        assert!(!calc.text);
    }

    #[test]
    fn unknown_command_is_usage_error() {
        assert_eq!(run_with_args(&args(&["quickref", "optimize"])), 2);
        assert_eq!(run_with_args(&args(&["quickref"])), 2);
    }
}
