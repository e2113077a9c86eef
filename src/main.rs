//! vibefilter - check and fold a filter expression tree

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use log::info;
use std::path::PathBuf;
use vibefilter::config::{DivisionMode, EvalConfig};
use vibefilter::expression::{ExpressionEvaluator, SqlCatalog, TypeChecker};
use vibefilter::loader::{load_tree, to_json};

/// Type check a JSON expression tree and fold it to a literal
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file holding the expression tree
    tree: PathBuf,

    /// Stop after type checking and print the checked tree
    #[arg(long)]
    check_only: bool,

    /// Fail on division by zero instead of returning the sentinel
    #[arg(long)]
    strict_division: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let mut tree = load_tree(&args.tree)?;
    info!("loaded expression {}", tree);

    let checker = TypeChecker::new(&SqlCatalog);
    let result_type = checker
        .check_tree(&mut tree)
        .context("Expression failed type checking")?;
    info!("expression type: {}", result_type);

    if args.check_only {
        println!("{}", to_json(&tree)?);
        return Ok(());
    }

    let config = EvalConfig {
        division: if args.strict_division {
            DivisionMode::Error
        } else {
            DivisionMode::Sentinel
        },
    };
    let value = ExpressionEvaluator::with_config(config)
        .fold(&tree)
        .context("Expression failed to evaluate")?;
    info!("result: {}", value);

    println!("{}", to_json(&value)?);
    Ok(())
}
