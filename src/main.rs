//! Select Valuation CLI
//!
//! Values one product for one life from a select-and-ultimate table file

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use select_valuation::{Product, ProductKind, TableLoader, ValuationConfig, ValuationEngine};

#[derive(Debug, Parser)]
#[command(
    name = "select_valuation",
    version,
    about = "Assurance and annuity values from a select mortality table"
)]
struct Args {
    /// Mortality table CSV (age, duration 0, duration 1, durations 2+)
    #[arg(long)]
    table: PathBuf,

    /// Preamble lines to skip before the table rows
    #[arg(long, default_value_t = select_valuation::assumptions::loader::DEFAULT_SKIP_ROWS)]
    skip_rows: usize,

    /// JSON valuation config (projection age, entry age range)
    #[arg(long)]
    config: Option<PathBuf>,

    /// whole-life-assurance, term-assurance, endowment-assurance,
    /// whole-life-annuity or term-annuity
    #[arg(long, default_value = "whole-life-assurance")]
    product: ProductKind,

    /// Entry age
    #[arg(long, default_value_t = 40)]
    age: u32,

    /// Annual effective interest rate, e.g. 0.04
    #[arg(long, default_value_t = 0.04, allow_negative_numbers = true)]
    interest: f64,

    /// Term in years (term and endowment products only)
    #[arg(long)]
    term: Option<u32>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ValuationConfig::from_json_path(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => ValuationConfig::default(),
    };

    let table = TableLoader::new()
        .skip_rows(args.skip_rows)
        .load_path(&args.table)
        .with_context(|| format!("loading mortality table {}", args.table.display()))?;

    let engine = ValuationEngine::new(&table, config)?;

    // Whole-life products ignore a stray --term, as the entry form disables it
    let term = if args.product.requires_term() { args.term } else { None };
    let product = Product::new(args.product, term)?;

    let valuation = engine
        .value(&product, args.age, args.interest)
        .context("valuation failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&valuation)?);
    } else {
        println!("{}", valuation);
    }

    Ok(())
}
