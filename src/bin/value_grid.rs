//! Value every product over a range of entry ages
//!
//! Writes one CSV row per (age, product) for comparison against published
//! commutation tables.
//!
//! Usage: cargo run --release --bin value_grid -- --table am92.csv --output grid.csv

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use select_valuation::{
    Product, ProductKind, TableLoader, ValuationConfig, ValuationEngine, ValuationRequest,
};
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(name = "value_grid", about = "Grid of product values by entry age")]
struct Args {
    #[arg(long)]
    table: PathBuf,

    #[arg(long, default_value_t = select_valuation::assumptions::loader::DEFAULT_SKIP_ROWS)]
    skip_rows: usize,

    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 0.04, allow_negative_numbers = true)]
    interest: f64,

    /// Term used for term and endowment products
    #[arg(long, default_value_t = 20)]
    term: u32,

    /// First entry age (defaults to the configured minimum)
    #[arg(long)]
    min_age: Option<u32>,

    /// Last entry age (defaults to the configured maximum)
    #[arg(long)]
    max_age: Option<u32>,

    #[arg(long, default_value = "valuation_grid.csv")]
    output: PathBuf,
}

#[derive(Debug, Serialize)]
struct GridRow<'a> {
    age: u32,
    product: &'a str,
    term: Option<u32>,
    label: &'a str,
    value: f64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ValuationConfig::from_json_path(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => ValuationConfig::default(),
    };

    let start = Instant::now();
    let table = TableLoader::new()
        .skip_rows(args.skip_rows)
        .load_path(&args.table)
        .with_context(|| format!("loading mortality table {}", args.table.display()))?;
    info!("loaded table in {:?}", start.elapsed());

    let engine = ValuationEngine::new(&table, config)?;
    let min_age = args.min_age.unwrap_or(config.min_entry_age);
    let max_age = args.max_age.unwrap_or(config.max_entry_age);

    let mut requests = Vec::new();
    for age in min_age..=max_age {
        for kind in ProductKind::ALL {
            let term = kind.requires_term().then_some(args.term);
            requests.push(ValuationRequest {
                product: Product::new(kind, term)?,
                age,
                interest_rate: args.interest,
            });
        }
    }

    let calc_start = Instant::now();
    let results = engine.value_batch(&requests);
    info!("valued {} cells in {:?}", results.len(), calc_start.elapsed());

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let mut written = 0usize;

    for (request, result) in requests.iter().zip(results) {
        match result {
            Ok(valuation) => {
                writer.serialize(GridRow {
                    age: valuation.age,
                    product: valuation.product.kind().name(),
                    term: valuation.product.term(),
                    label: &valuation.label,
                    value: valuation.value,
                })?;
                written += 1;
            }
            Err(e) => warn!(
                "skipping {} at age {}: {}",
                request.product.kind(),
                request.age,
                e
            ),
        }
    }
    writer.flush()?;

    println!("Wrote {} rows to {}", written, args.output.display());
    Ok(())
}
