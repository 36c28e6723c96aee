//! Survival and present-value calculations over a select table
//!
//! - [`SurvivalEngine`]: multi-year survival probabilities for a given entry age
//! - [`ValuationEngine`]: the five annual products (whole life, term and
//!   endowment assurance; whole life and term annuity-due)
//! - [`InterestRate`]: validated annual effective rate and discount factors
//!
//! # Example
//!
//! ```rust
//! use select_valuation::{MortalityTable, RawTableRow, ValuationEngine, Product};
//!
//! let rows = (17..=110).map(|age| {
//!     RawTableRow::ultimate_only(age, 0.001 * (1.0 + (age - 17) as f64 * 0.1))
//! });
//! let table = MortalityTable::from_rows(rows)?;
//! let engine = ValuationEngine::with_defaults(&table);
//!
//! let valuation = engine.value(&Product::term_assurance(20)?, 40, 0.04)?;
//! println!("{}", valuation);
//! # Ok::<(), select_valuation::Error>(())
//! ```

mod discount;
mod engine;
mod products;
mod survival;

pub use discount::InterestRate;
pub use engine::{ValuationEngine, ValuationRequest};
pub use products::{Product, ProductKind, Valuation};
pub use survival::{SurvivalEngine, SurvivalStep, SurvivalSteps};
