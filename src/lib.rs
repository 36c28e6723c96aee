//! Select Valuation - present values from select-and-ultimate mortality tables
//!
//! This library provides:
//! - Select-and-ultimate mortality tables with duration-aware rate lookup
//! - CSV loading of AM92-style table files
//! - Multi-year survival probabilities for a given entry age
//! - Annual assurance and annuity-due present values with actuarial labels
//!
//! Everything operates on an immutable table; engines borrow it and may be
//! shared across threads freely.

pub mod assumptions;
pub mod config;
pub mod error;
pub mod valuation;

// Re-export commonly used types
pub use assumptions::{Assumptions, MortalityTable, RawTableRow, TableLoader};
pub use config::ValuationConfig;
pub use error::{Error, InvalidArgumentError, InvalidTableError, Result};
pub use valuation::{
    InterestRate, Product, ProductKind, SurvivalEngine, Valuation, ValuationEngine,
    ValuationRequest,
};
