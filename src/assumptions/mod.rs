//! Mortality assumptions: the select table and how it is loaded

mod mortality;
pub mod loader;

pub use mortality::{
    MortalityTable, RawTableRow, SelectDuration, SelectRates, DURATION_0_COLUMN,
    DURATION_1_COLUMN, ULTIMATE_COLUMN,
};
pub use loader::TableLoader;

use std::path::Path;

use crate::config::ValuationConfig;
use crate::error::Result;
use crate::valuation::ValuationEngine;

/// A table together with the configuration it is valued under
#[derive(Debug, Clone)]
pub struct Assumptions {
    pub mortality: MortalityTable,
    pub config: ValuationConfig,
}

impl Assumptions {
    /// Validates the configuration before pairing it with the table
    pub fn new(mortality: MortalityTable, config: ValuationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { mortality, config })
    }

    /// Load the table from a CSV file with the default loader and config
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        Self::from_csv_path_with(path, &TableLoader::new(), ValuationConfig::default())
    }

    pub fn from_csv_path_with(
        path: &Path,
        loader: &TableLoader,
        config: ValuationConfig,
    ) -> Result<Self> {
        let mortality = loader.load_path(path)?;
        Self::new(mortality, config)
    }

    /// Engine borrowing this table
    pub fn engine(&self) -> Result<ValuationEngine<'_>> {
        Ok(ValuationEngine::new(&self.mortality, self.config)?)
    }
}
