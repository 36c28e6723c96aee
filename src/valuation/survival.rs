//! Multi-year survival probabilities from a select table

use crate::assumptions::MortalityTable;
use crate::config::ValuationConfig;
use crate::error::InvalidArgumentError;

/// Survival probabilities for lives entering at a given age.
///
/// Borrows the table; many engines can share one table across threads.
#[derive(Debug, Clone, Copy)]
pub struct SurvivalEngine<'a> {
    table: &'a MortalityTable,
    config: ValuationConfig,
}

impl<'a> SurvivalEngine<'a> {
    pub fn new(table: &'a MortalityTable, config: ValuationConfig) -> Self {
        Self { table, config }
    }

    pub fn table(&self) -> &'a MortalityTable {
        self.table
    }

    /// ₖpₓ: probability a life entering at `entry_age` survives `k` years.
    ///
    /// ```text
    /// ₖpₓ = ∏(t=0 to k-1) (1 - q[x]+t)
    /// ```
    /// k = 0 gives exactly 1.0. Once a year's rate is 1.0 (beyond the table)
    /// the result is 0.0 for that k and every larger k.
    pub fn survival_probability(
        &self,
        entry_age: u32,
        k: u32,
    ) -> Result<f64, InvalidArgumentError> {
        self.config.check_entry_age("entry_age", entry_age)?;
        Ok(self.product_to(entry_age, k))
    }

    /// Year-by-year steps `(k, ₖpₓ, q[x]+k)` for k = 0, 1, 2, …
    ///
    /// The iterator is unbounded; callers take as many years as they need.
    pub fn steps(&self, entry_age: u32) -> Result<SurvivalSteps<'a>, InvalidArgumentError> {
        self.config.check_entry_age("entry_age", entry_age)?;
        Ok(SurvivalSteps {
            table: self.table,
            entry_age,
            k: 0,
            survival: 1.0,
        })
    }

    /// ₖqₓ = 1 - ₖpₓ
    pub fn death_probability(&self, entry_age: u32, k: u32) -> Result<f64, InvalidArgumentError> {
        Ok(1.0 - self.survival_probability(entry_age, k)?)
    }

    /// `[₀pₓ, ₁pₓ, …, ₙpₓ]` for n = `years`, built as a running product.
    ///
    /// Each entry equals `survival_probability(entry_age, k)` exactly, since the
    /// factors are multiplied in the same order.
    pub fn survival_curve(
        &self,
        entry_age: u32,
        years: u32,
    ) -> Result<Vec<f64>, InvalidArgumentError> {
        self.config.check_entry_age("entry_age", entry_age)?;

        let mut curve = Vec::with_capacity(years as usize + 1);
        let mut p = 1.0;
        curve.push(p);
        for t in 0..years {
            p *= 1.0 - self.table.rate(entry_age.saturating_add(t), entry_age);
            curve.push(p);
        }
        Ok(curve)
    }

    fn product_to(&self, entry_age: u32, k: u32) -> f64 {
        if k == 0 {
            return 1.0;
        }
        let mut p = 1.0;
        for t in 0..k {
            p *= 1.0 - self.table.rate(entry_age.saturating_add(t), entry_age);
            if p == 0.0 {
                break;
            }
        }
        p
    }
}

/// One projection year for a life that entered at a fixed age
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurvivalStep {
    /// Years since entry
    pub k: u32,
    /// ₖpₓ, probability of being alive at the start of the year
    pub survival: f64,
    /// q[x]+k, probability of dying during the year
    pub mortality: f64,
}

/// Iterator behind [`SurvivalEngine::steps`]
#[derive(Debug, Clone)]
pub struct SurvivalSteps<'a> {
    table: &'a MortalityTable,
    entry_age: u32,
    k: u32,
    survival: f64,
}

impl Iterator for SurvivalSteps<'_> {
    type Item = SurvivalStep;

    fn next(&mut self) -> Option<Self::Item> {
        let mortality = self
            .table
            .rate(self.entry_age.saturating_add(self.k), self.entry_age);
        let step = SurvivalStep {
            k: self.k,
            survival: self.survival,
            mortality,
        };
        self.survival *= 1.0 - mortality;
        self.k = self.k.saturating_add(1);
        Some(step)
    }
}
