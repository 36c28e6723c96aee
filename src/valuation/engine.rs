//! Present values of assurances and annuities-due
//!
//! All products are annual: death benefits are paid at the end of the year of
//! death, annuity payments at the start of each year survived.
//!
//! # Whole-life truncation
//! Whole-life sums stop at `ValuationConfig::max_projection_age` (default 120)
//! rather than at the table's last age. A table that ends earlier contributes
//! nothing past its end, since survival beyond the table is zero. A table that
//! runs past the truncation age loses the tail, and the engine logs a warning
//! when it is built in that state.

use log::{debug, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::discount::InterestRate;
use super::products::{Product, ProductKind, Valuation};
use super::survival::{SurvivalEngine, SurvivalStep};
use crate::assumptions::MortalityTable;
use crate::config::ValuationConfig;
use crate::error::InvalidArgumentError;

/// One line of a batch valuation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuationRequest {
    pub product: Product,
    pub age: u32,
    pub interest_rate: f64,
}

/// Stateless valuation over a borrowed, immutable table
#[derive(Debug, Clone, Copy)]
pub struct ValuationEngine<'a> {
    survival: SurvivalEngine<'a>,
    config: ValuationConfig,
}

impl<'a> ValuationEngine<'a> {
    pub fn new(
        table: &'a MortalityTable,
        config: ValuationConfig,
    ) -> Result<Self, InvalidArgumentError> {
        config.validate()?;

        if let Some(max_age) = table.max_age() {
            if max_age > config.max_projection_age {
                warn!(
                    "table runs to age {} but whole-life sums stop at age {}",
                    max_age, config.max_projection_age
                );
            }
        }

        Ok(Self {
            survival: SurvivalEngine::new(table, config),
            config,
        })
    }

    /// Engine with the default configuration
    pub fn with_defaults(table: &'a MortalityTable) -> Self {
        Self {
            survival: SurvivalEngine::new(table, ValuationConfig::default()),
            config: ValuationConfig::default(),
        }
    }

    pub fn config(&self) -> &ValuationConfig {
        &self.config
    }

    pub fn survival(&self) -> &SurvivalEngine<'a> {
        &self.survival
    }

    /// Aₓ = Σ(k=0 to ω-x) vᵏ⁺¹ · ₖpₓ · q[x]+k, with ω the projection age
    pub fn whole_life_assurance(&self, x: u32, i: f64) -> Result<f64, InvalidArgumentError> {
        let rate = InterestRate::new(i)?;
        let last_k = self.whole_life_years(x)?;
        self.death_benefit_sum(x, last_k as usize + 1, &rate)
    }

    /// A¹ₓ:ₙ = Σ(k=0 to n-1) vᵏ⁺¹ · ₖpₓ · q[x]+k
    pub fn term_assurance(&self, x: u32, n: u32, i: f64) -> Result<f64, InvalidArgumentError> {
        let rate = InterestRate::new(i)?;
        check_term(n)?;
        self.death_benefit_sum(x, n as usize, &rate)
    }

    /// ₙEₓ = vⁿ · ₙpₓ
    pub fn pure_endowment(&self, x: u32, n: u32, i: f64) -> Result<f64, InvalidArgumentError> {
        let rate = InterestRate::new(i)?;
        check_term(n)?;
        Ok(rate.v_pow(n) * self.survival.survival_probability(x, n)?)
    }

    /// Aₓ:ₙ = A¹ₓ:ₙ + vⁿ · ₙpₓ
    pub fn endowment_assurance(
        &self,
        x: u32,
        n: u32,
        i: f64,
    ) -> Result<f64, InvalidArgumentError> {
        Ok(self.term_assurance(x, n, i)? + self.pure_endowment(x, n, i)?)
    }

    /// äₓ = 1 + Σ(k=1 to ω-x) vᵏ · ₖpₓ
    pub fn whole_life_annuity(&self, x: u32, i: f64) -> Result<f64, InvalidArgumentError> {
        let rate = InterestRate::new(i)?;
        let last_k = self.whole_life_years(x)?;
        self.annuity_due_sum(x, last_k as usize + 1, &rate)
    }

    /// äₓ:ₙ = 1 + Σ(k=1 to n-1) vᵏ · ₖpₓ
    pub fn term_annuity(&self, x: u32, n: u32, i: f64) -> Result<f64, InvalidArgumentError> {
        let rate = InterestRate::new(i)?;
        check_term(n)?;
        self.annuity_due_sum(x, n as usize, &rate)
    }

    /// Value any catalogued product and attach its symbolic label
    pub fn value(
        &self,
        product: &Product,
        x: u32,
        i: f64,
    ) -> Result<Valuation, InvalidArgumentError> {
        // Re-check so deserialized products get the same term rules
        let product = Product::new(product.kind(), product.term())?;
        let n = product.term().unwrap_or_default();

        let value = match product.kind() {
            ProductKind::WholeLifeAssurance => self.whole_life_assurance(x, i)?,
            ProductKind::TermAssurance => self.term_assurance(x, n, i)?,
            ProductKind::EndowmentAssurance => self.endowment_assurance(x, n, i)?,
            ProductKind::WholeLifeAnnuity => self.whole_life_annuity(x, i)?,
            ProductKind::TermAnnuity => self.term_annuity(x, n, i)?,
        };

        let label = product.label(x);
        debug!("{} = {:.6} (age {}, i = {})", label, value, x, i);

        Ok(Valuation {
            product,
            age: x,
            interest_rate: i,
            value,
            label,
        })
    }

    /// Value many requests in parallel; results keep the request order
    pub fn value_batch(
        &self,
        requests: &[ValuationRequest],
    ) -> Vec<Result<Valuation, InvalidArgumentError>> {
        requests
            .par_iter()
            .map(|req| self.value(&req.product, req.age, req.interest_rate))
            .collect()
    }

    fn whole_life_years(&self, x: u32) -> Result<u32, InvalidArgumentError> {
        self.config.check_entry_age("age", x)?;
        Ok(self.config.max_projection_age - x)
    }

    /// Σ over the first `steps` years of vᵏ⁺¹ · ₖpₓ · q[x]+k
    fn death_benefit_sum(
        &self,
        x: u32,
        steps: usize,
        rate: &InterestRate,
    ) -> Result<f64, InvalidArgumentError> {
        let total: f64 = self
            .live_steps(x, steps)?
            .map(|s| rate.v_pow(s.k.saturating_add(1)) * s.survival * s.mortality)
            .sum();
        Ok(total)
    }

    /// 1 + Σ over steps 1..`payments` of vᵏ · ₖpₓ
    fn annuity_due_sum(
        &self,
        x: u32,
        payments: usize,
        rate: &InterestRate,
    ) -> Result<f64, InvalidArgumentError> {
        let later: f64 = self
            .live_steps(x, payments)?
            .skip(1)
            .map(|s| rate.v_pow(s.k) * s.survival)
            .sum();
        Ok(1.0 + later)
    }

    /// First `steps` years, stopping early once survival reaches zero since
    /// every later term is zero too.
    fn live_steps(
        &self,
        x: u32,
        steps: usize,
    ) -> Result<impl Iterator<Item = SurvivalStep> + 'a, InvalidArgumentError> {
        Ok(self
            .survival
            .steps(x)?
            .take(steps)
            .take_while(is_alive))
    }
}

fn is_alive(step: &SurvivalStep) -> bool {
    step.survival > 0.0
}

fn check_term(n: u32) -> Result<(), InvalidArgumentError> {
    if n == 0 {
        return Err(InvalidArgumentError::NonPositiveTerm {
            field: "term",
            value: n,
        });
    }
    Ok(())
}
