//! Annual effective interest and discount factors

use serde::{Deserialize, Serialize};

use crate::error::InvalidArgumentError;

/// Validated annual effective interest rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct InterestRate {
    annual_rate: f64,
}

impl InterestRate {
    /// Accepts any finite rate strictly greater than -1
    pub fn new(annual_rate: f64) -> Result<Self, InvalidArgumentError> {
        if !annual_rate.is_finite() || annual_rate <= -1.0 {
            return Err(InvalidArgumentError::InterestRateOutOfRange {
                field: "interest_rate",
                value: annual_rate,
            });
        }
        Ok(Self { annual_rate })
    }

    pub fn annual_rate(&self) -> f64 {
        self.annual_rate
    }

    /// Discount factor v = 1 / (1 + i)
    pub fn v(&self) -> f64 {
        1.0 / (1.0 + self.annual_rate)
    }

    /// Discount rate d = i · v
    pub fn d(&self) -> f64 {
        self.annual_rate * self.v()
    }

    /// v^k, the value now of 1 payable in k years
    pub fn v_pow(&self, years: u32) -> f64 {
        match i32::try_from(years) {
            Ok(k) => self.v().powi(k),
            Err(_) => self.v().powf(f64::from(years)),
        }
    }
}

impl TryFrom<f64> for InterestRate {
    type Error = InvalidArgumentError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<InterestRate> for f64 {
    fn from(rate: InterestRate) -> Self {
        rate.annual_rate
    }
}
