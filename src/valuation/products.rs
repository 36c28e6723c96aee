//! Product catalogue and valuation results

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InvalidArgumentError;

/// The five single-life contracts the engine values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    /// Aₓ: 1 payable at the end of the year of death
    WholeLifeAssurance,
    /// A¹ₓ:ₙ: 1 payable at the end of the year of death within n years
    TermAssurance,
    /// Aₓ:ₙ: term assurance plus 1 on survival to n
    EndowmentAssurance,
    /// äₓ: 1 at the start of each year survived
    WholeLifeAnnuity,
    /// äₓ:ₙ: at most n payments of 1 at the start of each year survived
    TermAnnuity,
}

impl ProductKind {
    pub const ALL: [ProductKind; 5] = [
        ProductKind::WholeLifeAssurance,
        ProductKind::TermAssurance,
        ProductKind::EndowmentAssurance,
        ProductKind::WholeLifeAnnuity,
        ProductKind::TermAnnuity,
    ];

    /// Whether the contract has a fixed term
    pub fn requires_term(&self) -> bool {
        matches!(
            self,
            ProductKind::TermAssurance | ProductKind::EndowmentAssurance | ProductKind::TermAnnuity
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProductKind::WholeLifeAssurance => "whole_life_assurance",
            ProductKind::TermAssurance => "term_assurance",
            ProductKind::EndowmentAssurance => "endowment_assurance",
            ProductKind::WholeLifeAnnuity => "whole_life_annuity",
            ProductKind::TermAnnuity => "term_annuity",
        }
    }
}

impl fmt::Display for ProductKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProductKind {
    type Err = InvalidArgumentError;

    /// Accepts snake_case or kebab-case names, case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        ProductKind::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| InvalidArgumentError::UnknownProduct(s.to_string()))
    }
}

/// A product kind with its term, if it has one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Product {
    kind: ProductKind,
    term: Option<u32>,
}

impl Product {
    /// Fails when a term product has no term or a zero term, or when a
    /// whole-life product is given a term.
    pub fn new(kind: ProductKind, term: Option<u32>) -> Result<Self, InvalidArgumentError> {
        match (kind.requires_term(), term) {
            (true, None) => Err(InvalidArgumentError::MissingTerm {
                product: kind.name(),
            }),
            (true, Some(0)) => Err(InvalidArgumentError::NonPositiveTerm {
                field: "term",
                value: 0,
            }),
            (false, Some(n)) => Err(InvalidArgumentError::UnexpectedTerm {
                product: kind.name(),
                value: n,
            }),
            _ => Ok(Self { kind, term }),
        }
    }

    pub fn whole_life_assurance() -> Self {
        Self {
            kind: ProductKind::WholeLifeAssurance,
            term: None,
        }
    }

    pub fn term_assurance(term: u32) -> Result<Self, InvalidArgumentError> {
        Self::new(ProductKind::TermAssurance, Some(term))
    }

    pub fn endowment_assurance(term: u32) -> Result<Self, InvalidArgumentError> {
        Self::new(ProductKind::EndowmentAssurance, Some(term))
    }

    pub fn whole_life_annuity() -> Self {
        Self {
            kind: ProductKind::WholeLifeAnnuity,
            term: None,
        }
    }

    pub fn term_annuity(term: u32) -> Result<Self, InvalidArgumentError> {
        Self::new(ProductKind::TermAnnuity, Some(term))
    }

    pub fn kind(&self) -> ProductKind {
        self.kind
    }

    pub fn term(&self) -> Option<u32> {
        self.term
    }

    /// Actuarial symbol with the age (and term) filled in, e.g. `A¹_{40:20}`
    pub fn label(&self, age: u32) -> String {
        let n = self.term.unwrap_or_default();
        match self.kind {
            ProductKind::WholeLifeAssurance => format!("A_{}", age),
            ProductKind::TermAssurance => format!("A¹_{{{}:{}}}", age, n),
            ProductKind::EndowmentAssurance => format!("A_{{{}:{}}}", age, n),
            ProductKind::WholeLifeAnnuity => format!("ä_{}", age),
            ProductKind::TermAnnuity => format!("ä_{{{}:{}}}", age, n),
        }
    }
}

/// Present value of one product for one life
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    pub product: Product,
    pub age: u32,
    pub interest_rate: f64,
    pub value: f64,
    pub label: String,
}

impl fmt::Display for Valuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {:.6}", self.label, self.value)
    }
}
