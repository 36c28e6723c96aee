//! Valuation configuration
//!
//! Loadable from JSON; every field falls back to its default when omitted.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::InvalidArgumentError;

/// Default whole-life truncation age
pub const DEFAULT_MAX_PROJECTION_AGE: u32 = 120;

/// Default minimum insurable entry age
pub const DEFAULT_MIN_ENTRY_AGE: u32 = 17;

/// Default maximum entry age
pub const DEFAULT_MAX_ENTRY_AGE: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationConfig {
    /// Last attained age included in whole-life sums.
    ///
    /// This is a truncation, not a property of the table. If the table runs
    /// past this age, whole-life results omit the tail beyond it.
    pub max_projection_age: u32,

    /// Youngest entry age accepted by the engines
    pub min_entry_age: u32,

    /// Oldest entry age accepted by the engines
    pub max_entry_age: u32,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            max_projection_age: DEFAULT_MAX_PROJECTION_AGE,
            min_entry_age: DEFAULT_MIN_ENTRY_AGE,
            max_entry_age: DEFAULT_MAX_ENTRY_AGE,
        }
    }
}

impl ValuationConfig {
    pub fn from_json_str(json: &str) -> Result<Self, InvalidArgumentError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| InvalidArgumentError::InvalidConfig {
                field: "json",
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, InvalidArgumentError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| InvalidArgumentError::InvalidConfig {
            field: "path",
            message: format!("{}: {}", path.display(), e),
        })?;
        Self::from_json_str(&json)
    }

    /// Set the whole-life truncation age
    pub fn with_max_projection_age(mut self, age: u32) -> Self {
        self.max_projection_age = age;
        self
    }

    /// Set the accepted entry age range (inclusive)
    pub fn with_entry_age_range(mut self, min: u32, max: u32) -> Self {
        self.min_entry_age = min;
        self.max_entry_age = max;
        self
    }

    pub fn validate(&self) -> Result<(), InvalidArgumentError> {
        if self.min_entry_age > self.max_entry_age {
            return Err(InvalidArgumentError::InvalidConfig {
                field: "min_entry_age",
                message: format!(
                    "{} exceeds max_entry_age {}",
                    self.min_entry_age, self.max_entry_age
                ),
            });
        }
        if self.max_entry_age > self.max_projection_age {
            return Err(InvalidArgumentError::InvalidConfig {
                field: "max_entry_age",
                message: format!(
                    "{} exceeds max_projection_age {}",
                    self.max_entry_age, self.max_projection_age
                ),
            });
        }
        Ok(())
    }

    /// Check an entry age against the configured range
    pub fn check_entry_age(
        &self,
        field: &'static str,
        age: u32,
    ) -> Result<(), InvalidArgumentError> {
        if age < self.min_entry_age || age > self.max_entry_age {
            return Err(InvalidArgumentError::AgeOutOfRange {
                field,
                value: age,
                min: self.min_entry_age,
                max: self.max_entry_age,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ValuationConfig::default();
        assert_eq!(config.max_projection_age, 120);
        assert_eq!(config.min_entry_age, 17);
        assert_eq!(config.max_entry_age, 120);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "max_projection_age": 110, "max_entry_age": 100 }"#;
        let config = ValuationConfig::from_json_str(json).unwrap();
        assert_eq!(config.max_projection_age, 110);
        assert_eq!(config.min_entry_age, 17);
        assert_eq!(config.max_entry_age, 100);
    }

    #[test]
    fn test_inconsistent_ranges_rejected() {
        let config = ValuationConfig::default().with_entry_age_range(60, 50);
        assert!(matches!(
            config.validate(),
            Err(InvalidArgumentError::InvalidConfig { field: "min_entry_age", .. })
        ));

        let config = ValuationConfig::default().with_max_projection_age(100);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_json_rejected() {
        assert!(ValuationConfig::from_json_str("{ not json").is_err());
    }

    #[test]
    fn test_check_entry_age() {
        let config = ValuationConfig::default();
        assert!(config.check_entry_age("entry_age", 17).is_ok());
        assert!(config.check_entry_age("entry_age", 120).is_ok());
        assert!(matches!(
            config.check_entry_age("entry_age", 10),
            Err(InvalidArgumentError::AgeOutOfRange { value: 10, min: 17, .. })
        ));
    }
}
