//! Select-and-ultimate mortality table
//!
//! Rates are keyed by attained age, with three columns:
//! - duration 0 (first policy year)
//! - duration 1 (second policy year)
//! - durations 2+ (ultimate)
//!
//! Missing select rates are backfilled from the ultimate column when the table
//! is built, so lookups never see an absent rate.

use std::collections::BTreeMap;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::InvalidTableError;

pub const DURATION_0_COLUMN: &str = "duration_0";
pub const DURATION_1_COLUMN: &str = "duration_1";
pub const ULTIMATE_COLUMN: &str = "durations_2+";

/// One source row as delivered by a table loader, before validation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawTableRow {
    pub age: i64,
    /// Select rate in the first policy year, if the source has one
    pub duration_0: Option<f64>,
    /// Select rate in the second policy year, if the source has one
    pub duration_1: Option<f64>,
    pub ultimate: f64,
}

impl RawTableRow {
    pub fn new(age: i64, duration_0: Option<f64>, duration_1: Option<f64>, ultimate: f64) -> Self {
        Self {
            age,
            duration_0,
            duration_1,
            ultimate,
        }
    }

    /// Row with no select period (all durations use the ultimate rate)
    pub fn ultimate_only(age: i64, ultimate: f64) -> Self {
        Self::new(age, None, None, ultimate)
    }
}

/// Rates for a single attained age after backfill
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectRates {
    pub duration_0: f64,
    pub duration_1: f64,
    pub ultimate: f64,
}

/// Which column a lookup falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectDuration {
    Zero,
    One,
    /// Duration 2 and beyond. Negative durations also land here.
    Ultimate,
}

impl SelectDuration {
    pub fn from_ages(attained_age: u32, entry_age: u32) -> Self {
        match i64::from(attained_age) - i64::from(entry_age) {
            0 => SelectDuration::Zero,
            1 => SelectDuration::One,
            _ => SelectDuration::Ultimate,
        }
    }
}

/// Immutable select-and-ultimate mortality table
#[derive(Debug, Clone, PartialEq)]
pub struct MortalityTable {
    rates: BTreeMap<u32, SelectRates>,
}

impl MortalityTable {
    /// Build a table from source rows.
    ///
    /// Fails on an empty source, a negative or duplicate age, or any rate that
    /// is not a number in [0, 1]. Absent select rates take the ultimate rate.
    pub fn from_rows<I>(rows: I) -> Result<Self, InvalidTableError>
    where
        I: IntoIterator<Item = RawTableRow>,
    {
        let mut rates = BTreeMap::new();

        for row in rows {
            if row.age < 0 {
                return Err(InvalidTableError::NegativeAge { age: row.age });
            }
            let age = u32::try_from(row.age)
                .map_err(|_| InvalidTableError::AgeOutOfRange { age: row.age })?;

            let ultimate = check_rate(row.age, ULTIMATE_COLUMN, row.ultimate)?;
            let duration_0 = match row.duration_0 {
                Some(q) => check_rate(row.age, DURATION_0_COLUMN, q)?,
                None => ultimate,
            };
            let duration_1 = match row.duration_1 {
                Some(q) => check_rate(row.age, DURATION_1_COLUMN, q)?,
                None => ultimate,
            };

            let entry = SelectRates {
                duration_0,
                duration_1,
                ultimate,
            };
            if rates.insert(age, entry).is_some() {
                return Err(InvalidTableError::DuplicateAge { age: row.age });
            }
        }

        let table = Self { rates };
        let (min_age, max_age) = match (table.min_age(), table.max_age()) {
            (Some(min), Some(max)) => (min, max),
            _ => return Err(InvalidTableError::Empty),
        };

        let gaps = u64::from(max_age - min_age) + 1 - table.rates.len() as u64;
        if gaps > 0 {
            warn!(
                "mortality table has {} missing ages between {} and {}; \
                 those ages are treated as certain death",
                gaps, min_age, max_age
            );
        }
        debug!(
            "built mortality table: {} ages, range {}..={}",
            table.rates.len(),
            min_age,
            max_age
        );

        Ok(table)
    }

    /// Lowest age in the table
    pub fn min_age(&self) -> Option<u32> {
        self.rates.keys().next().copied()
    }

    /// Highest age in the table
    pub fn max_age(&self) -> Option<u32> {
        self.rates.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn contains_age(&self, age: u32) -> bool {
        self.rates.contains_key(&age)
    }

    /// Backfilled rates for an attained age, if the age is in the table
    pub fn select_rates(&self, age: u32) -> Option<&SelectRates> {
        self.rates.get(&age)
    }

    /// Iterate ages in ascending order with their rates
    pub fn iter(&self) -> impl Iterator<Item = (u32, &SelectRates)> {
        self.rates.iter().map(|(age, rates)| (*age, rates))
    }

    /// One-year mortality rate q for a life now aged `attained_age` that
    /// entered at `entry_age`.
    ///
    /// # Boundary policy
    /// An attained age that is not in the table returns 1.0: a life beyond the
    /// table's domain is certain to die within the year. This is what closes
    /// whole-life sums off at the end of the table.
    pub fn rate(&self, attained_age: u32, entry_age: u32) -> f64 {
        let Some(rates) = self.rates.get(&attained_age) else {
            return 1.0;
        };

        match SelectDuration::from_ages(attained_age, entry_age) {
            SelectDuration::Zero => rates.duration_0,
            SelectDuration::One => rates.duration_1,
            SelectDuration::Ultimate => rates.ultimate,
        }
    }

    /// Ultimate rate for an attained age, 1.0 outside the table
    pub fn ultimate_rate(&self, attained_age: u32) -> f64 {
        self.rates
            .get(&attained_age)
            .map(|r| r.ultimate)
            .unwrap_or(1.0)
    }
}

fn check_rate(age: i64, column: &'static str, value: f64) -> Result<f64, InvalidTableError> {
    if value.is_nan() {
        return Err(InvalidTableError::NonNumericRate {
            age,
            column,
            value: value.to_string(),
        });
    }
    if !(0.0..=1.0).contains(&value) {
        return Err(InvalidTableError::RateOutOfRange { age, column, value });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> MortalityTable {
        MortalityTable::from_rows(vec![
            RawTableRow::new(40, Some(0.002), Some(0.0022), 0.0024),
            RawTableRow::new(41, Some(0.0023), Some(0.0025), 0.0027),
            RawTableRow::new(42, None, None, 0.003),
        ])
        .unwrap()
    }

    #[test]
    fn test_duration_selects_column() {
        let table = sample_table();

        assert_eq!(table.rate(40, 40), 0.002);
        assert_eq!(table.rate(41, 40), 0.0025);
        assert_eq!(table.rate(42, 40), 0.003);
        assert_eq!(table.rate(41, 41), 0.0023);
    }

    #[test]
    fn test_select_rates_backfilled_from_ultimate() {
        let table = sample_table();
        let rates = table.select_rates(42).unwrap();

        assert_eq!(rates.duration_0, 0.003);
        assert_eq!(rates.duration_1, 0.003);
        assert_eq!(table.rate(42, 42), 0.003);
        assert_eq!(table.rate(42, 41), 0.003);
    }

    #[test]
    fn test_beyond_table_is_certain_death() {
        let table = sample_table();

        assert_eq!(table.max_age(), Some(42));
        assert_eq!(table.rate(43, 40), 1.0);
        assert_eq!(table.rate(43, 43), 1.0);
        assert_eq!(table.ultimate_rate(200), 1.0);
    }

    #[test]
    fn test_negative_duration_uses_ultimate() {
        let table = sample_table();
        assert_eq!(table.rate(40, 42), 0.0024);
    }

    #[test]
    fn test_rejects_rate_above_one() {
        let result = MortalityTable::from_rows(vec![RawTableRow::new(40, Some(1.5), None, 0.002)]);
        assert!(matches!(
            result,
            Err(InvalidTableError::RateOutOfRange { age: 40, column: DURATION_0_COLUMN, .. })
        ));
    }

    #[test]
    fn test_rejects_nan_rate() {
        let result = MortalityTable::from_rows(vec![RawTableRow::ultimate_only(40, f64::NAN)]);
        assert!(matches!(result, Err(InvalidTableError::NonNumericRate { .. })));
    }

    #[test]
    fn test_rejects_duplicate_and_negative_ages() {
        let dup = MortalityTable::from_rows(vec![
            RawTableRow::ultimate_only(40, 0.002),
            RawTableRow::ultimate_only(40, 0.003),
        ]);
        assert!(matches!(dup, Err(InvalidTableError::DuplicateAge { age: 40 })));

        let neg = MortalityTable::from_rows(vec![RawTableRow::ultimate_only(-1, 0.002)]);
        assert!(matches!(neg, Err(InvalidTableError::NegativeAge { age: -1 })));
    }

    #[test]
    fn test_age_beyond_u32_rejected() {
        let too_old = i64::from(u32::MAX) + 1;
        let result = MortalityTable::from_rows(vec![RawTableRow::ultimate_only(too_old, 0.01)]);

        match result {
            Err(InvalidTableError::AgeOutOfRange { age }) => assert_eq!(age, too_old),
            other => panic!("expected AgeOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_full_u32_age_span_builds() {
        let table = MortalityTable::from_rows(vec![
            RawTableRow::ultimate_only(0, 0.01),
            RawTableRow::ultimate_only(i64::from(u32::MAX), 0.01),
        ])
        .unwrap();

        assert_eq!(table.min_age(), Some(0));
        assert_eq!(table.max_age(), Some(u32::MAX));
        assert_eq!(table.rate(1, 0), 1.0);
    }

    #[test]
    fn test_rejects_empty_table() {
        let result = MortalityTable::from_rows(Vec::new());
        assert!(matches!(result, Err(InvalidTableError::Empty)));
    }

    #[test]
    fn test_interior_gap_is_outside_domain() {
        let table = MortalityTable::from_rows(vec![
            RawTableRow::ultimate_only(40, 0.002),
            RawTableRow::ultimate_only(42, 0.003),
        ])
        .unwrap();

        assert!(!table.contains_age(41));
        assert_eq!(table.rate(41, 40), 1.0);
        assert_eq!(table.len(), 2);
    }
}
