//! CSV-based mortality table loader
//!
//! Reads the AM92-style layout: a few preamble lines, then headerless rows of
//! `age, duration_0, duration_1, durations_2+`. Select cells may be blank.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use log::{debug, info};

use super::mortality::{
    MortalityTable, RawTableRow, DURATION_0_COLUMN, DURATION_1_COLUMN, ULTIMATE_COLUMN,
};
use crate::error::InvalidTableError;

/// Preamble lines ahead of the data in the published table files
pub const DEFAULT_SKIP_ROWS: usize = 4;

/// Loader for delimited mortality table files
#[derive(Debug, Clone)]
pub struct TableLoader {
    skip_rows: usize,
    delimiter: u8,
}

impl Default for TableLoader {
    fn default() -> Self {
        Self {
            skip_rows: DEFAULT_SKIP_ROWS,
            delimiter: b',',
        }
    }
}

impl TableLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of preamble lines to discard before the first data row
    pub fn skip_rows(mut self, rows: usize) -> Self {
        self.skip_rows = rows;
        self
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Load and validate a table from a file
    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> Result<MortalityTable, InvalidTableError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let table = self.load_reader(file)?;
        info!(
            "loaded mortality table from {} ({} ages)",
            path.display(),
            table.len()
        );
        Ok(table)
    }

    /// Load and validate a table from any reader
    pub fn load_reader<R: Read>(&self, reader: R) -> Result<MortalityTable, InvalidTableError> {
        let rows = self.parse_rows(reader)?;
        MortalityTable::from_rows(rows)
    }

    /// Parse raw rows without building the table.
    ///
    /// Rows with a blank or non-numeric age are dropped. Rate cells are parsed
    /// strictly: blank select cells become `None`, anything else must be a number.
    pub fn parse_rows<R: Read>(&self, reader: R) -> Result<Vec<RawTableRow>, InvalidTableError> {
        let mut buffered = BufReader::new(reader);
        let mut discard = String::new();
        for _ in 0..self.skip_rows {
            discard.clear();
            if buffered.read_line(&mut discard)? == 0 {
                break;
            }
        }

        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(buffered);

        let mut rows = Vec::new();
        let mut dropped = 0usize;

        for result in csv_reader.records() {
            let record = result?;
            let line = record
                .position()
                .map(|p| p.line() + self.skip_rows as u64)
                .unwrap_or(0);

            let Some(age) = parse_age(record.get(0), line)? else {
                dropped += 1;
                continue;
            };

            let duration_0 = parse_rate(record.get(1), age, DURATION_0_COLUMN)?;
            let duration_1 = parse_rate(record.get(2), age, DURATION_1_COLUMN)?;
            let ultimate = parse_rate(record.get(3), age, ULTIMATE_COLUMN)?
                .ok_or(InvalidTableError::MissingUltimateRate { age })?;

            rows.push(RawTableRow::new(age, duration_0, duration_1, ultimate));
        }

        debug!("parsed {} table rows, dropped {} without an age", rows.len(), dropped);
        Ok(rows)
    }
}

/// `None` for rows that carry no usable age (blank lines, footers, notes)
fn parse_age(cell: Option<&str>, line: u64) -> Result<Option<i64>, InvalidTableError> {
    let text = cell.map(str::trim).unwrap_or("");
    if text.is_empty() {
        return Ok(None);
    }
    if let Ok(age) = text.parse::<i64>() {
        return Ok(Some(age));
    }
    match text.parse::<f64>() {
        Ok(age) if age.is_finite() && age.fract() == 0.0 => Ok(Some(age as i64)),
        Ok(age) => Err(InvalidTableError::Parse {
            line,
            message: format!("age {} is not a whole number", age),
        }),
        Err(_) => Ok(None),
    }
}

fn parse_rate(
    cell: Option<&str>,
    age: i64,
    column: &'static str,
) -> Result<Option<f64>, InvalidTableError> {
    let text = cell.map(str::trim).unwrap_or("");
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<f64>()
        .map(Some)
        .map_err(|_| InvalidTableError::NonNumericRate {
            age,
            column,
            value: text.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
AM92 ultimate and select mortality
Source: test fixture

x,q[x],q[x-1]+1,qx
17,0.000519,0.000568,0.000591
18,0.000503,0.000550,0.000574
19,,,0.000560
,,,
Notes: footer line
";

    #[test]
    fn test_load_skips_preamble_and_footer() {
        let table = TableLoader::new().load_reader(SAMPLE.as_bytes()).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.min_age(), Some(17));
        assert_eq!(table.max_age(), Some(19));
        assert_eq!(table.rate(17, 17), 0.000519);
        assert_eq!(table.rate(18, 17), 0.000550);
    }

    #[test]
    fn test_blank_select_cells_backfilled() {
        let table = TableLoader::new().load_reader(SAMPLE.as_bytes()).unwrap();
        let rates = table.select_rates(19).unwrap();

        assert_eq!(rates.duration_0, 0.000560);
        assert_eq!(rates.duration_1, 0.000560);
    }

    #[test]
    fn test_parse_rows_keeps_select_gaps_as_none() {
        let rows = TableLoader::new().parse_rows(SAMPLE.as_bytes()).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2], RawTableRow::new(19, None, None, 0.000560));
    }

    #[test]
    fn test_non_numeric_rate_rejected() {
        let data = "40,0.002,abc,0.003\n";
        let result = TableLoader::new().skip_rows(0).load_reader(data.as_bytes());

        match result {
            Err(InvalidTableError::NonNumericRate { age, column, value }) => {
                assert_eq!(age, 40);
                assert_eq!(column, DURATION_1_COLUMN);
                assert_eq!(value, "abc");
            }
            other => panic!("expected NonNumericRate, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_ultimate_rejected() {
        let data = "40,0.002,0.0025\n";
        let result = TableLoader::new().skip_rows(0).load_reader(data.as_bytes());
        assert!(matches!(result, Err(InvalidTableError::MissingUltimateRate { age: 40 })));
    }

    #[test]
    fn test_out_of_range_rate_rejected() {
        let data = "40,1.5,0.0025,0.003\n";
        let result = TableLoader::new().skip_rows(0).load_reader(data.as_bytes());
        assert!(matches!(result, Err(InvalidTableError::RateOutOfRange { .. })));
    }

    #[test]
    fn test_semicolon_delimiter() {
        let data = "40;0.002;0.0025;0.003\n41;;;0.0035\n";
        let table = TableLoader::new()
            .skip_rows(0)
            .delimiter(b';')
            .load_reader(data.as_bytes())
            .unwrap();

        assert_eq!(table.rate(41, 41), 0.0035);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = TableLoader::new().load_path("does/not/exist.csv");
        assert!(matches!(result, Err(InvalidTableError::Io(_))));
    }
}
