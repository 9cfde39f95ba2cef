//! CSV chromatogram input.
//!
//! Exports carry a header row; the time and intensity columns are located by
//! name, other columns are ignored. Comma, tab and semicolon delimiters are
//! recognised from the header line.

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use lcpeak::series::Series;

/// Default header of the retention time column
pub const DEFAULT_TIME_COLUMN: &str = "Time (min)";

/// Default header of the intensity column
pub const DEFAULT_INTENSITY_COLUMN: &str = "Value (EU)";

/// Column headers used to locate the trace
#[derive(Debug, Clone)]
pub struct ColumnNames {
    pub time: String,
    pub intensity: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            time: DEFAULT_TIME_COLUMN.to_string(),
            intensity: DEFAULT_INTENSITY_COLUMN.to_string(),
        }
    }
}

/// Read a series from a delimited text file
pub fn read_series(path: &Path, columns: &ColumnNames) -> Result<Series> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut reader = BufReader::new(file);

    let mut first_line = String::new();
    reader
        .read_line(&mut first_line)
        .with_context(|| format!("Failed to read header of {}", path.display()))?;
    let delimiter = detect_delimiter(&first_line);

    let chained = first_line.as_bytes().chain(reader);
    from_reader(chained, delimiter, columns).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Parse a series from any reader with a header row
pub fn from_reader<R: Read>(reader: R, delimiter: u8, columns: &ColumnNames) -> Result<Series> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
    let time_idx = column_index(&headers, &columns.time)?;
    let intensity_idx = column_index(&headers, &columns.intensity)?;

    let mut time = Vec::new();
    let mut intensity = Vec::new();
    for (row, record) in csv_reader.records().enumerate() {
        let record = record?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        // Header is line 1
        let line = row + 2;
        time.push(parse_field(record.get(time_idx), &columns.time, line)?);
        intensity.push(parse_field(record.get(intensity_idx), &columns.intensity, line)?);
    }

    Ok(Series::from_columns(time, intensity)?)
}

fn detect_delimiter(header: &str) -> u8 {
    [b'\t', b';', b',']
        .into_iter()
        .max_by_key(|&d| header.bytes().filter(|&b| b == d).count())
        .filter(|&d| header.as_bytes().contains(&d))
        .unwrap_or(b',')
}

fn column_index(headers: &[String], name: &str) -> Result<usize> {
    match headers.iter().position(|h| h.eq_ignore_ascii_case(name)) {
        Some(idx) => Ok(idx),
        None => bail!("Missing column '{}' (found: {})", name, headers.join(", ")),
    }
}

fn parse_field(field: Option<&str>, column: &str, line: usize) -> Result<f64> {
    let value = field.with_context(|| format!("Line {line}: missing '{column}' value"))?;
    value
        .parse::<f64>()
        .with_context(|| format!("Line {line}: '{value}' in column '{column}' is not a number"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_default_columns() {
        let csv = "Time (min),Value (EU),Flags\n0.0,1.5,a\n0.1,2.5,b\n0.2,1.0,\n";
        let series = from_reader(csv.as_bytes(), b',', &ColumnNames::default()).unwrap();
        assert_eq!(series.time(), &[0.0, 0.1, 0.2]);
        assert_eq!(series.intensity(), &[1.5, 2.5, 1.0]);
    }

    #[test]
    fn test_custom_columns_any_order() {
        let columns = ColumnNames {
            time: "rt".to_string(),
            intensity: "signal".to_string(),
        };
        let csv = "signal\tRT\n5\t1.0\n6\t2.0\n";
        let series = from_reader(csv.as_bytes(), b'\t', &columns).unwrap();
        assert_eq!(series.time(), &[1.0, 2.0]);
        assert_eq!(series.intensity(), &[5.0, 6.0]);
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("Time (min)\tValue (EU)\n"), b'\t');
        assert_eq!(detect_delimiter("Time (min);Value (EU)\n"), b';');
        assert_eq!(detect_delimiter("Time (min),Value (EU)\n"), b',');
        assert_eq!(detect_delimiter("time\n"), b',');
    }

    #[test]
    fn test_errors() {
        let columns = ColumnNames::default();
        assert!(from_reader("Time (min),Other\n0,1\n".as_bytes(), b',', &columns).is_err());
        assert!(from_reader("Time (min),Value (EU)\n0,x\n".as_bytes(), b',', &columns).is_err());
        // Time must increase
        assert!(from_reader("Time (min),Value (EU)\n1,1\n0,1\n".as_bytes(), b',', &columns).is_err());
    }

    #[test]
    fn test_read_series_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.csv");
        std::fs::write(&path, "Time (min);Value (EU)\n0.0;3.0\n0.5;4.0\n").unwrap();
        let series = read_series(&path, &ColumnNames::default()).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.intensity(), &[3.0, 4.0]);
    }
}
