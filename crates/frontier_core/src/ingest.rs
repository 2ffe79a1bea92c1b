//! Price file ingestion
//!
//! Reads one `TICKER_prices.csv` file per asset into a [`PriceSeries`].
//!
//! Column detection works on normalised header names (trimmed, lower-cased,
//! with spaces, underscores and asterisks removed) and takes the first match
//! in [`PRICE_COLUMNS`]. Dates are parsed with the first pattern in
//! [`DATE_FORMATS`] that accepts every non-blank date cell of the file, so a
//! file is never read with a mix of day-first and year-first patterns.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use jiff::civil::Date;
use tracing::debug;

use crate::error::IngestError;
use crate::model::PriceSeries;

/// Accepted price headers, highest priority first (normalised form)
pub const PRICE_COLUMNS: &[&str] = &["adjclose", "close", "price"];

/// Accepted date header (normalised form)
pub const DATE_COLUMN: &str = "date";

/// Accepted date patterns, tried in this order
pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%Y/%m/%d", "%d/%m/%Y"];

/// Price cells treated as missing rather than malformed
const MISSING_MARKERS: &[&str] = &["null", "nan", "na", "n/a", "#n/a", "none"];

const FILENAME_SUFFIX: &str = "_prices";

/// Ticker from a `TICKER_prices.csv` style file name.
///
/// The `_prices` suffix is matched case-insensitively; a stem without it is
/// used whole.
pub fn ticker_from_filename(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let cut = stem.len().saturating_sub(FILENAME_SUFFIX.len());
    if stem.len() > FILENAME_SUFFIX.len()
        && stem.is_char_boundary(cut)
        && stem[cut..].eq_ignore_ascii_case(FILENAME_SUFFIX)
    {
        stem[..cut].to_string()
    } else {
        stem
    }
}

/// Load a single price file
pub fn load_price_file(path: &Path) -> Result<PriceSeries, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    load_price_reader(file, &name)
}

/// Load several price files, preserving argument order
pub fn load_price_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<PriceSeries>, IngestError> {
    paths
        .iter()
        .map(|p| load_price_file(p.as_ref()))
        .collect()
}

/// Parse price CSV content. `file_name` supplies the ticker and is used in
/// error messages.
pub fn load_price_reader<R: Read>(reader: R, file_name: &str) -> Result<PriceSeries, IngestError> {
    let csv_err = |source| IngestError::Csv {
        file: file_name.to_string(),
        source,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(normalize_header)
        .collect();

    let price_idx = PRICE_COLUMNS
        .iter()
        .find_map(|candidate| headers.iter().position(|h| h == candidate))
        .ok_or_else(|| IngestError::MissingColumn {
            file: file_name.to_string(),
        })?;
    let date_idx = headers
        .iter()
        .position(|h| h == DATE_COLUMN)
        .ok_or_else(|| IngestError::MissingDateColumn {
            file: file_name.to_string(),
        })?;

    // (line, date cell, price cell) for rows with a date
    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(csv_err)?;
        let date = record.get(date_idx).unwrap_or("");
        if date.is_empty() {
            continue;
        }
        let line = record.position().map_or(0, |p| p.line());
        let price = record.get(price_idx).unwrap_or("");
        rows.push((line, strip_time(date).to_string(), price.to_string()));
    }

    let format = detect_date_format(rows.iter().map(|(_, d, _)| d.as_str())).ok_or_else(|| {
        let value = rows
            .iter()
            .map(|(_, d, _)| d.as_str())
            .find(|d| Date::strptime(DATE_FORMATS[0], d).is_err())
            .unwrap_or_default()
            .to_string();
        IngestError::UnrecognizedDateFormat {
            file: file_name.to_string(),
            value,
        }
    })?;

    let mut points = Vec::with_capacity(rows.len());
    let mut missing = 0usize;
    for (line, date, price) in &rows {
        let Some(price) = parse_price(price).map_err(|_| IngestError::InvalidPrice {
            file: file_name.to_string(),
            line: *line,
            value: price.clone(),
        })?
        else {
            missing += 1;
            continue;
        };
        // detect_date_format accepted every cell with this pattern
        if let Ok(date) = Date::strptime(format, date) {
            points.push((date, price));
        }
    }

    let ticker = ticker_from_filename(Path::new(file_name));
    let series = PriceSeries::new(ticker, points);
    debug!(
        file = file_name,
        ticker = series.ticker(),
        rows = rows.len(),
        missing,
        kept = series.len(),
        date_format = format,
        "loaded price file"
    );
    Ok(series)
}

fn normalize_header(header: &str) -> String {
    header
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '*'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// `2024-01-05 00:00:00` and `2024-01-05T00:00:00Z` keep only the date part
fn strip_time(cell: &str) -> &str {
    cell.split([' ', 'T']).next().unwrap_or(cell)
}

fn detect_date_format<'a>(cells: impl Iterator<Item = &'a str> + Clone) -> Option<&'static str> {
    DATE_FORMATS
        .iter()
        .copied()
        .find(|format| cells.clone().all(|cell| Date::strptime(format, cell).is_ok()))
}

/// `Ok(None)` for blank / missing markers
fn parse_price(cell: &str) -> Result<Option<f64>, std::num::ParseFloatError> {
    if cell.is_empty()
        || MISSING_MARKERS
            .iter()
            .any(|marker| cell.eq_ignore_ascii_case(marker))
    {
        return Ok(None);
    }
    cell.parse::<f64>().map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    fn load(content: &str) -> Result<PriceSeries, IngestError> {
        load_price_reader(content.as_bytes(), "AAPL_prices.csv")
    }

    #[test]
    fn test_ticker_from_filename() {
        assert_eq!(ticker_from_filename(Path::new("AAPL_prices.csv")), "AAPL");
        assert_eq!(ticker_from_filename(Path::new("/tmp/data/msft_PRICES.csv")), "msft");
        assert_eq!(ticker_from_filename(Path::new("INFY.NS_prices.csv")), "INFY.NS");
        assert_eq!(ticker_from_filename(Path::new("GOOG.csv")), "GOOG");
        assert_eq!(ticker_from_filename(Path::new("_prices.csv")), "_prices");
    }

    #[test]
    fn test_adj_close_preferred_over_close() {
        let series = load(
            "Date,Open,Close,Adj Close,Volume\n\
             2024-01-02,1,10.0,9.0,100\n\
             2024-01-03,1,11.0,9.9,100\n",
        )
        .unwrap();

        assert_eq!(series.ticker(), "AAPL");
        assert_eq!(
            series.points(),
            &[(date(2024, 1, 2), 9.0), (date(2024, 1, 3), 9.9)]
        );
    }

    #[test]
    fn test_header_variants_are_normalised() {
        let series = load(" date , Adj_Close* \n2024-01-02,5\n2024-01-03,6\n").unwrap();
        assert_eq!(series.len(), 2);

        let series = load("DATE,close\n2024-01-02,5\n").unwrap();
        assert_eq!(series.points(), &[(date(2024, 1, 2), 5.0)]);

        let series = load("Date,Price\n2024-01-02,7\n").unwrap();
        assert_eq!(series.points(), &[(date(2024, 1, 2), 7.0)]);
    }

    #[test]
    fn test_missing_price_column() {
        let err = load("Date,Open\n2024-01-02,1\n").unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn { ref file } if file == "AAPL_prices.csv"));
    }

    #[test]
    fn test_missing_date_column() {
        let err = load("Day,Close\n2024-01-02,1\n").unwrap_err();
        assert!(matches!(err, IngestError::MissingDateColumn { .. }));
    }

    #[test]
    fn test_day_first_dates() {
        let series = load("Date,Close\n05-01-2024,1\n06-01-2024,2\n31-01-2024,3\n").unwrap();
        assert_eq!(series.first_date(), Some(date(2024, 1, 5)));
        assert_eq!(series.last_date(), Some(date(2024, 1, 31)));
    }

    #[test]
    fn test_one_pattern_per_file() {
        // Mixed styles cannot be read with a single pattern
        let err = load("Date,Close\n2024-01-05,1\n06-01-2024,2\n").unwrap_err();
        match err {
            IngestError::UnrecognizedDateFormat { value, .. } => assert_eq!(value, "06-01-2024"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_timestamps_keep_date_part() {
        let series =
            load("Date,Close\n2024-01-02 00:00:00,1\n2024-01-03T00:00:00Z,2\n").unwrap();
        assert_eq!(series.last_date(), Some(date(2024, 1, 3)));
    }

    #[test]
    fn test_missing_and_bad_prices() {
        let series = load("Date,Close\n2024-01-02,null\n2024-01-03,\n2024-01-04,3\n,4\n").unwrap();
        assert_eq!(series.points(), &[(date(2024, 1, 4), 3.0)]);

        let err = load("Date,Close\n2024-01-02,abc\n").unwrap_err();
        match err {
            IngestError::InvalidPrice { line, value, .. } => {
                assert_eq!(line, 2);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_price_files_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("AAA_prices.csv");
        let b = dir.path().join("BBB_prices.csv");
        std::fs::write(&a, "Date,Close\n2024-01-02,1\n2024-01-03,2\n").unwrap();
        std::fs::write(&b, "Date,Close\n2024-01-02,3\n2024-01-03,4\n").unwrap();

        let series = load_price_files(&[&b, &a]).unwrap();
        let tickers: Vec<&str> = series.iter().map(PriceSeries::ticker).collect();
        assert_eq!(tickers, vec!["BBB", "AAA"]);

        let err = load_price_file(&dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }));
    }
}
