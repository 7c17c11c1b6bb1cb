use crate::error::ProviderError;
use crate::series::PriceSeries;
use crate::utils;

/// Name of the date column expected in every price file.
pub const DATE_COLUMN: &str = "Date";

/// Default column holding the price to analyze.
pub const DEFAULT_PRICE_COLUMN: &str = "Close";

/// Resolves a header name to its position, preferring an exact match and
/// falling back to a case-insensitive one.
fn find_column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .or_else(|| headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name)))
}

/// Parses a price cell, tolerating thousands separators.
///
/// Returns `None` for blank, `nan`, `null`, `-` or otherwise non-numeric
/// values; those rows are dropped rather than failing the whole file.
fn parse_price(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => None,
    }
}

/// Reads `Date` and price columns from CSV data into a `PriceSeries`.
///
/// This function:
/// 1. Locates the date and price columns in the header.
/// 2. Parses each date, failing on the first malformed one.
/// 3. Drops rows whose price is missing or non-numeric.
/// 4. Sorts the remaining rows by date (stable).
///
/// # Arguments
/// * `reader` - CSV reader with headers.
/// * `ticker` - Label attached to the resulting series.
/// * `price_column` - Header of the price column (e.g. "Close").
///
/// # Returns
/// * `Result<PriceSeries, ProviderError>` - `NoData` if no row survives.
pub fn read_price_records<R: std::io::Read>(
    reader: &mut csv::Reader<R>,
    ticker: &str,
    price_column: &str,
) -> Result<PriceSeries, ProviderError> {
    let headers = reader.headers()?.clone();
    let date_idx = find_column(&headers, DATE_COLUMN);
    let price_idx = find_column(&headers, price_column);
    let (date_idx, price_idx) = match (date_idx, price_idx) {
        (Some(d), Some(p)) => (d, p),
        (d, p) => {
            let mut missing = Vec::new();
            if d.is_none() {
                missing.push(DATE_COLUMN.to_string());
            }
            if p.is_none() {
                missing.push(price_column.to_string());
            }
            return Err(ProviderError::MissingColumns(missing));
        }
    };

    let mut rows: Vec<(chrono::NaiveDate, f64)> = Vec::new();
    let mut dropped = 0usize;
    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line());

        let raw_date = record.get(date_idx).unwrap_or_default();
        let date = utils::parse_date(raw_date).ok_or_else(|| ProviderError::MalformedDate {
            line,
            value: raw_date.to_string(),
        })?;

        match record.get(price_idx).and_then(parse_price) {
            Some(price) => rows.push((date, price)),
            None => {
                log::debug!("{}: dropping line {} with no usable {} value", ticker, line, price_column);
                dropped += 1;
            }
        }
    }

    if dropped > 0 {
        log::info!("{}: dropped {} row(s) without a numeric {} price", ticker, dropped, price_column);
    }
    if rows.is_empty() {
        return Err(ProviderError::NoData(ticker.to_string()));
    }

    rows.sort_by_key(|(date, _)| *date);
    let (dates, prices) = rows.into_iter().unzip();

    Ok(PriceSeries { ticker: ticker.to_string(), dates, prices })
}

/// Loads a price series from a CSV file on disk.
///
/// The ticker label defaults to the upper-cased file stem.
///
/// # Arguments
/// * `path` - Path to the CSV file.
/// * `price_column` - Header of the price column.
///
/// # Returns
/// * `Result<PriceSeries, ProviderError>` - The parsed series or why it could not be built.
pub fn load_csv<P: AsRef<std::path::Path>>(path: P, price_column: &str) -> Result<PriceSeries, ProviderError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(ProviderError::FileNotFound(path.to_path_buf()));
    }
    let ticker = utils::ticker_from_path(path);

    let input_file = std::fs::File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input_file);

    let series = read_price_records(&mut reader, &ticker, price_column)?;
    log::debug!("{}: loaded {} prices from {}", ticker, series.len(), path.display());

    Ok(series)
}
