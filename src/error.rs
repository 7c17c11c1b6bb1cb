/// Failures raised while resolving a price series.
///
/// An empty selection is always reported as `NoData`, never as an empty
/// series, so callers can tell "nothing to analyze" apart from a result.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("File not found: {0}")]
    FileNotFound(std::path::PathBuf),

    #[error("No price file for ticker {ticker} in {dir}")]
    UnknownTicker { ticker: String, dir: std::path::PathBuf },

    #[error("Ticker {ticker} matches several files, use the exact file name: {matches:?}")]
    AmbiguousTicker { ticker: String, matches: Vec<String> },

    #[error("Missing required column(s): {0:?}")]
    MissingColumns(Vec<String>),

    #[error("Malformed date {value:?} on line {line}")]
    MalformedDate { line: u64, value: String },

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange { start: chrono::NaiveDate, end: chrono::NaiveDate },

    #[error("No data returned for {0}. Check ticker/date range/period.")]
    NoData(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
