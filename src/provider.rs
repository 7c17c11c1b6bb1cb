use crate::csv_processor;
use crate::error::ProviderError;
use crate::series::{PriceSeries, Selection};

/// Source of chronologically ordered prices for a ticker.
///
/// Implementations must report an empty selection as
/// `ProviderError::NoData` instead of returning an empty series.
pub trait PriceProvider {
    fn fetch(&self, ticker: &str, selection: Selection) -> Result<PriceSeries, ProviderError>;
}

/// Serves tickers from a directory of `<ticker>.csv` files.
///
/// File stems are matched case-insensitively, so `AAPL` resolves to
/// `aapl.csv` as well as `AAPL.csv`. When both exist, only an exact stem
/// match is accepted.
#[derive(Debug, Clone)]
pub struct CsvDirectoryProvider {
    data_dir: std::path::PathBuf,
    price_column: String,
}

impl CsvDirectoryProvider {
    pub fn new<P: Into<std::path::PathBuf>>(data_dir: P, price_column: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            price_column: price_column.into(),
        }
    }

    /// Finds the CSV file backing `ticker`.
    ///
    /// # Errors
    /// * `UnknownTicker` if no file stem matches.
    /// * `AmbiguousTicker` if several stems match ignoring case and none
    ///   matches exactly.
    pub fn resolve(&self, ticker: &str) -> Result<std::path::PathBuf, ProviderError> {
        let wanted = ticker.trim();
        let mut matches = list_csv_files(&self.data_dir)?
            .into_iter()
            .filter_map(|path| {
                let stem = path.file_stem()?.to_str()?.to_string();
                stem.eq_ignore_ascii_case(wanted).then_some((stem, path))
            })
            .collect::<Vec<_>>();

        if let Some(i) = matches.iter().position(|(stem, _)| stem == wanted) {
            return Ok(matches.swap_remove(i).1);
        }
        match matches.len() {
            0 => Err(ProviderError::UnknownTicker {
                ticker: wanted.to_uppercase(),
                dir: self.data_dir.clone(),
            }),
            1 => Ok(matches.remove(0).1),
            _ => Err(ProviderError::AmbiguousTicker {
                ticker: wanted.to_string(),
                matches: matches
                    .iter()
                    .filter_map(|(_, path)| path.file_name())
                    .map(|name| name.to_string_lossy().into_owned())
                    .collect(),
            }),
        }
    }

    /// Tickers available in the data directory, upper-cased and sorted.
    pub fn tickers(&self) -> Result<Vec<String>, ProviderError> {
        let mut tickers = list_csv_files(&self.data_dir)?
            .iter()
            .map(|path| crate::utils::ticker_from_path(path))
            .collect::<Vec<_>>();
        tickers.sort();
        tickers.dedup();
        Ok(tickers)
    }
}

impl PriceProvider for CsvDirectoryProvider {
    fn fetch(&self, ticker: &str, selection: Selection) -> Result<PriceSeries, ProviderError> {
        let path = self.resolve(ticker)?;
        log::debug!("Resolved {} to {}", ticker, path.display());
        let mut series = csv_processor::load_csv(&path, &self.price_column)?;
        series.ticker = ticker.trim().to_uppercase();
        series.select(selection)
    }
}

/// Whether `path` names a regular file with a `.csv` extension (any case).
pub fn is_csv_file(path: &std::path::Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Lists the CSV files directly inside `dir`, sorted by file name.
pub fn list_csv_files<P: AsRef<std::path::Path>>(dir: P) -> std::io::Result<Vec<std::path::PathBuf>> {
    let mut paths = std::fs::read_dir(dir.as_ref())?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| is_csv_file(path))
        .collect::<Vec<_>>();
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_file(dir: &std::path::Path, name: &str, contents: &str) {
        std::fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn test_fetch_resolves_ticker_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "rigetti.csv", "Date,Close\n2024-01-02,1\n2024-01-03,2\n");

        let provider = CsvDirectoryProvider::new(dir.path(), "Close");
        let series = provider.fetch("Rigetti", Selection::All).unwrap();
        assert_eq!(series.ticker, "RIGETTI");
        assert_eq!(series.prices, vec![1.0, 2.0]);
    }

    #[test]
    fn test_exact_stem_wins_over_case_variants() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "aapl.csv", "Date,Close\n2024-01-02,1\n");
        write_file(dir.path(), "AAPL.csv", "Date,Close\n2024-01-02,2\n");

        let provider = CsvDirectoryProvider::new(dir.path(), "Close");
        assert_eq!(provider.resolve("aapl").unwrap(), dir.path().join("aapl.csv"));
        assert_eq!(provider.resolve("AAPL").unwrap(), dir.path().join("AAPL.csv"));
        assert_eq!(provider.fetch("AAPL", Selection::All).unwrap().prices, vec![2.0]);
    }

    #[test]
    fn test_case_variants_without_exact_match_are_ambiguous() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "aapl.csv", "");
        write_file(dir.path(), "AAPL.csv", "");

        let provider = CsvDirectoryProvider::new(dir.path(), "Close");
        let err = provider.resolve("Aapl").unwrap_err();
        match err {
            ProviderError::AmbiguousTicker { ticker, matches } => {
                assert_eq!(ticker, "Aapl");
                assert_eq!(matches, vec!["AAPL.csv", "aapl.csv"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_tickers_lists_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "rigetti.csv", "");
        write_file(dir.path(), "bitdeer.csv", "");
        write_file(dir.path(), "notes.txt", "");

        let provider = CsvDirectoryProvider::new(dir.path(), "Close");
        assert_eq!(provider.tickers().unwrap(), vec!["BITDEER", "RIGETTI"]);
    }

    #[test]
    fn test_unknown_ticker() {
        let dir = tempfile::tempdir().unwrap();
        let provider = CsvDirectoryProvider::new(dir.path(), "Close");
        let err = provider.fetch("NOPE", Selection::All).unwrap_err();
        assert!(matches!(err, ProviderError::UnknownTicker { ref ticker, .. } if ticker == "NOPE"));
    }

    #[test]
    fn test_list_csv_files_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "b.csv", "");
        write_file(dir.path(), "a.CSV", "");
        write_file(dir.path(), "notes.txt", "");

        let names: Vec<_> = list_csv_files(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.CSV", "b.csv"]);
    }
}
