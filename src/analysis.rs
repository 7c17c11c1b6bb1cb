use crate::csv_processor;
use crate::indicators;
use crate::profit;
use crate::series::{AsOf, PriceSeries, Selection};
use crate::streaks;

use anyhow::Context;

/// Settings shared by every analysis in a run.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub price_column: String,
    pub sma_window: usize,
    pub selection: Selection,
    /// Anchor the analysis on this day (or the trading day before it).
    pub as_of: Option<chrono::NaiveDate>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            price_column: csv_processor::DEFAULT_PRICE_COLUMN.to_string(),
            sma_window: 5,
            selection: Selection::All,
            as_of: None,
        }
    }
}

/// Every derived column and summary computed for one price series.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub series: PriceSeries,
    pub sma_window: usize,
    pub sma: Vec<Option<f64>>,
    pub daily_returns: Vec<Option<f64>>,
    pub streaks: Vec<streaks::StreakRow>,
    pub run_summary: streaks::RunSummary,
    pub scan: profit::ScanResult,
    pub as_of: Option<AsOf>,
}

impl Analysis {
    /// Most recent SMA value, if the window was ever filled.
    pub fn latest_sma(&self) -> Option<f64> {
        self.sma.last().copied().flatten()
    }
}

/// Runs the indicators, streak labeling and max-profit scan over `series`.
///
/// Each computation reads the same prices independently; none feeds another.
///
/// # Arguments
/// * `series` - Loaded and filtered prices.
/// * `sma_window` - SMA period; must be positive.
///
/// # Returns
/// * `anyhow::Result<Analysis>`
pub fn analyze(series: PriceSeries, sma_window: usize) -> anyhow::Result<Analysis> {
    let sma = indicators::simple_moving_average(&series.prices, sma_window)?;
    let daily_returns = indicators::daily_returns(&series.prices);
    let streak_rows = streaks::movement_direction(&series.prices);
    let run_summary = streaks::run_summary(&streak_rows);
    let scan = profit::scan(&series.prices);

    log::debug!(
        "{}: {} prices, {} transaction(s), {} up / {} down runs",
        series.ticker,
        series.len(),
        scan.transactions.len(),
        run_summary.up_runs,
        run_summary.down_runs,
    );

    Ok(Analysis {
        series,
        sma_window,
        sma,
        daily_returns,
        streaks: streak_rows,
        run_summary,
        scan,
        as_of: None,
    })
}

/// Analyzes an already selected series, cutting it at `options.as_of` first.
///
/// # Returns
/// * `anyhow::Result<Analysis>` - `ProviderError::NoData` if no day precedes the as-of date.
pub fn analyze_series(series: PriceSeries, options: &AnalysisOptions) -> anyhow::Result<Analysis> {
    let Some(requested) = options.as_of else {
        return analyze(series, options.sma_window);
    };
    let (series, as_of) = series.truncate_as_of(requested)?;
    if as_of.fell_back() {
        log::info!(
            "{}: {} is not a trading day, using {}",
            series.ticker,
            as_of.requested,
            as_of.resolved
        );
    }
    let mut analysis = analyze(series, options.sma_window)?;
    analysis.as_of = Some(as_of);
    Ok(analysis)
}

/// Loads a CSV file, narrows it to the selected dates and analyzes it.
///
/// # Arguments
/// * `path` - CSV price file.
/// * `options` - Column, window and date selection.
///
/// # Returns
/// * `anyhow::Result<Analysis>` - Provider errors keep their `ProviderError` source.
pub fn analyze_file<P: AsRef<std::path::Path>>(path: P, options: &AnalysisOptions) -> anyhow::Result<Analysis> {
    let path = path.as_ref();
    let series = csv_processor::load_csv(path, &options.price_column)
        .and_then(|series| series.select(options.selection))
        .with_context(|| format!("Failed to load prices from {}", path.display()))?;
    analyze_series(series, options)
}
