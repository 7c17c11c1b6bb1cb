/// Date layouts accepted in price files, tried in order.
pub const DATE_FORMATS: [&str; 2] = ["%d-%b-%y", "%Y-%m-%d"];

/// Configures a custom Rayon thread pool with specified size.
///
/// Used when the caller wants batch analysis to run on an explicit number of
/// threads instead of the global Rayon pool.
///
/// # Arguments
/// * `num_threads` - Desired number of threads for the pool.
///
/// # Returns
/// * `Result<ThreadPool>` - Created thread pool or an error if creation fails.
pub fn configure_thread_pool(num_threads: usize) -> anyhow::Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build thread pool: {}", e))
}

/// Parses a calendar date from a price file or a prompt.
///
/// Accepts every layout in `DATE_FORMATS`, plus timestamps whose first ten
/// characters are a `%Y-%m-%d` date (e.g. "2024-01-02 00:00:00-05:00").
///
/// # Examples
///
/// ```
/// let d = price_scan::utils::parse_date("02-Jan-24").unwrap();
/// assert_eq!(d.to_string(), "2024-01-02");
/// ```
pub fn parse_date(raw: &str) -> Option<chrono::NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| chrono::NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            let prefix = raw.get(..10)?;
            chrono::NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
        })
}

/// Upper-cased file stem used as a ticker label, e.g. "data/eightco.csv" -> "EIGHTCO".
pub fn ticker_from_path(path: &std::path::Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_uppercase())
        .unwrap_or_else(|| "UNKNOWN".to_string())
}

/// Formats a date for reports (YYYY-MM-DD).
pub fn format_date(date: chrono::NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Formats an amount of money with two decimals, e.g. "$12.30".
pub fn format_money(amount: f64) -> String {
    format!("${:.2}", amount)
}
