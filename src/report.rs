use crate::analysis::Analysis;
use crate::profit::Transaction;
use crate::streaks::{Direction, RunSpan};
use crate::utils::{format_date, format_money};

use std::fmt::Write as _;

/// One row of the enriched CSV written next to a report.
#[derive(Debug, serde::Serialize)]
pub struct EnrichedRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Close")]
    close: f64,
    #[serde(rename = "SMA")]
    sma: Option<f64>,
    #[serde(rename = "Daily Returns")]
    daily_return: Option<f64>,
    #[serde(rename = "Direction")]
    direction: Direction,
    #[serde(rename = "RunID")]
    run_id: u32,
    #[serde(rename = "RunLength")]
    run_length: u32,
}

/// Renders one transaction as a log line with calendar dates.
///
/// # Example Output
/// ```text
/// Buy 2024-01-02 @ $1.00, Sell 2024-01-03 @ $5.00, Profit $4.00
/// ```
pub fn format_transaction(t: &Transaction, dates: &[chrono::NaiveDate]) -> String {
    let day = |i: usize| dates.get(i).map_or_else(|| format!("day {}", i), |d| format_date(*d));
    format!(
        "Buy {} @ {}, Sell {} @ {}, Profit {}",
        day(t.buy_day),
        format_money(t.buy_price),
        day(t.sell_day),
        format_money(t.sell_price),
        format_money(t.profit()),
    )
}

/// Renders an optional run as "start → end", or "-" when there is none.
pub fn format_range(span: Option<RunSpan>, dates: &[chrono::NaiveDate]) -> String {
    let range = span.and_then(|s| Some((dates.get(s.start)?, dates.get(s.end)?)));
    match range {
        Some((start, end)) => format!("{} → {}", format_date(*start), format_date(*end)),
        None => "-".to_string(),
    }
}

fn write_transactions(out: &mut String, analysis: &Analysis) -> std::fmt::Result {
    let scan = &analysis.scan;
    writeln!(out, "Total profit: {}", format_money(scan.total_profit))?;
    if scan.transactions.is_empty() {
        return writeln!(out, "No profitable transactions found.");
    }
    writeln!(out, "Transactions:")?;
    for t in &scan.transactions {
        writeln!(out, "{}", format_transaction(t, &analysis.series.dates))?;
    }
    Ok(())
}

fn write_sma(out: &mut String, analysis: &Analysis) -> std::fmt::Result {
    match analysis.latest_sma() {
        Some(value) => writeln!(out, "{}-Day SMA (latest): {}", analysis.sma_window, format_money(value)),
        None => writeln!(
            out,
            "{}-Day SMA: not enough data ({} prices)",
            analysis.sma_window,
            analysis.series.len()
        ),
    }
}

fn write_streak_table(out: &mut String, analysis: &Analysis, tail: usize) -> std::fmt::Result {
    let series = &analysis.series;
    writeln!(out, "Last {} rows with streak info:", tail.min(series.len()))?;
    writeln!(
        out,
        "{:<12} {:>12} {:>9} {:>6} {:>10}",
        "Date", "Close", "Direction", "RunID", "RunLength"
    )?;
    let skip = series.len().saturating_sub(tail);
    for (i, row) in analysis.streaks.iter().enumerate().skip(skip) {
        writeln!(
            out,
            "{:<12} {:>12.2} {:>9} {:>6} {:>10}",
            format_date(series.dates[i]),
            series.prices[i],
            row.direction,
            row.run_id,
            row.run_length,
        )?;
    }
    Ok(())
}

/// Point-in-time block for the last day of an as-of analysis.
///
/// # Example Output
/// ```text
/// Date not found. Using nearest previous trading day: 2024-01-05
///
/// === Daily Details ===
/// Stock: ACME
/// Date:  2024-01-05
/// Close: 3.0000
/// Direction: DOWN
/// Run length (for this DOWN): 1
/// ```
fn write_daily_details(out: &mut String, analysis: &Analysis) -> std::fmt::Result {
    let series = &analysis.series;
    let (Some(as_of), Some(row), Some(close)) =
        (analysis.as_of, analysis.streaks.last(), series.prices.last())
    else {
        return Ok(());
    };

    if as_of.fell_back() {
        writeln!(out, "Date not found. Using nearest previous trading day: {}", format_date(as_of.resolved))?;
        writeln!(out)?;
    }
    let label = match row.direction {
        Direction::Flat => "day".to_string(),
        direction => direction.to_string(),
    };
    writeln!(out, "=== Daily Details ===")?;
    writeln!(out, "Stock: {}", series.ticker)?;
    writeln!(out, "Date:  {}", format_date(as_of.resolved))?;
    writeln!(out, "Close: {:.4}", close)?;
    writeln!(out, "Direction: {}", row.direction)?;
    writeln!(out, "Run length (for this {}): {}", label, row.run_length)
}

fn write_run_summary(out: &mut String, analysis: &Analysis) -> std::fmt::Result {
    let dates = &analysis.series.dates;
    let summary = &analysis.run_summary;
    let length = |span: Option<RunSpan>| span.map_or(0, |s| s.length);
    let scope = match analysis.as_of {
        Some(_) => "up to selected date",
        None => "for selected period",
    };
    writeln!(out, "=== Run Summary ({}) ===", scope)?;
    writeln!(out, "Total UP runs:   {}", summary.up_runs)?;
    writeln!(out, "Total DOWN runs: {}", summary.down_runs)?;
    writeln!(
        out,
        "Longest UP streak:   {} days  ({})",
        length(summary.longest_up),
        format_range(summary.longest_up, dates)
    )?;
    writeln!(
        out,
        "Longest DOWN streak: {} days  ({})",
        length(summary.longest_down),
        format_range(summary.longest_down, dates)
    )
}

fn write_report(out: &mut String, analysis: &Analysis, tail: usize) -> std::fmt::Result {
    let series = &analysis.series;
    let span = match (series.first_date(), series.last_date()) {
        (Some(first), Some(last)) => format!("{} → {}", format_date(first), format_date(last)),
        _ => "-".to_string(),
    };
    writeln!(out, "=== {} ({}, {} prices) ===", series.ticker, span, series.len())?;
    writeln!(out)?;
    write_transactions(out, analysis)?;
    writeln!(out)?;
    write_sma(out, analysis)?;

    if tail > 0 {
        writeln!(out)?;
        write_streak_table(out, analysis, tail)?;
    }
    if analysis.as_of.is_some() {
        writeln!(out)?;
        write_daily_details(out, analysis)?;
    }

    writeln!(out)?;
    write_run_summary(out, analysis)
}

/// Builds the transaction log section.
pub fn render_transactions(analysis: &Analysis) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_transactions(&mut out, analysis);
    out
}

/// Builds the full text report for one analyzed series.
///
/// An as-of analysis also gets the Daily Details block for its last day and
/// a run summary scoped to that day.
///
/// # Arguments
/// * `analysis` - Result of `analysis::analyze` or `analysis::analyze_series`.
/// * `tail` - Number of trailing rows shown in the streak table.
pub fn render_report(analysis: &Analysis, tail: usize) -> String {
    let mut out = String::new();
    let _ = write_report(&mut out, analysis, tail);
    out
}

/// Writes the series with its derived columns to a CSV file.
///
/// # Arguments
/// * `analysis` - Result of `analysis::analyze`.
/// * `output_path` - Destination file; overwritten if it exists.
///
/// # Returns
/// * `anyhow::Result<()>`
pub fn write_enriched_csv<P: AsRef<std::path::Path>>(analysis: &Analysis, output_path: P) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(output_path.as_ref())?;
    let series = &analysis.series;
    for i in 0..series.len() {
        let row = &analysis.streaks[i];
        writer.serialize(EnrichedRecord {
            date: format_date(series.dates[i]),
            close: series.prices[i],
            sma: analysis.sma[i],
            daily_return: analysis.daily_returns[i],
            direction: row.direction,
            run_id: row.run_id,
            run_length: row.run_length,
        })?;
    }
    writer.flush()?;

    anyhow::Ok(())
}
