use crate::analysis::{self, AnalysisOptions};
use crate::file_processing;
use crate::provider::PriceProvider;
use crate::report;
use crate::series::Selection;

use std::io::{BufRead, Write};

/// Settings for the prompt loop.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub analysis: AnalysisOptions,
    pub tail: usize,
    pub output_dir: Option<std::path::PathBuf>,
}

fn is_quit(answer: &str) -> bool {
    matches!(answer.to_lowercase().as_str(), "quit" | "exit")
}

/// Prints `message` and reads one trimmed line; `None` at end of input.
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, message: &str) -> std::io::Result<Option<String>> {
    write!(out, "{}", message)?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn parse_prompt_date(raw: &str) -> anyhow::Result<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("Invalid date {:?}, expected YYYY-MM-DD: {}", raw, e))
}

/// Fetches, analyzes and renders one ticker for the given inclusive range.
fn analyze_ticker<P: PriceProvider>(
    provider: &P,
    options: &SessionOptions,
    ticker: &str,
    start: &str,
    end: &str,
) -> anyhow::Result<String> {
    let selection = Selection::Range {
        start: Some(parse_prompt_date(start)?),
        end: Some(parse_prompt_date(end)?),
    };
    let series = provider.fetch(ticker, selection)?;
    log::info!("{}: {} prices extracted", series.ticker, series.len());

    let analysis = analysis::analyze(series, options.analysis.sma_window)?;
    if let Some(dir) = &options.output_dir {
        let path = file_processing::enriched_output_path(dir, &analysis.series.ticker);
        report::write_enriched_csv(&analysis, &path)?;
        log::info!("Wrote {}", path.display());
    }
    Ok(report::render_report(&analysis, options.tail))
}

/// Runs the ticker / start / end prompt loop until the user quits.
///
/// `quit` or `exit` at any prompt ends the session, as does end of input.
/// Errors from a single request are printed and the loop continues.
///
/// # Arguments
/// * `input` - Source of user answers (stdin in the binary).
/// * `out` - Destination for prompts and reports.
/// * `provider` - Resolves tickers to price series.
/// * `options` - Analysis and report settings.
pub fn run_session<R: BufRead, W: Write, P: PriceProvider>(
    input: &mut R,
    out: &mut W,
    provider: &P,
    options: &SessionOptions,
) -> anyhow::Result<()> {
    loop {
        let Some(ticker) = prompt(input, out, "Enter stock ticker (e.g., AAPL): ")? else { break };
        let ticker = ticker.to_uppercase();
        if is_quit(&ticker) {
            writeln!(out, "Goodbye!")?;
            break;
        }

        let Some(start) = prompt(input, out, "Enter start date (YYYY-MM-DD): ")? else { break };
        if is_quit(&start) {
            writeln!(out, "Goodbye!")?;
            break;
        }

        let Some(end) = prompt(input, out, "Enter end date (YYYY-MM-DD): ")? else { break };
        if is_quit(&end) {
            writeln!(out, "Goodbye!")?;
            break;
        }

        if ticker.is_empty() || start.is_empty() || end.is_empty() {
            writeln!(out, "❌ All fields are required. Please try again.\n")?;
            continue;
        }

        match analyze_ticker(provider, options, &ticker, &start, &end) {
            Ok(text) => writeln!(out, "\n{}", text)?,
            Err(e) => {
                log::debug!("Request for {} failed: {:?}", ticker, e);
                writeln!(out, "❌ Error: {:#}", e)?;
                writeln!(out, "Please try again or type 'quit' to exit.\n")?;
                continue;
            }
        }

        let another = prompt(input, out, "\nAnalyze another stock? (y/n): ")?.unwrap_or_default();
        if !matches!(another.to_lowercase().as_str(), "y" | "yes") {
            writeln!(out, "Goodbye!")?;
            break;
        }
        writeln!(out)?;
    }

    anyhow::Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::series::PriceSeries;

    struct FixedProvider;

    impl PriceProvider for FixedProvider {
        fn fetch(&self, ticker: &str, selection: Selection) -> Result<PriceSeries, ProviderError> {
            if ticker != "ACME" {
                return Err(ProviderError::NoData(ticker.to_string()));
            }
            let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
            PriceSeries {
                ticker: ticker.to_string(),
                dates: (0..6).map(|i| start + chrono::Days::new(i)).collect(),
                prices: vec![7.0, 1.0, 5.0, 3.0, 6.0, 4.0],
            }
            .select(selection)
        }
    }

    fn session(answers: &str) -> String {
        let options = SessionOptions {
            analysis: AnalysisOptions::default(),
            tail: 3,
            output_dir: None,
        };
        let mut input = std::io::Cursor::new(answers.as_bytes().to_vec());
        let mut out = Vec::new();
        run_session(&mut input, &mut out, &FixedProvider, &options).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_quit_at_first_prompt() {
        let out = session("quit\n");
        assert!(out.ends_with("Goodbye!\n"));
        assert!(!out.contains("start date"));
    }

    #[test]
    fn test_full_request_then_stop() {
        let out = session("acme\n2024-01-01\n2024-01-06\nn\n");
        assert!(out.contains("Total profit: $7.00"));
        assert!(out.contains("Buy 2024-01-02 @ $1.00, Sell 2024-01-03 @ $5.00, Profit $4.00"));
        assert!(out.contains("Analyze another stock? (y/n): Goodbye!"));
    }

    #[test]
    fn test_missing_field_reprompts() {
        let out = session("ACME\n\n2024-01-06\nexit\n");
        assert!(out.contains("❌ All fields are required. Please try again."));
        assert!(out.ends_with("Goodbye!\n"));
    }

    #[test]
    fn test_errors_keep_the_loop_alive() {
        let out = session("ZZZ\n2024-01-01\n2024-01-06\nACME\n2024-01-01\n2024-01-03\nno\n");
        assert!(out.contains("❌ Error: No data returned for ZZZ"));
        assert!(out.contains("Please try again or type 'quit' to exit."));
        assert!(out.contains("Total profit: $4.00"));
    }

    #[test]
    fn test_bad_date_is_reported() {
        let out = session("ACME\n01/01/2024\n2024-01-06\nquit\n");
        assert!(out.contains("❌ Error: Invalid date \"01/01/2024\""));
    }

    #[test]
    fn test_end_of_input_ends_session() {
        let out = session("ACME\n");
        assert!(out.ends_with("Enter start date (YYYY-MM-DD): "));
    }
}
