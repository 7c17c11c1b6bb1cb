use crate::series::{Period, Selection};

/// Structure representing command-line arguments.
#[derive(Debug)]
pub struct Args {
    pub input: std::path::PathBuf,
    pub ticker: Option<String>,
    pub output: Option<std::path::PathBuf>,
    pub window: usize,
    pub selection: Selection,
    pub column: String,
    pub tail: usize,
    pub threads: Option<usize>,
    pub interactive: bool,
    pub as_of: Option<chrono::NaiveDate>,
}

/// Command-line arguments parser using Clap.
///
/// Supports a single file, one ticker out of a directory, or a whole
/// directory in batch, plus date selection and SMA settings.
impl Args {
    /// Builds the `clap` command definition.
    pub fn command() -> clap::Command {
        clap::Command::new("price-scan")
            .version("0.1.0")
            .about("Max-profit, SMA, daily return and streak analysis of CSV price history")
            .arg(
                clap::Arg::new("input")
                    .short('i')
                    .long("input")
                    .help("Path to a CSV price file, or a directory of <ticker>.csv files")
                    .required(true)
                    .num_args(1),
            )
            .arg(
                clap::Arg::new("ticker")
                .short('T')
                .long("ticker")
                .help("Ticker to analyze from the input directory (e.g. AAPL)")
                .num_args(1)
                .conflicts_with("interactive"),
            )
            .arg(
                clap::Arg::new("output")
                .short('o')
                .long("output")
                .help("Directory for enriched CSV output (Date, Close, SMA, Daily Returns, Direction, RunID, RunLength)")
                .num_args(1),
            )
            .arg(
                clap::Arg::new("window")
                .short('w')
                .long("window")
                .help("SMA period (5, 10, 21...)")
                .default_value("5")
                .num_args(1)
                .value_parser(clap::builder::ValueParser::new(parse_usize_positive)),
            )
            .arg(
                clap::Arg::new("start")
                .short('s')
                .long("start")
                .help("First date to include (YYYY-MM-DD)")
                .num_args(1)
                .value_parser(clap::builder::ValueParser::new(parse_cli_date)),
            )
            .arg(
                clap::Arg::new("end")
                .short('e')
                .long("end")
                .help("Last date to include, inclusive (YYYY-MM-DD)")
                .num_args(1)
                .value_parser(clap::builder::ValueParser::new(parse_cli_date)),
            )
            .arg(
                clap::Arg::new("period")
                .short('p')
                .long("period")
                .help("Trailing period ending at the last available date. Available: 1M, 3M, 6M, 1Y, 2Y, 5Y, MAX")
                .num_args(1)
                .value_parser(clap::builder::ValueParser::new(|s: &str| s.parse::<Period>()))
                .conflicts_with_all(["start", "end"]),
            )
            .arg(
                clap::Arg::new("column")
                .long("column")
                .help("Name of the price column")
                .default_value("Close")
                .num_args(1),
            )
            .arg(
                clap::Arg::new("tail")
                .long("tail")
                .help("Number of trailing rows shown in the streak table")
                .default_value("10")
                .num_args(1)
                .value_parser(clap::value_parser!(usize)),
            )
            .arg(
                clap::Arg::new("threads")
                .short('t')
                .long("threads")
                .help("Number of threads for directory batch mode (default: all available)")
                .num_args(1)
                .value_parser(clap::builder::ValueParser::new(parse_usize_positive)),
            )
            .arg(
                clap::Arg::new("interactive")
                .long("interactive")
                .help("Prompt for ticker and date range in a loop (input must be a directory)")
                .required(false)
                .action(clap::ArgAction::SetTrue)
                .conflicts_with_all(["period", "start", "end", "as_of"]),
            )
            .arg(
                clap::Arg::new("as_of")
                .long("as-of")
                .help("Report daily details and streaks up to this date (YYYY-MM-DD); falls back to the previous trading day")
                .num_args(1)
                .value_parser(clap::builder::ValueParser::new(parse_cli_date)),
            )
    }

    /// Parses command-line arguments using `clap`.
    ///
    /// # Returns
    /// * `Args` - Struct containing parsed arguments.
    ///
    /// # Errors
    /// * Exits with a usage message if arguments are missing or invalid.
    pub fn parse() -> Self {
        Self::from_matches(&Self::command().get_matches())
    }

    /// Same as `parse`, over an explicit argument list.
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = Self::command().try_get_matches_from(args)?;
        Ok(Self::from_matches(&matches))
    }

    fn from_matches(matches: &clap::ArgMatches) -> Self {
        let selection = match matches.get_one::<Period>("period") {
            Some(period) => Selection::Trailing(*period),
            None => {
                let start = matches.get_one::<chrono::NaiveDate>("start").copied();
                let end = matches.get_one::<chrono::NaiveDate>("end").copied();
                if start.is_none() && end.is_none() {
                    Selection::All
                } else {
                    Selection::Range { start, end }
                }
            }
        };

        Args {
            input: matches
                .get_one::<String>("input")
                .map(std::path::PathBuf::from)
                .unwrap_or_default(),
            ticker: matches.get_one::<String>("ticker").cloned(),
            output: matches.get_one::<String>("output").map(std::path::PathBuf::from),
            window: matches.get_one::<usize>("window").copied().unwrap_or(5),
            selection,
            column: matches
                .get_one::<String>("column")
                .cloned()
                .unwrap_or_else(|| "Close".to_string()),
            tail: matches.get_one::<usize>("tail").copied().unwrap_or(10),
            threads: matches.get_one::<usize>("threads").cloned(),
            interactive: matches.get_flag("interactive"),
            as_of: matches.get_one::<chrono::NaiveDate>("as_of").copied(),
        }
    }

    /// Rejects options that the chosen input kind would otherwise ignore.
    ///
    /// `--ticker` and `--interactive` pick a file out of a directory, so both
    /// need `--input` to be one.
    pub fn check_mode(&self) -> anyhow::Result<()> {
        if self.input.is_dir() {
            return anyhow::Ok(());
        }
        if self.interactive {
            anyhow::bail!("--interactive needs a directory of <ticker>.csv files as input");
        }
        if let Some(ticker) = &self.ticker {
            anyhow::bail!(
                "--ticker {} needs a directory as input, but {} is a file",
                ticker,
                self.input.display()
            );
        }
        anyhow::Ok(())
    }
}

/// Validates that a count (threads, SMA window) is a positive integer.
///
/// # Arguments
/// * `s` - String representation of the number.
///
/// # Returns
/// * `Result<usize>` - Validated number.
fn parse_usize_positive(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("Must be a positive integer".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("Not a valid number: {}", e)),
    }
}

fn parse_cli_date(s: &str) -> Result<chrono::NaiveDate, String> {
    chrono::NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("Expected YYYY-MM-DD: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["price-scan", "-i", "data"]).unwrap();
        assert_eq!(args.input, std::path::PathBuf::from("data"));
        assert_eq!(args.window, 5);
        assert_eq!(args.tail, 10);
        assert_eq!(args.column, "Close");
        assert_eq!(args.selection, Selection::All);
        assert!(!args.interactive);
    }

    #[test]
    fn test_date_range() {
        let args = Args::try_parse_from(["price-scan", "-i", "a.csv", "-s", "2024-01-01", "-e", "2024-02-01"]).unwrap();
        assert_eq!(
            args.selection,
            Selection::Range {
                start: chrono::NaiveDate::from_ymd_opt(2024, 1, 1),
                end: chrono::NaiveDate::from_ymd_opt(2024, 2, 1),
            }
        );
    }

    #[test]
    fn test_period() {
        let args = Args::try_parse_from(["price-scan", "-i", "a.csv", "-p", "1y"]).unwrap();
        assert_eq!(args.selection, Selection::Trailing(Period::OneYear));
    }

    #[test]
    fn test_period_conflicts_with_range() {
        let res = Args::try_parse_from(["price-scan", "-i", "a.csv", "-p", "1Y", "-s", "2024-01-01"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_rejects_zero_window_and_bad_dates() {
        assert!(Args::try_parse_from(["price-scan", "-i", "a.csv", "-w", "0"]).is_err());
        assert!(Args::try_parse_from(["price-scan", "-i", "a.csv", "-s", "01/02/2024"]).is_err());
    }

    #[test]
    fn test_interactive_rejects_date_options() {
        for extra in [["-p", "1Y"], ["-s", "2024-01-01"], ["-e", "2024-01-01"], ["--as-of", "2024-01-01"]] {
            let mut argv = vec!["price-scan", "-i", "data", "--interactive"];
            argv.extend(extra);
            assert!(Args::try_parse_from(argv).is_err(), "accepted {:?}", extra);
        }
    }

    #[test]
    fn test_as_of() {
        let args = Args::try_parse_from(["price-scan", "-i", "a.csv", "--as-of", "2025-09-12"]).unwrap();
        assert_eq!(args.as_of, chrono::NaiveDate::from_ymd_opt(2025, 9, 12));
    }

    #[test]
    fn test_check_mode_needs_directory_for_ticker_and_interactive() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("acme.csv");
        std::fs::write(&file, "Date,Close\n").unwrap();
        let dir_arg = dir.path().to_str().unwrap();
        let file_arg = file.to_str().unwrap();

        let args = Args::try_parse_from(["price-scan", "-i", file_arg, "-T", "ACME"]).unwrap();
        assert!(args.check_mode().is_err());
        let args = Args::try_parse_from(["price-scan", "-i", file_arg, "--interactive"]).unwrap();
        assert!(args.check_mode().is_err());

        let args = Args::try_parse_from(["price-scan", "-i", file_arg]).unwrap();
        assert!(args.check_mode().is_ok());
        let args = Args::try_parse_from(["price-scan", "-i", dir_arg, "-T", "ACME"]).unwrap();
        assert!(args.check_mode().is_ok());
    }

    #[test]
    fn test_parse_usize_positive() {
        assert_eq!(parse_usize_positive("4"), Ok(4));
        assert!(parse_usize_positive("0").is_err());
        assert!(parse_usize_positive("four").is_err());
    }
}
