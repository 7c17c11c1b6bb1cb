use price_scan::analysis::{self, AnalysisOptions};
use price_scan::cli;
use price_scan::file_processing;
use price_scan::interactive;
use price_scan::progress;
use price_scan::provider::{self, CsvDirectoryProvider, PriceProvider};
use price_scan::report;
use price_scan::utils;

/// Writes the enriched CSV for one analysis when an output directory is set.
///
/// The file is named after `name`, the stem of the CSV the prices came from.
fn write_output(analysis: &analysis::Analysis, name: &str, output: Option<&std::path::Path>) -> anyhow::Result<()> {
    if let Some(dir) = output {
        let path = file_processing::enriched_output_path(dir, name);
        report::write_enriched_csv(analysis, &path)?;
        println!("💾 Wrote {}", path.display());
    }
    anyhow::Ok(())
}

/// Analyzes every CSV file in `dir` in parallel and prints the reports.
///
/// Fails after printing everything if any file could not be analyzed.
fn run_batch(args: &cli::Args, options: &AnalysisOptions) -> anyhow::Result<()> {
    let paths = provider::list_csv_files(&args.input)?;
    if paths.is_empty() {
        anyhow::bail!("No CSV files found in {}", args.input.display());
    }

    let effective_threads = match args.threads {
        Some(n) => {
            let max_threads = num_cpus::get();
            if n > max_threads {
                println!("⚠️ Warning: Limiting thread count to {} (max available)", max_threads);
                max_threads
            } else { n }
        }
        None => rayon::current_num_threads(),
    };
    println!("🚀 Analyzing {} file(s) using {} thread(s)", paths.len(), effective_threads);

    let output = args.output.as_deref();
    let outcomes = if args.threads.is_some() {
        let local_pool = utils::configure_thread_pool(effective_threads)?;
        local_pool.install(|| progress::process_files(&paths, options, output))?
    } else {
        progress::process_files(&paths, options, output)?
    };

    let mut failed = 0usize;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(analysis) => println!("\n{}", report::render_report(analysis, args.tail)),
            Err(e) => {
                failed += 1;
                println!("\n❌ {}: {:#}", outcome.path.display(), e);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} file(s) could not be analyzed", failed, outcomes.len());
    }
    anyhow::Ok(())
}

/// Main entry point of the application.
///
/// This function orchestrates the entire workflow:
/// 1. Parses command-line arguments.
/// 2. Validates input/output paths.
/// 3. Runs the interactive loop, a single file or ticker, or a directory batch.
///
/// # Returns
///
/// * `anyhow::Result<()>` - Success or an error if any step fails.
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let total_start = std::time::Instant::now();
    let args = cli::Args::parse();
    log::debug!("Parsed arguments: {:?}", args);

    file_processing::check_path(&args.input)?;
    args.check_mode()?;
    if let Some(dir) = &args.output {
        file_processing::ensure_dir_exist(dir)?;
    }

    let options = AnalysisOptions {
        price_column: args.column.clone(),
        sma_window: args.window,
        selection: args.selection,
        as_of: args.as_of,
    };

    if args.interactive {
        let provider = CsvDirectoryProvider::new(&args.input, &args.column);
        println!("Available stocks: {}", provider.tickers()?.join(", "));
        let session = interactive::SessionOptions {
            analysis: options,
            tail: args.tail,
            output_dir: args.output.clone(),
        };
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        return interactive::run_session(&mut stdin.lock(), &mut stdout.lock(), &provider, &session);
    }

    if args.input.is_file() {
        let analysis = analysis::analyze_file(&args.input, &options)?;
        println!("{}", report::render_report(&analysis, args.tail));
        write_output(&analysis, &file_processing::output_name(&args.input), args.output.as_deref())?;
    } else if let Some(ticker) = &args.ticker {
        let provider = CsvDirectoryProvider::new(&args.input, &args.column);
        let source = provider.resolve(ticker)?;
        let series = provider.fetch(ticker, options.selection)?;
        println!("Number of prices extracted: {}", series.len());
        let analysis = analysis::analyze_series(series, &options)?;
        println!("{}", report::render_report(&analysis, args.tail));
        write_output(&analysis, &file_processing::output_name(&source), args.output.as_deref())?;
    } else {
        run_batch(&args, &options)?;
    }

    println!(
        "✅ Analysis completed in {:?} seconds",
        total_start.elapsed().as_secs_f64()
    );
    Ok(())
}
