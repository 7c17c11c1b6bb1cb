use crate::analysis::{self, Analysis, AnalysisOptions};
use crate::file_processing;
use crate::report;

use rayon::prelude::*;

/// Result of analyzing one file in batch mode.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: std::path::PathBuf,
    pub result: anyhow::Result<Analysis>,
}

/// Builds the progress bar shown while files are analyzed.
fn progress_bar(len: usize) -> anyhow::Result<indicatif::ProgressBar> {
    let pb = indicatif::ProgressBar::new(len as u64);
    pb.set_style(
        indicatif::ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )?
        .progress_chars("#>-"),
    );
    Ok(pb)
}

/// Analyzes every CSV file in parallel on the current Rayon pool.
///
/// Each file is loaded, filtered and analyzed independently; when
/// `output_dir` is set the enriched CSV, named after the file stem, is
/// written as soon as its analysis finishes. One file failing does not stop
/// the others.
///
/// # Arguments
/// * `paths` - CSV files to analyze.
/// * `options` - Shared analysis settings.
/// * `output_dir` - Optional directory for enriched CSVs (must exist).
///
/// # Returns
/// * `anyhow::Result<Vec<FileOutcome>>` - One outcome per path, in input order.
///   Fails before analyzing anything if two paths map to the same output file.
pub fn process_files(
    paths: &[std::path::PathBuf],
    options: &AnalysisOptions,
    output_dir: Option<&std::path::Path>,
) -> anyhow::Result<Vec<FileOutcome>> {
    let outputs: Vec<Option<std::path::PathBuf>> = match output_dir {
        Some(dir) => file_processing::batch_output_paths(paths, dir)?
            .into_iter()
            .map(Some)
            .collect(),
        None => vec![None; paths.len()],
    };
    let pb = progress_bar(paths.len())?;

    let outcomes = paths
        .par_iter()
        .zip(outputs.par_iter())
        .map(|(path, out)| {
            log::debug!("Analyzing {:?} in thread {:?}", path, std::thread::current().id());
            let result = analysis::analyze_file(path, options).and_then(|analysis| {
                if let Some(out) = out {
                    report::write_enriched_csv(&analysis, out)?;
                }
                Ok(analysis)
            });
            pb.set_message(path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default());
            pb.inc(1);
            FileOutcome { path: path.clone(), result }
        })
        .collect::<Vec<_>>();

    pb.finish_with_message("done");
    Ok(outcomes)
}
