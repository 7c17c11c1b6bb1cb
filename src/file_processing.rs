use anyhow::Context;

/// Checks that the input path exists.
///
/// # Arguments
/// * `path` - CSV file or directory given on the command line.
///
/// # Returns
/// * `anyhow::Result<()>` - Error if the path does not exist.
pub fn check_path<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<()> {
    let path = path.as_ref();
    if !path.exists() {
        anyhow::bail!("Input path does not exist: {}", path.display());
    }
    anyhow::Ok(())
}

/// Creates the output directory (and parents) if it is missing.
pub fn ensure_dir_exist<P: AsRef<std::path::Path>>(dir: P) -> anyhow::Result<()> {
    let dir = dir.as_ref();
    if dir.exists() && !dir.is_dir() {
        anyhow::bail!("Output path is not a directory: {}", dir.display());
    }
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    anyhow::Ok(())
}

/// Path of the enriched CSV for `name` inside `output_dir`, e.g. "out/aapl_analysis.csv".
///
/// `name` is used verbatim so inputs that differ only in case keep
/// separate outputs.
pub fn enriched_output_path<P: AsRef<std::path::Path>>(output_dir: P, name: &str) -> std::path::PathBuf {
    output_dir.as_ref().join(format!("{}_analysis.csv", name))
}

/// Output name for an input file: its stem exactly as it appears on disk.
pub fn output_name(input: &std::path::Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Maps every input to its enriched CSV path, failing if two inputs would
/// write the same file (e.g. "acme.csv" and "acme.CSV").
pub fn batch_output_paths<P: AsRef<std::path::Path>>(
    inputs: &[std::path::PathBuf],
    output_dir: P,
) -> anyhow::Result<Vec<std::path::PathBuf>> {
    let mut seen: std::collections::HashMap<std::path::PathBuf, &std::path::PathBuf> =
        std::collections::HashMap::with_capacity(inputs.len());
    let mut outputs = Vec::with_capacity(inputs.len());
    for input in inputs {
        let out = enriched_output_path(output_dir.as_ref(), &output_name(input));
        if let Some(previous) = seen.insert(out.clone(), input) {
            anyhow::bail!(
                "{} and {} would both write {}",
                previous.display(),
                input.display(),
                out.display()
            );
        }
        outputs.push(out);
    }
    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(check_path(dir.path()).is_ok());
        assert!(check_path(dir.path().join("missing.csv")).is_err());
    }

    #[test]
    fn test_ensure_dir_exist_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_dir_exist(&nested).unwrap();
        assert!(nested.is_dir());

        let file = dir.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();
        assert!(ensure_dir_exist(&file).is_err());
    }

    #[test]
    fn test_enriched_output_path() {
        let path = enriched_output_path("out", "aapl");
        assert_eq!(path, std::path::Path::new("out").join("aapl_analysis.csv"));
        let path = enriched_output_path("out", "AAPL");
        assert_eq!(path, std::path::Path::new("out").join("AAPL_analysis.csv"));
    }

    #[test]
    fn test_batch_output_paths_keep_stem_case() {
        let inputs = vec![
            std::path::PathBuf::from("data/ACME.csv"),
            std::path::PathBuf::from("data/acme.csv"),
        ];
        let outputs = batch_output_paths(&inputs, "out").unwrap();
        assert_eq!(
            outputs,
            vec![
                std::path::Path::new("out").join("ACME_analysis.csv"),
                std::path::Path::new("out").join("acme_analysis.csv"),
            ]
        );
    }

    #[test]
    fn test_batch_output_paths_reject_collisions() {
        let inputs = vec![
            std::path::PathBuf::from("data/acme.CSV"),
            std::path::PathBuf::from("data/acme.csv"),
        ];
        let err = batch_output_paths(&inputs, "out").unwrap_err();
        assert!(err.to_string().contains("acme_analysis.csv"));
    }
}
