//! Batch ingestion of trace files.
//!
//! Each file is parsed and ingested into its own aggregator on a rayon
//! worker; the per-file aggregates are then reduced with `merge`, so no
//! aggregate is ever shared between threads.

use super::collector::{AggregateTable, CostAggregator};
use crate::parser::{has_trace_extension, parse_trace_file};
use crate::utils::error::AnalysisError;
use log::{debug, info, warn};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of aggregating a batch of files
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub table: AggregateTable,

    /// Files that failed to parse, with the reason
    pub skipped: Vec<(PathBuf, String)>,
}

/// Find the trace files to analyze
///
/// `input` may be a directory (its direct entries are scanned) or a single
/// trace file. Entries without the trace extension are skipped with a
/// warning.
///
/// # Errors
/// * `AnalysisError::InputNotFound` - `input` does not exist
/// * `AnalysisError::NoTraceFiles` - nothing to analyze
pub fn discover_trace_files(input: &Path) -> Result<Vec<PathBuf>, AnalysisError> {
    if !input.exists() {
        return Err(AnalysisError::InputNotFound(input.to_path_buf()));
    }

    let candidates: Vec<PathBuf> = if input.is_dir() {
        fs::read_dir(input)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .collect()
    } else {
        vec![input.to_path_buf()]
    };

    let mut files: Vec<PathBuf> = candidates
        .into_iter()
        .filter(|p| {
            let keep = has_trace_extension(p);
            if !keep {
                warn!("Skipping non-trace file: {}", p.display());
            }
            keep
        })
        .collect();

    if files.is_empty() {
        return Err(AnalysisError::NoTraceFiles(input.to_path_buf()));
    }

    files.sort();
    info!("Found {} trace files in {}", files.len(), input.display());
    Ok(files)
}

/// Parse and aggregate every file, skipping the ones that fail
///
/// # Errors
/// * `AnalysisError::NoUsableTraces` - every file failed to parse
pub fn aggregate_files(files: &[PathBuf]) -> Result<BatchResult, AnalysisError> {
    let (aggregator, skipped) = files
        .par_iter()
        .map(|path| match parse_trace_file(path) {
            Ok(root) => {
                let mut aggregator = CostAggregator::new();
                aggregator.ingest(&root);
                debug!("Aggregated {}", path.display());
                (aggregator, Vec::new())
            }
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                (CostAggregator::new(), vec![(path.clone(), e.to_string())])
            }
        })
        .reduce(
            || (CostAggregator::new(), Vec::new()),
            |(a, mut skipped_a), (b, skipped_b)| {
                skipped_a.extend(skipped_b);
                (a.merge(b), skipped_a)
            },
        );

    if !files.is_empty() && skipped.len() == files.len() {
        return Err(AnalysisError::NoUsableTraces(files.len()));
    }

    let table = aggregator.finalize();
    info!(
        "Aggregated {} samples over {} signatures ({} files, {} skipped)",
        table.total_samples(),
        table.len(),
        table.counters.files_processed,
        skipped.len()
    );

    Ok(BatchResult { table, skipped })
}

/// Run `aggregate_files` on a dedicated pool of `jobs` threads
pub fn aggregate_files_with_jobs(
    files: &[PathBuf],
    jobs: usize,
) -> Result<BatchResult, AnalysisError> {
    let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;
    pool.install(|| aggregate_files(files))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_discover_missing_input() {
        let result = discover_trace_files(Path::new("/definitely/not/here"));
        assert!(matches!(result, Err(AnalysisError::InputNotFound(_))));
    }

    #[test]
    fn test_discover_skips_other_extensions() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.xml"), "<root/>").unwrap();
        fs::write(dir.path().join("a.xml"), "<root/>").unwrap();
        fs::write(dir.path().join("notes.txt"), "hello").unwrap();

        let files = discover_trace_files(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.xml"));
    }

    #[test]
    fn test_discover_empty_directory() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("readme.md"), "#").unwrap();
        assert!(matches!(
            discover_trace_files(dir.path()),
            Err(AnalysisError::NoTraceFiles(_))
        ));
    }

    #[test]
    fn test_bad_file_is_isolated() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.xml");
        let bad = dir.path().join("bad.xml");
        fs::write(&good, r#"<root><kernel_drop_node ins="42"/></root>"#).unwrap();
        fs::write(&bad, "<root><kernel_drop_node ins=").unwrap();

        let result = aggregate_files(&[good, bad.clone()]).unwrap();
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].0, bad);
        assert_eq!(result.table.counters.files_processed, 1);
        assert_eq!(result.table.get("kernel_drop_node").unwrap().samples, vec![42]);
    }

    #[test]
    fn test_all_files_bad() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("bad.xml");
        fs::write(&bad, "not markup").unwrap();
        assert!(matches!(
            aggregate_files(&[bad]),
            Err(AnalysisError::NoUsableTraces(1))
        ));
    }
}
