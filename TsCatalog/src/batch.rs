//! Batch catalog checking
//!
//! Discovers `.ts` files under a directory and parses and validates them in
//! parallel. Every file gets its own [`Catalog`], so no state is shared
//! between workers beyond the progress counter.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::catalog::CatalogStats;
use crate::error::Result;
use crate::formats::ts::read_ts_with_issues;
use crate::lifecycle::{Issue, Severity};

/// Progress update for a batch check
#[derive(Debug, Clone)]
pub struct CheckProgress {
    /// Current item number (1-indexed)
    pub current: usize,
    /// Total number of items
    pub total: usize,
    /// File being checked
    pub current_file: Option<String>,
}

impl CheckProgress {
    /// Create a progress update with a file name
    #[must_use]
    pub fn with_file(current: usize, total: usize, file: impl Into<String>) -> Self {
        Self {
            current,
            total,
            current_file: Some(file.into()),
        }
    }

    /// Get the progress percentage (0.0 - 1.0)
    #[must_use]
    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.current as f32 / self.total as f32
        }
    }
}

/// Result of checking one catalog file
#[derive(Debug, Clone)]
pub struct FileSummary {
    /// Path of the checked file
    pub path: PathBuf,
    /// Target language of the catalog
    pub language: Option<String>,
    /// Message counts
    pub stats: CatalogStats,
    /// Issues recovered while parsing, followed by validation issues
    pub issues: Vec<Issue>,
}

impl FileSummary {
    /// Number of issues at or above a severity
    #[must_use]
    pub fn count_at_least(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity >= severity).count()
    }
}

/// Result of a batch check
#[derive(Debug, Clone, Default)]
pub struct BatchCheckResult {
    /// Files that parsed, in input order
    pub checked: Vec<FileSummary>,
    /// Files that failed to read or parse, with the error message
    pub failures: Vec<(PathBuf, String)>,
}

impl BatchCheckResult {
    /// Number of issues at or above a severity across all checked files
    #[must_use]
    pub fn count_at_least(&self, severity: Severity) -> usize {
        self.checked.iter().map(|f| f.count_at_least(severity)).sum()
    }

    /// Whether every file parsed and no error-level issue was found
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.count_at_least(Severity::Error) == 0
    }
}

/// Bytes read when deciding whether a `.ts` file is a catalog
const SNIFF_LEN: u64 = 4096;

/// Find all .ts catalogs in a directory recursively
///
/// TypeScript sources share the extension, so only files that start with
/// markup and carry a `<TS` root tag near the top are returned.
///
/// # Returns
/// A sorted list of paths to .ts catalogs found in the directory tree.
pub fn find_ts_files<P: AsRef<Path>>(dir: P) -> Vec<PathBuf> {
    let mut ts_files: Vec<_> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| {
            e.path().is_file()
                && e.path()
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("ts"))
        })
        .filter(|e| {
            let catalog = looks_like_catalog(e.path());
            if !catalog {
                tracing::debug!("Skipping {:?}: not a TS catalog", e.path());
            }
            catalog
        })
        .map(|e| e.path().to_path_buf())
        .collect();

    ts_files.sort();
    ts_files
}

/// Whether a file starts like a Qt Linguist catalog
fn looks_like_catalog(path: &Path) -> bool {
    let mut head = Vec::new();
    let read = File::open(path).and_then(|file| file.take(SNIFF_LEN).read_to_end(&mut head));
    if read.is_err() {
        return false;
    }

    let head = head
        .strip_prefix(&[0xEF, 0xBB, 0xBF])
        .unwrap_or(head.as_slice());
    let text = String::from_utf8_lossy(head);
    text.trim_start().starts_with('<')
        && text.match_indices("<TS").any(|(index, tag)| {
            text[index + tag.len()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_whitespace() || c == '>' || c == '/')
        })
}

/// Parse and validate a single catalog file
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn check_file<P: AsRef<Path>>(path: P) -> Result<FileSummary> {
    let path = path.as_ref();
    let parsed = read_ts_with_issues(path)?;
    let mut issues = parsed.issues;
    issues.extend(parsed.catalog.validate());
    Ok(FileSummary {
        path: path.to_path_buf(),
        language: parsed.catalog.language.clone(),
        stats: parsed.catalog.statistics(),
        issues,
    })
}

/// Check catalog files in parallel
///
/// # Arguments
/// * `files` - Catalog files to check
/// * `progress` - Callback for progress updates
pub fn check_files<F>(files: &[PathBuf], progress: F) -> BatchCheckResult
where
    F: Fn(&CheckProgress) + Send + Sync,
{
    let processed = AtomicUsize::new(0);
    let total = files.len();

    let outcomes: Vec<(PathBuf, Result<FileSummary>)> = files
        .par_iter()
        .map(|path| {
            let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
            progress(&CheckProgress::with_file(
                current,
                total,
                path.to_string_lossy(),
            ));
            (path.clone(), check_file(path))
        })
        .collect();

    let mut result = BatchCheckResult::default();
    for (path, outcome) in outcomes {
        match outcome {
            Ok(summary) => result.checked.push(summary),
            Err(e) => {
                tracing::warn!("Failed to check {:?}: {}", path, e);
                result.failures.push((path, e.to_string()));
            }
        }
    }

    tracing::info!(
        "Checked {} catalogs ({} failed)",
        result.checked.len(),
        result.failures.len()
    );
    result
}
