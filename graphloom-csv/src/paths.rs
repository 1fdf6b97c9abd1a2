//! Output path selection that never overwrites existing files.

use std::path::{Path, PathBuf};

/// Returns `path` if nothing exists there, otherwise the first
/// `<stem><n><.ext>` sibling (counting from `0`) that is free.
///
/// # Examples
/// ```
/// use graphloom_csv::unused_path;
///
/// let dir = tempfile::tempdir().expect("temp dir");
/// let first = dir.path().join("summary.csv");
/// assert_eq!(unused_path(&first), first);
/// std::fs::write(&first, "").expect("write");
/// assert_eq!(unused_path(&first), dir.path().join("summary0.csv"));
/// ```
#[must_use]
pub fn unused_path(path: &Path) -> PathBuf {
    unused_paths(&[path]).into_iter().next().unwrap_or_else(|| path.to_path_buf())
}

/// Like [`unused_path`] for a group of files that must share one suffix: the
/// same `n` is appended to every stem until none of the candidates exist.
#[must_use]
pub fn unused_paths(paths: &[&Path]) -> Vec<PathBuf> {
    if paths.iter().all(|path| !path.exists()) {
        return paths.iter().map(|path| path.to_path_buf()).collect();
    }
    let mut suffix = 0_u64;
    loop {
        let candidates: Vec<PathBuf> = paths
            .iter()
            .map(|path| with_suffix(path, suffix))
            .collect();
        if candidates.iter().all(|candidate| !candidate.exists()) {
            return candidates;
        }
        suffix += 1;
    }
}

fn with_suffix(path: &Path, suffix: u64) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(extension) => format!("{stem}{suffix}.{}", extension.to_string_lossy()),
        None => format!("{stem}{suffix}"),
    };
    path.with_file_name(name)
}
