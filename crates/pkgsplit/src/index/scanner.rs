use crate::classify::normalize_path;
use crate::error::{PkgsplitError, Result};
use log::warn;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    pub files_scanned: usize,
    pub dirs_scanned: usize,
    pub symlinks_found: usize,
    pub errors: usize,
}

/// Options for install tree scanning
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub follow_symlinks: bool,
    pub max_depth: Option<usize>,
}

/// Walks an install root and returns the installed paths, normalized and sorted
///
/// Regular files and symlinks are yielded relative to `root` with a leading
/// `/`, which is the form the package generator routes on. Directories are
/// only counted. Unreadable entries are logged and counted as errors.
pub fn scan_install_root<P: AsRef<Path>>(
    root: P,
    options: &ScanOptions,
) -> Result<(Vec<String>, ScanStats)> {
    let root = root.as_ref();
    let mut stats = ScanStats::default();
    let mut paths = Vec::new();

    if !root.exists() {
        return Err(PkgsplitError::FileNotFound(root.to_path_buf()));
    }

    let mut walker = WalkDir::new(root).follow_links(options.follow_symlinks);

    if let Some(max_depth) = options.max_depth {
        walker = walker.max_depth(max_depth);
    }

    for entry in walker.into_iter() {
        match entry {
            Ok(entry) => {
                if let Some(path) = process_entry(&entry, &mut stats, root) {
                    paths.push(path);
                }
            }
            Err(e) => {
                warn!("Walk error: {}", e);
                stats.errors += 1;
            }
        }
    }

    paths.sort();
    Ok((paths, stats))
}

fn process_entry(entry: &DirEntry, stats: &mut ScanStats, root: &Path) -> Option<String> {
    let file_type = entry.file_type();

    if file_type.is_dir() {
        stats.dirs_scanned += 1;
        return None;
    }

    if file_type.is_symlink() {
        stats.symlinks_found += 1;
    } else if !file_type.is_file() {
        return None;
    }

    let relative_path = entry
        .path()
        .strip_prefix(root)
        .unwrap_or(entry.path())
        .to_string_lossy()
        .to_string();

    stats.files_scanned += 1;
    Some(normalize_path(&relative_path))
}
