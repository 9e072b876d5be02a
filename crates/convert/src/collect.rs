//! Discovery of convertible files below an input root.

use log::{debug, warn};
use std::path::{Path, PathBuf};
use txtify_core::DocumentKind;
use walkdir::WalkDir;

/// Collect every file with a supported extension under `root`.
///
/// A file root yields itself when supported and nothing otherwise. A
/// directory root is walked recursively without following symlinks; entries
/// come back sorted by file name within each directory. A root that does
/// not exist yields nothing.
pub fn collect_candidates(root: &Path) -> Vec<PathBuf> {
    if root.is_file() {
        return if DocumentKind::is_supported(root) {
            vec![root.to_path_buf()]
        } else {
            debug!("Skipping unsupported file {}", root.display());
            Vec::new()
        };
    }

    if !root.is_dir() {
        warn!("Input path {} is neither a file nor a directory", root.display());
        return Vec::new();
    }

    let candidates: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| DocumentKind::is_supported(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    debug!("Found {} candidates under {}", candidates.len(), root.display());
    candidates
}
