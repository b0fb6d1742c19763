//! Removal of incomplete download artifacts.
//!
//! yt-dlp leaves `.part`, `.ytdl`, `.temp` and `.aria2` files behind when a
//! download is interrupted. This module finds them under a folder and,
//! unless running dry, deletes them.

use std::io;
use std::path::{Path, PathBuf};

/// Extensions (lower-case, without the dot) of incomplete artifacts
pub const TRASH_EXTENSIONS: &[&str] = &["part", "ytdl", "temp", "aria2"];

/// Outcome of a cleanup pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Folder that was scanned
    pub root: PathBuf,
    /// False when the folder did not exist (nothing was scanned)
    pub root_exists: bool,
    /// Matching files, in discovery order
    pub files: Vec<PathBuf>,
    /// Files actually deleted (always 0 on a dry run)
    pub removed: usize,
    pub dry_run: bool,
}

/// Returns true when `path` has one of the artifact extensions (any case).
pub fn is_incomplete_artifact(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            TRASH_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Recursively lists regular files under `root` that look like incomplete
/// downloads. Symlinks are not followed.
///
/// Only an unreadable `root` is an error; subfolders and entries that cannot
/// be read are logged and skipped.
pub fn find_incomplete(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let read = match fs_err::read_dir(&dir) {
            Ok(read) => read,
            Err(e) if dir == root => return Err(e),
            Err(e) => {
                log::warn!("Skipping unreadable folder: {}", e);
                continue;
            }
        };

        let mut entries: Vec<_> = read
            .filter_map(|entry| {
                entry
                    .map_err(|e| log::warn!("Skipping unreadable entry in {}: {}", dir.display(), e))
                    .ok()
            })
            .collect();
        entries.sort_by_key(|entry| entry.path());

        for entry in entries {
            let path = entry.path();
            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(e) => {
                    log::warn!("Skipping {}: {}", path.display(), e);
                    continue;
                }
            };
            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() && is_incomplete_artifact(&path) {
                found.push(path);
            }
        }
    }

    Ok(found)
}

/// Finds incomplete artifacts under `root` and deletes them unless `dry_run`.
///
/// A missing `root` is not an error: the report comes back with
/// `root_exists == false`. Files that vanish before deletion count as removed.
pub fn cleanup(root: &Path, dry_run: bool) -> io::Result<CleanupReport> {
    let mut report = CleanupReport {
        root: root.to_path_buf(),
        dry_run,
        ..Default::default()
    };

    if !root.exists() {
        log::info!("Cleanup root {} does not exist", root.display());
        return Ok(report);
    }
    report.root_exists = true;
    report.files = find_incomplete(root)?;

    if dry_run {
        return Ok(report);
    }

    for path in &report.files {
        match fs_err::remove_file(path) {
            Ok(()) => report.removed += 1,
            Err(e) if e.kind() == io::ErrorKind::NotFound => report.removed += 1,
            Err(e) => log::warn!("Failed to delete {}: {}", path.display(), e),
        }
    }
    log::info!("Removed {} of {} incomplete file(s) under {}", report.removed, report.files.len(), root.display());

    Ok(report)
}
