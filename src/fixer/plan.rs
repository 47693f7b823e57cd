//! Planning passes over the filesystem tree.
//!
//! Each pass is a pure recursive function over the live tree that returns an
//! immutable plan, merged by the caller. Nothing is renamed or deleted here.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::fixer::{Config, Mode, title};

/// Planned filename fixes: renames keyed by the existing path,
/// plus the set of files queued for deletion in torrent mode.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FixPlan {
    pub renames: BTreeMap<PathBuf, PathBuf>,
    pub deletes: BTreeSet<PathBuf>,
}

impl FixPlan {
    /// Merge another plan into this one. Paths are unique per pass,
    /// so the key sets never collide.
    pub fn merge(&mut self, other: Self) {
        self.renames.extend(other.renames);
        self.deletes.extend(other.deletes);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.renames.is_empty() && self.deletes.is_empty()
    }
}

/// List the direct children of a directory as absolute paths,
/// skipping hidden entries and OS metadata files.
///
/// # Errors
/// Returns an error if the directory does not exist or cannot be read.
pub fn list_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_entry(|entry| !crate::should_skip_entry(entry))
        .map(|entry| entry.map(walkdir::DirEntry::into_path))
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?;

    entries.sort_unstable();
    Ok(entries)
}

/// Plan filename fixes for the given path, recursing into subdirectories.
///
/// In torrent mode, files whose extension is not an accepted format are
/// queued for deletion, and only content formats get a title cleanup.
/// In youtube and imgur mode, the id suffix is stripped from every file
/// regardless of extension and nothing is deleted.
pub fn plan_fixes(path: &Path, config: &Config) -> Result<FixPlan> {
    let mut plan = FixPlan::default();

    if path.is_file() {
        if config.mode == Mode::Torrent {
            let extension = crate::path_to_file_extension_string(path);
            if !config.is_accepted_format(&extension) {
                plan.deletes.insert(path.to_path_buf());
                return Ok(plan);
            }
            if !config.is_content_format(&extension) {
                return Ok(plan);
            }
        }
        let new_path = title::fixed_file_path(path, config.mode)?;
        if new_path != path {
            plan.renames.insert(path.to_path_buf(), new_path);
        }
    } else {
        for entry in list_entries(path)? {
            plan.merge(plan_fixes(&entry, config)?);
        }
    }

    Ok(plan)
}

/// Plan moving the contents of single-file directories up one level.
///
/// A directory with exactly one direct-child file is collapsed: the file
/// moves to the directory's parent, keeping its name. Such a directory is
/// fully described by its single file, so its subdirectories are not
/// inspected further. The now-empty directory is not cleaned up here.
pub fn collapse_single_folders(path: &Path) -> Result<BTreeMap<PathBuf, PathBuf>> {
    let mut moves = BTreeMap::new();
    if path.is_file() {
        return Ok(moves);
    }

    let entries = list_entries(path)?;
    let mut files = entries.iter().filter(|entry| entry.is_file());

    if let (Some(file), None) = (files.next(), files.next()) {
        let parent = path.parent().context("Failed to get parent directory")?;
        moves.insert(file.clone(), parent.join(crate::path_to_filename_string(file)));
    } else {
        for entry in entries.iter().filter(|entry| entry.is_dir()) {
            moves.extend(collapse_single_folders(entry)?);
        }
    }

    Ok(moves)
}

/// Plan cleaning every directory name in the tree, root included.
///
/// Each directory gets the title cleanup on its own name, recorded against
/// the original, not-yet-renamed parent path. The plan must be applied
/// deepest-first so that a parent rename cannot invalidate a child's
/// recorded path (`apply_renames` takes care of the ordering).
pub fn plan_folder_renames(dir: &Path) -> Result<BTreeMap<PathBuf, PathBuf>> {
    let mut plan = BTreeMap::new();

    if let Some(fixed) = title::fixed_directory_path(dir)
        && fixed != dir
    {
        plan.insert(dir.to_path_buf(), fixed);
    }

    for entry in list_entries(dir)? {
        if entry.is_dir() {
            plan.extend(plan_folder_renames(&entry)?);
        }
    }

    Ok(plan)
}
