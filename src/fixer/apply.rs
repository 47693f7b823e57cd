//! Applies planned rename and delete operations to the filesystem.
//!
//! Application is not transactional: a failed operation is recorded and the
//! batch continues, so the report tells exactly what succeeded and what did
//! not. A rename whose target already exists is always refused.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::fixer::Config;

/// Outcome of applying a batch of operations.
#[derive(Debug, Default)]
pub struct ApplyReport {
    /// Number of operations applied (or printed, in dryrun mode).
    pub applied: usize,
    /// Operations that could not be applied, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

impl ApplyReport {
    /// Fold another report into this one.
    pub fn merge(&mut self, other: Self) {
        self.applied += other.applied;
        self.failed.extend(other.failed);
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Apply a batch of renames, deepest paths first.
///
/// Applying deepest-first means a directory rename can never invalidate the
/// recorded path of an entry deeper in the same tree.
#[must_use]
pub fn apply_renames(renames: &BTreeMap<PathBuf, PathBuf>, root: &Path, config: &Config) -> ApplyReport {
    let mut report = ApplyReport::default();

    let mut pairs: Vec<(&PathBuf, &PathBuf)> = renames.iter().collect();
    pairs.sort_by_key(|(path, _)| Reverse(path.components().count()));

    let max_items = pairs.len();
    let max_chars = pairs.len().checked_ilog10().map_or(1, |d| d as usize + 1);
    for (index, (path, new_path)) in pairs.into_iter().enumerate() {
        let old_str = crate::get_relative_path_or_filename(path, root);
        let new_str = crate::get_relative_path_or_filename(new_path, root);
        let number = format!("{:>max_chars$} / {max_items}", index + 1);

        if config.dryrun {
            println!("{}", format!("Dryrun {number}:").bold().cyan());
            crate::show_diff(&old_str, &new_str);
            report.applied += 1;
            continue;
        }

        println!("{}", format!("Rename {number}:").bold().magenta());
        crate::show_diff(&old_str, &new_str);

        if new_path.exists() {
            crate::print_error!("Rename target already exists: {old_str} -> {new_str}");
            report
                .failed
                .push((path.clone(), format!("target already exists: {new_str}")));
            continue;
        }

        match fs::rename(path, new_path) {
            Ok(()) => {
                report.applied += 1;
            }
            Err(e) => {
                crate::print_error!("Failed to rename: {old_str}\n{e}");
                report.failed.push((path.clone(), e.to_string()));
            }
        }
    }

    report
}

/// Apply a batch of file deletions.
#[must_use]
pub fn apply_deletes(deletes: &BTreeSet<PathBuf>, root: &Path, config: &Config) -> ApplyReport {
    let mut report = ApplyReport::default();

    for path in deletes {
        let path_str = crate::get_relative_path_or_filename(path, root);

        if config.dryrun {
            println!("{} {path_str}", "Dryrun delete:".bold().cyan());
            report.applied += 1;
            continue;
        }

        println!("{} {}", "Delete:".bold().red(), path_str);
        match fs::remove_file(path) {
            Ok(()) => {
                report.applied += 1;
            }
            Err(e) => {
                crate::print_error!("Failed to delete: {path_str}\n{e}");
                report.failed.push((path.clone(), e.to_string()));
            }
        }
    }

    report
}
