//! Driver that sequences the cleanup passes.

use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use colored::Colorize;
use itertools::Itertools;

use crate::fixer::{ApplyReport, Config, Mode, apply, plan};

/// Media fix handler that plans and applies the cleanup passes for one root path.
#[derive(Debug)]
pub struct Fixer {
    root: PathBuf,
    config: Config,
}

impl Fixer {
    /// Create a new instance for the given root path.
    #[must_use]
    pub const fn new(root: PathBuf, config: Config) -> Self {
        Self { root, config }
    }

    /// Run all cleanup passes for the configured mode.
    ///
    /// Each pass plans against the live tree and is applied in full before
    /// the next pass plans, so planning never interleaves with mutation.
    /// In dryrun mode nothing is applied, which means the collapse and folder
    /// passes print plans computed against the unmodified tree.
    ///
    /// # Errors
    /// Returns an error if a planning walk fails,
    /// or if any of the applied operations failed.
    pub fn run(&self) -> Result<()> {
        if self.config.verbose {
            println!("{self}");
        }

        let start = Instant::now();
        let mut report = ApplyReport::default();

        let fix_plan = plan::plan_fixes(&self.root, &self.config)?;
        if fix_plan.is_empty() && self.config.verbose {
            println!("No files to fix");
        }
        report.merge(apply::apply_renames(&fix_plan.renames, &self.root, &self.config));

        if self.config.mode == Mode::Torrent {
            report.merge(apply::apply_deletes(&fix_plan.deletes, &self.root, &self.config));

            if self.root.is_dir() {
                let moves = plan::collapse_single_folders(&self.root)?;
                report.merge(apply::apply_renames(&moves, &self.root, &self.config));

                let folders = plan::plan_folder_renames(&self.root)?;
                report.merge(apply::apply_renames(&folders, &self.root, &self.config));
            }
        }

        if self.config.dryrun {
            println!("Dryrun: would have applied {} operations", report.applied);
        } else if report.applied > 0 {
            println!("{}", format!("Applied {} operations", report.applied).green());
        } else if self.config.verbose {
            println!("Nothing to do");
        }
        println!("Took {}", crate::format_duration(start.elapsed()));

        if report.has_failures() {
            anyhow::bail!(
                "{} of {} operations failed:\n{}",
                report.failed.len(),
                report.failed.len() + report.applied,
                report
                    .failed
                    .iter()
                    .map(|(path, reason)| format!("  {}: {reason}", path.display()))
                    .join("\n")
            );
        }
        Ok(())
    }
}

impl fmt::Display for Fixer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Root: {}", self.root.display())?;
        write!(f, "{}", self.config)
    }
}
