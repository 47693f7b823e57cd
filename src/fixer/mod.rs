//! Media filename cleanup module.
//!
//! Cleans the names of media files and directories by stripping release-group
//! tags, encoding metadata and downloader-appended id suffixes, then collapses
//! single-file directories and cleans directory names. Planning and applying
//! are strictly separated: each pass walks the live filesystem, produces a
//! plan, and only then are the renames and deletes applied.

mod apply;
mod config;
mod fix;
mod plan;
mod title;

pub use apply::{ApplyReport, apply_deletes, apply_renames};
pub use config::{Config, Mode};
pub use fix::Fixer;
pub use plan::{FixPlan, collapse_single_folders, list_entries, plan_fixes, plan_folder_renames};
pub use title::{fixed_directory_path, fixed_file_path, normalize_title, strip_imgur_id, strip_youtube_id};
