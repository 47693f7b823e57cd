use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use media_fix::fixer::{Config, Fixer, Mode};

#[derive(Parser)]
#[command(
    author,
    version,
    name = env!("CARGO_BIN_NAME"),
    about = "Clean up media file and directory names"
)]
pub struct Args {
    /// Cleanup mode to apply
    #[arg(value_enum)]
    mode: Option<Mode>,

    /// Optional input directory or file
    #[arg(value_hint = clap::ValueHint::AnyPath)]
    path: Option<PathBuf>,

    /// Only print changes without renaming
    #[arg(short, long)]
    print: bool,

    /// Create shell completion
    #[arg(short = 'l', long, name = "SHELL")]
    completion: Option<Shell>,

    /// Print verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if let Some(shell) = args.completion {
        return media_fix::generate_shell_completion(shell, Args::command(), true, env!("CARGO_BIN_NAME"));
    }
    let Some(mode) = args.mode else {
        anyhow::bail!("Cleanup mode is required: torrent, youtube or imgur");
    };
    let path = media_fix::resolve_input_path(args.path.as_deref())?;
    let config = Config::from_options(mode, args.print, args.verbose)?;
    Fixer::new(path, config).run()
}
