use std::fmt;
use std::fs;

use anyhow::Context;
use clap::ValueEnum;
use itertools::Itertools;
use serde::Deserialize;

/// File extensions that are allowed to stay in torrent mode.
/// Anything else gets queued for deletion.
pub static FILE_FORMATS: [&str; 6] = ["mp4", "mkv", "mka", "flac", "jpg", "png"];

/// File extensions whose names get the title cleanup in torrent mode.
pub static CONTENT_FORMATS: [&str; 2] = ["mp4", "mkv"];

/// Which cleanup rules to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Clean fansub release names and delete non-media files
    Torrent,
    /// Strip the 11-char video id youtube-dl appends to filenames
    Youtube,
    /// Strip the 7-char image id appended to Imgur downloads
    Imgur,
}

/// Config from the user config file
#[derive(Debug, Default, Deserialize)]
struct FixConfig {
    #[serde(default)]
    content_formats: Vec<String>,
    #[serde(default)]
    dryrun: bool,
    #[serde(default)]
    file_formats: Vec<String>,
    #[serde(default)]
    verbose: bool,
}

/// Wrapper needed for parsing the config file section.
#[derive(Debug, Default, Deserialize)]
struct UserConfig {
    #[serde(default)]
    mfix: FixConfig,
}

/// Final config created from CLI arguments and user config file.
#[derive(Debug)]
pub struct Config {
    pub mode: Mode,
    pub(crate) content_formats: Vec<String>,
    pub(crate) dryrun: bool,
    pub(crate) file_formats: Vec<String>,
    pub(crate) verbose: bool,
}

impl Config {
    /// Create config from given command line options and the user config file.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn from_options(mode: Mode, dryrun: bool, verbose: bool) -> anyhow::Result<Self> {
        let user_config = FixConfig::get_user_config()?;

        let file_formats = if user_config.file_formats.is_empty() {
            FILE_FORMATS.iter().map(std::string::ToString::to_string).collect()
        } else {
            user_config.file_formats
        };
        let content_formats = if user_config.content_formats.is_empty() {
            CONTENT_FORMATS.iter().map(std::string::ToString::to_string).collect()
        } else {
            user_config.content_formats
        };

        Ok(Self {
            mode,
            content_formats,
            dryrun: dryrun || user_config.dryrun,
            file_formats,
            verbose: verbose || user_config.verbose,
        })
    }

    /// Create a config with the default format lists, ignoring the user config file.
    #[must_use]
    pub fn with_defaults(mode: Mode) -> Self {
        Self {
            mode,
            content_formats: CONTENT_FORMATS.iter().map(std::string::ToString::to_string).collect(),
            dryrun: false,
            file_formats: FILE_FORMATS.iter().map(std::string::ToString::to_string).collect(),
            verbose: false,
        }
    }

    /// Check if the extension is one of the accepted file formats.
    pub(crate) fn is_accepted_format(&self, extension: &str) -> bool {
        self.file_formats.iter().any(|e| e == extension)
    }

    /// Check if the extension is one of the renamable content formats.
    pub(crate) fn is_content_format(&self, extension: &str) -> bool {
        self.content_formats.iter().any(|e| e == extension)
    }
}

impl FixConfig {
    /// Try to read user config from the file if it exists.
    /// Otherwise, fall back to default config.
    ///
    /// # Errors
    /// Returns an error if config file exists but cannot be read or parsed.
    fn get_user_config() -> anyhow::Result<Self> {
        let Some(path) = crate::config::CONFIG_PATH.as_deref() else {
            return Ok(Self::default());
        };

        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse config file {}:\n{e}", path.display())),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(anyhow::anyhow!(
                "Failed to read config file {}: {error}",
                path.display()
            )),
        }
    }

    /// Parse config from a TOML string.
    ///
    /// # Errors
    /// Returns an error if the TOML string is invalid.
    fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        toml::from_str::<UserConfig>(toml_str)
            .map(|config| config.mfix)
            .context("Failed to parse mfix config TOML")
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Torrent => write!(f, "torrent"),
            Self::Youtube => write!(f, "youtube"),
            Self::Imgur => write!(f, "imgur"),
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Config:")?;
        writeln!(f, "  mode:    {}", self.mode)?;
        writeln!(f, "  dryrun:  {}", crate::colorize_bool(self.dryrun))?;
        writeln!(f, "  verbose: {}", crate::colorize_bool(self.verbose))?;
        writeln!(f, "  file formats:    {}", self.file_formats.iter().join(", "))?;
        writeln!(f, "  content formats: {}", self.content_formats.iter().join(", "))
    }
}
