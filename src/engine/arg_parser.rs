use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Find and remove an extended attribute (default com.apple.quarantine). Quote paths with spaces.
#[derive(Clone, Debug, Parser)]
#[command(name = "aq", version, disable_version_flag = true)]
#[command(
    about = "aq - antiQuarantine: check or remove an extended attribute on a file or a whole directory."
)]
#[command(after_help = "Examples:
  aq <file>            print whether file has the attribute
  aq -r <file>         remove the attribute from file
  aq -f <directory>    list files in directory with the attribute (recursive)
  aq -rf <directory>   remove the attribute from all files in directory (recursive)

Folder mode never crosses into another mounted filesystem.")]
pub struct Cli {
    /// File to check, or with -r, to clean.
    #[arg(
        value_name = "PATH",
        required_unless_present = "folder",
        conflicts_with = "folder"
    )]
    pub path: Option<PathBuf>,

    /// Remove the attribute instead of reporting it.
    #[arg(long, short = 'r')]
    pub remove: bool,

    /// Work recursively on a directory.
    #[arg(long, short = 'f', value_name = "DIR")]
    pub folder: Option<PathBuf>,

    /// Attribute name (case-sensitive). Default: com.apple.quarantine.
    #[arg(long, short = 'a', value_name = "NAME")]
    pub attr: Option<String>,

    /// Worker threads for folder mode. Default: one per CPU.
    #[arg(long, short = 'j', value_parser = clap::value_parser!(usize))]
    pub threads: Option<usize>,

    /// Paths queued ahead of the workers in folder mode.
    #[arg(long, value_parser = clap::value_parser!(usize))]
    pub queue_cap: Option<usize>,

    /// Follow symbolic links (walk into linked directories, act on link targets).
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub follow_links: Option<bool>,

    /// Verbose (debug) logging on stderr.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Config file. Default: .aq.toml in the current directory, if present.
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print version.
    #[arg(long, short = 'v', action = ArgAction::Version)]
    pub version: Option<bool>,
}
