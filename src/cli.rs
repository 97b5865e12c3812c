mod help_text;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Build and compare size manifests of directory trees
#[derive(Parser, Debug)]
#[command(name = "filelist", version, about, long_about = help_text::ROOT_LONG_ABOUT)]
pub struct Cli {
    /// Change to DIRECTORY before doing anything else
    #[arg(short = 'C', value_name = "DIRECTORY", global = true)]
    pub directory: Option<PathBuf>,

    /// Increase log output (-v for info, -vv for debug). Takes precedence over RUST_LOG.
    #[arg(short, long, action = clap::ArgAction::Count, global = true, conflicts_with = "log_level")]
    pub verbose: u8,

    /// Log at LEVEL and above. Takes precedence over RUST_LOG.
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan a directory tree and save its manifest
    #[command(long_about = help_text::SCAN_LONG_ABOUT)]
    Scan {
        /// Directory to scan
        #[arg(value_name = "PATH", default_value = ".")]
        path: PathBuf,

        /// Manifest file to write (".json" is appended if missing)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Compare two manifests and generate an archive script for the differences
    #[command(long_about = help_text::COMPARE_LONG_ABOUT)]
    Compare {
        /// First manifest (A)
        #[arg(value_name = "A")]
        manifest_a: PathBuf,

        /// Second manifest (B)
        #[arg(value_name = "B")]
        manifest_b: PathBuf,

        /// Where to write the archive script
        #[arg(long, value_name = "FILE", conflicts_with = "no_script")]
        script: Option<PathBuf>,

        /// Do not generate an archive script
        #[arg(long)]
        no_script: bool,

        /// Also write a JSON report of the comparison to FILE
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,

        /// List every differing path
        #[arg(long)]
        list: bool,
    },

    /// Print the paths embedded in a generated archive script
    ScriptPaths {
        /// Archive script generated by 'compare'
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
