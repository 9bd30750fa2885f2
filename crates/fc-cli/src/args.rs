//! Command-line argument definitions for the `fc` tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use fc_editor::config::DEFAULT_STORAGE_KEY;

/// Export, import, and check stored freeform canvases
#[derive(Parser, Debug)]
#[command(name = "fc", author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding stored canvases (one `<key>.json` per canvas)
    #[arg(long, global = true, default_value = ".")]
    pub store_dir: PathBuf,

    /// Storage key of the canvas to operate on
    #[arg(short, long, global = true, default_value = DEFAULT_STORAGE_KEY)]
    pub key: String,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Shorthand for `--log-level debug`
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write the stored canvas as interchange text
    Export {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace the stored canvas with an interchange file
    Import {
        /// Interchange text file to read
        input: PathBuf,
    },

    /// Report lines, records, or links that would be dropped on load
    Check {
        /// Interchange text file to check (the stored canvas when omitted)
        input: Option<PathBuf>,
    },
}
