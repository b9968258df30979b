//! Command-line argument parsing
//!
//! Defines the command-line interface of the Horizon command console using
//! the clap crate for argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the Horizon command console
///
/// Options here override the matching settings of the configuration file.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Run Horizon commands and selectors against a world snapshot", long_about = None)]
pub struct CliArgs {
    /// Configuration file path
    ///
    /// If the file doesn't exist, a default configuration will be created.
    #[arg(short, long, default_value = "console.toml")]
    pub config: PathBuf,

    /// World snapshot (JSON) to load entities from
    #[arg(short, long)]
    pub world: Option<PathBuf>,

    /// Run commands as this online player instead of the console
    #[arg(short = 'a', long = "as", value_name = "PLAYER")]
    pub act_as: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Output logs in JSON format
    #[arg(long)]
    pub json_logs: bool,

    /// A single command to run; reads commands from stdin when omitted
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            config: PathBuf::from("console.toml"),
            world: None,
            act_as: None,
            log_level: None,
            json_logs: false,
            command: Vec::new(),
        }
    }
}

impl CliArgs {
    /// The one-shot command line, if any was given.
    pub fn command_line(&self) -> Option<String> {
        if self.command.is_empty() {
            None
        } else {
            Some(self.command.join(" "))
        }
    }
}
