//! CLI definition using clap

use clap::{Parser, Subcommand};
use ecosort_types::OutputFormat;
use std::path::PathBuf;

#[derive(Parser, Clone)]
#[command(name = "ecosort")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Identify waste in a photo and learn how to dispose of it")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Model name override
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Classify the waste items in an image
    Classify {
        /// Image file (jpg, png, webp, gif, heic) or a .txt file holding a data URI
        image: PathBuf,

        /// Do not add the result to history
        #[arg(long)]
        no_save: bool,

        /// Give up after this many seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Request schema-constrained JSON (on if set here or in config)
        #[arg(long)]
        structured: bool,
    },

    /// Show scan history
    History {
        /// Limit number of entries shown
        #[arg(long, short = 'n', default_value = "20")]
        limit: usize,

        /// Delete one scan by id
        #[arg(long)]
        delete: Option<String>,

        /// Delete all scans
        #[arg(long)]
        clear: bool,
    },

    /// Show how scanned items split across categories
    Stats,

    /// Show recycling tips
    Tips {
        /// Article id to show in full
        id: Option<String>,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set model
        #[arg(long)]
        set_model: Option<String>,

        /// Set API base URL
        #[arg(long)]
        set_api_base: Option<String>,

        /// Set the environment variable that holds the API key
        #[arg(long)]
        set_api_key_env: Option<String>,

        /// Enable/disable schema-constrained output
        #[arg(long)]
        set_structured: Option<bool>,

        /// Set number of scans kept in history
        #[arg(long)]
        set_history_limit: Option<usize>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_structured(args: &[&str]) -> bool {
        match Cli::try_parse_from(args).unwrap().command {
            Commands::Classify { structured, .. } => structured,
            _ => panic!("expected classify"),
        }
    }

    #[test]
    fn test_structured_is_a_bare_flag() {
        assert!(classify_structured(&["ecosort", "classify", "bin.jpg", "--structured"]));
        assert!(!classify_structured(&["ecosort", "classify", "bin.jpg"]));
        assert!(Cli::try_parse_from(["ecosort", "classify", "bin.jpg", "--structured", "true"]).is_err());
    }
}
