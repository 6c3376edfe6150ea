//! Command-line arguments

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use promptlab_core::AiProvider;

/// promptlab - version and test LLM prompts from the terminal
#[derive(Parser, Debug)]
#[command(name = "promptlab", version)]
#[command(about = "A terminal workbench for versioning and testing LLM prompts", long_about = None)]
pub struct Args {
    /// Settings file (defaults to <config_dir>/promptlab/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Backend base URL, overriding the settings file
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Print NDJSON events instead of text (headless commands only)
    #[arg(long, global = true)]
    pub json: bool,

    /// Run a single command without the TUI
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List all prompts
    List,

    /// Show a prompt with its versions and the history of the latest one
    Show {
        #[arg(value_name = "PROMPT_ID")]
        id: u64,
    },

    /// Create a prompt with an initial version
    Create {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Content of version 1
        #[arg(long)]
        content: String,
    },

    /// Save new content as the next version of a prompt
    AddVersion {
        #[arg(value_name = "PROMPT_ID")]
        id: u64,

        #[arg(long)]
        content: String,
    },

    /// Run a version against one or more inputs
    Test {
        #[arg(value_name = "PROMPT_ID")]
        prompt_id: u64,

        /// Version number to test (defaults to the latest)
        #[arg(long, value_name = "N")]
        version: Option<u32>,

        /// Test input; repeat for more than one
        #[arg(long = "input", value_name = "TEXT", required = true)]
        inputs: Vec<String>,

        #[arg(long)]
        provider: Option<AiProvider>,

        #[arg(long)]
        model: Option<String>,

        /// Also write the results to this CSV file
        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,
    },

    /// Run ad-hoc prompt content without saving a version
    QuickTest {
        #[arg(long)]
        content: String,

        #[arg(long = "input", value_name = "TEXT", required = true)]
        inputs: Vec<String>,

        #[arg(long)]
        provider: Option<AiProvider>,

        #[arg(long)]
        model: Option<String>,
    },

    /// Run two versions of a prompt on the same input
    Compare {
        #[arg(value_name = "PROMPT_ID")]
        prompt_id: u64,

        /// Version number for side A (defaults to the latest)
        #[arg(long, value_name = "N")]
        a: Option<u32>,

        /// Version number for side B (defaults to the one before the latest)
        #[arg(long, value_name = "N")]
        b: Option<u32>,

        /// Shared input (defaults to `defaults.compare_input`)
        #[arg(long, value_name = "TEXT")]
        input: Option<String>,
    },

    /// Past test runs of a version
    History {
        #[arg(value_name = "PROMPT_ID")]
        prompt_id: u64,

        /// Version number (defaults to the latest)
        #[arg(long, value_name = "N")]
        version: Option<u32>,
    },

    /// Fetch a single test run with its results
    Run {
        #[arg(value_name = "RUN_ID")]
        id: u64,
    },

    /// Store the provider API key (read from stdin when omitted)
    SetKey { key: Option<String> },

    /// Remove the stored API key
    ClearKey,

    /// Write a default config file if none exists
    InitConfig,
}
