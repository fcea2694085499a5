mod cardsort;
mod config;
mod lists;
mod logger;

use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::cardsort::CardSort;
use crate::config::Config;

#[derive(Parser)]
#[command(
    author,
    version,
    name = env!("CARGO_BIN_NAME"),
    about = "Sort scanned ID card images into per-person folders"
)]
pub(crate) struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Source directory with the numbered images
    #[arg(value_hint = clap::ValueHint::DirPath)]
    source: Option<PathBuf>,

    /// Destination root directory
    #[arg(short = 'o', long, value_name = "DIR", value_hint = clap::ValueHint::DirPath)]
    output: Option<PathBuf>,

    /// Read name+ID records from file, use '-' for stdin
    #[arg(short = 'i', long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    input: Option<PathBuf>,

    /// Add a name+ID record
    #[arg(short = 'n', long = "record", num_args = 1, action = clap::ArgAction::Append, value_name = "LINE")]
    records: Vec<String>,

    /// Select a document label by position or name
    #[arg(short = 's', long = "select", num_args = 1, action = clap::ArgAction::Append, value_name = "LABEL")]
    select: Vec<String>,

    /// Select all document labels
    #[arg(short = 'a', long, conflicts_with = "select")]
    all: bool,

    /// Naming template for the source images
    #[arg(short = 't', long, value_name = "TEXT")]
    template: Option<String>,

    /// Use a naming template from the saved list by position or text
    #[arg(short = 'u', long = "use", value_name = "TEMPLATE")]
    use_template: Option<String>,

    /// Only print changes without copying files
    #[arg(short = 'p', long)]
    print: bool,

    /// Write a log file
    #[arg(short = 'g', long, value_name = "FILE", num_args = 0..=1, value_hint = clap::ValueHint::FilePath)]
    log: Option<Option<PathBuf>>,

    /// Directory for the label and template lists
    #[arg(short = 'd', long, value_name = "DIR", global = true, value_hint = clap::ValueHint::DirPath)]
    data_dir: Option<PathBuf>,

    /// Generate shell completion
    #[arg(short = 'l', long, name = "SHELL")]
    completion: Option<Shell>,

    /// Print verbose output
    #[arg(short = 'v', long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Manage document labels
    #[command(subcommand)]
    Labels(LabelCommand),

    /// Manage naming templates
    #[command(subcommand)]
    Templates(TemplateCommand),
}

#[derive(Subcommand)]
pub(crate) enum LabelCommand {
    /// List labels, optionally only those containing the filter text
    List { filter: Option<String> },

    /// Add a label
    Add {
        name: String,

        /// Insert after this label position or name instead of appending
        #[arg(short = 'a', long, value_name = "LABEL")]
        after: Option<String>,
    },

    /// Remove labels by position or name
    Remove {
        #[arg(required = true, num_args = 1..)]
        labels: Vec<String>,
    },

    /// Move a label to a new position
    Move {
        /// Label position or name
        label: String,

        /// New 1-based position
        position: usize,
    },

    /// Remove all labels
    Clear,
}

#[derive(Subcommand)]
pub(crate) enum TemplateCommand {
    /// List naming templates, optionally only those containing the filter text
    List { filter: Option<String> },

    /// Add a naming template
    Add { template: String },

    /// Remove a naming template by position or text
    Remove { template: String },

    /// Show the default naming template, or set it by position or text
    Default { template: Option<String> },
}

fn main() -> Result<()> {
    let mut args = Args::parse();
    if let Some(ref shell) = args.completion {
        card_sort::generate_shell_completion(*shell, Args::command(), true, env!("CARGO_BIN_NAME"))
    } else {
        let config = Config::from_args(&args)?;
        match args.command.take() {
            Some(Command::Labels(command)) => lists::run_labels(&config, command),
            Some(Command::Templates(command)) => lists::run_templates(&config, command),
            None => CardSort::new(&args, config)?.run(),
        }
    }
}
