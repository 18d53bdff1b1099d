//! Command-line interface definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Convert pasted HTML to Markdown
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// TOML file with conversion options
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Keep whitespace inside <pre> blocks
    #[arg(long, global = true)]
    pub preserve_pre: bool,

    /// Return inputs larger than this many bytes unconverted
    #[arg(long, global = true, value_name = "BYTES")]
    pub max_input: Option<usize>,

    /// Return inputs nesting elements deeper than this unconverted
    #[arg(long, global = true, value_name = "LEVELS")]
    pub max_depth: Option<usize>,

    /// Alt text for images without one
    #[arg(long, global = true, value_name = "TEXT")]
    pub default_alt: Option<String>,

    /// Leave unlabelled code blocks without a language
    #[arg(long, global = true)]
    pub no_detect: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Convert HTML to Markdown
    #[command(visible_alias = "c")]
    Convert {
        /// HTML file to read. Reads stdin when omitted or `-`.
        #[arg(value_hint = clap::ValueHint::FilePath)]
        input: Option<PathBuf>,
    },

    /// Treat the input as a clipboard `text/html` payload and apply the
    /// rich-paste gate. Prints the input unchanged when it would not be
    /// converted.
    #[command(visible_alias = "p")]
    Paste {
        #[arg(value_hint = clap::ValueHint::FilePath)]
        input: Option<PathBuf>,
    },

    /// Print the detected language of a code snippet
    #[command(visible_alias = "d")]
    Detect {
        #[arg(value_hint = clap::ValueHint::FilePath)]
        input: Option<PathBuf>,
    },
}

impl Commands {
    pub fn input(&self) -> Option<&PathBuf> {
        match self {
            Commands::Convert { input } | Commands::Paste { input } | Commands::Detect { input } => {
                input.as_ref()
            }
        }
    }
}
