//! Conversion options from a TOML file and command-line overrides.
//!
//! Every key is optional and defaults to the editor's settings:
//!
//! ```toml
//! default_image_alt = "image"
//! preserve_preformatted = false
//! max_input_len = 1048576
//! detect_code_language = true
//! max_depth = 512
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use pastedown::TurndownOptions;

use crate::args::Cli;

/// Load options from an optional config file, then apply flag overrides.
pub fn load_options(cli: &Cli) -> Result<TurndownOptions> {
    let mut options = match &cli.config {
        Some(path) => read_options(path)?,
        None => TurndownOptions::default(),
    };
    apply_overrides(&mut options, cli);
    Ok(options)
}

fn read_options(path: &Path) -> Result<TurndownOptions> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse_options(&content).with_context(|| format!("Invalid config file {}", path.display()))
}

fn parse_options(content: &str) -> Result<TurndownOptions> {
    let options = toml::from_str(content)?;
    Ok(options)
}

fn apply_overrides(options: &mut TurndownOptions, cli: &Cli) {
    if cli.preserve_pre {
        options.preserve_preformatted = true;
    }
    if let Some(limit) = cli.max_input {
        options.max_input_len = Some(limit);
    }
    if let Some(depth) = cli.max_depth {
        options.max_depth = depth;
    }
    if let Some(alt) = &cli.default_alt {
        options.default_image_alt = alt.clone();
    }
    if cli.no_detect {
        options.detect_code_language = false;
    }
}
