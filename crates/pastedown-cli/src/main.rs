//! pastedown - convert pasted HTML to Markdown from the command line.

mod args;
mod config;

use std::collections::HashMap;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use args::{Cli, Commands};
use clap::Parser;
use pastedown::{
    detect_language, PasteHandler, PasteOutcome, TurndownOptions, TurndownService, HTML_MIME,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let options = config::load_options(&cli)?;
    tracing::debug!(?options, "loaded conversion options");

    let input = read_input(cli.command.input().map(|p| p.as_path()))?;
    let output = match &cli.command {
        Commands::Convert { .. } => {
            TurndownService::editor_with_options(options).html_to_markdown(&input)
        }
        Commands::Paste { .. } => paste(options, input),
        Commands::Detect { .. } => detect_language(&input).to_string(),
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", output).context("Failed to write output")?;
    Ok(())
}

/// Log to stderr so stdout only carries Markdown. `RUST_LOG` overrides the
/// default `warn` level.
fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn paste(options: TurndownOptions, html: String) -> String {
    let handler = PasteHandler::with_service(Arc::new(TurndownService::editor_with_options(options)));
    let clipboard = HashMap::from([(HTML_MIME.to_string(), html)]);

    match handler.handle(&clipboard) {
        PasteOutcome::Insert(markdown) => markdown,
        PasteOutcome::PassThrough => {
            tracing::info!("paste not converted, printing input unchanged");
            clipboard.get(HTML_MIME).cloned().unwrap_or_default()
        }
    }
}
