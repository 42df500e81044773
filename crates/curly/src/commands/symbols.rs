//! Symbols command - show the active marker symbols

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use crate::context::Context;
use crate::output::{print_json, print_text};

/// Symbols command JSON output schema
#[derive(Debug, Serialize)]
struct SymbolsOutput {
    start: String,
    end: String,
    escaped_start: String,
    escaped_end: String,
    /// Config file the symbols came from, `None` for defaults
    config: Option<String>,
}

pub fn run(json: bool, config: Option<PathBuf>, verbose: bool) -> Result<()> {
    let ctx = Context::new(config, verbose)?;
    let markers = ctx.config.markers()?;

    let output = SymbolsOutput {
        start: markers.start().to_string(),
        end: markers.end().to_string(),
        escaped_start: markers.escaped_start().to_string(),
        escaped_end: markers.escaped_end().to_string(),
        config: ctx.config_path.as_ref().map(|p| p.display().to_string()),
    };

    if json {
        print_json(&output)?;
        return Ok(());
    }

    print_text(&format!("start:         {}", output.start))?;
    print_text(&format!("end:           {}", output.end))?;
    print_text(&format!("escaped start: {}", output.escaped_start))?;
    print_text(&format!("escaped end:   {}", output.escaped_end))?;
    match &output.config {
        Some(path) => print_text(&format!("{} from {}", "→".cyan(), path))?,
        None => print_text(&format!("{} built-in defaults", "→".cyan()))?,
    }
    Ok(())
}
