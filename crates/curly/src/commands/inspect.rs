//! Inspect command - show how a template splits into text and expressions

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use curly_core::{CompileOptions, SinkCategory};
use serde::Serialize;

use crate::context::Context;
use crate::output::{print_json, print_text};

/// Inspect command JSON output schema
#[derive(Debug, Serialize)]
struct InspectOutput {
    text: String,
    separators: Vec<String>,
    expressions: Vec<String>,
    has_interpolation: bool,
    constant: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    trusted_context: Option<SinkCategory>,
}

/// Compile a template and print its parts
///
/// # Arguments
///
/// * `template` - Template text, or a path when `file` is set
/// * `trusted` - Optional sink the template is checked against
/// * `json` - Output in JSON format if true
pub fn run(
    template: String,
    file: bool,
    trusted: Option<SinkCategory>,
    json: bool,
    config: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    let ctx = Context::new(config, verbose)?;
    let text = ctx.load_template(&template, file)?;
    let interpolator = ctx.config.interpolator()?;

    let mut options = CompileOptions::new();
    if let Some(sink) = trusted {
        options = options.trusted_context(sink);
    }

    // Without must_have_expression a compiled template is always produced
    let Some(compiled) = interpolator.compile(&text, options)? else {
        return Ok(());
    };

    let output = InspectOutput {
        text: compiled.text().to_string(),
        separators: compiled.separators().to_vec(),
        expressions: compiled.expressions().to_vec(),
        has_interpolation: !compiled.expressions().is_empty(),
        constant: compiled.is_constant(),
        trusted_context: trusted,
    };

    if json {
        print_json(&output)?;
        return Ok(());
    }

    print_text(&format!(
        "{} Compiled template ({} expression(s))",
        "✓".green().bold(),
        output.expressions.len()
    ))?;
    for (i, separator) in output.separators.iter().enumerate() {
        print_text(&format!("  {} {:?}", "text".dimmed(), separator))?;
        if let Some(expression) = output.expressions.get(i) {
            print_text(&format!("  {} {:?}", "expr".cyan(), expression))?;
        }
    }

    if ctx.verbose {
        print_text(&format!(
            "{} markers {} {}",
            "→".cyan(),
            interpolator.start_symbol(),
            interpolator.end_symbol()
        ))?;
        print_text(&format!("{} constant: {}", "→".cyan(), output.constant))?;
        if let Some(sink) = output.trusted_context {
            print_text(&format!("{} trusted context: {}", "→".cyan(), sink))?;
        }
    }

    Ok(())
}
