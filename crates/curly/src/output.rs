//! Stdout helpers shared by the commands

use std::io::{self, Write};

use serde::Serialize;

/// Pretty-print a command's output schema as JSON
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(value)?;
    let mut out = io::stdout().lock();
    writeln!(out, "{rendered}")?;
    Ok(())
}

/// Write one line of plain output
pub fn print_text(s: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{s}")
}
