//! CLI command structure using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use curly_core::SinkCategory;

#[derive(Parser)]
#[command(name = "curly")]
#[command(version, about = "Render and inspect {{expression}} templates", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to curly.toml (defaults to the nearest one above the current directory)
    #[arg(short, long, global = true, env = "CURLY_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a template against a context
    Render {
        /// Template text, or a path when --file is given
        template: String,

        /// Treat TEMPLATE as a file path
        #[arg(short, long)]
        file: bool,

        /// JSON or TOML file holding the context object
        #[arg(long, value_name = "PATH")]
        context: Option<PathBuf>,

        /// Bind a variable (VALUE is parsed as JSON, or taken as a string)
        #[arg(long = "var", value_name = "KEY=VALUE")]
        vars: Vec<String>,

        /// Require a value certified for this sink (html, css, url, resource-url, js)
        #[arg(long, value_name = "SINK")]
        trusted: Option<SinkCategory>,

        /// Render nothing unless every expression is defined
        #[arg(long)]
        all_or_nothing: bool,

        /// Skip templates without any expression
        #[arg(long)]
        must_have_expression: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how a template is split into text and expressions
    Inspect {
        /// Template text, or a path when --file is given
        template: String,

        /// Treat TEMPLATE as a file path
        #[arg(short, long)]
        file: bool,

        /// Check the template against a trusted sink
        #[arg(long, value_name = "SINK")]
        trusted: Option<SinkCategory>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the active marker symbols
    Symbols {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
