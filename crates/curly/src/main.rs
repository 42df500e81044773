mod cli;
mod commands;
mod context;
mod output;

use clap::Parser;
use cli::{Cli, Commands};
use commands::render::RenderArgs;

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let result = match cli.command {
        Commands::Render {
            template,
            file,
            context,
            vars,
            trusted,
            all_or_nothing,
            must_have_expression,
            json,
        } => commands::render::run(
            RenderArgs {
                template,
                file,
                context,
                vars,
                trusted,
                all_or_nothing,
                must_have_expression,
                json,
            },
            cli.config,
            cli.verbose,
        ),
        Commands::Inspect {
            template,
            file,
            trusted,
            json,
        } => commands::inspect::run(template, file, trusted, json, cli.config, cli.verbose),
        Commands::Symbols { json } => commands::symbols::run(json, cli.config, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
