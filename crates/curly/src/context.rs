//! Global context for CLI commands

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use curly_core::config::Config;

/// Loaded configuration and global flags
pub struct Context {
    pub config: Config,
    /// Where the configuration came from, `None` for built-in defaults
    pub config_path: Option<PathBuf>,
    pub verbose: bool,
}

impl Context {
    /// Load the configuration given on the command line, or discover one
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be read or parsed
    pub fn new(config: Option<PathBuf>, verbose: bool) -> Result<Self> {
        let config_path = match config {
            Some(path) => Some(path),
            None => Config::find_file(env::current_dir()?),
        };

        let config = match &config_path {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        match &config_path {
            Some(path) => log::info!("using config {}", path.display()),
            None => log::info!("no curly.toml found, using defaults"),
        }

        Ok(Self {
            config,
            config_path,
            verbose,
        })
    }

    /// Template text, read from disk when `is_file` is set
    pub fn load_template(&self, template: &str, is_file: bool) -> Result<String> {
        if !is_file {
            return Ok(template.to_string());
        }

        let path = Path::new(template);
        log::info!("reading template {}", path.display());
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read template {}", path.display()))
    }
}
