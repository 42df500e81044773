//! Render command - evaluate a template against a context

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, anyhow, bail};
use colored::Colorize;
use curly_core::{CollectingReporter, CompileOptions, Scope, SinkCategory, Value};
use serde::Serialize;

use crate::context::Context;
use crate::output::{print_json, print_text};

/// Arguments of the render command
pub struct RenderArgs {
    pub template: String,
    pub file: bool,
    pub context: Option<PathBuf>,
    pub vars: Vec<String>,
    pub trusted: Option<SinkCategory>,
    pub all_or_nothing: bool,
    pub must_have_expression: bool,
    pub json: bool,
}

/// Render command JSON output schema
#[derive(Debug, Serialize)]
struct RenderOutput {
    /// `None` when nothing was rendered
    rendered: Option<String>,
    status: RenderStatus,
    expressions: Vec<String>,
    errors: Vec<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
enum RenderStatus {
    Rendered,
    NoInterpolation,
    Undefined,
    Failed,
}

/// Render a template and print the result
///
/// Expression failures are printed as warnings and make the command fail
/// after the output is written.
pub fn run(args: RenderArgs, config: Option<PathBuf>, verbose: bool) -> Result<()> {
    let ctx = Context::new(config, verbose)?;
    let text = ctx.load_template(&args.template, args.file)?;
    let scope = build_scope(args.context.as_ref(), &args.vars)?;

    let reporter = Arc::new(CollectingReporter::new());
    let interpolator = ctx
        .config
        .interpolator_builder()?
        .reporter(reporter.clone())
        .build();

    let mut options = CompileOptions::new()
        .all_or_nothing(args.all_or_nothing)
        .must_have_expression(args.must_have_expression);
    if let Some(sink) = args.trusted {
        options = options.trusted_context(sink);
    }

    let Some(compiled) = interpolator.compile(&text, options)? else {
        return print_outcome(
            &args,
            RenderOutput {
                rendered: None,
                status: RenderStatus::NoInterpolation,
                expressions: Vec::new(),
                errors: Vec::new(),
            },
        );
    };
    log::info!("compiled {} expression(s)", compiled.expressions().len());

    let rendered = compiled.evaluate(&scope)?;
    let errors: Vec<String> = reporter.take().iter().map(ToString::to_string).collect();

    let status = match (&rendered, errors.is_empty()) {
        (_, false) => RenderStatus::Failed,
        (Some(_), true) => RenderStatus::Rendered,
        (None, true) => RenderStatus::Undefined,
    };

    let failures = errors.len();
    print_outcome(
        &args,
        RenderOutput {
            rendered: rendered.map(|s| s.to_string()),
            status,
            expressions: compiled.expressions().to_vec(),
            errors,
        },
    )?;

    if failures > 0 {
        bail!("{} expression(s) failed to evaluate", failures);
    }
    Ok(())
}

fn print_outcome(args: &RenderArgs, output: RenderOutput) -> Result<()> {
    if args.json {
        print_json(&output)?;
        return Ok(());
    }

    for error in &output.errors {
        eprintln!("{} {}", "!".yellow(), error);
    }

    match (&output.rendered, &output.status) {
        (Some(rendered), _) => print_text(rendered)?,
        (None, RenderStatus::NoInterpolation) => {
            eprintln!("{} (no interpolation)", "!".yellow())
        }
        (None, _) => eprintln!("{} (undefined)", "!".yellow()),
    }
    Ok(())
}

/// Scope from an optional context file plus `KEY=VALUE` bindings
fn build_scope(context: Option<&PathBuf>, vars: &[String]) -> Result<Scope> {
    let mut scope = match context {
        Some(path) => Scope::from_file(path)?,
        None => Scope::new(),
    };

    for var in vars {
        let (key, value) = parse_var(var)?;
        scope.set(key, value);
    }
    Ok(scope)
}

fn parse_var(var: &str) -> Result<(String, Value)> {
    let (key, raw) = var
        .split_once('=')
        .ok_or_else(|| anyhow!("Invalid --var '{}': expected KEY=VALUE", var))?;

    let key = key.trim();
    if key.is_empty() {
        bail!("Invalid --var '{}': empty key", var);
    }

    let value = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(json) => Value::from(json),
        Err(_) => Value::from(raw),
    };
    Ok((key.to_string(), value))
}
