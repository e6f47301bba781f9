//! `citeplate` CLI — render and check citeplate templates from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Render an inline template against a JSON context on stdin
//! echo '{"title":"Dune","year":1965}' | citeplate render -t '{{title}} ({{year}})'
//!
//! # Render a template file against a context file, writing to a file
//! citeplate render -f note.md.tpl -c item.json -o note.md
//!
//! # Generate a citekey (output restricted to [A-Za-z0-9_-])
//! citeplate render -t '{{authors_family.0|lowercase}}{{year}}' -c item.json --citekey
//!
//! # Check a template for syntax errors
//! citeplate check -f note.md.tpl
//!
//! # List the available filters
//! citeplate filters
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `warn`);
//! `-v` raises the default to `debug`.

use anyhow::{Context, Result};
use citeplate_core::{Filter, RenderOptions, Template, Value};
use clap::{Args, Parser, Subcommand};
use std::io::{self, IsTerminal, Read};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "citeplate",
    version,
    about = "Render citation-metadata templates (citekeys, filenames, note fields)"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log engine activity at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a template against a JSON context
    Render {
        #[command(flatten)]
        template: TemplateSource,
        /// JSON context file (reads from stdin if omitted; empty input means `{}`)
        #[arg(short, long)]
        context: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Strip every character outside [A-Za-z0-9_-] from the output
        #[arg(long)]
        citekey: bool,
        /// The output is meant to be a JSON array; warn if it does not parse as one
        #[arg(long)]
        yaml_array: bool,
    },
    /// Check a template for syntax errors without rendering it
    Check {
        #[command(flatten)]
        template: TemplateSource,
    },
    /// List the available filters
    Filters,
}

/// Where the template text comes from: exactly one of `-t` or `-f`.
#[derive(Args)]
#[group(required = true, multiple = false)]
struct TemplateSource {
    /// Template text
    #[arg(short, long)]
    template: Option<String>,
    /// Template file
    #[arg(short = 'f', long)]
    template_file: Option<String>,
}

impl TemplateSource {
    fn load(&self) -> Result<String> {
        match (&self.template, &self.template_file) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read template file: {}", path)),
            (None, None) => anyhow::bail!("Either --template or --template-file is required"),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Render {
            template,
            context,
            output,
            citekey,
            yaml_array,
        } => {
            let source = template.load()?;
            let parsed = Template::parse(&source).context("Failed to parse template")?;

            let json = read_input(context.as_deref())?;
            let context = parse_context(&json)?;

            let options = RenderOptions {
                sanitize_for_citekey: citekey,
                yaml_array,
            };
            let rendered = parsed.render(&context, &options);

            if yaml_array {
                check_array_output(&rendered);
            }
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Check { template } => {
            let source = template.load()?;
            let parsed = Template::parse(&source).context("Template is invalid")?;
            tracing::debug!(nodes = parsed.nodes().len(), "template is valid");
            println!("ok");
        }
        Commands::Filters => {
            for name in Filter::names() {
                println!("{}", name);
            }
        }
    }

    Ok(())
}

/// Install the stderr subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();
}

/// Parse the render context. Whitespace-only input is an empty object so a
/// template can be rendered without any data.
fn parse_context(json: &str) -> Result<Value> {
    if json.trim().is_empty() {
        return Ok(Value::Object(Vec::new()));
    }
    let value: serde_json::Value =
        serde_json::from_str(json).context("Failed to parse context JSON")?;
    Ok(Value::from(value))
}

/// Array-aware rendering is advisory; tell the user when the template did not
/// produce a JSON array, but still emit the output.
fn check_array_output(rendered: &str) {
    match serde_json::from_str::<serde_json::Value>(rendered) {
        Ok(serde_json::Value::Array(items)) => {
            tracing::debug!(len = items.len(), "output parses as a JSON array");
        }
        Ok(_) => tracing::warn!("output is valid JSON but not an array"),
        Err(err) => tracing::warn!(error = %err, "output does not parse as a JSON array"),
    }
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
