//! `feather` CLI -- format, minify and validate JSON from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Pretty-print (stdin -> stdout)
//! echo '{"name":"Alice","tags":["a"]}' | feather format
//!
//! # Pretty-print a file into another file, dropping null members
//! feather format -i data.json -o pretty.json --omit-null
//!
//! # Strip all insignificant whitespace
//! feather minify -i pretty.json
//!
//! # Validate and report the top-level value kind
//! feather check -i data.json
//! ```
//!
//! Set `RUST_LOG=debug` (or pass `--verbose`) to see parser diagnostics.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use feather_core::{CodecOptions, JsonValue};
use std::io::{self, Read};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "feather", version, about = "Format, minify and validate JSON")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log parser and encoder diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Pretty-print JSON with a two-space indent
    Format {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Drop object members that are null, "null" or "undefined"
        #[arg(long)]
        omit_null: bool,
    },
    /// Re-encode JSON without insignificant whitespace
    Minify {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Drop object members that are null, "null" or "undefined"
        #[arg(long)]
        omit_null: bool,
    },
    /// Validate JSON and print the kind of its top-level value
    Check {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Format {
            input,
            output,
            omit_null,
        } => {
            let options = CodecOptions::pretty().with_omit_null_or_undefined(omit_null);
            let text = reencode(input.as_deref(), &options)?;
            write_output(output.as_deref(), &format!("{text}\n"))?;
        }
        Commands::Minify {
            input,
            output,
            omit_null,
        } => {
            let options = CodecOptions::compact().with_omit_null_or_undefined(omit_null);
            let text = reencode(input.as_deref(), &options)?;
            write_output(output.as_deref(), &text)?;
        }
        Commands::Check { input } => {
            let value = read_document(input.as_deref())?;
            println!("valid JSON {}", value.kind());
        }
    }

    Ok(())
}

/// Install a stderr subscriber. `RUST_LOG` wins; otherwise `--verbose`
/// selects `debug` and the default is `warn`.
fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .init();
}

/// Parse the input and encode it again with `options`. The document goes
/// through the binder so `--omit-null` applies at every nesting level.
fn reencode(path: Option<&str>, options: &CodecOptions) -> Result<String> {
    debug!(
        pretty = options.pretty_print,
        omit_null = options.omit_null_or_undefined,
        "re-encoding document"
    );
    let value = read_document(path)?;
    feather_core::to_string(&value, options).context("Failed to encode JSON")
}

fn read_document(path: Option<&str>) -> Result<JsonValue> {
    let text = read_input(path)?;
    feather_core::parse(&text)
        .context("Failed to parse JSON")?
        .context("Input contains no JSON value")
}

fn read_input(path: Option<&str>) -> Result<String> {
    debug!(source = path.unwrap_or("<stdin>"), "reading input");
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
