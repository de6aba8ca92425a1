//! realm-schema CLI
//!
//! Usage:
//!     realm-schema models.realm -o schema.json --class TestItem

use anyhow::{Context, Result};
use clap::Parser;
use realm_schema::{ContributorOptions, KnobCopy, compile_models, render_json};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "realm_schema=info";

#[derive(Parser, Debug)]
#[command(
    name = "realm-schema",
    about = "Compile model declarations into object schema descriptors"
)]
struct Args {
    /// Model declaration file
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit only this class's descriptor
    #[arg(short, long)]
    class: Option<String>,

    /// Linked-model knob copying: present, truthy
    #[arg(short, long, default_value = "present", env = "REALM_SCHEMA_KNOBS", value_parser = parse_knob_copy)]
    knobs: KnobCopy,

    /// Single-line JSON
    #[arg(long)]
    compact: bool,

    /// Log every contribution
    #[arg(short, long)]
    verbose: bool,
}

fn parse_knob_copy(s: &str) -> Result<KnobCopy, String> {
    KnobCopy::from_str(s).ok_or_else(|| format!("Invalid knob copy mode: {s}"))
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("realm_schema=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let input = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let options = ContributorOptions {
        knob_copy: args.knobs,
    };

    let registry = compile_models(&input, options)?;
    tracing::info!(
        classes = registry.len(),
        input = %args.input.display(),
        "compiled model declarations"
    );

    let json = render_json(&registry, args.class.as_deref(), !args.compact)?;

    match args.output {
        Some(path) => {
            fs::write(&path, format!("{json}\n"))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(output = %path.display(), "wrote schema");
        }
        None => println!("{json}"),
    }

    Ok(())
}
