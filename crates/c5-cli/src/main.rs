//! c5 CLI - canonical rendering, digests and envelopes for JSON documents.

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{canonicalize, digest, verify, wrap};

#[derive(Parser)]
#[command(name = "c5")]
#[command(about = "Canonical JSON, content digests and message envelopes")]
struct Cli {
    /// Log filter (e.g. `debug`, `c5_envelope=trace`)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show canonical JSON for input JSON
    Canonicalize {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
        /// Spaces per nesting level (0 = compact)
        #[arg(long, default_value_t = 0)]
        indent: usize,
    },
    /// Show the base58 SHA-256 content digest of input JSON
    Digest {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
    },
    /// Wrap a `{kind, data}` payload document in an envelope
    Wrap {
        /// Payload JSON file (or stdin if not provided)
        input: Option<String>,
        /// Sender identifier
        #[arg(long)]
        src: String,
        /// Destination (repeatable)
        #[arg(long)]
        dst: Vec<String>,
        /// Explicit message id (skips digest computation)
        #[arg(long)]
        id: Option<String>,
        /// Envelope time in milliseconds since the epoch (default: now)
        #[arg(long)]
        t: Option<i64>,
        /// Hop limit (default: 10)
        #[arg(long)]
        ttl: Option<u32>,
        /// Spaces per nesting level (0 = compact)
        #[arg(long, default_value_t = 0)]
        indent: usize,
    },
    /// Check that an envelope id matches its payload
    Verify {
        /// Envelope JSON file (or stdin if not provided)
        input: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let result = match cli.command {
        Commands::Canonicalize { input, indent } => canonicalize::run(input, indent),
        Commands::Digest { input } => digest::run(input),
        Commands::Wrap {
            input,
            src,
            dst,
            id,
            t,
            ttl,
            indent,
        } => wrap::run(
            input,
            wrap::WrapArgs {
                src,
                dst,
                id,
                t,
                ttl,
                indent,
            },
        ),
        Commands::Verify { input, json } => verify::run(input, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
