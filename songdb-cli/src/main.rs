//! songdb-dump: convert a songs.db library database into dump.xml
//!
//! Reads `songs.db` from the working directory and overwrites `dump.xml`
//! unless other paths are given.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use songdb_core::{dump, ByteCursor, DumpSummary, Emitter, JsonLinesEmitter, XmlEmitter};

#[derive(Parser)]
#[command(name = "songdb-dump")]
#[command(about = "Dump a songs.db library database as XML")]
#[command(version)]
struct Cli {
    /// Database to read
    #[arg(short, long, default_value = "songs.db")]
    input: PathBuf,

    /// Output file (overwritten)
    #[arg(short, long, default_value = "dump.xml")]
    output: PathBuf,

    #[arg(short, long, value_enum, default_value_t = Format::Xml)]
    format: Format,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Xml,
    /// One JSON object per line
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .compact()
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(summary) => {
            info!(
                "done: {} songs written to {:?}",
                summary.records, cli.output
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<DumpSummary> {
    let input = File::open(&cli.input)
        .with_context(|| format!("Cannot open database {:?}", cli.input))?;
    let output = File::create(&cli.output)
        .with_context(|| format!("Cannot create output {:?}", cli.output))?;

    let writer = BufWriter::new(output);
    let mut emitter: Box<dyn Emitter> = match cli.format {
        Format::Xml => Box::new(XmlEmitter::new(writer)),
        Format::Json => Box::new(JsonLinesEmitter::new(writer)),
    };

    let cursor = ByteCursor::new(BufReader::new(input));
    let summary = dump(cursor, &mut emitter)
        .with_context(|| format!("Failed to dump {:?}", cli.input))?;

    Ok(summary)
}
