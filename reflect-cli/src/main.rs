// agentreflect CLI - Agent session log inspection
// Parses transcripts from files or stdin into role-tagged messages

mod export;

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use color_eyre::{eyre::Context, Result};
use reflect_core::{decode_session_bytes, detect_format, parse_file, parse_session, Message, Session, SessionStats};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::export::SessionExporter;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match &cli.command {
        Command::Parse(cmd) => handle_parse(cmd)?,
        Command::Stats(cmd) => handle_stats(cmd)?,
        Command::Detect(cmd) => handle_detect(cmd)?,
        Command::Export(cmd) => handle_export(cmd)?,
    }
    Ok(())
}

#[derive(Parser, Debug)]
#[command(
    name = "agentreflect",
    author,
    version,
    about = "agentreflect: normalize agent session logs",
    long_about = "Detect the format of an agent transcript (JSON array, JSONL, `## Human` markdown or plain text)\nand turn it into role-tagged messages."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the session as role-tagged text
    Parse(OutputArgs),
    /// Show message and size statistics
    Stats(OutputArgs),
    /// Print the detected format tag
    Detect(InputArgs),
    /// Write the normalized session as session.json + messages.jsonl
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Session log to read (stdin if omitted or `-`)
    path: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct OutputArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Output directory (default: ~/.agentreflect/sessions)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Session id (default: file stem, or `stdin`)
    #[arg(long)]
    id: Option<String>,
}

impl InputArgs {
    /// Path to read, or `None` for stdin
    fn file(&self) -> Option<&Path> {
        self.path.as_deref().filter(|p| *p != Path::new("-"))
    }
}

/// JSON view of a session for `--json` output
#[derive(Serialize)]
struct SessionJson<'a> {
    source: &'a str,
    format_detected: &'a str,
    stats: SessionStats,
    messages: &'a [Message],
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_stdin() -> Result<String> {
    let mut buffer = Vec::new();
    std::io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read session log from stdin")?;
    Ok(decode_session_bytes(buffer))
}

fn load_session(input: &InputArgs) -> Result<Session> {
    match input.file() {
        Some(path) => {
            parse_file(path).with_context(|| format!("Failed to parse session log {}", path.display()))
        }
        None => {
            let content = read_stdin()?;
            parse_session(&content, "stdin").context("Failed to parse session log from stdin")
        }
    }
}

fn handle_parse(args: &OutputArgs) -> Result<()> {
    let session = load_session(&args.input)?;

    if args.json {
        let view = SessionJson {
            source: session.source(),
            format_detected: session.format().as_str(),
            stats: session.stats(),
            messages: session.messages(),
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("{}", session.to_text());
    }
    Ok(())
}

fn handle_stats(args: &OutputArgs) -> Result<()> {
    let session = load_session(&args.input)?;
    let stats = session.stats();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("source:             {}", session.source());
    println!("format:             {}", session.format());
    println!("total_messages:     {}", stats.total_messages);
    println!("user_messages:      {}", stats.user_messages);
    println!("assistant_messages: {}", stats.assistant_messages);
    println!("total_chars:        {}", stats.total_chars);
    println!("estimated_tokens:   {}", stats.estimated_tokens);
    Ok(())
}

fn handle_detect(args: &InputArgs) -> Result<()> {
    let content = match args.file() {
        Some(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            decode_session_bytes(bytes)
        }
        None => read_stdin()?,
    };

    println!("{}", detect_format(&content));
    Ok(())
}

fn handle_export(args: &ExportArgs) -> Result<()> {
    let exporter = if let Some(ref output) = args.output {
        SessionExporter::with_base_dir(output.clone())
    } else {
        SessionExporter::new()?
    };
    tracing::debug!(base_dir = %exporter.base_dir().display(), "export destination");

    let session = load_session(&args.input)?;
    let session_id = match (&args.id, args.input.file()) {
        (Some(id), _) => id.clone(),
        (None, Some(path)) => path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string(),
        (None, None) => "stdin".to_string(),
    };

    eprintln!("Exporting {} session: {}", session.format(), session_id);
    let session_dir = exporter.export(&session, &session_id)?;

    println!("✓ Exported {} messages from session: {}", session.message_count(), session_id);
    println!("  Location: {}", session_dir.display());
    Ok(())
}
