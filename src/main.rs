use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use mail_threader::config::ThreadingConfig;
use mail_threader::display;
use mail_threader::error::ThreadingError;
use mail_threader::import::load_paths;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "mail-threader",
    version,
    about = "Arrange email messages into reply threads"
)]
struct Args {
    /// Message files, directories of message files, mbox files or JSON message lists.
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Treat every non-directory, non-JSON input as an mbox file.
    #[arg(long)]
    mbox: bool,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Print one summary per top-level thread instead of every message.
    #[arg(long)]
    summary: bool,

    /// Search the whole tree even for replies to unknown Message-IDs.
    #[arg(long)]
    no_short_circuit: bool,

    /// Parser threads (defaults to MAIL_THREADER_PARSE_THREADS or the CPU count).
    #[arg(long)]
    threads: Option<usize>,

    /// Spaces per nesting level in text output.
    #[arg(long)]
    indent: Option<usize>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    mail_threader::init_logger();

    let args = Args::parse();

    let mut config = ThreadingConfig::from_env();
    if args.no_short_circuit {
        config.short_circuit_unknown_parents = false;
    }
    if let Some(threads) = args.threads {
        config.parse_threads = threads.max(1);
    }
    if let Some(indent) = args.indent {
        config.indent = indent;
    }
    log::debug!("configuration: {:?}", config);

    let report = load_paths(&args.paths, args.mbox, &config)?;

    let tree = match mail_threader::thread_messages(&report.messages, config.build_options()) {
        Ok(tree) => tree,
        Err(ThreadingError::EmptySequence) => {
            log::warn!("no messages to thread");
            if args.format == OutputFormat::Json {
                println!("[]");
            }
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match (args.format, args.summary) {
        (OutputFormat::Json, false) => writeln!(out, "{}", display::to_json(&tree)?)?,
        (OutputFormat::Json, true) => writeln!(out, "{}", display::summaries_to_json(&tree)?)?,
        (OutputFormat::Text, false) => display::write_text(&tree, config.indent, &mut out)?,
        (OutputFormat::Text, true) => {
            for thread in tree.threads() {
                writeln!(
                    out,
                    "{} [{} messages, {} .. {}] {}",
                    thread
                        .root_message_id
                        .as_deref()
                        .map(|id| format!("<{}>", id))
                        .unwrap_or_else(|| "(no id)".to_string()),
                    thread.message_count(),
                    thread.start_date.format("%Y-%m-%d"),
                    thread.last_date.format("%Y-%m-%d"),
                    thread.subject
                )?;
            }
        }
    }

    let stats = tree.stats();
    log::info!(
        "rendered {} messages ({} loaded, {} rejected), max depth {}",
        stats.messages,
        report.parsed + report.decoded,
        report.failed,
        stats.max_depth
    );

    Ok(())
}
