use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sticky-frame", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a scenario and write one JSON line per sticky element per frame.
    Replay(ReplayArgs),
    /// Load and validate a scenario without running it.
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
struct ReplayArgs {
    /// Input scenario JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output JSONL path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Only write a record when a sticky element's state changes.
    #[arg(long, default_value_t = false)]
    changes_only: bool,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Input scenario JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    let cli = Cli::parse();
    match cli.cmd {
        Command::Replay(args) => cmd_replay(args),
        Command::Check(args) => cmd_check(args),
    }
}

fn init_logging() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install log subscriber: {e}"))
}

fn load(path: &std::path::Path) -> anyhow::Result<sticky_frame::Scenario> {
    let scenario = sticky_frame::Scenario::from_path(path)
        .with_context(|| format!("load scenario '{}'", path.display()))?;
    scenario
        .validate()
        .with_context(|| format!("validate scenario '{}'", path.display()))?;
    Ok(scenario)
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let scenario = load(&args.in_path)?;
    eprintln!(
        "ok: {} sticky element(s), {} step(s), {} frame(s)",
        scenario.stickies.len(),
        scenario.steps.len(),
        scenario.total_frames()
    );
    Ok(())
}

fn cmd_replay(args: ReplayArgs) -> anyhow::Result<()> {
    let scenario = load(&args.in_path)?;
    let opts = sticky_frame::ReplayOpts {
        changes_only: args.changes_only,
    };
    let session = sticky_frame::ReplaySession::new(scenario, opts)?;

    let out: Box<dyn Write> = match &args.out {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            let f = File::create(path)
                .with_context(|| format!("create output '{}'", path.display()))?;
            Box::new(f)
        }
        None => Box::new(std::io::stdout().lock()),
    };
    let mut sink = sticky_frame::JsonLinesSink::new(BufWriter::new(out));
    let stats = session.run(&mut sink).context("replay scenario")?;

    if let Some(path) = &args.out {
        eprintln!(
            "wrote {} record(s) over {} frame(s) to {}",
            stats.records,
            stats.frames,
            path.display()
        );
    }
    Ok(())
}
