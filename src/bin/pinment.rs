use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

use pinment::state::validate::parse_versioned;
use pinment::{CapacityReport, SchemaVersion, ShareConfig, State};

#[derive(Parser, Debug)]
#[command(name = "pinment", version, about = "Work with Pinment share URLs and exported files")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Log decisions (locator fallbacks, migrations, rejected payloads) to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Share settings JSON (`base_url`, `max_url_bytes`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Viewer page share URLs point at.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Share URL budget in bytes.
    #[arg(long, global = true)]
    max_bytes: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a share URL from an exported state file.
    Share(ShareArgs),
    /// Decode a share URL back into state JSON.
    Open(OpenArgs),
    /// Validate a state file and report every schema violation.
    Check(CheckArgs),
    /// Report how much of the URL budget a state file uses.
    Size(SizeArgs),
}

#[derive(Parser, Debug)]
struct ShareArgs {
    /// Input state JSON (version 1 files are migrated).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Print the URL even when it is over budget.
    #[arg(long)]
    allow_oversize: bool,
}

#[derive(Parser, Debug)]
struct OpenArgs {
    /// Share URL (`<base>#data=<payload>`).
    #[arg(long)]
    url: String,

    /// Write the state here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Input state JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Write the validated (and migrated) state here.
    #[arg(long)]
    migrate_out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct SizeArgs {
    /// Input state JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);
    let cfg = share_config(&cli.global)?;
    match cli.cmd {
        Command::Share(args) => cmd_share(args, &cfg),
        Command::Open(args) => cmd_open(args),
        Command::Check(args) => cmd_check(args),
        Command::Size(args) => cmd_size(args, &cfg),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("pinment=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn share_config(global: &GlobalArgs) -> anyhow::Result<ShareConfig> {
    let mut cfg = match &global.config {
        Some(path) => ShareConfig::from_path(path)?,
        None => ShareConfig::default(),
    };
    if let Some(base_url) = &global.base_url {
        cfg.base_url = base_url.clone();
    }
    if let Some(max_bytes) = global.max_bytes {
        cfg.max_url_bytes = max_bytes;
    }
    cfg.validate().context("share settings")?;
    Ok(cfg)
}

fn read_state(path: &Path) -> anyhow::Result<State> {
    pinment::read_json_path(path).with_context(|| format!("load state '{}'", path.display()))
}

fn read_raw_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let f = File::open(path).with_context(|| format!("open state '{}'", path.display()))?;
    let r = BufReader::new(f);
    serde_json::from_reader(r).with_context(|| format!("parse state JSON '{}'", path.display()))
}

fn capacity_line(report: &CapacityReport) -> String {
    format!(
        "share URL: {} / {} bytes ({}%){}",
        report.bytes,
        report.limit,
        report.percent,
        if report.over_limit { ", over limit" } else { "" }
    )
}

fn cmd_share(args: ShareArgs, cfg: &ShareConfig) -> anyhow::Result<()> {
    let state = read_state(&args.in_path)?;
    let url = pinment::to_share_url(&state, &cfg.base_url)?;
    let report = CapacityReport::new(url.len(), cfg.max_url_bytes);
    eprintln!("{}", capacity_line(&report));

    if report.over_limit && !args.allow_oversize {
        anyhow::bail!(
            "share URL is {} bytes, over the {}-byte budget; remove pins or shorten comments \
             (or pass --allow-oversize)",
            report.bytes,
            report.limit
        );
    }
    println!("{url}");
    Ok(())
}

fn cmd_open(args: OpenArgs) -> anyhow::Result<()> {
    let raw = pinment::from_share_url(&args.url)
        .context("URL has no decodable '#data=' payload")?;
    let state = pinment::validate_detailed(&raw).context("shared state failed validation")?;

    match &args.out {
        Some(out) => {
            pinment::write_json_path(out, &state)?;
            eprintln!("wrote {} ({} pins)", out.display(), state.pins.len());
        }
        None => println!("{}", pinment::to_json(&state)?),
    }
    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let raw = read_raw_json(&args.in_path)?;
    let parsed = match parse_versioned(&raw) {
        Ok(parsed) => parsed,
        Err(errors) => {
            for e in &errors.errors {
                eprintln!("{e}");
            }
            anyhow::bail!(
                "'{}': {} schema violation(s)",
                args.in_path.display(),
                errors.errors.len()
            );
        }
    };

    let version = parsed.version();
    let state = parsed.into_current();
    match version {
        SchemaVersion::V1 => println!("version: 1 (migrates to {})", state.v),
        SchemaVersion::V2 => println!("version: {}", state.v),
    }
    println!("url: {}", state.url);
    println!("viewport: {}", state.viewport);
    println!("pins: {}", state.pins.len());
    println!("anchored: {}", state.anchored_count());

    if let Some(out) = &args.migrate_out {
        pinment::write_json_path(out, &state)?;
        eprintln!("wrote {}", out.display());
    }
    Ok(())
}

fn cmd_size(args: SizeArgs, cfg: &ShareConfig) -> anyhow::Result<()> {
    let state = read_state(&args.in_path)?;
    let report = pinment::capacity_report(&state, &cfg.base_url, cfg.max_url_bytes)?;
    println!("bytes: {}", report.bytes);
    println!("limit: {}", report.limit);
    println!("percent: {}", report.percent);
    println!("over_limit: {}", report.over_limit);
    Ok(())
}
