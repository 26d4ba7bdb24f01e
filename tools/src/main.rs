//! funstr-runner: headless runner for the funstr domain oracle.
//!
//! Usage:
//!   funstr-runner --data-dir ./data summary
//!   funstr-runner --now 2026-01-20T15:00:00Z market --top 10
//!   funstr-runner --manual data/domains.json portfolio
//!   funstr-runner ipc            (line-delimited JSON on stdin/stdout)

mod explainer;
mod registry;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use funstr_core::{
    cache::TtlCache,
    config::OracleConfig,
    engine::OracleEngine,
    inventory::load_manual_domains,
    snapshot::InventorySource,
};
use std::io::{self, BufRead, Write};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "funstr-runner", about = "Deterministic domain oracle and market simulator")]
struct Cli {
    /// Directory holding vocabulary.json, market.json and inventory.json.
    /// Built-in tables are used when omitted.
    #[arg(long, global = true)]
    data_dir: Option<String>,

    /// Fixed instant (RFC 3339) instead of the wall clock.
    #[arg(long, global = true)]
    now: Option<String>,

    /// Curated domain list to serve instead of the simulated inventory.
    #[arg(long, global = true)]
    manual: Option<String>,

    /// Fetch the inventory from the registrar API (GODADDY_API_KEY/SECRET).
    #[arg(long, global = true)]
    registry: bool,

    /// Refuse to fall back to the simulated inventory.
    #[arg(long, global = true)]
    no_mock: bool,

    /// Timeout for outbound HTTP calls, in seconds.
    #[arg(long, global = true, default_value = "20")]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the inventory snapshot
    Inventory {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Heuristic score for one domain
    Score { domain: String },
    /// Model explanation with heuristic fallback
    Explain { domain: String },
    /// Portfolio analysis of the inventory
    Portfolio,
    /// Today's market board
    Market {
        #[arg(long, default_value = "20")]
        top: usize,
    },
    /// Since-last-boundary period diff
    Period,
    /// Curation schedule status
    Status,
    /// Human-readable overview
    Summary,
    /// Serve JSON commands on stdin
    Ipc,
}

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetInventory {
        #[serde(default)]
        refresh: bool,
    },
    Score {
        domain: String,
    },
    Explain {
        domain: String,
    },
    Portfolio {
        #[serde(default)]
        refresh: bool,
    },
    Market,
    Period {
        #[serde(default)]
        refresh: bool,
    },
    Status,
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let fixed_now = cli
        .now
        .as_deref()
        .map(|raw| {
            DateTime::parse_from_rfc3339(raw)
                .map(|t| t.with_timezone(&Utc))
                .with_context(|| format!("--now must be RFC 3339, got {raw}"))
        })
        .transpose()?;
    let clock = move || fixed_now.unwrap_or_else(Utc::now);

    let config = match &cli.data_dir {
        Some(dir) => OracleConfig::load(dir)?,
        None => OracleConfig::builtin(),
    };
    let engine = build_engine(&cli, config)?;

    match cli.command.unwrap_or(Command::Summary) {
        Command::Inventory { limit } => {
            let mut snap = engine.inventory(clock(), true)?;
            if let Some(n) = limit {
                snap.domains.truncate(n);
            }
            print_json(&snap)?;
        }
        Command::Score { domain } => print_json(&engine.score(&domain))?,
        Command::Explain { domain } => print_json(&engine.explain(&domain, clock()))?,
        Command::Portfolio => print_json(&engine.portfolio(clock(), true)?)?,
        Command::Market { top } => {
            let mut board = engine.market(clock());
            board.signals.truncate(top);
            print_json(&board)?;
        }
        Command::Period => print_json(&engine.period_report(clock(), true)?)?,
        Command::Status => print_json(&engine.schedule_status(clock()))?,
        Command::Summary => print_summary(&engine, clock())?,
        Command::Ipc => run_ipc_loop(&engine, &clock)?,
    }

    Ok(())
}

/// Wire the engine: TTL cache, optional explainer, and the first
/// available inventory override (manual file, then registrar).
fn build_engine(cli: &Cli, config: OracleConfig) -> Result<OracleEngine> {
    let timeout = Duration::from_secs(cli.timeout_secs);
    let tld = config.inventory.tld.clone();
    let mut engine = OracleEngine::new(config)
        .with_cache(Box::new(TtlCache::default()))
        .with_mock_enabled(!cli.no_mock);

    if let Some(explainer) = explainer::AnthropicExplainer::from_env(&tld, timeout)? {
        log::info!("model explainer enabled");
        engine = engine.with_explainer(Box::new(explainer));
    }

    let manual_path = cli
        .manual
        .clone()
        .or_else(|| std::env::var("FUNSTR_MANUAL_DOMAINS_PATH").ok());
    if let Some(path) = manual_path {
        let domains = load_manual_domains(&path).with_context(|| format!("Cannot read {path}"))?;
        log::info!("serving {} manual domains from {path}", domains.len());
        return Ok(engine.with_override(domains, InventorySource::Manual));
    }

    if cli.registry {
        match registry::RegistryClient::from_env(timeout)? {
            Some(client) => {
                let domains = client.fetch_domains()?;
                return Ok(engine.with_override(domains, InventorySource::Registry));
            }
            None => log::warn!("--registry given but GODADDY_API_KEY/GODADDY_API_SECRET are not set"),
        }
    }

    Ok(engine)
}

fn run_ipc_loop(engine: &OracleEngine, clock: &dyn Fn() -> DateTime<Utc>) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                write_error(&mut stdout, &e)?;
                continue;
            }
        };

        let now = clock();
        let reply = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetInventory { refresh } => engine
                .inventory(now, refresh)
                .map(|s| serde_json::to_value(&s)),
            IpcCommand::Score { domain } => Ok(serde_json::to_value(engine.score(&domain))),
            IpcCommand::Explain { domain } => Ok(serde_json::to_value(engine.explain(&domain, now))),
            IpcCommand::Portfolio { refresh } => engine
                .portfolio(now, refresh)
                .map(|p| serde_json::to_value(&p)),
            IpcCommand::Market => Ok(serde_json::to_value(engine.market(now))),
            IpcCommand::Period { refresh } => engine
                .period_report(now, refresh)
                .map(|r| serde_json::to_value(&r)),
            IpcCommand::Status => Ok(serde_json::to_value(engine.schedule_status(now))),
        };

        match reply {
            Ok(value) => writeln!(stdout, "{}", value?)?,
            Err(e) => write_error(&mut stdout, &e)?,
        }
        stdout.flush()?;
    }
    Ok(())
}

fn write_error(out: &mut impl Write, e: &dyn std::fmt::Display) -> Result<()> {
    let err_json = serde_json::json!({ "error": e.to_string() });
    writeln!(out, "{err_json}")?;
    out.flush()?;
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_summary(engine: &OracleEngine, now: DateTime<Utc>) -> Result<()> {
    let snap = engine.inventory(now, false)?;
    let portfolio = engine.portfolio(now, false)?;
    let board = engine.market(now);
    let status = engine.schedule_status(now);

    println!("funstr oracle — funstr-runner");
    println!("  now:            {}", now.to_rfc3339());
    println!("  config:         v{}", engine.config().market.version);
    println!();
    println!("=== INVENTORY ===");
    println!("  source:         {}", snap.source.as_str());
    println!("  domains:        {}", snap.stats.domains_bought);
    println!("  total spent:    ${:.2}", snap.stats.total_spent_usd);
    for d in snap.domains.iter().take(5) {
        println!("    {}", d.domain);
    }

    println!();
    println!("=== PORTFOLIO ===");
    println!("  {}", portfolio.summary);
    for issue in &portfolio.issues {
        println!("  [{:?}] {}", issue.severity, issue.title);
    }
    if !portfolio.suggested_domains.is_empty() {
        println!("  suggested:      {}", portfolio.suggested_domains.join(", "));
    }

    println!();
    println!("=== MARKET ({}) ===", board.day);
    for s in board.signals.iter().take(8) {
        println!(
            "  {:<18} {:>5.1}% ({:+.1}) | base {:>3} | bids {:>3} offers {:>2} watch {:>4}",
            s.key.to_string(),
            s.dominance,
            s.dominance_delta,
            s.base_score,
            s.bids,
            s.offers,
            s.watch
        );
    }

    println!();
    println!("=== CURATION ===");
    println!("  status:         {}", status.title);
    println!("  next run:       {} (in {}s)", status.next_run.to_rfc3339(), status.next_in_secs);
    Ok(())
}
