//! `ringroute` — deterministic shard routing and parity checks.
//!
//! Routes keys over a consistent hash ring (MD5 virtual points, CRC-32 keys)
//! and produces the artifacts used to check parity with other routers.
//!
//! # Usage
//!
//! ```text
//! ringroute keys -n 10000                     # write artifacts/keys.json
//! ringroute assign                            # route keys, write a report
//! ringroute compare a.json b.json             # parity check two reports
//! ringroute resolve user:42 "{user:42}:cart"  # route individual keys
//! ringroute ring -c ringroute.toml            # show ring statistics
//! ```

mod backend;
mod config;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use ringroute_harness::{
    CorpusConfig, assign, compare, generate_keys, read_keys, read_report, report_meta, write_keys,
    write_report,
};
use ringroute_select::{SelectError, ShardPool, ShardSelector};
use tracing::{info, warn};

use backend::Backend;
use config::CliConfig;

// -----------------------------------------------------------------------
// CLI definition
// -----------------------------------------------------------------------

#[derive(Parser)]
#[command(
    name = "ringroute",
    version,
    about = "Deterministic consistent-hash shard router and parity harness"
)]
struct Cli {
    /// Path to TOML config file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a deterministic key corpus.
    Keys {
        /// Where to write the keys artifact.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of keys to generate.
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// RNG seed.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Route every key in a keys artifact and write an assignment report.
    Assign {
        /// Keys artifact to read.
        #[arg(short, long)]
        keys: Option<PathBuf>,

        /// Where to write the assignment report.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compare two assignment reports key by key.
    ///
    /// Exits with an error if any key is routed differently.
    Compare {
        /// First report (usually this router's).
        left: PathBuf,
        /// Second report (usually another implementation's).
        right: PathBuf,
    },

    /// Resolve individual keys.
    Resolve {
        /// Keys to route, hashed exactly as given.
        #[arg(required = true)]
        keys: Vec<String>,

        /// Show the read target instead of the write target.
        #[arg(long)]
        read: bool,
    },

    /// Show ring statistics.
    Ring,
}

// -----------------------------------------------------------------------
// Entrypoint
// -----------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref()).context("failed to load config")?;

    setup_tracing(&config.log.level);

    match cli.command {
        Commands::Keys {
            output,
            count,
            seed,
        } => {
            let mut corpus = config.corpus();
            if let Some(n) = count {
                corpus.count = n;
            }
            if let Some(s) = seed {
                corpus.seed = s;
            }
            let output = output.unwrap_or_else(|| config.artifacts.keys.clone());
            cmd_keys(&corpus, &output)
        }
        Commands::Assign { keys, output } => {
            let keys = keys.unwrap_or_else(|| config.artifacts.keys.clone());
            let output = output.unwrap_or_else(|| config.artifacts.output.clone());
            cmd_assign(&config, &keys, &output)
        }
        Commands::Compare { left, right } => cmd_compare(&left, &right),
        Commands::Resolve { keys, read } => cmd_resolve(&config, &keys, read),
        Commands::Ring => cmd_ring(&config),
    }
}

/// Initialize the `tracing` subscriber with the given level filter.
///
/// Respects `RUST_LOG` env var if set, otherwise uses the config value.
/// Logs go to stderr so command output on stdout stays clean.
fn setup_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Build the selector for the configured shard layout.
fn build_selector(config: &CliConfig) -> Result<ShardSelector<Backend>> {
    info!(
        shards = config.ring.shards.len(),
        replicas = config.ring.replicas,
        read_policy = ?config.ring.read_policy,
        "building ring"
    );
    ShardSelector::new(
        config.shard_nodes(),
        config.ring.replicas,
        config.ring.read_policy,
    )
    .context("failed to build ring")
}

// -----------------------------------------------------------------------
// ringroute keys
// -----------------------------------------------------------------------

fn cmd_keys(corpus: &CorpusConfig, output: &Path) -> Result<()> {
    let keys = generate_keys(corpus);
    write_keys(output, &keys)
        .with_context(|| format!("failed to write keys to {}", output.display()))?;
    println!("wrote {} keys to {}", keys.len(), output.display());
    Ok(())
}

// -----------------------------------------------------------------------
// ringroute assign
// -----------------------------------------------------------------------

fn cmd_assign(config: &CliConfig, keys_path: &Path, output: &Path) -> Result<()> {
    let keys = read_keys(keys_path)
        .with_context(|| format!("failed to read keys from {}", keys_path.display()))?;

    let selector = build_selector(config)?;
    let ring = selector.ring().snapshot();

    let key_source = keys_path.display().to_string();
    let meta = report_meta(&ring, &key_source, |pool: &ShardPool<Backend>| {
        pool.primary().addr().to_string()
    });
    let report = assign(&ring, &keys, meta);

    write_report(output, &report)
        .with_context(|| format!("failed to write report to {}", output.display()))?;

    let mut per_shard: BTreeMap<&str, usize> = BTreeMap::new();
    for a in &report.assignments {
        *per_shard.entry(a.shard.as_str()).or_default() += 1;
    }

    println!(
        "routed {} keys to {}",
        report.assignments.len(),
        output.display()
    );
    for (shard, count) in &per_shard {
        let shard = if shard.is_empty() { "<none>" } else { shard };
        println!("  {shard}: {count}");
    }

    drop(ring);
    selector.close();
    Ok(())
}

// -----------------------------------------------------------------------
// ringroute compare
// -----------------------------------------------------------------------

fn cmd_compare(left: &Path, right: &Path) -> Result<()> {
    let left_report = read_report(left)
        .with_context(|| format!("failed to read report {}", left.display()))?;
    let right_report = read_report(right)
        .with_context(|| format!("failed to read report {}", right.display()))?;

    let parity = compare(&left_report, &right_report).context("reports are not comparable")?;
    print!("{parity}");

    if !parity.is_full_match() {
        bail!(
            "parity check failed: {} mismatches, {} keys only in {}, {} keys only in {}",
            parity.mismatches.len(),
            parity.missing_in_right.len(),
            left.display(),
            parity.missing_in_left.len(),
            right.display(),
        );
    }

    info!(keys = parity.total, "parity check passed");
    Ok(())
}

// -----------------------------------------------------------------------
// ringroute resolve
// -----------------------------------------------------------------------

fn cmd_resolve(config: &CliConfig, keys: &[String], read: bool) -> Result<()> {
    let selector = build_selector(config)?;

    for key in keys {
        let route = if read {
            selector.for_read(key.as_bytes())
        } else {
            selector.for_write(key.as_bytes())
        };
        match route {
            Ok(route) => println!("{key} -> {} ({})", route.shard, route.handle),
            Err(SelectError::NoBackend) => {
                warn!(%key, "no backend available");
                println!("{key} -> <none>");
            }
            Err(e) => return Err(e.into()),
        }
    }

    selector.close();
    Ok(())
}

// -----------------------------------------------------------------------
// ringroute ring
// -----------------------------------------------------------------------

fn cmd_ring(config: &CliConfig) -> Result<()> {
    let selector = build_selector(config)?;
    let ring = selector.ring().snapshot();

    println!("shards:     {}", ring.node_count());
    println!("replicas:   {}", ring.replicas());
    println!("points:     {}", ring.point_count());
    println!("collisions: {}", ring.collisions());

    let keyspace = (1u64 << 32) as f64;
    for (name, arc) in ring.ownership() {
        println!("  {name}: {:.2}% of keyspace", arc as f64 / keyspace * 100.0);
    }

    drop(ring);
    selector.close();
    Ok(())
}
