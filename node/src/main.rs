use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, error};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use vehicle_trust_core::{ContractHost, CoreConfig, MemoryLedger};
use vehicle_trust_node::{load_ledger, read_batch, save_ledger, ReceiptLine};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Vehicle Trust Ledger contract host")]
struct Args {
    /// Config file path
    #[clap(short, long, env = "VTL_CONFIG")]
    config: Option<String>,

    /// Invocation batch file; read from stdin when absent
    #[clap(short, long)]
    batch: Option<PathBuf>,

    /// Ledger snapshot loaded before and saved after the run
    #[clap(short, long, env = "VTL_STATE")]
    state: Option<PathBuf>,

    /// Trust value written by InitTrust
    #[clap(long, env = "VTL_INITIAL_TRUST")]
    initial_trust: Option<f64>,

    /// Reject events from unregistered cars
    #[clap(long)]
    require_registered_car: bool,

    /// Default log filter, e.g. `debug` or `vehicle_trust_core=trace`
    #[clap(long, env = "VTL_LOG_LEVEL")]
    log_level: Option<String>,

    /// Fail unless the final state root equals this hex digest
    #[clap(long)]
    expect_root: Option<String>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let args = Args::parse();

    // Load configuration
    let mut config = CoreConfig::new();

    if let Some(config_path) = &args.config {
        config = CoreConfig::from_file(config_path)
            .with_context(|| format!("loading config {}", config_path))?;
    }

    // Override config with command-line arguments
    if let Some(initial_trust) = args.initial_trust {
        config.trust.initial_value = initial_trust;
    }
    if args.require_registered_car {
        config.events.require_registered_car = true;
    }
    if let Some(log_level) = args.log_level {
        config.log_level = log_level;
    }

    // Initialize logging; RUST_LOG takes precedence over the configured level
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, config.log_level.as_str()),
    );

    let ledger = match &args.state {
        Some(path) => load_ledger(path)?,
        None => MemoryLedger::new(),
    };

    let batch = match &args.batch {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening batch {}", path.display()))?;
            read_batch(file)?
        }
        None => read_batch(io::stdin().lock())?,
    };

    let mut host = ContractHost::deploy(&config, ledger)?;
    info!("Executing {} invocations", batch.len());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for invocation in &batch {
        let receipt = host.execute(invocation);
        serde_json::to_writer(&mut out, &ReceiptLine::from(&receipt))?;
        writeln!(out)?;
    }
    out.flush()?;

    let root = host.ledger().state_root();
    info!("State root: {}", hex::encode(root));

    if let Some(path) = &args.state {
        save_ledger(host.ledger(), path)?;
    }

    if let Some(expected) = &args.expect_root {
        let expected: [u8; 32] = hex::decode(expected)
            .context("decoding --expect-root")?
            .try_into()
            .map_err(|_| anyhow::anyhow!("--expect-root must be 32 bytes"))?;
        if !host.ledger().matches_root(&expected) {
            error!("State root mismatch");
            bail!("state root {} does not match expected", hex::encode(root));
        }
    }

    Ok(())
}
