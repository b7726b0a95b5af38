use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Result, anyhow};
use chrono::Utc;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{self, EnvFilter};

use zk_event_commitment::indexer::{self, transformations::snapshot::GENERATED_AT_FORMAT};
use zk_event_commitment::metrics::Metrics;
use zk_event_commitment::models::common::{Config, SnapshotRequest};
use zk_event_commitment::models::datasets::snapshot::Snapshot;
use zk_event_commitment::models::errors::SnapshotError;
use zk_event_commitment::utils::{load_config, parse_address, parse_topic0};

#[derive(Parser, Debug)]
#[command(
    name = "zk-event-commitment",
    version,
    about = "Create an L1 event-log snapshot + Keccak commitment for ZK/soundness systems."
)]
struct Cli {
    /// Contract address whose events are to be profiled
    address: String,

    /// Optional topic0 (event signature hash, 0x + 64 hex chars) to filter logs
    #[arg(long)]
    topic0: Option<String>,

    /// RPC URL
    #[arg(long, env = "RPC_URL")]
    rpc: Option<String>,

    /// Start block (defaults to the trailing window)
    #[arg(long)]
    from_block: Option<u64>,

    /// End block (defaults to chain tip)
    #[arg(long)]
    to_block: Option<u64>,

    /// Number of recent blocks if from/to are not provided [default: 200]
    #[arg(long, env = "ZK_EVENT_BLOCKS")]
    blocks: Option<u64>,

    /// Pretty-print JSON instead of compact output
    #[arg(long)]
    pretty: bool,

    /// Disable human summary (JSON only)
    #[arg(long)]
    no_human: bool,

    /// YAML config file (defaults to ./config.yml when present)
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    /// Layer flags and env over the file config.
    fn apply(&self, mut config: Config) -> Config {
        if let Some(rpc) = &self.rpc {
            config.rpc_url = rpc.clone();
        }
        if let Some(blocks) = self.blocks {
            config.blocks = blocks;
        }
        config.pretty |= self.pretty;
        if self.no_human {
            config.human = false;
        }
        config
    }

    fn request(&self, config: &Config) -> Result<SnapshotRequest, SnapshotError> {
        if config.blocks == 0 {
            return Err(SnapshotError::InvalidWindow {
                blocks: config.blocks,
            });
        }

        Ok(SnapshotRequest {
            address: parse_address(&self.address)?,
            topic0: self.topic0.as_deref().map(parse_topic0).transpose()?,
            from_block: self.from_block,
            to_block: self.to_block,
            blocks: config.blocks,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries only the snapshot document
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => cli.apply(config),
        Err(e) => {
            error!("Failed to load config: {}", e);
            return Err(anyhow!(e));
        }
    };

    if config.uses_placeholder_rpc() {
        warn!("RPC_URL is not set and the default RPC still uses a placeholder key. Set RPC_URL or pass --rpc.");
    }

    let request = match cli.request(&config) {
        Ok(request) => request,
        Err(e) => {
            error!("Rejected input: {}", e);
            return Err(anyhow!(e));
        }
    };

    if config.metrics.lacks_textfile() {
        warn!("Metrics are enabled but metrics.textfile_path is not set; recorded metrics will be discarded");
    }

    let metrics = if config.metrics.enabled {
        Some(Arc::new(Metrics::new()?))
    } else {
        None
    };

    let result = run(&config, &request, metrics.clone()).await;

    if let (Some(metrics), Some(path)) = (&metrics, &config.metrics.textfile_path) {
        if let Err(e) = metrics.write_textfile(path) {
            warn!("Failed to write metrics: {:#}", e);
        }
    }

    let snapshot = match result {
        Ok(snapshot) => snapshot,
        Err(e) => {
            if e.is_input_error() {
                error!("Rejected input: {}", e);
            } else {
                error!("Snapshot failed: {}", e);
            }
            return Err(anyhow!(e));
        }
    };

    // Serialize fully before writing so a failure leaves stdout empty
    let json = snapshot.to_json(config.pretty)?;
    println!("{json}");

    Ok(())
}

async fn run(
    config: &Config,
    request: &SnapshotRequest,
    metrics: Option<Arc<Metrics>>,
) -> Result<Snapshot, SnapshotError> {
    let started = Instant::now();

    if config.human {
        info!(
            "zk_event_commitment started at UTC {}",
            Utc::now().format(GENERATED_AT_FORMAT)
        );
        info!(
            "Using RPC endpoint: {}  |  contract={}",
            config.rpc_url, request.address
        );
    }

    let (gateway, identity) = indexer::connect(&config.rpc_url, metrics.clone()).await?;
    let snapshot =
        indexer::build_snapshot(&gateway, &identity, request, metrics.as_deref()).await?;

    if config.human {
        info!(
            "{} (chainId {}) blocks [{}, {}] events={}",
            snapshot.network,
            snapshot.chain_id,
            snapshot.data.from_block,
            snapshot.data.to_block,
            snapshot.data.event_count
        );
        info!("CommitmentKeccak: {}", snapshot.data.commitment_keccak);
        info!(
            "Snapshot generation took {:.2}s (logs only: {}s)",
            started.elapsed().as_secs_f64(),
            snapshot.data.elapsed_sec
        );
    }

    Ok(snapshot)
}
