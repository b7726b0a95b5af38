pub mod range;
pub mod rpc;
pub mod transformations;

use std::sync::Arc;
use std::time::Instant;

use alloy_eips::BlockNumberOrTag;
use alloy_network::AnyNetwork;
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_types_eth::{Filter, Log};
use alloy_transport::TransportError;
use chrono::Utc;
use tracing::{info, warn};
use url::Url;

use crate::indexer::range::resolve_range;
use crate::indexer::rpc::logs::LogParser;
use crate::indexer::transformations::{
    commitment::commitment_hex,
    events::sort_events,
    snapshot::{SnapshotParts, assemble_snapshot},
};
use crate::metrics::Metrics;
use crate::models::common::{ChainIdentity, LogQuery, SnapshotRequest};
use crate::models::datasets::snapshot::Snapshot;
use crate::models::errors::SnapshotError;
use crate::utils::strip_html;

/// The three JSON-RPC calls a snapshot needs.
#[allow(async_fn_in_trait)]
pub trait LogGateway {
    async fn chain_id(&self) -> Result<u64, SnapshotError>;
    async fn latest_block_number(&self) -> Result<u64, SnapshotError>;
    async fn get_logs(&self, query: &LogQuery) -> Result<Vec<Log>, SnapshotError>;
}

pub struct RpcGateway<P> {
    provider: P,
    endpoint: String,
    metrics: Option<Arc<Metrics>>,
}

pub type HttpGateway = RpcGateway<DynProvider<AnyNetwork>>;

impl<P> RpcGateway<P>
where
    P: Provider<AnyNetwork>,
{
    pub fn new(provider: P, endpoint: impl Into<String>, metrics: Option<Arc<Metrics>>) -> Self {
        Self {
            provider,
            endpoint: endpoint.into(),
            metrics,
        }
    }

    fn record(&self, method: &'static str, start: Instant, is_error: bool) {
        if let Some(metrics) = &self.metrics {
            metrics.record_rpc(method, start.elapsed(), is_error);
        }
    }

    fn connection_error(&self, method: &str, e: TransportError) -> SnapshotError {
        warn!("{} failed. Error details:\n{:#?}", method, e);
        SnapshotError::Connection {
            endpoint: self.endpoint.clone(),
            reason: strip_html(&e.to_string()),
        }
    }
}

impl<P> LogGateway for RpcGateway<P>
where
    P: Provider<AnyNetwork>,
{
    async fn chain_id(&self) -> Result<u64, SnapshotError> {
        let start = Instant::now();
        let result = self.provider.get_chain_id().await;
        self.record("eth_chainId", start, result.is_err());
        result.map_err(|e| self.connection_error("eth_chainId", e))
    }

    async fn latest_block_number(&self) -> Result<u64, SnapshotError> {
        let start = Instant::now();
        let result = self.provider.get_block_number().await;
        self.record("eth_blockNumber", start, result.is_err());
        result.map_err(|e| self.connection_error("eth_blockNumber", e))
    }

    async fn get_logs(&self, query: &LogQuery) -> Result<Vec<Log>, SnapshotError> {
        let mut filter = Filter::new()
            .address(query.address)
            .from_block(BlockNumberOrTag::Number(query.from_block))
            .to_block(BlockNumberOrTag::Number(query.to_block));
        if let Some(topic0) = query.topic0 {
            filter = filter.event_signature(topic0);
        }

        let start = Instant::now();
        let result = self.provider.get_logs(&filter).await;
        self.record("eth_getLogs", start, result.is_err());

        result.map_err(|e| {
            warn!("eth_getLogs failed. Error details:\n{:#?}", e);
            SnapshotError::RpcQuery {
                from_block: query.from_block,
                to_block: query.to_block,
                message: strip_html(&e.to_string()),
            }
        })
    }
}

/// Build an HTTP gateway and resolve the chain identity once.
pub async fn connect(
    rpc_url: &str,
    metrics: Option<Arc<Metrics>>,
) -> Result<(HttpGateway, ChainIdentity), SnapshotError> {
    let url = Url::parse(rpc_url).map_err(|e| SnapshotError::Connection {
        endpoint: rpc_url.to_string(),
        reason: e.to_string(),
    })?;

    let start = Instant::now();
    let provider = ProviderBuilder::new()
        .network::<AnyNetwork>()
        .connect_http(url)
        .erased();
    let gateway = RpcGateway::new(provider, rpc_url, metrics);

    let chain_id = gateway.chain_id().await?;
    let identity = ChainIdentity::from_chain_id(chain_id);
    info!(
        "Connected to {} (chainId {}) in {:.2}s",
        identity.network,
        identity.chain_id,
        start.elapsed().as_secs_f64()
    );

    Ok((gateway, identity))
}

/// Resolve the range, fetch, normalize, sort, commit and assemble.
///
/// Issues one `eth_blockNumber` and, once the range is valid, one `eth_getLogs`.
pub async fn build_snapshot<G: LogGateway>(
    gateway: &G,
    identity: &ChainIdentity,
    request: &SnapshotRequest,
    metrics: Option<&Metrics>,
) -> Result<Snapshot, SnapshotError> {
    let head_block = gateway.latest_block_number().await?;
    let range = resolve_range(request.from_block, request.to_block, request.blocks, head_block)?;

    info!(
        "Fetching logs for {} in blocks [{}, {}] (head {})",
        request.address, range.from_block, range.to_block, head_block
    );

    let start = Instant::now();
    let logs = gateway
        .get_logs(&LogQuery {
            address: request.address,
            topic0: request.topic0,
            from_block: range.from_block,
            to_block: range.to_block,
        })
        .await?;

    let mut events = logs.parse_event_records()?;
    let duplicates = sort_events(&mut events);
    if duplicates > 0 {
        warn!("{} duplicate log(s) kept in the commitment", duplicates);
    }
    let commitment = commitment_hex(&events);
    let elapsed = start.elapsed();

    if let Some(metrics) = metrics {
        metrics.record_snapshot(identity.chain_id, head_block, events.len(), elapsed);
    }

    Ok(assemble_snapshot(SnapshotParts {
        identity: identity.clone(),
        address: request.address,
        range,
        events,
        commitment,
        elapsed,
        generated_at: Utc::now(),
    }))
}
