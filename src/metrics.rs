use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use opentelemetry::KeyValue;
use opentelemetry::metrics::{Counter, Gauge, Histogram, MeterProvider};
use opentelemetry_sdk::metrics::{MetricError, SdkMeterProvider};
use prometheus::{Encoder, TextEncoder};
use tracing::info;

/// Per-run instruments. A snapshot is a batch job, so instead of serving `/metrics`
/// the registry is rendered once at exit into a node-exporter textfile.
pub struct Metrics {
    registry: prometheus::Registry,
    _provider: SdkMeterProvider,

    // RPC metrics
    pub rpc_requests: Counter<u64>,
    pub rpc_errors: Counter<u64>,
    pub rpc_latency: Histogram<f64>,

    // Snapshot metrics
    pub head_block: Gauge<u64>,
    pub events_committed: Gauge<u64>,
    pub snapshot_duration: Gauge<f64>,
}

impl Metrics {
    pub fn new() -> Result<Self, MetricError> {
        let registry = prometheus::Registry::new();

        let exporter = opentelemetry_prometheus::exporter()
            .with_registry(registry.clone())
            .build()?;

        let provider = SdkMeterProvider::builder().with_reader(exporter).build();
        let meter = provider.meter("zk_event_commitment");

        let rpc_requests = meter
            .u64_counter("snapshot_rpc_requests")
            .with_description("Number of RPC requests made")
            .build();

        let rpc_errors = meter
            .u64_counter("snapshot_rpc_errors")
            .with_description("Number of RPC errors encountered")
            .build();

        let rpc_latency = meter
            .f64_histogram("snapshot_rpc_latency")
            .with_description("RPC request latency")
            .with_boundaries(vec![
                0.025, 0.05, 0.075, 0.1, 0.15, 0.2, 0.3, 0.5, 1.0, 5.0, 10.0, 25.0,
            ])
            .with_unit("s")
            .build();

        let head_block = meter
            .u64_gauge("snapshot_head_block_number")
            .with_description("Chain tip observed when the snapshot was taken")
            .build();

        let events_committed = meter
            .u64_gauge("snapshot_events_committed")
            .with_description("Number of events covered by the commitment")
            .build();

        let snapshot_duration = meter
            .f64_gauge("snapshot_duration")
            .with_description("Time spent fetching and processing logs")
            .with_unit("s")
            .build();

        Ok(Self {
            registry,
            _provider: provider,
            rpc_requests,
            rpc_errors,
            rpc_latency,
            head_block,
            events_committed,
            snapshot_duration,
        })
    }

    pub fn record_rpc(&self, method: &'static str, elapsed: Duration, is_error: bool) {
        let labels = [KeyValue::new("method", method)];
        self.rpc_requests.add(1, &labels);
        self.rpc_latency.record(elapsed.as_secs_f64(), &labels);
        if is_error {
            self.rpc_errors.add(1, &labels);
        }
    }

    pub fn record_snapshot(&self, chain_id: u64, head_block: u64, events: usize, elapsed: Duration) {
        let labels = [KeyValue::new("chain_id", chain_id.to_string())];
        self.head_block.record(head_block, &labels);
        self.events_committed.record(events as u64, &labels);
        self.snapshot_duration.record(elapsed.as_secs_f64(), &labels);
    }

    /// Prometheus text exposition of everything recorded so far.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = vec![];
        encoder
            .encode(&metric_families, &mut buffer)
            .context("failed to encode metrics")?;
        String::from_utf8(buffer).context("metrics output is not valid UTF-8")
    }

    pub fn write_textfile<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let rendered = self.render()?;

        // Write then rename so a collector never reads a partial file
        let tmp = path.with_extension("prom.tmp");
        std::fs::write(&tmp, rendered)
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, path)
            .with_context(|| format!("failed to move metrics into {}", path.display()))?;

        info!("Metrics written to {}", path.display());
        Ok(())
    }
}
