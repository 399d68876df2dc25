//! `geotrack serve` - load an export file, then serve queries over HTTP.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use tracing::info;

use geotrack::store::SpatialStore;
use geotrack::{IngestPipeline, MemoryStore, ServiceConfig, TrackService, ZoomPolicy};

use crate::http;

use super::load_export;

#[derive(Args)]
pub struct ServeArgs {
    /// Bulk export file to load before serving.
    #[arg(long)]
    pub data: PathBuf,

    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8000")]
    pub addr: SocketAddr,

    /// Speed threshold separating the two point labels.
    #[arg(long, default_value_t = 30.0)]
    pub speed_threshold: f64,

    /// Label for points below the threshold.
    #[arg(long, default_value = "distress")]
    pub below_label: String,

    /// Label for points at or above the threshold.
    #[arg(long, default_value = "normal")]
    pub above_label: String,

    /// Zoom level at or above which all points are shown.
    #[arg(long, default_value_t = 15)]
    pub detail_zoom: u8,

    /// Result cache TTL in seconds.
    #[arg(long, default_value_t = 3600)]
    pub cache_ttl_secs: u64,

    /// Records per insert batch during the initial load.
    #[arg(long, default_value_t = 1000)]
    pub batch_size: usize,
}

impl ServeArgs {
    fn service_config(&self) -> ServiceConfig {
        let policy = ZoomPolicy::new(
            self.speed_threshold,
            self.below_label.clone(),
            self.above_label.clone(),
        )
        .with_detail_zoom(self.detail_zoom);

        ServiceConfig::default()
            .with_policy(policy)
            .with_cache_ttl(Duration::from_secs(self.cache_ttl_secs))
            .with_batch_size(self.batch_size)
    }
}

pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    let config = args.service_config();
    let store = Arc::new(MemoryStore::new());

    let records = load_export(&args.data)?;
    let pipeline = IngestPipeline::new(
        Arc::clone(&store) as Arc<dyn SpatialStore>,
        config.ingest.clone(),
    );
    let report = pipeline.run(records).await?;
    info!(
        records = report.records_inserted,
        batches = report.batches,
        file = %args.data.display(),
        "export loaded"
    );

    let service = TrackService::new(store, config);
    http::serve(service, args.addr).await
}
