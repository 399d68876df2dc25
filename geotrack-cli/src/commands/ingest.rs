//! `geotrack ingest` - parse and load a bulk export, print the report.
//!
//! Useful as a validation dry-run before serving: the file is fully parsed
//! and every record makes it through the same pipeline the serve command
//! uses, just into a throwaway store.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;

use geotrack::config::IngestConfig;
use geotrack::store::SpatialStore;
use geotrack::{IngestPipeline, MemoryStore};

use super::load_export;

#[derive(Args)]
pub struct IngestArgs {
    /// Bulk export file to load.
    #[arg(long)]
    pub data: PathBuf,

    /// Records per insert batch.
    #[arg(long, default_value_t = 1000)]
    pub batch_size: usize,
}

pub async fn run(args: IngestArgs) -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let pipeline = IngestPipeline::new(
        Arc::clone(&store) as Arc<dyn SpatialStore>,
        IngestConfig {
            batch_size: args.batch_size,
        },
    );

    let records = load_export(&args.data)?;
    let report = pipeline.run(records).await?;

    println!(
        "loaded {} of {} records in {} batches from {}",
        report.records_inserted,
        report.records_read,
        report.batches,
        args.data.display()
    );
    Ok(())
}
