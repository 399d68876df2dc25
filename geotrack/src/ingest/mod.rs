//! Batch ingest pipeline: bulk export records into the spatial store.
//!
//! The pipeline consumes a finite sequence of raw export records, maps each
//! into the canonical [`PointRecord`], and submits fixed-size batches to the
//! store for throughput. It is single-writer and run-to-completion: ingest
//! happens before serving starts, which is what lets the cache layer get
//! away with having no invalidation path.
//!
//! Failure handling is fail-fast: the first store fault aborts the whole
//! pipeline. The report carries the counts observed up to that point.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::IngestConfig;
use crate::record::{PointRecord, RawPointRecord};
use crate::store::{SpatialStore, StoreError};

/// Failure during batch load.
#[derive(Debug, Error)]
pub enum IngestError {
    /// A batch failed to persist; the pipeline aborted.
    #[error("ingest aborted after {inserted} records: {source}")]
    Store {
        /// Records persisted before the fault.
        inserted: usize,
        #[source]
        source: StoreError,
    },
}

/// Outcome of a completed ingest run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    /// Raw records consumed from the input.
    pub records_read: usize,
    /// Records persisted to the store.
    pub records_inserted: usize,
    /// Batches submitted.
    pub batches: usize,
}

/// Maps raw export records into the store in fixed-size batches.
pub struct IngestPipeline {
    store: Arc<dyn SpatialStore>,
    batch_size: usize,
}

impl IngestPipeline {
    pub fn new(store: Arc<dyn SpatialStore>, config: IngestConfig) -> Self {
        // A zero batch size would stall the pipeline; clamp to one.
        let batch_size = config.batch_size.max(1);
        Self { store, batch_size }
    }

    /// Run the pipeline over a finite sequence of raw records.
    pub async fn run<I>(&self, records: I) -> Result<IngestReport, IngestError>
    where
        I: IntoIterator<Item = RawPointRecord>,
    {
        let mut records_read = 0;
        let mut records_inserted = 0;
        let mut batches = 0;
        let mut batch: Vec<PointRecord> = Vec::with_capacity(self.batch_size);

        for raw in records {
            records_read += 1;
            batch.push(raw.into());

            if batch.len() == self.batch_size {
                records_inserted += self.submit(std::mem::take(&mut batch), records_inserted).await?;
                batches += 1;
                batch.reserve(self.batch_size);
            }
        }

        if !batch.is_empty() {
            records_inserted += self.submit(batch, records_inserted).await?;
            batches += 1;
        }

        info!(records_read, records_inserted, batches, "ingest complete");

        Ok(IngestReport {
            records_read,
            records_inserted,
            batches,
        })
    }

    async fn submit(
        &self,
        batch: Vec<PointRecord>,
        inserted_so_far: usize,
    ) -> Result<usize, IngestError> {
        let size = batch.len();
        let inserted = self
            .store
            .insert_batch(batch)
            .await
            .map_err(|source| IngestError::Store {
                inserted: inserted_so_far,
                source,
            })?;
        debug!(batch_size = size, inserted, "batch persisted");
        Ok(inserted)
    }
}
