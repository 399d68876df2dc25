//! CLI subcommands.

pub mod ingest;
pub mod serve;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use geotrack::RawPointRecord;

/// Read a bulk export file: a JSON array of camelCase point records.
pub fn load_export(path: &Path) -> anyhow::Result<Vec<RawPointRecord>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open export file {}", path.display()))?;
    let records: Vec<RawPointRecord> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse export file {}", path.display()))?;
    Ok(records)
}
