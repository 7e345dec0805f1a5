use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::{ScoreTier, ScoredFeatureRecord};
use crate::pipeline::{CategoryReport, Harvest};

#[derive(Debug, Serialize)]
struct ExportRecord<'a> {
    #[serde(flatten)]
    record: &'a ScoredFeatureRecord,
    tier: ScoreTier,
}

/// Hand-off document for the map renderer
#[derive(Debug, Serialize)]
struct Export<'a> {
    directory: &'a str,
    records: Vec<ExportRecord<'a>>,
    /// `[lat, lon, weight]` triples for a density layer
    heat: Vec<[f64; 3]>,
    categories: &'a [CategoryReport],
}

impl<'a> Export<'a> {
    fn new(harvest: &'a Harvest) -> Self {
        Self {
            directory: &harvest.directory,
            records: harvest
                .records
                .iter()
                .map(|record| ExportRecord {
                    record,
                    tier: record.tier(),
                })
                .collect(),
            heat: harvest
                .records
                .iter()
                .map(|r| {
                    let (lat, lon, weight) = r.heat_point();
                    [lat, lon, weight]
                })
                .collect(),
            categories: &harvest.categories,
        }
    }
}

/// Serialize a harvest as pretty JSON
pub fn to_json(harvest: &Harvest) -> Result<String> {
    serde_json::to_string_pretty(&Export::new(harvest)).context("Failed to serialize records")
}

/// Write a harvest to `path` as pretty JSON
pub fn write_json(path: &Path, harvest: &Harvest) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, &Export::new(harvest))
        .context("Failed to serialize records")?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    Ok(())
}
