use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::dataset::Dataset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Csv,
    Json,
    Sqlite,
}

impl Format {
    pub fn default_path(self) -> &'static str {
        match self {
            Format::Csv => "Governance_Data.csv",
            Format::Json => "Governance_Data.json",
            Format::Sqlite => crate::db::DEFAULT_DB_PATH,
        }
    }
}

pub fn write_csv<W: Write>(dataset: &Dataset, out: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(&dataset.columns)?;
    for row in &dataset.rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(dataset: &Dataset, out: W) -> Result<()> {
    serde_json::to_writer_pretty(out, &dataset.to_json())?;
    Ok(())
}

/// Write the dataset as CSV or JSON to `path`.
pub fn write_file(dataset: &Dataset, format: Format, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let out = BufWriter::new(file);
    match format {
        Format::Csv => write_csv(dataset, out),
        Format::Json => write_json(dataset, out),
        Format::Sqlite => anyhow::bail!("sqlite output is written through db::save_dataset"),
    }
}
