//! JSON persistence of finished cases.
//!
//! One record per run: the configuration used, every saved velocity
//! snapshot keyed by step number, and the full Appellian series. Downstream
//! visualization and reporting tools consume this file; nothing in the
//! solver reads it back except through [`read_case`].

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::sim::flow::CaseResult;

/// Writes a case record as pretty-printed JSON.
pub fn write_case(path: &Path, result: &CaseResult) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, result)
        .with_context(|| format!("Failed to write case record: {}", path.display()))?;

    Ok(())
}

/// Reads a case record written by [`write_case`].
pub fn read_case(path: &Path) -> Result<CaseResult> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let reader = BufReader::new(file);

    let result: CaseResult = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse case record: {}", path.display()))?;

    Ok(result)
}
