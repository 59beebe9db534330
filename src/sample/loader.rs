//! Load simulated losses from CSV
//!
//! Expected layout: a header row containing a `loss` column and one row per
//! simulated year. Other columns (year index, scenario id, ...) are ignored.

use super::LossSample;
use crate::error::Result;
use csv::Reader;
use std::path::Path;

/// Raw CSV row; only the loss column is read
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(alias = "Loss", alias = "LOSS")]
    loss: f64,
}

/// Load a loss sample from a CSV file
pub fn load_losses<P: AsRef<Path>>(path: P) -> Result<LossSample> {
    let reader = Reader::from_path(path)?;
    collect(reader)
}

/// Load a loss sample from any reader (e.g., string buffer, stdin)
pub fn load_losses_from_reader<R: std::io::Read>(reader: R) -> Result<LossSample> {
    collect(Reader::from_reader(reader))
}

fn collect<R: std::io::Read>(mut reader: Reader<R>) -> Result<LossSample> {
    let mut losses = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        losses.push(row.loss);
    }

    log::debug!("loaded {} simulated years", losses.len());
    LossSample::new(losses)
}
