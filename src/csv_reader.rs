//! Record ingestion: CSV (the canonical Iris format) and JSON arrays
//! (what the web form submits). Schema validation fails fast with the
//! name of the first missing column; rows with non-finite numerics or an
//! empty species label are rejected with their row number.

use anyhow::{Context, Result};
use std::io::Read;

use crate::error::ArtError;
use crate::record::{IrisRecord, REQUIRED_COLUMNS};

/// Read and validate records from CSV.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<IrisRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers().context("Failed to read CSV header")?;
    let mut indices = [0usize; 5];
    for (slot, column) in REQUIRED_COLUMNS.iter().enumerate() {
        match headers.iter().position(|h| h == *column) {
            Some(i) => indices[slot] = i,
            None => return Err(ArtError::MissingColumn(column.to_string()).into()),
        }
    }

    let mut records = Vec::new();
    for (row_number, row) in csv_reader.records().enumerate() {
        // Row numbers reported to the user are 1-based and count data rows.
        let row_number = row_number + 1;
        let row = row.with_context(|| format!("Failed to read CSV row {}", row_number))?;

        let field = |slot: usize| row.get(indices[slot]).unwrap_or("");
        let numeric = |slot: usize| -> Result<f64, ArtError> {
            let raw = field(slot);
            match raw.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(v),
                _ => Err(ArtError::BadValue {
                    row: row_number,
                    column: REQUIRED_COLUMNS[slot].to_string(),
                    value: raw.to_string(),
                }),
            }
        };

        let species = field(4).to_string();
        if species.is_empty() {
            return Err(ArtError::BadValue {
                row: row_number,
                column: "species".to_string(),
                value: String::new(),
            }
            .into());
        }

        records.push(IrisRecord {
            sepal_length: numeric(0)?,
            sepal_width: numeric(1)?,
            petal_length: numeric(2)?,
            petal_width: numeric(3)?,
            species,
        });
    }

    Ok(records)
}

/// Read records from a JSON array of objects, the payload shape the web
/// front end submits.
pub fn read_json<R: Read>(reader: R) -> Result<Vec<IrisRecord>> {
    let records: Vec<IrisRecord> =
        serde_json::from_reader(reader).context("Failed to parse JSON record array")?;
    for (row_number, record) in records.iter().enumerate() {
        if !record.is_valid() {
            return Err(ArtError::BadValue {
                row: row_number + 1,
                column: "record".to_string(),
                value: format!("{:?}", record),
            }
            .into());
        }
    }
    Ok(records)
}
