//! Optional price hints loaded from a CSV export.
//!
//! The expected columns are `name, pack_size, price_gbp`, but any header row
//! is accepted: each data row becomes a JSON object keyed by header. The
//! records are forwarded to the model as-is and never validated here.

use std::io::Read;
use std::path::Path;

use serde_json::{Map, Number, Value};
use thiserror::Error;
use tracing::debug;

/// Errors reading a price-hint CSV.
#[derive(Debug, Error)]
pub enum PriceHintError {
    #[error("failed to read price hints from {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("malformed price hint CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("price hint CSV has no header row")]
    NoHeader,
}

/// Parsed price-hint table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceHints {
    headers: Vec<String>,
    records: Vec<Map<String, Value>>,
}

impl PriceHints {
    /// Parse CSV from any reader. The first row is the header.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PriceHintError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_owned).collect();
        if headers.iter().all(String::is_empty) {
            return Err(PriceHintError::NoHeader);
        }

        let mut records = Vec::new();
        for row in csv_reader.records() {
            let row = row?;
            let record = headers
                .iter()
                .zip(row.iter())
                .map(|(header, cell)| (header.clone(), cell_value(cell)))
                .collect();
            records.push(record);
        }

        debug!(rows = records.len(), columns = headers.len(), "parsed price hints");
        Ok(Self { headers, records })
    }

    /// Read and parse a CSV file.
    pub fn from_path(path: &Path) -> Result<Self, PriceHintError> {
        let file = std::fs::File::open(path).map_err(|source| PriceHintError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(file)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The records as a JSON array, one object per row.
    pub fn to_json(&self) -> Value {
        Value::Array(self.records.iter().cloned().map(Value::Object).collect())
    }

    /// Markdown table of the hints, for showing what was uploaded.
    pub fn render_table(&self) -> String {
        let mut lines = Vec::with_capacity(self.records.len() + 2);
        lines.push(format!("| {} |", self.headers.join(" | ")));
        lines.push(format!("|{}", "---|".repeat(self.headers.len())));
        for record in &self.records {
            let cells: Vec<String> = self
                .headers
                .iter()
                .map(|h| crate::plan::display_text(record.get(h)))
                .collect();
            lines.push(format!("| {} |", cells.join(" | ")));
        }
        lines.join("\n")
    }
}

/// Numeric cells become JSON numbers; everything else stays a string.
fn cell_value(cell: &str) -> Value {
    if let Ok(n) = cell.parse::<i64>() {
        return Value::from(n);
    }
    match cell.parse::<f64>().ok().and_then(Number::from_f64) {
        Some(n) => Value::Number(n),
        None => Value::String(cell.to_owned()),
    }
}
