//! CSV rendering.
//!
//! Output records become a header row plus one data row. Form tables become
//! one row per page, with the header being every field name seen across
//! pages in first-seen order.

use finscan_core::models::fields::FieldValue;
use finscan_core::models::forms::FormExtraction;
use finscan_core::models::record::{OutputRecord, RecordEntry};
use indexmap::IndexSet;
use tracing::debug;

use crate::error::ExportError;

/// Render an output record as a two-row CSV table.
///
/// Absent fields are empty cells. Repeated fields are written as a JSON
/// array of their mentions so the cell stays unambiguous.
pub fn record_to_csv(record: &OutputRecord) -> Result<Vec<u8>, ExportError> {
    let mut header = Vec::with_capacity(record.key_count());
    let mut row = Vec::with_capacity(record.key_count());

    for (key, entry) in record.entries() {
        header.push(key.to_string());
        row.push(match entry {
            RecordEntry::Field(value) => field_cell(value)?,
            RecordEntry::Metric(value) => metric_cell(value),
        });
    }

    write_rows(&header, std::iter::once(row))
}

/// Render a form-field table, or its page-text fallback, as CSV.
pub fn form_table_to_csv(extraction: &FormExtraction) -> Result<Vec<u8>, ExportError> {
    match extraction {
        FormExtraction::Fields(pages) => {
            let columns: IndexSet<&str> = pages
                .iter()
                .flat_map(|page| page.keys().map(String::as_str))
                .collect();
            let header: Vec<String> = columns.iter().map(|c| c.to_string()).collect();

            debug!(
                pages = pages.len(),
                columns = header.len(),
                "rendering form field table"
            );

            let rows = pages.iter().map(|page| {
                columns
                    .iter()
                    .map(|column| page.get(*column).cloned().unwrap_or_default())
                    .collect::<Vec<_>>()
            });
            write_rows(&header, rows)
        }
        FormExtraction::Text(pages) => {
            let header = ["page_number".to_string(), "text".to_string()];
            let rows = pages
                .iter()
                .map(|page| vec![page.page_number.to_string(), page.text.clone()]);
            write_rows(&header, rows)
        }
    }
}

fn field_cell(value: &FieldValue) -> Result<String, ExportError> {
    Ok(match value {
        FieldValue::Absent => String::new(),
        FieldValue::Single(text) => text.clone(),
        FieldValue::Multiple(texts) => serde_json::to_string(texts)?,
    })
}

/// Same number formatting as the JSON artifact.
fn metric_cell(value: f64) -> String {
    serde_json::Number::from_f64(value)
        .map(|n| n.to_string())
        .unwrap_or_default()
}

fn write_rows(
    header: &[String],
    rows: impl IntoIterator<Item = Vec<String>>,
) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(&row)?;
    }
    writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))
}
