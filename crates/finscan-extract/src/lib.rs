//! finscan-extract
//!
//! Pure extraction over a processed document: financial field buckets,
//! derived ratios, the flattened output record, and the form-field pass.

pub mod fields;
pub mod forms;
pub mod metrics;
pub mod record;

use finscan_core::models::document::StructuredDocument;
use finscan_core::models::record::OutputRecord;

/// Field extraction, metric calculation and record assembly in one pass.
pub fn analyze_financials(document: &StructuredDocument) -> OutputRecord {
    let fields = fields::extract_fields(document);
    let metrics = metrics::calculate_metrics(&fields);
    record::assemble_record(fields, metrics)
}
