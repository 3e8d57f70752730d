use finscan_core::models::fields::ExtractedFields;
use finscan_core::models::metrics::DerivedMetrics;
use finscan_core::models::record::OutputRecord;

/// Merge extracted fields and derived metrics into one record.
pub fn assemble_record(fields: ExtractedFields, metrics: DerivedMetrics) -> OutputRecord {
    OutputRecord { fields, metrics }
}
