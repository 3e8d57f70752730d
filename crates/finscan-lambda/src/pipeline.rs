//! The request flow shared by both extraction strategies.
//!
//! Fetch the PDF, run it through the document processor, extract with the
//! configured strategy, and store the resulting artifacts in the output
//! bucket.

use std::fmt;
use std::str::FromStr;

use finscan_bedrock::error::BedrockError;
use finscan_core::models::fields::CanonicalField;
use finscan_core::models::record::OutputRecord;
use finscan_core::s3_keys::{
    CSV_CONTENT_TYPE, JSON_CONTENT_TYPE, ObjectUri, PDF_MIME_TYPE, output_filename,
};
use finscan_export::error::ExportError;
use finscan_export::json::to_json_pretty;
use finscan_export::table::{form_table_to_csv, record_to_csv};
use finscan_storage::error::StorageError;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::state::AppState;

/// Which extraction runs over the processed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionStrategy {
    /// Canonical financial fields plus derived ratios; JSON and CSV output.
    #[default]
    Financial,
    /// Generic form key/value pairs, or page text; CSV output.
    Forms,
}

impl ExtractionStrategy {
    /// Entity types the document processor is asked to tag.
    pub fn entity_types(self) -> Vec<String> {
        match self {
            ExtractionStrategy::Financial => CanonicalField::ALL
                .iter()
                .map(|field| field.as_str().to_string())
                .collect(),
            ExtractionStrategy::Forms => Vec::new(),
        }
    }
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExtractionStrategy::Financial => "financial",
            ExtractionStrategy::Forms => "forms",
        })
    }
}

#[derive(Debug, Error)]
#[error("unknown pipeline '{0}', expected 'financial' or 'forms'")]
pub struct UnknownStrategy(String);

impl FromStr for ExtractionStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "financial" => Ok(ExtractionStrategy::Financial),
            "forms" => Ok(ExtractionStrategy::Forms),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

/// Successful response body. Field names are part of the public API.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PipelineOutcome {
    Financial {
        json_gcs_uri: String,
        csv_gcs_uri: String,
        extracted_data: OutputRecord,
    },
    Forms {
        csv_gcs_uri: String,
    },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Processor(#[from] BedrockError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Run one PDF through the configured pipeline.
pub async fn run_pipeline(
    state: &AppState,
    pdf_uri: &str,
) -> Result<PipelineOutcome, PipelineError> {
    let source =
        ObjectUri::parse(pdf_uri).map_err(|e| PipelineError::BadRequest(e.to_string()))?;
    info!(uri = %source, pipeline = %state.strategy, "processing PDF");

    let pdf = state.store.fetch(&source).await?;
    let document = state
        .processor
        .process(&pdf, PDF_MIME_TYPE, source.basename())
        .await?;

    match state.strategy {
        ExtractionStrategy::Financial => {
            let record = finscan_extract::analyze_financials(&document);
            let json = to_json_pretty(&record)?;
            let csv = record_to_csv(&record)?;
            info!(
                final_data = %String::from_utf8_lossy(&json),
                metrics = record.metrics.len(),
                "assembled output record"
            );

            let json_uri = store_artifact(state, &source, json, "json", JSON_CONTENT_TYPE).await?;
            let csv_uri = store_artifact(state, &source, csv, "csv", CSV_CONTENT_TYPE).await?;

            Ok(PipelineOutcome::Financial {
                json_gcs_uri: json_uri.to_string(),
                csv_gcs_uri: csv_uri.to_string(),
                extracted_data: record,
            })
        }
        ExtractionStrategy::Forms => {
            let table = finscan_extract::forms::extract_form_fields(&document);
            let csv = form_table_to_csv(&table)?;

            let csv_uri = store_artifact(state, &source, csv, "csv", CSV_CONTENT_TYPE).await?;

            Ok(PipelineOutcome::Forms {
                csv_gcs_uri: csv_uri.to_string(),
            })
        }
    }
}

async fn store_artifact(
    state: &AppState,
    source: &ObjectUri,
    body: Vec<u8>,
    ext: &str,
    content_type: &str,
) -> Result<ObjectUri, StorageError> {
    let filename = output_filename(&source.key, ext);
    let uri = state
        .store
        .store(body, &filename, &state.output_bucket, content_type)
        .await?;
    info!(uri = %uri, "artifact uploaded");
    Ok(uri)
}
