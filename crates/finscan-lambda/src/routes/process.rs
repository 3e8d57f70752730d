use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use serde::Deserialize;

use crate::error::ApiError;
use crate::pipeline::{self, PipelineOutcome};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ProcessRequest {
    pub pdf_gcs_uri: Option<String>,
    /// Older clients send this key; `pdf_gcs_uri` wins when both are present.
    pub pdf_uri: Option<String>,
}

impl ProcessRequest {
    pub fn into_uri(self) -> Option<String> {
        self.pdf_gcs_uri.or(self.pdf_uri)
    }
}

/// Extract data from the referenced PDF and store the artifacts.
///
/// The body is parsed leniently: anything that does not yield a URI string
/// is reported as a bad request rather than an extractor rejection.
pub async fn process_pdf(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PipelineOutcome>, ApiError> {
    let pdf_uri = serde_json::from_slice::<ProcessRequest>(&body)
        .ok()
        .and_then(ProcessRequest::into_uri)
        .ok_or_else(|| ApiError::BadRequest("Missing PDF GCS URI in request".to_string()))?;

    let outcome = pipeline::run_pipeline(&state, &pdf_uri).await?;
    Ok(Json(outcome))
}
