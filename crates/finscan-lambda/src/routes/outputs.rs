use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};

use finscan_core::s3_keys::{CSV_CONTENT_TYPE, ObjectUri};
use finscan_storage::objects::newest_with_suffix;

use crate::error::ApiError;
use crate::state::AppState;

/// Download the most recently written CSV artifact.
pub async fn latest_csv(State(state): State<AppState>) -> Result<Response, ApiError> {
    let objects = state.store.list(&state.output_bucket).await?;
    let latest = newest_with_suffix(&objects, ".csv").ok_or_else(|| {
        ApiError::NotFound("no CSV files found in the output bucket".to_string())
    })?;

    let uri = ObjectUri::new(&state.output_bucket, &latest.key);
    let body = state.store.fetch(&uri).await?;

    tracing::info!(
        uri = %uri,
        listed_size = latest.size,
        size = body.len(),
        "serving latest CSV"
    );

    let disposition = format!("attachment; filename=\"{}\"", uri.basename());
    Ok((
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
