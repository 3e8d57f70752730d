use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("JSON rendering failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV rendering failed: {0}")]
    Csv(#[from] csv::Error),
}
