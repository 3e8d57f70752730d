use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: s3://{bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("S3 GetObject error: {0}")]
    GetObject(String),

    #[error("S3 PutObject error: {0}")]
    PutObject(String),

    #[error("S3 ListObjects error: {0}")]
    ListObjects(String),
}
