use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid object URI '{uri}': {reason}")]
    InvalidUri { uri: String, reason: &'static str },
}
