//! Object URI and key conventions.
//!
//! Pure string functions with no AWS SDK dependency. These define how source
//! PDFs are addressed and how output artifacts are named.

use std::fmt;

use crate::error::CoreError;

pub const URI_SCHEME: &str = "s3://";

pub const PDF_MIME_TYPE: &str = "application/pdf";
pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// A bucket/key pair addressed as `s3://bucket/key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectUri {
    pub bucket: String,
    pub key: String,
}

impl ObjectUri {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    pub fn parse(uri: &str) -> Result<Self, CoreError> {
        let invalid = |reason| CoreError::InvalidUri {
            uri: uri.to_string(),
            reason,
        };

        let rest = uri
            .strip_prefix(URI_SCHEME)
            .ok_or_else(|| invalid("expected an s3:// URI"))?;
        let (bucket, key) = rest
            .split_once('/')
            .ok_or_else(|| invalid("missing object key"))?;

        if bucket.is_empty() {
            return Err(invalid("missing bucket name"));
        }
        if key.is_empty() || key.ends_with('/') {
            return Err(invalid("key does not name an object"));
        }

        Ok(Self::new(bucket, key))
    }

    /// Last path segment of the key.
    pub fn basename(&self) -> &str {
        basename(&self.key)
    }
}

impl fmt::Display for ObjectUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{URI_SCHEME}{}/{}", self.bucket, self.key)
    }
}

fn basename(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Artifact name for a source key: basename with its last extension
/// replaced by `ext`.
///
/// `invoices/q3.report.pdf` with `csv` gives `q3.report.csv`. A basename
/// without a dot keeps its full name.
pub fn output_filename(key: &str, ext: &str) -> String {
    let name = basename(key);
    let stem = name.rsplit_once('.').map_or(name, |(stem, _)| stem);
    format!("{stem}.{ext}")
}
