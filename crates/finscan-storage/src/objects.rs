use aws_sdk_s3::Client;
use aws_smithy_types::byte_stream::ByteStream;
use tracing::{debug, error};

use crate::error::StorageError;

/// Result of a GET operation.
pub struct GetObjectOutput {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

/// Get an object from S3.
pub async fn get_object(
    client: &Client,
    bucket: &str,
    key: &str,
) -> Result<GetObjectOutput, StorageError> {
    let resp = client
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| {
            let err = e.into_service_error();
            if err.is_no_such_key() {
                StorageError::NotFound {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                }
            } else {
                error!(bucket, key, error = %err, "S3 GetObject failed");
                StorageError::GetObject(err.to_string())
            }
        })?;

    let content_type = resp.content_type().map(|s| s.to_string());
    let body = resp
        .body
        .collect()
        .await
        .map_err(|e| StorageError::GetObject(e.to_string()))?
        .into_bytes()
        .to_vec();

    debug!(bucket, key, size = body.len(), "downloaded object");

    Ok(GetObjectOutput { body, content_type })
}

/// Put an object to S3. Returns the new ETag.
pub async fn put_object(
    client: &Client,
    bucket: &str,
    key: &str,
    body: Vec<u8>,
    content_type: Option<&str>,
) -> Result<String, StorageError> {
    let mut req = client
        .put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(body));

    if let Some(ct) = content_type {
        req = req.content_type(ct);
    }

    let resp = req.send().await.map_err(|e| {
        let err = e.into_service_error();
        error!(bucket, key, error = %err, "S3 PutObject failed");
        StorageError::PutObject(err.to_string())
    })?;

    Ok(resp.e_tag().unwrap_or_default().to_string())
}

/// Metadata for a single S3 object, returned by [`list_objects_with_metadata`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMeta {
    pub key: String,
    pub size: i64,
    /// Seconds since the Unix epoch.
    pub last_modified: Option<i64>,
}

/// List objects under a prefix with size and last-modified metadata.
pub async fn list_objects_with_metadata(
    client: &Client,
    bucket: &str,
    prefix: &str,
) -> Result<Vec<ObjectMeta>, StorageError> {
    let mut objects = Vec::new();
    let mut continuation_token: Option<String> = None;

    loop {
        let mut req = client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix);

        if let Some(token) = &continuation_token {
            req = req.continuation_token(token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| StorageError::ListObjects(e.into_service_error().to_string()))?;

        for obj in resp.contents() {
            if let Some(key) = obj.key() {
                objects.push(ObjectMeta {
                    key: key.to_string(),
                    size: obj.size().unwrap_or(0),
                    last_modified: obj.last_modified().map(|t| t.secs()),
                });
            }
        }

        if resp.is_truncated() == Some(true) {
            continuation_token = resp.next_continuation_token().map(|s| s.to_string());
        } else {
            break;
        }
    }

    Ok(objects)
}

/// The most recently modified object whose key ends with `suffix`.
///
/// Objects without a modification time sort before any dated object.
pub fn newest_with_suffix<'a>(objects: &'a [ObjectMeta], suffix: &str) -> Option<&'a ObjectMeta> {
    objects
        .iter()
        .filter(|obj| obj.key.ends_with(suffix))
        .max_by_key(|obj| obj.last_modified)
}
