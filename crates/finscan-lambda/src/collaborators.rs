//! Seams to the external services a request depends on.
//!
//! The handler only sees these traits; `main` wires in the S3 and Bedrock
//! implementations and tests wire in in-memory fakes.

use std::future::Future;
use std::pin::Pin;

use finscan_bedrock::error::BedrockError;
use finscan_bedrock::process::BedrockProcessor;
use finscan_core::models::document::StructuredDocument;
use finscan_core::s3_keys::{ObjectUri, PDF_MIME_TYPE};
use finscan_storage::error::StorageError;
use finscan_storage::objects::{self, ObjectMeta};
use tracing::warn;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait ObjectStore: Send + Sync {
    /// Download the object at `uri`.
    fn fetch<'a>(&'a self, uri: &'a ObjectUri) -> BoxFuture<'a, Result<Vec<u8>, StorageError>>;

    /// Upload `body` as `bucket/filename` and return where it landed.
    fn store<'a>(
        &'a self,
        body: Vec<u8>,
        filename: &'a str,
        bucket: &'a str,
        content_type: &'a str,
    ) -> BoxFuture<'a, Result<ObjectUri, StorageError>>;

    /// List every object in `bucket`.
    fn list<'a>(&'a self, bucket: &'a str) -> BoxFuture<'a, Result<Vec<ObjectMeta>, StorageError>>;
}

pub trait DocumentProcessor: Send + Sync {
    fn process<'a>(
        &'a self,
        bytes: &'a [u8],
        mime_type: &'a str,
        filename: &'a str,
    ) -> BoxFuture<'a, Result<StructuredDocument, BedrockError>>;
}

pub struct S3Store {
    client: aws_sdk_s3::Client,
}

impl S3Store {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }
}

impl ObjectStore for S3Store {
    fn fetch<'a>(&'a self, uri: &'a ObjectUri) -> BoxFuture<'a, Result<Vec<u8>, StorageError>> {
        Box::pin(async move {
            let output = objects::get_object(&self.client, &uri.bucket, &uri.key).await?;
            if let Some(ct) = output.content_type.as_deref().filter(|ct| *ct != PDF_MIME_TYPE) {
                warn!(uri = %uri, content_type = ct, "source object is not tagged as a PDF");
            }
            Ok(output.body)
        })
    }

    fn store<'a>(
        &'a self,
        body: Vec<u8>,
        filename: &'a str,
        bucket: &'a str,
        content_type: &'a str,
    ) -> BoxFuture<'a, Result<ObjectUri, StorageError>> {
        Box::pin(async move {
            objects::put_object(&self.client, bucket, filename, body, Some(content_type)).await?;
            Ok(ObjectUri::new(bucket, filename))
        })
    }

    fn list<'a>(&'a self, bucket: &'a str) -> BoxFuture<'a, Result<Vec<ObjectMeta>, StorageError>> {
        Box::pin(objects::list_objects_with_metadata(&self.client, bucket, ""))
    }
}

impl DocumentProcessor for BedrockProcessor {
    fn process<'a>(
        &'a self,
        bytes: &'a [u8],
        mime_type: &'a str,
        filename: &'a str,
    ) -> BoxFuture<'a, Result<StructuredDocument, BedrockError>> {
        Box::pin(self.process_document(bytes, mime_type, filename))
    }
}
