use std::sync::Arc;

use crate::collaborators::{DocumentProcessor, ObjectStore};
use crate::pipeline::ExtractionStrategy;

/// Shared application state, injected into all route handlers via Axum state.
///
/// Collaborator handles are built once at startup and reused by every request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ObjectStore>,
    pub processor: Arc<dyn DocumentProcessor>,
    pub output_bucket: String,
    pub strategy: ExtractionStrategy,
}
