pub mod document;
pub mod fields;
pub mod forms;
pub mod metrics;
pub mod record;
