//! finscan-bedrock
//!
//! Document processing via the Bedrock Converse API: PDF bytes in, structured
//! document (entities and pages) out.

pub mod client;
pub mod error;
pub mod process;
