//! finscan-export
//!
//! Renders output records and form tables into the JSON and CSV artifacts
//! written back to the object store.

pub mod error;
pub mod json;
pub mod table;
