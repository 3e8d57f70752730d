//! finscan-core
//!
//! Pure domain types and object URI conventions.
//! No AWS SDK dependency. This is the shared vocabulary of the finscan system.

pub mod error;
pub mod models;
pub mod s3_keys;
