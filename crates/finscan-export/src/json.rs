use serde::Serialize;

use crate::error::ExportError;

/// Render any artifact as two-space indented JSON.
pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<Vec<u8>, ExportError> {
    Ok(serde_json::to_vec_pretty(value)?)
}
