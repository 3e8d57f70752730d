use std::collections::BTreeMap;

use serde::de::{Deserializer, Error as _};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use super::fields::{CanonicalField, ExtractedFields, FieldValue};
use super::metrics::{DerivedMetrics, Metric};

/// Extracted fields and derived metrics, serialized as one flat object.
///
/// Field keys come first in canonical order, followed by whichever metrics
/// were computed. The two key sets are disjoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputRecord {
    pub fields: ExtractedFields,
    pub metrics: DerivedMetrics,
}

/// A single value in an [`OutputRecord`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecordEntry<'a> {
    Field(&'a FieldValue),
    Metric(f64),
}

impl OutputRecord {
    /// Every key of the flattened record with its value, in output order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, RecordEntry<'_>)> {
        let fields = self
            .fields
            .iter()
            .map(|(field, value)| (field.as_str(), RecordEntry::Field(value)));
        let metrics = self
            .metrics
            .iter()
            .map(|(metric, value)| (metric.as_str(), RecordEntry::Metric(value)));
        fields.chain(metrics)
    }

    /// Number of keys in the flattened record.
    pub fn key_count(&self) -> usize {
        CanonicalField::ALL.len() + self.metrics.len()
    }
}

impl Serialize for OutputRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.key_count()))?;
        for (key, entry) in self.entries() {
            match entry {
                RecordEntry::Field(value) => map.serialize_entry(key, value)?,
                RecordEntry::Metric(value) => map.serialize_entry(key, &value)?,
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for OutputRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        let mut record = OutputRecord::default();

        for (key, value) in raw {
            if let Some(field) = CanonicalField::from_name(&key) {
                let value = FieldValue::deserialize(value).map_err(D::Error::custom)?;
                record.fields.set(field, value);
            } else if let Some(metric) = Metric::from_name(&key) {
                let value = value
                    .as_f64()
                    .ok_or_else(|| D::Error::custom(format!("metric '{key}' is not a number")))?;
                record.metrics.insert(metric, value);
            } else {
                return Err(D::Error::custom(format!("unknown record key '{key}'")));
            }
        }

        Ok(record)
    }
}
