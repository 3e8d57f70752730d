use finscan_core::models::document::StructuredDocument;
use finscan_core::models::fields::{CanonicalField, ExtractedFields, FieldValue};
use tracing::debug;

/// Bucket entity mentions by canonical field name.
///
/// Entities whose type is not a canonical name are skipped. Each bucket is
/// collapsed to absent, a single mention, or the ordered list of mentions.
pub fn extract_fields(document: &StructuredDocument) -> ExtractedFields {
    let mut buckets: [Vec<String>; 8] = Default::default();
    let mut skipped = 0usize;

    for entity in &document.entities {
        match CanonicalField::from_name(&entity.entity_type) {
            Some(field) => buckets[field as usize].push(entity.mention_text.clone()),
            None => skipped += 1,
        }
    }

    debug!(
        entities = document.entities.len(),
        skipped, "bucketed document entities"
    );

    let mut fields = ExtractedFields::default();
    for (field, mentions) in CanonicalField::ALL.into_iter().zip(buckets) {
        fields.set(field, FieldValue::from_mentions(mentions));
    }
    fields
}
