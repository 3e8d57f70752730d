use serde::{Deserialize, Serialize};

/// Structured output of the document processor for one PDF.
///
/// Entities are the tagged field instances found anywhere in the document;
/// pages carry the raw page text and any form fields detected on that page.
/// Both sequences keep document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredDocument {
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub pages: Vec<Page>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub mention_text: String,
}

impl Entity {
    pub fn new(entity_type: impl Into<String>, mention_text: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            mention_text: mention_text.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub text: String,
    #[serde(default)]
    pub form_fields: Vec<FormField>,
}

/// A labeled name/value pair detected on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    pub value: String,
}

impl FormField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
