use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Form fields of one page, name → value, in first-seen order.
pub type PageFields = IndexMap<String, String>;

/// Trimmed raw text of one page. `page_number` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    pub page_number: usize,
    pub text: String,
}

/// Result of the form-field pass over a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "pages", rename_all = "snake_case")]
pub enum FormExtraction {
    /// One mapping per page that had at least one usable form field.
    Fields(Vec<PageFields>),
    /// No page had form fields; one entry per page of the document.
    Text(Vec<PageText>),
}
