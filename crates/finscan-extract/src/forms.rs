use finscan_core::models::document::{Page, StructuredDocument};
use finscan_core::models::forms::{FormExtraction, PageFields, PageText};
use indexmap::IndexMap;

/// Collect form key/value pairs per page, falling back to page text.
///
/// Names and values are trimmed and pairs with an empty side are skipped.
/// A repeated name on the same page keeps the last value. Pages left with
/// no pairs are dropped; if that leaves nothing, every page's trimmed text
/// is returned instead, empty pages included.
pub fn extract_form_fields(document: &StructuredDocument) -> FormExtraction {
    let tables: Vec<PageFields> = document
        .pages
        .iter()
        .map(page_fields)
        .filter(|fields| !fields.is_empty())
        .collect();

    if !tables.is_empty() {
        return FormExtraction::Fields(tables);
    }

    let texts = document
        .pages
        .iter()
        .enumerate()
        .map(|(i, page)| PageText {
            page_number: i + 1,
            text: page.text.trim().to_string(),
        })
        .collect();

    FormExtraction::Text(texts)
}

fn page_fields(page: &Page) -> PageFields {
    let mut fields = IndexMap::new();
    for field in &page.form_fields {
        let name = field.name.trim();
        let value = field.value.trim();
        if !name.is_empty() && !value.is_empty() {
            fields.insert(name.to_string(), value.to_string());
        }
    }
    fields
}
