//! Structured document extraction via the Bedrock Converse API.
//!
//! Sends the PDF as a `DocumentBlock` and asks the model for the entities it
//! finds (restricted to a caller-supplied list of types) together with the
//! text and form fields of every page, returned as JSON.

use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, DocumentBlock, DocumentFormat, DocumentSource,
    InferenceConfiguration, Message, StopReason, SystemContentBlock,
};
use finscan_core::models::document::StructuredDocument;
use tracing::{error, info};

use crate::error::BedrockError;

const MAX_OUTPUT_TOKENS: i32 = 16_384;

const RESPONSE_SHAPE: &str = r#"{"entities": [{"type": "<entity type>", "mention_text": "<text as printed>"}], "pages": [{"text": "<full page text>", "form_fields": [{"name": "<field label>", "value": "<field value>"}]}]}"#;

/// Turns PDF bytes into a [`StructuredDocument`] with one Bedrock call.
#[derive(Debug, Clone)]
pub struct BedrockProcessor {
    client: Client,
    model_id: String,
    entity_types: Vec<String>,
}

impl BedrockProcessor {
    pub fn new(client: Client, model_id: impl Into<String>, entity_types: Vec<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
            entity_types,
        }
    }

    /// Process one document. `filename` only labels the document for the model.
    pub async fn process_document(
        &self,
        bytes: &[u8],
        mime_type: &str,
        filename: &str,
    ) -> Result<StructuredDocument, BedrockError> {
        let format = document_format_for_mime(mime_type)
            .ok_or_else(|| BedrockError::UnsupportedMimeType(mime_type.to_string()))?;

        let doc_block = DocumentBlock::builder()
            .format(format)
            .name(sanitize_document_name(filename))
            .source(DocumentSource::Bytes(aws_smithy_types::Blob::new(bytes)))
            .build()
            .map_err(|e| BedrockError::Invocation(e.to_string()))?;

        let message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Document(doc_block))
            .content(ContentBlock::Text(
                "Extract the structured content of this document.".to_string(),
            ))
            .build()
            .map_err(|e| BedrockError::Invocation(e.to_string()))?;

        let model_id = self.model_id.as_str();
        info!(model_id, filename, size = bytes.len(), "processing document");

        let response = self
            .client
            .converse()
            .model_id(model_id)
            .system(SystemContentBlock::Text(build_system_prompt(
                &self.entity_types,
            )))
            .messages(message)
            .inference_config(
                InferenceConfiguration::builder()
                    .max_tokens(MAX_OUTPUT_TOKENS)
                    .temperature(0.0)
                    .build(),
            )
            .send()
            .await
            .map_err(|e| {
                let err = e.into_service_error();
                error!(model_id, filename, error = %err, "Bedrock Converse failed");
                BedrockError::Invocation(err.to_string())
            })?;

        if matches!(response.stop_reason(), StopReason::MaxTokens) {
            return Err(BedrockError::ResponseParse(
                "model output truncated at max_tokens".to_string(),
            ));
        }

        let output_message = response
            .output()
            .and_then(|o| o.as_message().ok())
            .ok_or_else(|| BedrockError::ResponseParse("no message in response".to_string()))?;

        let text = output_message
            .content()
            .iter()
            .filter_map(|block| {
                if let ContentBlock::Text(t) = block {
                    Some(t.as_str())
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        let document = parse_document_response(&text)?;

        info!(
            model_id,
            filename,
            entities = document.entities.len(),
            pages = document.pages.len(),
            "document processing complete"
        );

        Ok(document)
    }
}

/// System prompt naming the entity types to tag and the JSON shape to return.
///
/// With no entity types the model is told to leave `entities` empty.
pub fn build_system_prompt(entity_types: &[String]) -> String {
    let entities = if entity_types.is_empty() {
        "Entities: none are requested; return an empty entities array.".to_string()
    } else {
        format!(
            "Entities: tag only values of these types: {}. Emit one entity per \
             occurrence, in reading order, using the type name verbatim. Copy each \
             value exactly as printed, including thousands separators and signs.",
            entity_types.join(", ")
        )
    };

    format!(
        "You are a document-understanding service. Read the attached document and \
         respond with a single JSON object and nothing else, shaped exactly like:\n\
         {RESPONSE_SHAPE}\n\n\
         {entities}\n\
         Pages: include every page in order, blank pages too (empty text). Put \
         labeled name/value pairs of forms in form_fields; use an empty array \
         when a page has none.",
    )
}

/// Parse the model's reply, tolerating a surrounding Markdown code fence.
pub fn parse_document_response(text: &str) -> Result<StructuredDocument, BedrockError> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(BedrockError::ResponseParse("empty response".to_string()));
    }

    serde_json::from_str(body).map_err(|e| {
        BedrockError::SchemaViolation(format!(
            "failed to parse StructuredDocument: {e}. Response: {body}"
        ))
    })
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.trim_end();
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    // Drop the info string (e.g. `json`) on the opening line.
    match rest.split_once('\n') {
        Some((_, body)) => body.trim(),
        None => rest
            .trim_start_matches(|c: char| c.is_ascii_alphanumeric())
            .trim(),
    }
}

/// Sanitize a filename for use as a Bedrock `DocumentBlock` name.
///
/// The name field only allows alphanumeric characters, single whitespace,
/// hyphens, parentheses, and square brackets.
pub fn sanitize_document_name(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '(' | ')' | '[' | ']') {
                c
            } else {
                ' '
            }
        })
        .collect();

    let collapsed = sanitized.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        "document".to_string()
    } else {
        collapsed
    }
}

/// Map a MIME type to a Bedrock `DocumentFormat`.
pub fn document_format_for_mime(mime_type: &str) -> Option<DocumentFormat> {
    match mime_type.to_ascii_lowercase().as_str() {
        "application/pdf" => Some(DocumentFormat::Pdf),
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
            Some(DocumentFormat::Docx)
        }
        "application/msword" => Some(DocumentFormat::Doc),
        _ => None,
    }
}
