//! Editable form model shared by detection, editing, and export

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Control kind of an editable field. Fixed at detection time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    MultilineText,
    Select,
    Checkbox,
    Radio,
}

impl FieldKind {
    /// Empty value for this kind: `false` for checkboxes, `""` otherwise
    pub fn default_value(self) -> FieldValue {
        match self {
            FieldKind::Checkbox => FieldValue::Bool(false),
            _ => FieldValue::Text(String::new()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::MultilineText => "multiline_text",
            FieldKind::Select => "select",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Radio => "radio",
        }
    }

    fn accepts(self, value: &FieldValue) -> bool {
        matches!(
            (self, value),
            (FieldKind::Checkbox, FieldValue::Bool(_))
                | (
                    FieldKind::Text
                        | FieldKind::MultilineText
                        | FieldKind::Select
                        | FieldKind::Radio,
                    FieldValue::Text(_)
                )
        )
    }
}

/// Current value of a field; JSON string or boolean
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
}

impl FieldValue {
    /// True for anything except `""` and `false`. Only these values are written on export.
    pub fn is_set(&self) -> bool {
        match self {
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::Bool(b) => *b,
        }
    }

    /// Text form used by the completion check
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Bool(b) => b.to_string(),
        }
    }
}

/// One editable form field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FormField {
    /// Identifier, unique within the document (`field_<index>` for detected fields)
    pub id: String,
    /// Fully-qualified form field name used when writing back
    pub name: String,
    pub kind: FieldKind,
    /// Display label derived from the name
    pub label: String,
    pub value: FieldValue,
    /// Choices for select and radio fields
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

/// Reference the viewer uses to find a document's original bytes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct PreviewHandle {
    /// Resource URI (`pdf-form://documents/<id>`)
    pub uri: String,
    /// Page count, if the object model could count the pages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
}

impl PreviewHandle {
    pub const URI_PREFIX: &'static str = "pdf-form://documents/";

    pub fn for_document(id: &str, page_count: Option<u32>) -> Self {
        Self {
            uri: format!("{}{}", Self::URI_PREFIX, id),
            page_count,
        }
    }

    /// Document id encoded in a preview URI
    pub fn document_id(uri: &str) -> Option<&str> {
        uri.strip_prefix(Self::URI_PREFIX).filter(|id| !id.is_empty())
    }
}

/// A PDF uploaded into the session.
///
/// Treated as an immutable value: edits produce a new document through
/// [`UploadedDocument::with_field_value`] and the caller swaps it in wholesale.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub id: String,
    pub file_name: String,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
    /// Bytes as captured at upload; never mutated
    pub original_bytes: Arc<[u8]>,
    pub preview: PreviewHandle,
    pub fields: Vec<FormField>,
}

impl UploadedDocument {
    pub fn field(&self, field_id: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.id == field_id)
    }

    /// Copy of this document with one field's value replaced
    pub fn with_field_value(&self, field_id: &str, value: FieldValue) -> Result<Self> {
        let field = self.field(field_id).ok_or_else(|| Error::FieldNotFound {
            name: field_id.to_string(),
        })?;

        if !field.kind.accepts(&value) {
            return Err(Error::InvalidFieldValue {
                field: field.name.clone(),
                expected: match field.kind {
                    FieldKind::Checkbox => "a boolean".to_string(),
                    _ => "a string".to_string(),
                },
            });
        }

        let fields = self
            .fields
            .iter()
            .map(|f| {
                if f.id == field_id {
                    FormField {
                        value: value.clone(),
                        ..f.clone()
                    }
                } else {
                    f.clone()
                }
            })
            .collect();

        Ok(Self {
            fields,
            ..self.clone()
        })
    }

    pub fn completion_percentage(&self) -> u8 {
        completion_percentage(&self.fields)
    }
}

/// Share of required fields that are satisfied, rounded to a whole percent.
///
/// Required checkboxes always count as complete; other required fields need a
/// value that is non-empty after trimming. Zero required fields yields 0.
pub fn completion_percentage(fields: &[FormField]) -> u8 {
    let required: Vec<&FormField> = fields.iter().filter(|f| f.required).collect();
    if required.is_empty() {
        return 0;
    }

    let complete = required
        .iter()
        .filter(|f| f.kind == FieldKind::Checkbox || !f.value.to_text().trim().is_empty())
        .count();

    ((complete as f64 / required.len() as f64) * 100.0).round() as u8
}
