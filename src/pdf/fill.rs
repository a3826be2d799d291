//! Writing field values back into the original PDF

use crate::error::{Error, Result};
use crate::model::{FieldKind, FieldValue, FormField};
use crate::pdf::acroform::AcroForm;

/// Result of filling form fields
#[derive(Debug, Clone, Default)]
pub struct FillFormResultInfo {
    /// Number of fields successfully filled
    pub fields_filled: u32,
    /// Fields that could not be filled
    pub fields_skipped: Vec<SkippedField>,
}

/// Info about a field that could not be filled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedField {
    /// Field name
    pub name: String,
    /// Reason the field was skipped
    pub reason: String,
}

/// Filled document bytes plus the fill summary
#[derive(Debug, Clone)]
pub struct FilledPdf {
    pub data: Vec<u8>,
    pub result: FillFormResultInfo,
}

/// Fill `fields` into a fresh parse of `data` and serialize the result.
///
/// Only set values (non-empty text, `true`) are written. Each write stands
/// alone: a field that cannot be resolved is logged and listed in
/// `fields_skipped`, and the rest are still written. Errors are returned only
/// when the document cannot be loaded or saved. The form stays editable.
pub fn fill_form_fields(data: &[u8], fields: &[FormField]) -> Result<FilledPdf> {
    let mut form = AcroForm::load(data)?;
    let mut result = FillFormResultInfo::default();

    for field in fields.iter().filter(|f| f.value.is_set()) {
        match write_field(&mut form, field) {
            Ok(()) => result.fields_filled += 1,
            Err(e) => {
                tracing::warn!(field = %field.name, error = %e, "Skipping form field");
                result.fields_skipped.push(SkippedField {
                    name: field.name.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    let data = form.save_to_bytes()?;
    Ok(FilledPdf { data, result })
}

fn write_field(form: &mut AcroForm, field: &FormField) -> Result<()> {
    match (field.kind, &field.value) {
        (FieldKind::Checkbox, FieldValue::Bool(checked)) => form.set_checked(&field.name, *checked),
        (FieldKind::Radio, FieldValue::Text(option)) => form.select_radio(&field.name, option),
        (FieldKind::Select, FieldValue::Text(option)) => form.select_option(&field.name, option),
        (FieldKind::Text | FieldKind::MultilineText, FieldValue::Text(text)) => {
            form.set_text(&field.name, text)
        }
        (kind, _) => Err(Error::InvalidFieldValue {
            field: field.name.clone(),
            expected: format!("a value for a {} field", kind.as_str()),
        }),
    }
}

/// Last path component of a client-supplied file name.
///
/// Both `/` and `\` count as separators. Empty, `.` and `..` components become `document`.
pub fn base_file_name(name: &str) -> &str {
    match name.rsplit(|c: char| c == '/' || c == '\\').next() {
        Some(base) if !base.is_empty() && base != "." && base != ".." => base,
        _ => "document",
    }
}

/// Download name for a filled copy: `filled-<name without .pdf>-<unix ms>.pdf`
pub fn filled_file_name(original_name: &str, timestamp_ms: i64) -> String {
    let name = base_file_name(original_name);
    let base = if name.to_ascii_lowercase().ends_with(".pdf") {
        &name[..name.len() - 4]
    } else {
        name
    };
    format!("filled-{}-{}.pdf", base, timestamp_ms)
}
