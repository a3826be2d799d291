//! Form field detection

use crate::model::{FieldKind, FormField};
use crate::pdf::acroform::{AcroForm, NativeField, NativeFieldKind};

/// Size of the demonstration field set used when nothing is detected
pub const FALLBACK_FIELD_COUNT: usize = 7;

/// Field model plus page count from a single parse
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedForm {
    pub fields: Vec<FormField>,
    /// `None` when the document could not be parsed
    pub page_count: Option<u32>,
}

/// Build the editable field model for a PDF.
///
/// Never fails: a document that cannot be parsed, has no AcroForm, or has an
/// empty one yields [`fallback_fields`] instead.
pub fn detect_fields(data: &[u8]) -> Vec<FormField> {
    detect_form(data).fields
}

/// Like [`detect_fields`], also reporting the page count
pub fn detect_form(data: &[u8]) -> DetectedForm {
    let form = match AcroForm::load(data) {
        Ok(form) => form,
        Err(e) => {
            tracing::warn!(error = %e, "Form field detection failed, using fallback fields");
            return DetectedForm {
                fields: fallback_fields(),
                page_count: None,
            };
        }
    };

    let mut fields: Vec<FormField> = form
        .fields()
        .iter()
        .enumerate()
        .map(|(index, native)| from_native(index, native))
        .collect();

    if fields.is_empty() {
        tracing::debug!("No form fields detected, using fallback fields");
        fields = fallback_fields();
    } else {
        tracing::debug!(count = fields.len(), "Detected form fields");
    }

    DetectedForm {
        fields,
        page_count: Some(form.page_count()),
    }
}

fn from_native(index: usize, native: &NativeField) -> FormField {
    let kind = match native.kind {
        NativeFieldKind::Text if native.multiline => FieldKind::MultilineText,
        NativeFieldKind::CheckBox => FieldKind::Checkbox,
        NativeFieldKind::RadioGroup => FieldKind::Radio,
        NativeFieldKind::Dropdown => FieldKind::Select,
        // Lists, buttons and signatures are edited as plain text
        _ => FieldKind::Text,
    };

    let options = match kind {
        FieldKind::Select | FieldKind::Radio => {
            native.options.iter().map(|o| o.display.clone()).collect()
        }
        _ => Vec::new(),
    };

    FormField {
        id: format!("field_{}", index),
        name: native.name.clone(),
        kind,
        label: label_from_name(&native.name),
        value: kind.default_value(),
        options,
        required: false,
        placeholder: Some(format!("Enter {}", native.name)),
    }
}

/// Display label for a field name: a space before each ASCII capital, first letter upper-cased.
///
/// `clientName` becomes `Client Name`.
pub fn label_from_name(name: &str) -> String {
    let mut spaced = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            spaced.push(' ');
        }
        spaced.push(c);
    }

    // Only the space inserted before a leading capital is dropped
    let spaced = match name.chars().next() {
        Some(first) if first.is_ascii_uppercase() => &spaced[1..],
        _ => spaced.as_str(),
    };
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Fixed demonstration schema, every value at its empty default
pub fn fallback_fields() -> Vec<FormField> {
    let field = |name: &str,
                 kind: FieldKind,
                 label: &str,
                 required: bool,
                 options: &[&str],
                 placeholder: Option<&str>| FormField {
        id: name.to_string(),
        name: name.to_string(),
        kind,
        label: label.to_string(),
        value: kind.default_value(),
        options: options.iter().map(|o| o.to_string()).collect(),
        required,
        placeholder: placeholder.map(str::to_string),
    };

    vec![
        field(
            "fullName",
            FieldKind::Text,
            "Full Name",
            true,
            &[],
            Some("Enter your full name"),
        ),
        field(
            "email",
            FieldKind::Text,
            "Email Address",
            true,
            &[],
            Some("Enter your email address"),
        ),
        field(
            "phone",
            FieldKind::Text,
            "Phone Number",
            false,
            &[],
            Some("Enter your phone number"),
        ),
        field(
            "address",
            FieldKind::MultilineText,
            "Address",
            false,
            &[],
            Some("Enter your full address"),
        ),
        field(
            "country",
            FieldKind::Select,
            "Country",
            true,
            &[
                "United States",
                "Canada",
                "United Kingdom",
                "Australia",
                "Germany",
                "Other",
            ],
            None,
        ),
        field(
            "newsletter",
            FieldKind::Checkbox,
            "Subscribe to Newsletter",
            false,
            &[],
            None,
        ),
        field(
            "contactMethod",
            FieldKind::Radio,
            "Preferred Contact Method",
            false,
            &["Email", "Phone", "Mail"],
            None,
        ),
    ]
}
