//! AcroForm access over the lopdf object model
//!
//! This is the only place that touches the interactive form dictionary. It
//! loads a document, enumerates its terminal fields in native order, writes
//! values into named fields, and serializes the result. Field kinds come out
//! as a [`NativeFieldKind`] derived from `/FT` and `/Ff`.

use crate::error::{Error, Result};
use crate::pdf::check_pdf_header;
use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat};
use std::collections::HashSet;

const FF_MULTILINE: i64 = 1 << 12;
const FF_RADIO: i64 = 1 << 15;
const FF_PUSHBUTTON: i64 = 1 << 16;
const FF_COMBO: i64 = 1 << 17;
const FF_EDIT: i64 = 1 << 18;

/// Guards against reference cycles in malformed field trees
const MAX_FIELD_DEPTH: usize = 32;

const OFF_STATE: &[u8] = b"Off";
const DEFAULT_ON_STATE: &str = "Yes";

/// Control kind of a terminal AcroForm field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeFieldKind {
    Text,
    CheckBox,
    RadioGroup,
    Dropdown,
    OptionList,
    Button,
    Signature,
    Unknown,
}

impl NativeFieldKind {
    fn classify(field_type: Option<&[u8]>, flags: i64) -> Self {
        match field_type {
            Some(b"Tx") => NativeFieldKind::Text,
            Some(b"Btn") if flags & FF_PUSHBUTTON != 0 => NativeFieldKind::Button,
            Some(b"Btn") if flags & FF_RADIO != 0 => NativeFieldKind::RadioGroup,
            Some(b"Btn") => NativeFieldKind::CheckBox,
            Some(b"Ch") if flags & FF_COMBO != 0 => NativeFieldKind::Dropdown,
            Some(b"Ch") => NativeFieldKind::OptionList,
            Some(b"Sig") => NativeFieldKind::Signature,
            _ => NativeFieldKind::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NativeFieldKind::Text => "text",
            NativeFieldKind::CheckBox => "checkbox",
            NativeFieldKind::RadioGroup => "radio_group",
            NativeFieldKind::Dropdown => "dropdown",
            NativeFieldKind::OptionList => "option_list",
            NativeFieldKind::Button => "button",
            NativeFieldKind::Signature => "signature",
            NativeFieldKind::Unknown => "unknown",
        }
    }
}

/// Selectable choice of a dropdown, list, or radio group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeOption {
    /// Value stored in `/V` when selected
    pub export: String,
    /// Text shown to the user
    pub display: String,
}

/// Value currently stored in a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeValue {
    Empty,
    Text(String),
    Checked(bool),
    Selected(String),
}

/// Terminal field of the document's AcroForm
#[derive(Debug, Clone)]
pub struct NativeField {
    /// Fully-qualified name (`parent.child`)
    pub name: String,
    pub kind: NativeFieldKind,
    pub multiline: bool,
    /// Dropdown accepts values outside its option list
    pub editable: bool,
    pub options: Vec<NativeOption>,
    pub value: NativeValue,
    id: ObjectId,
    widgets: Vec<ObjectId>,
}

/// Loaded document plus its enumerated form fields
pub struct AcroForm {
    doc: Document,
    fields: Vec<NativeField>,
}

impl AcroForm {
    /// Parse PDF bytes and enumerate the form. A document without an
    /// AcroForm loads fine and has no fields.
    pub fn load(data: &[u8]) -> Result<Self> {
        check_pdf_header(data)?;

        let doc = Document::load_mem(data).map_err(|e| Error::InvalidPdf {
            reason: e.to_string(),
        })?;
        let fields = collect_fields(&doc);

        tracing::debug!(fields = fields.len(), "Enumerated AcroForm fields");

        Ok(Self { doc, fields })
    }

    /// Fields in native order
    pub fn fields(&self) -> &[NativeField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&NativeField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Set the content of a text field
    pub fn set_text(&mut self, name: &str, value: &str) -> Result<()> {
        let index = self.lookup(name, NativeFieldKind::Text)?;
        let id = self.fields[index].id;

        self.field_dict_mut(id)?.set("V", encode_text(value));
        self.mark_needs_appearances()?;
        self.fields[index].value = NativeValue::Text(value.to_string());
        Ok(())
    }

    /// Check or uncheck a checkbox
    pub fn set_checked(&mut self, name: &str, checked: bool) -> Result<()> {
        let index = self.lookup(name, NativeFieldKind::CheckBox)?;
        let field = &self.fields[index];
        let id = field.id;

        let states: Vec<(ObjectId, String)> = field
            .widgets
            .iter()
            .map(|w| {
                let on = widget_on_state(&self.doc, *w)
                    .unwrap_or_else(|| DEFAULT_ON_STATE.to_string());
                (*w, on)
            })
            .collect();
        let field_state = match (checked, states.first()) {
            (true, Some((_, on))) => on.clone(),
            (true, None) => DEFAULT_ON_STATE.to_string(),
            (false, _) => "Off".to_string(),
        };

        self.field_dict_mut(id)?
            .set("V", Object::Name(field_state.into_bytes()));
        for (widget, on) in states {
            let state = if checked { on } else { "Off".to_string() };
            self.field_dict_mut(widget)?
                .set("AS", Object::Name(state.into_bytes()));
        }

        self.fields[index].value = NativeValue::Checked(checked);
        Ok(())
    }

    /// Select one option of a radio group
    pub fn select_radio(&mut self, name: &str, option: &str) -> Result<()> {
        let index = self.lookup(name, NativeFieldKind::RadioGroup)?;
        let field = &self.fields[index];

        let export = field
            .options
            .iter()
            .find(|o| o.export == option || o.display == option)
            .map(|o| o.export.clone())
            .ok_or_else(|| Error::OptionNotFound {
                name: name.to_string(),
                option: option.to_string(),
            })?;

        let id = field.id;
        let states: Vec<(ObjectId, Option<String>)> = field
            .widgets
            .iter()
            .map(|w| (*w, widget_on_state(&self.doc, *w)))
            .collect();

        self.field_dict_mut(id)?
            .set("V", Object::Name(export.clone().into_bytes()));
        for (widget, on) in states {
            let state = match on {
                Some(on) if on == export => on,
                _ => "Off".to_string(),
            };
            self.field_dict_mut(widget)?
                .set("AS", Object::Name(state.into_bytes()));
        }

        self.fields[index].value = NativeValue::Selected(export);
        Ok(())
    }

    /// Select one option of a dropdown
    pub fn select_option(&mut self, name: &str, option: &str) -> Result<()> {
        let index = self.lookup(name, NativeFieldKind::Dropdown)?;
        let field = &self.fields[index];
        let id = field.id;

        let export = match field
            .options
            .iter()
            .find(|o| o.display == option || o.export == option)
        {
            Some(o) => o.export.clone(),
            None if field.editable => option.to_string(),
            None => {
                return Err(Error::OptionNotFound {
                    name: name.to_string(),
                    option: option.to_string(),
                })
            }
        };

        let dict = self.field_dict_mut(id)?;
        dict.set("V", encode_text(&export));
        // Stale selection indices would contradict the new /V
        dict.remove(b"I");
        self.mark_needs_appearances()?;

        self.fields[index].value = NativeValue::Selected(export);
        Ok(())
    }

    /// Serialize the document, including any values written so far
    pub fn save_to_bytes(mut self) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.doc.save_to(&mut output).map_err(|e| Error::Pdf {
            reason: format!("Failed to save PDF: {}", e),
        })?;
        Ok(output)
    }

    fn lookup(&self, name: &str, expected: NativeFieldKind) -> Result<usize> {
        let index = self
            .fields
            .iter()
            .position(|f| f.name == name)
            .ok_or_else(|| Error::FieldNotFound {
                name: name.to_string(),
            })?;

        let actual = self.fields[index].kind;
        if actual != expected {
            return Err(Error::FieldKindMismatch {
                name: name.to_string(),
                expected: expected.as_str().to_string(),
                actual: actual.as_str().to_string(),
            });
        }

        Ok(index)
    }

    fn field_dict_mut(&mut self, id: ObjectId) -> Result<&mut Dictionary> {
        Ok(self.doc.get_object_mut(id)?.as_dict_mut()?)
    }

    /// Ask viewers to regenerate appearance streams for changed values
    fn mark_needs_appearances(&mut self) -> Result<()> {
        let form_ref = {
            let catalog = self.doc.catalog()?;
            match catalog.get(b"AcroForm") {
                Ok(Object::Reference(id)) => Some(*id),
                Ok(_) => None,
                Err(_) => return Ok(()),
            }
        };

        let form = match form_ref {
            Some(id) => self.doc.get_object_mut(id)?.as_dict_mut()?,
            None => self.doc.catalog_mut()?.get_mut(b"AcroForm")?.as_dict_mut()?,
        };
        form.set("NeedAppearances", Object::Boolean(true));
        Ok(())
    }
}

/// Inheritable attributes passed down the field tree
#[derive(Debug, Clone, Default)]
struct Inherited {
    name: Option<String>,
    field_type: Option<Vec<u8>>,
    flags: i64,
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Object> {
    let mut current = object;
    for _ in 0..MAX_FIELD_DEPTH {
        match current {
            Object::Reference(id) => current = doc.get_object(*id).ok()?,
            other => return Some(other),
        }
    }
    None
}

fn get<'a>(doc: &'a Document, dict: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
    dict.get(key).ok().and_then(|o| resolve(doc, o))
}

fn collect_fields(doc: &Document) -> Vec<NativeField> {
    let Some(form) = doc
        .catalog()
        .ok()
        .and_then(|catalog| get(doc, catalog, b"AcroForm"))
        .and_then(|o| o.as_dict().ok())
    else {
        return Vec::new();
    };

    let Some(Object::Array(roots)) = get(doc, form, b"Fields") else {
        return Vec::new();
    };

    let mut visited = HashSet::new();
    let mut fields = Vec::new();
    for root in roots {
        match root {
            Object::Reference(id) => walk(
                doc,
                *id,
                &Inherited::default(),
                &mut visited,
                &mut fields,
                0,
            ),
            _ => tracing::debug!("Skipping inline AcroForm field"),
        }
    }
    fields
}

fn walk(
    doc: &Document,
    id: ObjectId,
    parent: &Inherited,
    visited: &mut HashSet<ObjectId>,
    out: &mut Vec<NativeField>,
    depth: usize,
) {
    if depth > MAX_FIELD_DEPTH || !visited.insert(id) {
        return;
    }
    let Ok(dict) = doc.get_dictionary(id) else {
        return;
    };

    let partial = get(doc, dict, b"T").and_then(decode_text);
    let name = match (&parent.name, partial) {
        (Some(prefix), Some(partial)) => Some(format!("{}.{}", prefix, partial)),
        (None, Some(partial)) => Some(partial),
        (prefix, None) => prefix.clone(),
    };
    let field_type = match get(doc, dict, b"FT") {
        Some(Object::Name(ft)) => Some(ft.clone()),
        _ => parent.field_type.clone(),
    };
    let flags = match get(doc, dict, b"Ff") {
        Some(Object::Integer(ff)) => *ff,
        _ => parent.flags,
    };

    let kids: Vec<ObjectId> = match get(doc, dict, b"Kids") {
        Some(Object::Array(kids)) => kids.iter().filter_map(|k| k.as_reference().ok()).collect(),
        _ => Vec::new(),
    };
    let child_fields: Vec<ObjectId> = kids
        .iter()
        .copied()
        .filter(|k| {
            doc.get_dictionary(*k)
                .map(|d| d.has(b"T"))
                .unwrap_or(false)
        })
        .collect();

    if !child_fields.is_empty() {
        let inherited = Inherited {
            name,
            field_type,
            flags,
        };
        for kid in child_fields {
            walk(doc, kid, &inherited, visited, out, depth + 1);
        }
        return;
    }

    let Some(name) = name else {
        tracing::debug!(?id, "Skipping unnamed AcroForm field");
        return;
    };

    let kind = NativeFieldKind::classify(field_type.as_deref(), flags);
    let widgets = if kids.is_empty() { vec![id] } else { kids };
    let options = match kind {
        NativeFieldKind::Dropdown | NativeFieldKind::OptionList => choice_options(doc, dict),
        NativeFieldKind::RadioGroup => widget_options(doc, &widgets),
        _ => Vec::new(),
    };
    let value = read_value(doc, dict, kind, &widgets);

    out.push(NativeField {
        name,
        kind,
        multiline: kind == NativeFieldKind::Text && flags & FF_MULTILINE != 0,
        editable: kind == NativeFieldKind::Dropdown && flags & FF_EDIT != 0,
        options,
        value,
        id,
        widgets,
    });
}

fn choice_options(doc: &Document, dict: &Dictionary) -> Vec<NativeOption> {
    let Some(Object::Array(items)) = get(doc, dict, b"Opt") else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match resolve(doc, item)? {
            Object::Array(pair) if pair.len() == 2 => {
                let export = resolve(doc, &pair[0]).and_then(decode_text)?;
                let display = resolve(doc, &pair[1]).and_then(decode_text)?;
                Some(NativeOption { export, display })
            }
            other => decode_text(other).map(|text| NativeOption {
                export: text.clone(),
                display: text,
            }),
        })
        .collect()
}

/// Radio options are the distinct "on" appearance states of the kids
fn widget_options(doc: &Document, widgets: &[ObjectId]) -> Vec<NativeOption> {
    let mut options: Vec<NativeOption> = Vec::new();
    for state in widgets.iter().filter_map(|w| widget_on_state(doc, *w)) {
        if !options.iter().any(|o| o.export == state) {
            options.push(NativeOption {
                export: state.clone(),
                display: state,
            });
        }
    }
    options
}

fn widget_on_state(doc: &Document, widget: ObjectId) -> Option<String> {
    let dict = doc.get_dictionary(widget).ok()?;
    let appearance = get(doc, dict, b"AP")?.as_dict().ok()?;
    let normal = get(doc, appearance, b"N")?.as_dict().ok()?;

    normal
        .iter()
        .map(|(key, _)| key)
        .find(|key| key.as_slice() != OFF_STATE)
        .map(|key| String::from_utf8_lossy(key).into_owned())
}

fn read_value(
    doc: &Document,
    dict: &Dictionary,
    kind: NativeFieldKind,
    widgets: &[ObjectId],
) -> NativeValue {
    let stored = get(doc, dict, b"V");
    match kind {
        NativeFieldKind::Text => stored
            .and_then(decode_text)
            .map(NativeValue::Text)
            .unwrap_or(NativeValue::Empty),
        NativeFieldKind::CheckBox => {
            let state = stored.or_else(|| {
                widgets
                    .first()
                    .and_then(|w| doc.get_dictionary(*w).ok())
                    .and_then(|w| get(doc, w, b"AS"))
            });
            NativeValue::Checked(
                matches!(state, Some(Object::Name(n)) if n.as_slice() != OFF_STATE),
            )
        }
        NativeFieldKind::RadioGroup => match stored {
            Some(Object::Name(n)) if n.as_slice() != OFF_STATE => {
                NativeValue::Selected(String::from_utf8_lossy(n).into_owned())
            }
            _ => NativeValue::Empty,
        },
        NativeFieldKind::Dropdown | NativeFieldKind::OptionList => match stored {
            Some(Object::Array(values)) => values
                .first()
                .and_then(|v| resolve(doc, v))
                .and_then(decode_text)
                .map(NativeValue::Selected)
                .unwrap_or(NativeValue::Empty),
            Some(other) => decode_text(other)
                .map(NativeValue::Selected)
                .unwrap_or(NativeValue::Empty),
            None => NativeValue::Empty,
        },
        _ => NativeValue::Empty,
    }
}

/// Decode a PDF text string (UTF-16BE with BOM, UTF-8 with BOM, or PDFDocEncoding)
fn decode_text(object: &Object) -> Option<String> {
    let bytes = match object {
        Object::String(bytes, _) => bytes.as_slice(),
        Object::Name(name) => return Some(String::from_utf8_lossy(name).into_owned()),
        _ => return None,
    };

    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return Some(String::from_utf16_lossy(&units));
    }
    if let Some(utf8) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return Some(String::from_utf8_lossy(utf8).into_owned());
    }
    // PDFDocEncoding matches Latin-1 for everything a form value normally holds
    Some(bytes.iter().map(|&b| b as char).collect())
}

fn encode_text(value: &str) -> Object {
    if value.is_ascii() {
        return Object::String(value.as_bytes().to_vec(), StringFormat::Literal);
    }

    let mut bytes = vec![0xFE, 0xFF];
    for unit in value.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::test_support::{
        build_contract_pdf, build_form_pdf, build_plain_pdf, TestField,
    };
    use pretty_assertions::assert_eq;

    fn names(form: &AcroForm) -> Vec<&str> {
        form.fields().iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_load_rejects_non_pdf() {
        let result = AcroForm::load(b"not a pdf");
        assert!(matches!(result, Err(Error::InvalidPdf { .. })));
    }

    #[test]
    fn test_load_rejects_truncated_pdf() {
        let result = AcroForm::load(b"%PDF-1.7\n1 0 obj\n<<");
        assert!(matches!(result, Err(Error::InvalidPdf { .. })));
    }

    #[test]
    fn test_plain_pdf_has_no_fields() {
        let form = AcroForm::load(&build_plain_pdf()).unwrap();
        assert!(form.fields().is_empty());
        assert_eq!(form.page_count(), 1);
    }

    #[test]
    fn test_classifies_every_kind_in_native_order() {
        let data = build_form_pdf(&[
            TestField::Text("name"),
            TestField::MultilineText("notes"),
            TestField::CheckBox("agree"),
            TestField::Radio("method", &["Email", "Phone"]),
            TestField::Dropdown("country", &["Canada", "Mexico"]),
            TestField::ListBox("colors", &["Red"]),
            TestField::PushButton("submit"),
            TestField::Signature("sig"),
        ]);
        let form = AcroForm::load(&data).unwrap();

        let kinds: Vec<NativeFieldKind> = form.fields().iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![
                NativeFieldKind::Text,
                NativeFieldKind::Text,
                NativeFieldKind::CheckBox,
                NativeFieldKind::RadioGroup,
                NativeFieldKind::Dropdown,
                NativeFieldKind::OptionList,
                NativeFieldKind::Button,
                NativeFieldKind::Signature,
            ]
        );
        assert_eq!(
            names(&form),
            vec!["name", "notes", "agree", "method", "country", "colors", "submit", "sig"]
        );
        assert!(form.field("notes").unwrap().multiline);
        assert!(!form.field("name").unwrap().multiline);
    }

    #[test]
    fn test_hierarchical_names_are_qualified() {
        let data = build_form_pdf(&[TestField::Group("applicant", &["first", "last"])]);
        let form = AcroForm::load(&data).unwrap();
        assert_eq!(names(&form), vec!["applicant.first", "applicant.last"]);
        assert_eq!(form.fields()[0].kind, NativeFieldKind::Text);
    }

    #[test]
    fn test_options_for_choice_and_radio() {
        let data = build_form_pdf(&[
            TestField::Radio("method", &["Email", "Phone", "Email"]),
            TestField::Dropdown("country", &["Canada", "Mexico"]),
        ]);
        let form = AcroForm::load(&data).unwrap();

        let radio: Vec<&str> = form
            .field("method")
            .unwrap()
            .options
            .iter()
            .map(|o| o.export.as_str())
            .collect();
        assert_eq!(radio, vec!["Email", "Phone"]);

        let dropdown: Vec<&str> = form
            .field("country")
            .unwrap()
            .options
            .iter()
            .map(|o| o.display.as_str())
            .collect();
        assert_eq!(dropdown, vec!["Canada", "Mexico"]);
    }

    #[test]
    fn test_set_text_round_trip() {
        let mut form = AcroForm::load(&build_contract_pdf()).unwrap();
        form.set_text("clientName", "Acme Corp").unwrap();
        let bytes = form.save_to_bytes().unwrap();

        let reloaded = AcroForm::load(&bytes).unwrap();
        assert_eq!(
            reloaded.field("clientName").unwrap().value,
            NativeValue::Text("Acme Corp".to_string())
        );
    }

    #[test]
    fn test_set_text_unicode_round_trip() {
        let mut form = AcroForm::load(&build_contract_pdf()).unwrap();
        form.set_text("clientName", "Zoë Ångström").unwrap();
        let reloaded = AcroForm::load(&form.save_to_bytes().unwrap()).unwrap();
        assert_eq!(
            reloaded.field("clientName").unwrap().value,
            NativeValue::Text("Zoë Ångström".to_string())
        );
    }

    #[test]
    fn test_set_checked_updates_value_and_appearance_state() {
        let mut form = AcroForm::load(&build_contract_pdf()).unwrap();
        assert_eq!(form.field("agree").unwrap().value, NativeValue::Checked(false));

        form.set_checked("agree", true).unwrap();
        let reloaded = AcroForm::load(&form.save_to_bytes().unwrap()).unwrap();
        let agree = reloaded.field("agree").unwrap();
        assert_eq!(agree.value, NativeValue::Checked(true));

        let widget = reloaded.doc.get_dictionary(agree.widgets[0]).unwrap();
        assert_eq!(widget.get(b"AS").unwrap(), &Object::Name(b"Yes".to_vec()));
    }

    #[test]
    fn test_select_radio_sets_matching_kid() {
        let data = build_form_pdf(&[TestField::Radio("method", &["Email", "Phone"])]);
        let mut form = AcroForm::load(&data).unwrap();
        form.select_radio("method", "Phone").unwrap();

        let reloaded = AcroForm::load(&form.save_to_bytes().unwrap()).unwrap();
        let method = reloaded.field("method").unwrap();
        assert_eq!(method.value, NativeValue::Selected("Phone".to_string()));

        let states: Vec<Object> = method
            .widgets
            .iter()
            .map(|w| {
                let widget = reloaded.doc.get_dictionary(*w).unwrap();
                widget.get(b"AS").unwrap().clone()
            })
            .collect();
        assert_eq!(
            states,
            vec![Object::Name(b"Off".to_vec()), Object::Name(b"Phone".to_vec())]
        );
    }

    #[test]
    fn test_select_radio_unknown_option_fails() {
        let data = build_form_pdf(&[TestField::Radio("method", &["Email", "Phone"])]);
        let mut form = AcroForm::load(&data).unwrap();
        let result = form.select_radio("method", "Pigeon");
        assert!(matches!(result, Err(Error::OptionNotFound { .. })));
    }

    #[test]
    fn test_select_option_respects_edit_flag() {
        let data = build_form_pdf(&[
            TestField::Dropdown("country", &["Canada", "Mexico"]),
            TestField::EditableDropdown("city", &["Lima"]),
        ]);
        let mut form = AcroForm::load(&data).unwrap();

        form.select_option("country", "Mexico").unwrap();
        assert!(matches!(
            form.select_option("country", "Atlantis"),
            Err(Error::OptionNotFound { .. })
        ));
        form.select_option("city", "Quito").unwrap();

        let reloaded = AcroForm::load(&form.save_to_bytes().unwrap()).unwrap();
        assert_eq!(
            reloaded.field("country").unwrap().value,
            NativeValue::Selected("Mexico".to_string())
        );
        assert_eq!(
            reloaded.field("city").unwrap().value,
            NativeValue::Selected("Quito".to_string())
        );
    }

    #[test]
    fn test_write_with_wrong_kind_or_name_fails() {
        let mut form = AcroForm::load(&build_contract_pdf()).unwrap();
        assert!(matches!(
            form.set_text("agree", "yes"),
            Err(Error::FieldKindMismatch { .. })
        ));
        assert!(matches!(
            form.set_checked("clientName", true),
            Err(Error::FieldKindMismatch { .. })
        ));
        assert!(matches!(
            form.set_text("client_name", "x"),
            Err(Error::FieldNotFound { .. })
        ));
    }

    #[test]
    fn test_text_write_sets_need_appearances() {
        let mut form = AcroForm::load(&build_contract_pdf()).unwrap();
        form.set_text("clientName", "Acme").unwrap();
        let reloaded = AcroForm::load(&form.save_to_bytes().unwrap()).unwrap();

        let catalog = reloaded.doc.catalog().unwrap();
        let acroform = get(&reloaded.doc, catalog, b"AcroForm")
            .and_then(|o| o.as_dict().ok())
            .unwrap();
        assert_eq!(
            acroform.get(b"NeedAppearances").unwrap(),
            &Object::Boolean(true)
        );
    }

    #[test]
    fn test_decode_text_encodings() {
        let utf16 = Object::String(
            vec![0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69],
            StringFormat::Hexadecimal,
        );
        assert_eq!(decode_text(&utf16), Some("Hi".to_string()));

        let latin1 = Object::String(vec![b'c', b'a', b'f', 0xE9], StringFormat::Literal);
        assert_eq!(decode_text(&latin1), Some("café".to_string()));

        assert_eq!(decode_text(&Object::Integer(3)), None);
    }
}
