//! In-memory PDF builders for form tests

#![allow(dead_code)]

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

const FF_MULTILINE: i64 = 1 << 12;
const FF_RADIO: i64 = 1 << 15;
const FF_PUSHBUTTON: i64 = 1 << 16;
const FF_COMBO: i64 = 1 << 17;
const FF_EDIT: i64 = 1 << 18;

/// Field to place in a generated AcroForm
#[derive(Debug, Clone)]
pub enum TestField {
    Text(&'static str),
    MultilineText(&'static str),
    CheckBox(&'static str),
    Radio(&'static str, &'static [&'static str]),
    Dropdown(&'static str, &'static [&'static str]),
    EditableDropdown(&'static str, &'static [&'static str]),
    ListBox(&'static str, &'static [&'static str]),
    PushButton(&'static str),
    Signature(&'static str),
    /// Non-terminal field holding text kids; names become `parent.kid`
    Group(&'static str, &'static [&'static str]),
}

fn literal(s: &str) -> Object {
    Object::String(s.as_bytes().to_vec(), StringFormat::Literal)
}

fn rect(index: usize) -> Object {
    let y = 700 - (index as i64 * 30);
    Object::Array(vec![
        Object::Integer(50),
        Object::Integer(y),
        Object::Integer(250),
        Object::Integer(y + 20),
    ])
}

fn empty_stream(doc: &mut Document) -> ObjectId {
    doc.add_object(Stream::new(Dictionary::new(), b"q Q".to_vec()))
}

fn appearance(doc: &mut Document, on_state: &str) -> Object {
    let on = empty_stream(doc);
    let off = empty_stream(doc);
    let mut normal = Dictionary::new();
    normal.set(on_state, Object::Reference(on));
    normal.set("Off", Object::Reference(off));
    Object::Dictionary(dictionary! { "N" => Object::Dictionary(normal) })
}

fn widget(page_id: ObjectId, index: usize) -> Dictionary {
    dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "Rect" => rect(index),
        "P" => Object::Reference(page_id),
    }
}

fn text_field(
    doc: &mut Document,
    page_id: ObjectId,
    index: usize,
    name: &str,
    ff: i64,
    widgets: &mut Vec<Object>,
) -> ObjectId {
    let mut dict = widget(page_id, index);
    dict.set("FT", Object::Name(b"Tx".to_vec()));
    dict.set("T", literal(name));
    dict.set("Ff", Object::Integer(ff));
    dict.set("DA", literal("/Helv 12 Tf 0 g"));
    let id = doc.add_object(Object::Dictionary(dict));
    widgets.push(Object::Reference(id));
    id
}

fn choice_field(
    doc: &mut Document,
    page_id: ObjectId,
    index: usize,
    name: &str,
    ff: i64,
    options: &[&str],
    widgets: &mut Vec<Object>,
) -> ObjectId {
    let mut dict = widget(page_id, index);
    dict.set("FT", Object::Name(b"Ch".to_vec()));
    dict.set("T", literal(name));
    dict.set("Ff", Object::Integer(ff));
    dict.set(
        "Opt",
        Object::Array(options.iter().map(|o| literal(o)).collect()),
    );
    let id = doc.add_object(Object::Dictionary(dict));
    widgets.push(Object::Reference(id));
    id
}

fn add_field(
    doc: &mut Document,
    page_id: ObjectId,
    index: usize,
    field: &TestField,
    widgets: &mut Vec<Object>,
) -> ObjectId {
    match field {
        TestField::Text(name) => text_field(doc, page_id, index, name, 0, widgets),
        TestField::MultilineText(name) => {
            text_field(doc, page_id, index, name, FF_MULTILINE, widgets)
        }
        TestField::CheckBox(name) => {
            let mut dict = widget(page_id, index);
            dict.set("FT", Object::Name(b"Btn".to_vec()));
            dict.set("T", literal(name));
            dict.set("V", Object::Name(b"Off".to_vec()));
            dict.set("AS", Object::Name(b"Off".to_vec()));
            dict.set("AP", appearance(doc, "Yes"));
            let id = doc.add_object(Object::Dictionary(dict));
            widgets.push(Object::Reference(id));
            id
        }
        TestField::Radio(name, options) => {
            let parent_id = doc.new_object_id();
            let mut kids = Vec::new();
            for (i, option) in options.iter().enumerate() {
                let mut dict = widget(page_id, index + i);
                dict.set("Parent", Object::Reference(parent_id));
                dict.set("AS", Object::Name(b"Off".to_vec()));
                dict.set("AP", appearance(doc, option));
                let kid = doc.add_object(Object::Dictionary(dict));
                kids.push(Object::Reference(kid));
                widgets.push(Object::Reference(kid));
            }
            doc.objects.insert(
                parent_id,
                Object::Dictionary(dictionary! {
                    "FT" => "Btn",
                    "T" => literal(name),
                    "Ff" => Object::Integer(FF_RADIO),
                    "V" => "Off",
                    "Kids" => Object::Array(kids),
                }),
            );
            parent_id
        }
        TestField::Dropdown(name, options) => {
            choice_field(doc, page_id, index, name, FF_COMBO, options, widgets)
        }
        TestField::EditableDropdown(name, options) => choice_field(
            doc,
            page_id,
            index,
            name,
            FF_COMBO | FF_EDIT,
            options,
            widgets,
        ),
        TestField::ListBox(name, options) => {
            choice_field(doc, page_id, index, name, 0, options, widgets)
        }
        TestField::PushButton(name) => {
            let mut dict = widget(page_id, index);
            dict.set("FT", Object::Name(b"Btn".to_vec()));
            dict.set("T", literal(name));
            dict.set("Ff", Object::Integer(FF_PUSHBUTTON));
            let id = doc.add_object(Object::Dictionary(dict));
            widgets.push(Object::Reference(id));
            id
        }
        TestField::Signature(name) => {
            let mut dict = widget(page_id, index);
            dict.set("FT", Object::Name(b"Sig".to_vec()));
            dict.set("T", literal(name));
            let id = doc.add_object(Object::Dictionary(dict));
            widgets.push(Object::Reference(id));
            id
        }
        TestField::Group(name, kids) => {
            let parent_id = doc.new_object_id();
            let mut kid_refs = Vec::new();
            for (i, kid_name) in kids.iter().enumerate() {
                let kid = text_field(doc, page_id, index + i, kid_name, 0, widgets);
                if let Ok(dict) = doc.get_object_mut(kid).and_then(Object::as_dict_mut) {
                    dict.set("Parent", Object::Reference(parent_id));
                }
                kid_refs.push(Object::Reference(kid));
            }
            doc.objects.insert(
                parent_id,
                Object::Dictionary(dictionary! {
                    "T" => literal(name),
                    "Kids" => Object::Array(kid_refs),
                }),
            );
            parent_id
        }
    }
}

fn finish(
    mut doc: Document,
    page_id: ObjectId,
    pages_id: ObjectId,
    acroform: Option<Dictionary>,
) -> Vec<u8> {
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => Object::Integer(1),
        }),
    );

    let mut catalog = dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    };
    if let Some(form) = acroform {
        let form_id = doc.add_object(Object::Dictionary(form));
        catalog.set("AcroForm", Object::Reference(form_id));
    }
    let catalog_id = doc.add_object(Object::Dictionary(catalog));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("failed to save test PDF");
    bytes
}

fn page(doc: &mut Document, pages_id: ObjectId) -> ObjectId {
    let content = doc.add_object(Stream::new(
        Dictionary::new(),
        b"BT /F1 12 Tf 50 750 Td (Form) Tj ET".to_vec(),
    ));
    doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => Object::Reference(pages_id),
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(612),
            Object::Integer(792),
        ],
        "Contents" => Object::Reference(content),
    })
}

/// One-page PDF whose AcroForm holds `fields` in order
pub fn build_form_pdf(fields: &[TestField]) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let page_id = page(&mut doc, pages_id);

    let mut field_refs = Vec::new();
    let mut widgets = Vec::new();
    let mut index = 0;
    for field in fields {
        let id = add_field(&mut doc, page_id, index, field, &mut widgets);
        field_refs.push(Object::Reference(id));
        index += match field {
            TestField::Radio(_, options) => options.len(),
            TestField::Group(_, kids) => kids.len(),
            _ => 1,
        };
    }

    if let Ok(page) = doc.get_object_mut(page_id).and_then(Object::as_dict_mut) {
        page.set("Annots", Object::Array(widgets));
    }

    let form = dictionary! {
        "Fields" => Object::Array(field_refs),
        "DA" => literal("/Helv 0 Tf 0 g"),
    };
    finish(doc, page_id, pages_id, Some(form))
}

/// One-page PDF without an AcroForm
pub fn build_plain_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let page_id = page(&mut doc, pages_id);
    finish(doc, page_id, pages_id, None)
}

/// `contract.pdf` from the usage scenario: `clientName` text + `agree` checkbox
pub fn build_contract_pdf() -> Vec<u8> {
    build_form_pdf(&[TestField::Text("clientName"), TestField::CheckBox("agree")])
}
