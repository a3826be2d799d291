//! PDF processing layer
//!
//! Form access (detection and filling) goes through the lopdf object model;
//! page previews are rendered with PDFium.

mod acroform;
mod detect;
mod fill;
mod render;

#[cfg(test)]
#[path = "../../tests/common/mod.rs"]
pub(crate) mod test_support;

pub use acroform::{AcroForm, NativeField, NativeFieldKind, NativeOption, NativeValue};
pub use detect::{
    detect_fields, detect_form, fallback_fields, label_from_name, DetectedForm,
    FALLBACK_FIELD_COUNT,
};
pub use fill::{
    base_file_name, fill_form_fields, filled_file_name, FillFormResultInfo, FilledPdf, SkippedField,
};
pub use render::{
    clamp_page, render_page, render_width, RenderedPage, MAX_RENDER_WIDTH, VIEWPORT_MARGIN,
};

use crate::error::{Error, Result};

/// Reject buffers that do not start with a PDF header
pub fn check_pdf_header(data: &[u8]) -> Result<()> {
    if data.len() < 4 || &data[0..4] != b"%PDF" {
        return Err(Error::InvalidPdf {
            reason: "Not a valid PDF file".to_string(),
        });
    }
    Ok(())
}
