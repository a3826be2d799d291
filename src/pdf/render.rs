//! Page previews of the original (unfilled) document

use crate::error::{Error, Result};
use crate::pdf::check_pdf_header;
use base64::Engine;
use pdfium_render::prelude::*;

/// Widest preview the viewer produces
pub const MAX_RENDER_WIDTH: u32 = 600;
/// Space reserved around the preview in the available width
pub const VIEWPORT_MARGIN: u32 = 100;

/// A rendered page preview
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Page number actually rendered (1-indexed, after clamping)
    pub page: u32,
    /// Total pages in the document
    pub page_count: u32,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Base64 encoded PNG
    pub data_base64: String,
    pub mime_type: String,
}

/// Target width for a viewport of `available` pixels: `min(max_width, available - margin)`, at least 1
pub fn render_width(available: u32, max_width: u32, margin: u32) -> u32 {
    available.saturating_sub(margin).min(max_width).max(1)
}

/// Bound a requested page number to `[1, page_count]`
pub fn clamp_page(requested: u32, page_count: u32) -> u32 {
    requested.clamp(1, page_count.max(1))
}

/// Get PDFium instance (creates new instance each time - PDFium is not thread-safe)
fn create_pdfium() -> Result<Pdfium> {
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                "/opt/pdfium/lib",
            ))
        })
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| Error::Pdfium {
            reason: format!("Failed to initialize PDFium: {}", e),
        })?;

    Ok(Pdfium::new(bindings))
}

/// Render one page at `width` pixels wide with annotations and form widgets drawn.
///
/// Out-of-range page numbers are clamped rather than rejected.
pub fn render_page(data: &[u8], page: u32, width: u32) -> Result<RenderedPage> {
    check_pdf_header(data)?;

    let pdfium = create_pdfium()?;
    let document = pdfium
        .load_pdf_from_byte_slice(data, None)
        .map_err(|e| Error::Pdfium {
            reason: format!("{}", e),
        })?;

    let pages = document.pages();
    let page_count = pages.len() as u32;
    if page_count == 0 {
        return Err(Error::PageOutOfBounds { page, total: 0 });
    }

    let page_num = clamp_page(page, page_count);
    let pdf_page = pages.get((page_num - 1) as u16).map_err(|e| Error::Pdfium {
        reason: format!("Failed to get page {}: {}", page_num, e),
    })?;

    let config = PdfRenderConfig::new()
        .set_target_width(width as i32)
        .render_form_data(true)
        .render_annotations(true);

    let bitmap = pdf_page
        .render_with_config(&config)
        .map_err(|e| Error::Pdfium {
            reason: format!("Failed to render page {}: {}", page_num, e),
        })?;

    let image = bitmap.as_image();
    let mut png_bytes = Vec::new();
    image
        .write_to(
            &mut std::io::Cursor::new(&mut png_bytes),
            image::ImageFormat::Png,
        )
        .map_err(|e| Error::Pdfium {
            reason: format!("Failed to encode page {} as PNG: {}", page_num, e),
        })?;

    Ok(RenderedPage {
        page: page_num,
        page_count,
        width: image.width(),
        height: image.height(),
        data_base64: base64::engine::general_purpose::STANDARD.encode(&png_bytes),
        mime_type: "image/png".to_string(),
    })
}
