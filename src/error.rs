//! Error types for PDF Form MCP Server

use thiserror::Error;

/// Result type alias for PDF Form MCP Server
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for PDF Form MCP Server
#[derive(Error, Debug)]
pub enum Error {
    /// PDF file not found
    #[error("PDF not found: {path}")]
    PdfNotFound { path: String },

    /// Invalid PDF file
    #[error("Invalid PDF file: {reason}")]
    InvalidPdf { reason: String },

    /// Upload batch contained no PDF-typed file
    #[error("No PDF files in upload batch ({rejected} rejected)")]
    NoPdfFiles { rejected: usize },

    /// Upload larger than the configured limit
    #[error("Upload too large: {size} bytes (max: {max_size} bytes)")]
    UploadTooLarge { size: u64, max_size: u64 },

    /// No document with this id in the session
    #[error("Document not found: {id}")]
    DocumentNotFound { id: String },

    /// Operation needs a selected document
    #[error("No document selected")]
    NoDocumentSelected,

    /// Field id or field name not present
    #[error("Form field not found: {name}")]
    FieldNotFound { name: String },

    /// Value does not fit the field kind
    #[error("Invalid value for field {field}: expected {expected}")]
    InvalidFieldValue { field: String, expected: String },

    /// Native field has another control kind than requested
    #[error("Field {name} is a {actual} field, not a {expected} field")]
    FieldKindMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    /// Option value is not one of the control's defined options
    #[error("Option {option:?} not available for field {name}")]
    OptionNotFound { name: String, option: String },

    /// Page out of bounds
    #[error("Page {page} out of bounds (total: {total})")]
    PageOutOfBounds { page: u32, total: u32 },

    /// PDF object model error (lopdf)
    #[error("PDF error: {reason}")]
    Pdf { reason: String },

    /// PDFium error
    #[error("PDFium error: {reason}")]
    Pdfium { reason: String },

    /// Base64 decode error
    #[error("Invalid base64 data: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Path access denied (outside allowed resource directories)
    #[error("Path access denied: {path}")]
    PathAccessDenied { path: String },
}

impl From<lopdf::Error> for Error {
    fn from(e: lopdf::Error) -> Self {
        Error::Pdf {
            reason: e.to_string(),
        }
    }
}

impl Error {
    /// Return a sanitized error message safe to send to clients.
    /// Internal details (paths, library errors, file sizes) are omitted.
    /// Full details should be logged via tracing before calling this.
    pub fn client_message(&self) -> String {
        match self {
            Error::PdfNotFound { .. } => "PDF not found".to_string(),
            Error::InvalidPdf { .. } => "Invalid PDF file".to_string(),
            Error::NoPdfFiles { .. } => "Please upload PDF files only".to_string(),
            Error::UploadTooLarge { max_size, .. } => {
                format!("Upload exceeds maximum size of {} bytes", max_size)
            }
            Error::DocumentNotFound { id } => format!("Document not found: {}", id),
            Error::NoDocumentSelected => "No document selected".to_string(),
            Error::FieldNotFound { name } => format!("Form field not found: {}", name),
            Error::InvalidFieldValue { field, expected } => {
                format!("Invalid value for field {}: expected {}", field, expected)
            }
            Error::FieldKindMismatch { name, .. } => {
                format!("Field {} has a different type", name)
            }
            Error::OptionNotFound { name, option } => {
                format!("Option {:?} not available for field {}", option, name)
            }
            Error::PageOutOfBounds { page, total } => {
                format!("Page {} out of bounds (total: {})", page, total)
            }
            Error::Pdf { .. } => "PDF processing error".to_string(),
            Error::Pdfium { .. } => "PDF rendering error".to_string(),
            Error::Base64Decode(_) => "Invalid base64 data".to_string(),
            Error::Io(_) => "I/O error".to_string(),
            Error::Serialization(_) => "Serialization error".to_string(),
            Error::PathAccessDenied { .. } => "Access denied".to_string(),
        }
    }
}
