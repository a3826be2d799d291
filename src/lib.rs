//! PDF Form MCP Server Library
//!
//! This crate provides MCP tools for filling PDF forms:
//! - `upload_pdfs`: Upload PDFs and detect their AcroForm fields
//! - `get_fields` / `set_field_value`: Inspect and edit field values
//! - `export_filled`: Write the values into a filled copy of the original
//! - `render_page`: Preview a page of the original document

pub mod config;
pub mod error;
pub mod model;
pub mod pdf;
pub mod server;
pub mod session;

pub use config::ServerConfig;
pub use error::{Error, Result};
pub use model::{FieldKind, FieldValue, FormField, PreviewHandle, UploadedDocument};
pub use server::{run_server, run_server_with_config, PdfFormServer};
pub use session::{Session, UploadCandidate};
