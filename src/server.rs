//! MCP Server implementation using rmcp

use crate::config::ServerConfig;
use crate::model::{FieldValue, FormField, PreviewHandle, UploadedDocument};
use crate::pdf::render_width;
use crate::session::{export_document, Session, UploadCandidate};
use anyhow::Result;
use base64::Engine;
use parking_lot::Mutex;
use rmcp::{
    handler::server::tool::ToolRouter, handler::server::wrapper::Parameters, model::*,
    schemars::JsonSchema, service::RequestContext, tool, tool_handler, tool_router, RoleServer,
    ServerHandler, ServiceExt,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// PDF Form MCP Server
#[derive(Clone)]
pub struct PdfFormServer {
    /// Held only for short reads and swaps; parsing, filling and rendering run on snapshots
    session: Arc<Mutex<Session>>,
    tool_router: ToolRouter<Self>,
    /// Server configuration
    config: Arc<ServerConfig>,
}

// ============================================================================
// Shared response types
// ============================================================================

#[derive(Debug, Serialize, JsonSchema)]
pub struct DocumentSummary {
    pub id: String,
    pub file_name: String,
    /// Size in bytes
    pub size: u64,
    /// Upload time (RFC 3339)
    pub uploaded_at: String,
    /// Resource URI of the document
    pub preview_uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    pub field_count: usize,
    pub completion_percentage: u8,
    pub selected: bool,
}

impl DocumentSummary {
    fn new(document: &UploadedDocument, selected: bool) -> Self {
        Self {
            id: document.id.clone(),
            file_name: document.file_name.clone(),
            size: document.size,
            uploaded_at: document.uploaded_at.to_rfc3339(),
            preview_uri: document.preview.uri.clone(),
            page_count: document.preview.page_count,
            field_count: document.fields.len(),
            completion_percentage: document.completion_percentage(),
            selected,
        }
    }
}

// ============================================================================
// Request/Response types for upload_pdfs
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UploadFileParam {
    /// Path to a PDF on disk
    #[serde(default)]
    pub path: Option<String>,
    /// Base64 encoded PDF content
    #[serde(default)]
    pub base64: Option<String>,
    /// File name for base64 uploads
    #[serde(default)]
    pub name: Option<String>,
    /// Declared MIME type (inferred from the file name when omitted)
    #[serde(default)]
    pub content_type: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UploadPdfsParams {
    /// Files to upload, each {"path": "..."} or {"base64": "...", "name": "..."}
    pub files: Vec<UploadFileParam>,
    /// Content type applied to files that do not declare one
    #[serde(default)]
    pub content_type: Option<String>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct UploadFileError {
    pub file_name: String,
    pub error: String,
}

#[derive(Debug, Default, Serialize, JsonSchema)]
pub struct UploadPdfsResult {
    pub documents: Vec<DocumentSummary>,
    /// Per-file failures; the rest of the batch was still processed
    pub errors: Vec<UploadFileError>,
    /// Progress values reported while the batch ran
    pub progress: Vec<u8>,
    /// PDF files in the batch after filtering by content type
    pub batch_size: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Files dropped because they were not PDFs
    pub rejected: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_document_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// Request/Response types for list_documents / select_document
// ============================================================================

#[derive(Debug, Serialize, JsonSchema)]
pub struct ListDocumentsResult {
    pub documents: Vec<DocumentSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_document_id: Option<String>,
    /// Completion of the selected document (0 when none is selected)
    pub completion_percentage: u8,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SelectDocumentParams {
    pub document_id: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct SelectDocumentResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<DocumentSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// Request/Response types for get_fields / set_field_value
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetFieldsParams {
    /// Document to read (default: the selected document)
    #[serde(default)]
    pub document_id: Option<String>,
}

#[derive(Debug, Default, Serialize, JsonSchema)]
pub struct GetFieldsResult {
    pub document_id: String,
    pub file_name: String,
    pub fields: Vec<FormField>,
    pub completion_percentage: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SetFieldValueParams {
    pub document_id: String,
    pub field_id: String,
    /// String for text/select/radio fields, boolean for checkboxes
    pub value: FieldValue,
}

#[derive(Debug, Default, Serialize, JsonSchema)]
pub struct SetFieldValueResult {
    pub document_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<FormField>,
    pub completion_percentage: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// Request/Response types for export_filled
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExportFilledParams {
    /// Document to export (default: the selected document)
    #[serde(default)]
    pub document_id: Option<String>,
    /// Directory to write into (default: the configured download directory)
    #[serde(default)]
    pub output_dir: Option<String>,
    /// Also return the filled PDF as base64
    #[serde(default)]
    pub include_base64: bool,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct SkippedFieldInfo {
    /// Field name
    pub name: String,
    /// Reason the field was skipped
    pub reason: String,
}

#[derive(Debug, Default, Serialize, JsonSchema)]
pub struct ExportFilledResult {
    pub document_id: String,
    /// `filled-<name>-<unix ms>.pdf`
    pub file_name: String,
    /// Where the file was written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
    pub size: usize,
    /// Number of fields successfully filled
    pub fields_filled: u32,
    /// Fields that could not be filled
    pub fields_skipped: Vec<SkippedFieldInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// Request/Response types for render_page
// ============================================================================

fn default_page() -> u32 {
    1
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct RenderPageParams {
    /// Document to render (default: the selected document)
    #[serde(default)]
    pub document_id: Option<String>,
    /// Page number (1-indexed); out-of-range values are clamped
    #[serde(default = "default_page")]
    pub page: u32,
    /// Width of the viewport in pixels; the preview is at most 600px and leaves a 100px margin
    #[serde(default)]
    pub available_width: Option<u32>,
}

#[derive(Debug, Default, Serialize, JsonSchema)]
pub struct RenderPageResult {
    pub document_id: String,
    /// Page actually rendered
    pub page: u32,
    pub page_count: u32,
    pub width: u32,
    pub height: u32,
    /// Base64 encoded PNG
    pub data_base64: String,
    pub mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// Tool implementations
// ============================================================================

#[tool_router]
impl PdfFormServer {
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    /// Create a new PdfFormServer with full configuration
    pub fn with_config(config: ServerConfig) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session::new())),
            tool_router: Self::tool_router(),
            config: Arc::new(config),
        }
    }

    /// Upload PDFs into the session
    #[tool(
        description = "Upload one or more PDF files into the session and detect their form fields.

Each file is {\"path\": \"/absolute/path.pdf\"} or {\"base64\": \"...\", \"name\": \"form.pdf\"}, optionally with \"content_type\". Files whose content type is not application/pdf are skipped; if no PDF remains, the whole batch is rejected.

Files are processed one at a time. A file that cannot be read is reported in errors and the rest of the batch continues. The first uploaded document becomes selected when nothing is selected yet.

PDFs without form fields get a demonstration set of seven fields."
    )]
    async fn upload_pdfs(&self, Parameters(params): Parameters<UploadPdfsParams>) -> String {
        let result = self.process_upload_pdfs(params).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "upload_pdfs failed");
            UploadPdfsResult {
                error: Some(e.client_message()),
                ..UploadPdfsResult::default()
            }
        });

        let response = serde_json::json!({ "results": [result] });
        serde_json::to_string_pretty(&response).unwrap_or_default()
    }

    /// List uploaded documents
    #[tool(description = "List documents uploaded in this session, with the selected document and its completion percentage.")]
    async fn list_documents(&self) -> String {
        let result = self.process_list_documents();
        let response = serde_json::json!({ "results": [result] });
        serde_json::to_string_pretty(&response).unwrap_or_default()
    }

    /// Select a document
    #[tool(description = "Select the document that field edits, export, and preview default to.")]
    async fn select_document(
        &self,
        Parameters(params): Parameters<SelectDocumentParams>,
    ) -> String {
        let result = match self.process_select_document(&params) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(error = %e, "select_document failed");
                SelectDocumentResult {
                    document: None,
                    error: Some(e.client_message()),
                }
            }
        };

        let response = serde_json::json!({ "results": [result] });
        serde_json::to_string_pretty(&response).unwrap_or_default()
    }

    /// Get the editable fields of a document
    #[tool(
        description = "Get the editable form fields of a document (default: the selected one).

Each field has an id, the PDF field name, a kind (text, multiline_text, select, checkbox, radio), a label, its current value (string, or boolean for checkboxes), options for select/radio fields, and a required flag."
    )]
    async fn get_fields(&self, Parameters(params): Parameters<GetFieldsParams>) -> String {
        let result = self.process_get_fields(&params).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "get_fields failed");
            GetFieldsResult {
                error: Some(e.client_message()),
                ..GetFieldsResult::default()
            }
        });

        let response = serde_json::json!({ "results": [result] });
        serde_json::to_string_pretty(&response).unwrap_or_default()
    }

    /// Set one field value
    #[tool(
        description = "Set the value of one form field. Use a string for text, multiline_text, select and radio fields, and a boolean for checkboxes. Returns the updated field and the document's completion percentage."
    )]
    async fn set_field_value(
        &self,
        Parameters(params): Parameters<SetFieldValueParams>,
    ) -> String {
        let result = self.process_set_field_value(params).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "set_field_value failed");
            SetFieldValueResult {
                error: Some(e.client_message()),
                ..SetFieldValueResult::default()
            }
        });

        let response = serde_json::json!({ "results": [result] });
        serde_json::to_string_pretty(&response).unwrap_or_default()
    }

    /// Export a filled copy of a document
    #[tool(
        description = "Write the current field values into a fresh copy of the original PDF and save it as filled-<name>-<timestamp>.pdf.

Only non-empty text and checked boxes are written. Fields that cannot be filled (name not found, different field type, option not offered by the PDF) are listed in fields_skipped; the export still succeeds. The form stays editable."
    )]
    async fn export_filled(&self, Parameters(params): Parameters<ExportFilledParams>) -> String {
        let result = self.process_export_filled(&params).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "export_filled failed");
            ExportFilledResult {
                error: Some(e.client_message()),
                ..ExportFilledResult::default()
            }
        });

        let response = serde_json::json!({ "results": [result] });
        serde_json::to_string_pretty(&response).unwrap_or_default()
    }

    /// Render a page preview
    #[tool(
        description = "Render one page of the original (unfilled) document as a PNG image, returned base64-encoded. The width is min(600, available_width - 100). Page numbers outside the document are clamped to the first or last page."
    )]
    async fn render_page(&self, Parameters(params): Parameters<RenderPageParams>) -> String {
        let result = self.process_render_page(&params).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "render_page failed");
            RenderPageResult {
                error: Some(e.client_message()),
                ..RenderPageResult::default()
            }
        });

        let response = serde_json::json!({ "results": [result] });
        serde_json::to_string_pretty(&response).unwrap_or_default()
    }
}

impl PdfFormServer {
    /// Validate that a path is within allowed resource directories.
    /// If no resource_dirs are configured, all paths are allowed.
    fn validate_path_access(&self, path: &str) -> crate::error::Result<PathBuf> {
        if self.config.resource_dirs.is_empty() {
            return Ok(PathBuf::from(path));
        }

        let canonical = std::fs::canonicalize(path).map_err(|_| {
            crate::error::Error::PathAccessDenied {
                path: path.to_string(),
            }
        })?;

        for dir in &self.config.resource_dirs {
            if let Ok(canonical_dir) = std::fs::canonicalize(dir) {
                if canonical.starts_with(&canonical_dir) {
                    return Ok(canonical);
                }
            }
        }

        Err(crate::error::Error::PathAccessDenied {
            path: path.to_string(),
        })
    }

    /// Validate that an output path is within allowed resource directories.
    /// Canonicalizes the parent directory since the output file may not exist yet.
    fn validate_output_path_access(&self, path: &Path) -> crate::error::Result<PathBuf> {
        if self.config.resource_dirs.is_empty() {
            return Ok(path.to_path_buf());
        }

        let denied = || crate::error::Error::PathAccessDenied {
            path: path.display().to_string(),
        };

        let parent = path.parent().unwrap_or(Path::new("."));
        let canonical_parent = std::fs::canonicalize(parent).map_err(|_| denied())?;
        let canonical_target =
            canonical_parent.join(path.file_name().unwrap_or(std::ffi::OsStr::new("")));

        for dir in &self.config.resource_dirs {
            if let Ok(canonical_dir) = std::fs::canonicalize(dir) {
                if canonical_target.starts_with(&canonical_dir) {
                    return Ok(canonical_target);
                }
            }
        }

        Err(denied())
    }

    /// Write output data to a file path, with sandbox validation.
    fn write_output(&self, path: &Path, data: &[u8]) -> crate::error::Result<PathBuf> {
        self.validate_output_path_access(path)?;

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, data)?;
        Ok(path.to_path_buf())
    }

    fn summaries(session: &Session) -> Vec<DocumentSummary> {
        let selected_id = session.selected().map(|d| d.id.as_str());
        session
            .documents()
            .iter()
            .map(|d| DocumentSummary::new(d, Some(d.id.as_str()) == selected_id))
            .collect()
    }

    pub async fn process_upload_pdfs(
        &self,
        params: UploadPdfsParams,
    ) -> crate::error::Result<UploadPdfsResult> {
        let mut candidates = Vec::with_capacity(params.files.len());
        let mut errors = Vec::new();

        for file in params.files {
            let content_type = file.content_type.or_else(|| params.content_type.clone());
            let candidate = match (file.path, file.base64) {
                (Some(path), _) => match self.validate_path_access(&path) {
                    Ok(resolved) => {
                        let candidate = UploadCandidate::from_path(resolved);
                        match file.name {
                            Some(name) => candidate.with_file_name(name),
                            None => candidate,
                        }
                    }
                    Err(e) => {
                        tracing::warn!(path = %path, error = %e, "Upload path rejected");
                        errors.push(UploadFileError {
                            file_name: path,
                            error: e.client_message(),
                        });
                        continue;
                    }
                },
                (None, Some(encoded)) => UploadCandidate::from_base64(
                    file.name.unwrap_or_else(|| "upload.pdf".to_string()),
                    encoded,
                ),
                (None, None) => {
                    errors.push(UploadFileError {
                        file_name: file.name.unwrap_or_default(),
                        error: "Expected \"path\" or \"base64\"".to_string(),
                    });
                    continue;
                }
            };

            candidates.push(match content_type {
                Some(t) => candidate.with_content_type(t),
                None => candidate,
            });
        }

        let max_upload_bytes = self.config.max_upload_bytes;

        // Parsing is CPU-bound and runs without the session lock
        let prepared = tokio::task::spawn_blocking(move || {
            let mut progress = Vec::new();
            let report =
                Session::prepare_batch(candidates, max_upload_bytes, |p| progress.push(p))?;
            Ok::<_, crate::error::Error>((report, progress))
        })
        .await
        .map_err(|e| crate::error::Error::Pdf {
            reason: format!("Task join error: {}", e),
        })?;

        let (report, progress) = match prepared {
            Ok(prepared) => prepared,
            // Keep the per-file errors when nothing was left to upload
            Err(e) if !errors.is_empty() => {
                tracing::warn!(error = %e, failed = errors.len(), "Upload batch rejected");
                let rejected = match &e {
                    crate::error::Error::NoPdfFiles { rejected } => *rejected,
                    _ => 0,
                };
                return Ok(UploadPdfsResult {
                    failed: errors.len(),
                    rejected,
                    error: Some(e.client_message()),
                    errors,
                    ..UploadPdfsResult::default()
                });
            }
            Err(e) => return Err(e),
        };

        let (summaries, selected_id) = {
            let mut session = self.session.lock();
            session.commit_batch(&report);
            let selected_id = session.selected().map(|d| d.id.clone());
            let summaries: Vec<DocumentSummary> = report
                .uploaded
                .iter()
                .map(|d| DocumentSummary::new(d, Some(&d.id) == selected_id.as_ref()))
                .collect();
            (summaries, selected_id)
        };

        errors.extend(report.failed.iter().map(|f| UploadFileError {
            file_name: f.file_name.clone(),
            error: f.error.client_message(),
        }));

        Ok(UploadPdfsResult {
            succeeded: report.uploaded.len(),
            failed: report.failed.len(),
            batch_size: report.batch_size,
            rejected: report.rejected,
            documents: summaries,
            errors,
            progress,
            selected_document_id: selected_id,
            error: None,
        })
    }

    pub fn process_list_documents(&self) -> ListDocumentsResult {
        let session = self.session.lock();
        ListDocumentsResult {
            documents: Self::summaries(&session),
            selected_document_id: session.selected().map(|d| d.id.clone()),
            completion_percentage: session.completion_percentage(),
        }
    }

    pub fn process_select_document(
        &self,
        params: &SelectDocumentParams,
    ) -> crate::error::Result<SelectDocumentResult> {
        let document = self.session.lock().select_document(&params.document_id)?;
        Ok(SelectDocumentResult {
            document: Some(DocumentSummary::new(&document, true)),
            error: None,
        })
    }

    pub fn process_get_fields(
        &self,
        params: &GetFieldsParams,
    ) -> crate::error::Result<GetFieldsResult> {
        let document = self.session.lock().resolve(params.document_id.as_deref())?;
        Ok(GetFieldsResult {
            document_id: document.id.clone(),
            file_name: document.file_name.clone(),
            completion_percentage: document.completion_percentage(),
            fields: document.fields.clone(),
            error: None,
        })
    }

    pub fn process_set_field_value(
        &self,
        params: SetFieldValueParams,
    ) -> crate::error::Result<SetFieldValueResult> {
        let updated = self.session.lock().set_field_value(
            &params.document_id,
            &params.field_id,
            params.value,
        )?;

        Ok(SetFieldValueResult {
            document_id: updated.id.clone(),
            field: updated.field(&params.field_id).cloned(),
            completion_percentage: updated.completion_percentage(),
            error: None,
        })
    }

    pub async fn process_export_filled(
        &self,
        params: &ExportFilledParams,
    ) -> crate::error::Result<ExportFilledResult> {
        let document = self.session.lock().resolve(params.document_id.as_deref())?;
        let timestamp_ms = chrono::Utc::now().timestamp_millis();

        // Fill and serialize on a blocking thread
        let exported = tokio::task::spawn_blocking(move || export_document(&document, timestamp_ms))
            .await
            .map_err(|e| crate::error::Error::Pdf {
                reason: format!("Task join error: {}", e),
            })??;

        let dir = params
            .output_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| self.config.download_dir.clone());
        let output_path = self.write_output(&dir.join(&exported.file_name), &exported.data)?;

        let data_base64 = params
            .include_base64
            .then(|| base64::engine::general_purpose::STANDARD.encode(&exported.data));

        Ok(ExportFilledResult {
            document_id: exported.document_id,
            file_name: exported.file_name,
            output_path: Some(output_path.display().to_string()),
            size: exported.data.len(),
            fields_filled: exported.result.fields_filled,
            fields_skipped: exported
                .result
                .fields_skipped
                .into_iter()
                .map(|s| SkippedFieldInfo {
                    name: s.name,
                    reason: s.reason,
                })
                .collect(),
            data_base64,
            error: None,
        })
    }

    pub async fn process_render_page(
        &self,
        params: &RenderPageParams,
    ) -> crate::error::Result<RenderPageResult> {
        let document = self.session.lock().resolve(params.document_id.as_deref())?;
        let width = match params.available_width {
            Some(available) => render_width(
                available,
                self.config.max_render_width,
                self.config.viewport_margin,
            ),
            None => self.config.max_render_width,
        };
        let page = params.page;
        let data = document.original_bytes.clone();

        // CPU-bound PDFium work
        let rendered =
            tokio::task::spawn_blocking(move || crate::pdf::render_page(&data, page, width))
                .await
                .map_err(|e| crate::error::Error::Pdfium {
                    reason: format!("Task join error: {}", e),
                })??;

        Ok(RenderPageResult {
            document_id: document.id.clone(),
            page: rendered.page,
            page_count: rendered.page_count,
            width: rendered.width,
            height: rendered.height,
            data_base64: rendered.data_base64,
            mime_type: rendered.mime_type,
            error: None,
        })
    }

    fn document_resource_json(document: &UploadedDocument) -> crate::error::Result<String> {
        let body = serde_json::json!({
            "id": document.id,
            "file_name": document.file_name,
            "completion_percentage": document.completion_percentage(),
            "fields": document.fields,
        });
        Ok(serde_json::to_string_pretty(&body)?)
    }
}

impl Default for PdfFormServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_handler]
impl ServerHandler for PdfFormServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "PDF Form MCP Server fills PDF forms: upload PDFs, edit the detected fields, \
                 and export a filled copy. Uploaded documents are exposed as resources."
                    .into(),
            ),
        }
    }

    /// List uploaded documents as resources
    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, ErrorData> {
        let session = self.session.lock();
        let resources = session
            .documents()
            .iter()
            .map(|document| {
                let mut resource =
                    RawResource::new(document.preview.uri.clone(), document.file_name.clone());
                resource.mime_type = Some("application/json".to_string());
                resource.description = Some(format!(
                    "PDF form ({} fields, {}% complete)",
                    document.fields.len(),
                    document.completion_percentage()
                ));
                Annotated {
                    raw: resource,
                    annotations: None,
                }
            })
            .collect();

        Ok(ListResourcesResult {
            resources,
            next_cursor: None,
            meta: Default::default(),
        })
    }

    /// Read a document resource: its field model as JSON
    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, ErrorData> {
        let uri = &request.uri;

        let Some(id) = PreviewHandle::document_id(uri) else {
            return Err(ErrorData::invalid_params(
                "Only pdf-form://documents/ URIs are supported",
                None,
            ));
        };

        let document = self
            .session
            .lock()
            .document(id)
            .map_err(|e| ErrorData::invalid_params(e.client_message(), None))?;

        match Self::document_resource_json(&document) {
            Ok(text) => Ok(ReadResourceResult {
                contents: vec![ResourceContents::TextResourceContents {
                    uri: uri.clone(),
                    mime_type: Some("application/json".to_string()),
                    text,
                    meta: Default::default(),
                }],
            }),
            Err(e) => {
                tracing::warn!(error = %e, "read_resource failed");
                Err(ErrorData::internal_error(e.client_message(), None))
            }
        }
    }
}

/// Run the MCP server with default configuration
pub async fn run_server() -> Result<()> {
    run_server_with_config(ServerConfig::default()).await
}

/// Run the MCP server with full configuration
pub async fn run_server_with_config(config: ServerConfig) -> Result<()> {
    tracing::info!(
        download_dir = %config.download_dir.display(),
        resource_dirs = config.resource_dirs.len(),
        "PDF Form MCP Server ready, waiting for connections..."
    );

    let server = PdfFormServer::with_config(config);
    let service = server.serve(rmcp::transport::io::stdio()).await?;
    service.waiting().await?;

    Ok(())
}
