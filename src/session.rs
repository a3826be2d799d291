//! In-memory document session
//!
//! Holds the uploaded documents and the current selection. Documents are
//! immutable values behind `Arc`; every edit builds a new document and swaps
//! it into the list and the selection together, so the two never diverge.

use crate::error::{Error, Result};
use crate::model::{FieldValue, PreviewHandle, UploadedDocument};
use crate::pdf::{
    base_file_name, check_pdf_header, detect_form, fill_form_fields, filled_file_name,
    FillFormResultInfo,
};
use base64::Engine;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;

/// MIME type accepted by the uploader
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Where an upload candidate's bytes come from
#[derive(Debug, Clone)]
pub enum CandidateSource {
    /// File on disk, read when the batch reaches it
    Path(PathBuf),
    /// Bytes supplied inline
    Bytes(Vec<u8>),
    /// Base64 text, decoded when the batch reaches it
    Base64(String),
}

/// One file offered to the uploader
#[derive(Debug, Clone)]
pub struct UploadCandidate {
    pub file_name: String,
    /// Declared MIME type; inferred from the file name when absent
    pub content_type: Option<String>,
    pub source: CandidateSource,
}

impl UploadCandidate {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            file_name,
            content_type: None,
            source: CandidateSource::Path(path),
        }
    }

    pub fn from_bytes(file_name: impl AsRef<str>, data: Vec<u8>) -> Self {
        Self {
            file_name: base_file_name(file_name.as_ref()).to_string(),
            content_type: None,
            source: CandidateSource::Bytes(data),
        }
    }

    pub fn from_base64(file_name: impl AsRef<str>, encoded: impl Into<String>) -> Self {
        Self {
            file_name: base_file_name(file_name.as_ref()).to_string(),
            content_type: None,
            source: CandidateSource::Base64(encoded.into()),
        }
    }

    /// Override the display name; only its last path component is kept
    pub fn with_file_name(mut self, file_name: impl AsRef<str>) -> Self {
        self.file_name = base_file_name(file_name.as_ref()).to_string();
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Declared content type, or the one implied by a `.pdf` extension
    pub fn effective_content_type(&self) -> Option<&str> {
        match &self.content_type {
            Some(declared) => Some(declared.as_str()),
            None if self.file_name.to_ascii_lowercase().ends_with(".pdf") => {
                Some(PDF_CONTENT_TYPE)
            }
            None => None,
        }
    }

    pub fn is_pdf(&self) -> bool {
        self.effective_content_type()
            .is_some_and(|t| t.trim().eq_ignore_ascii_case(PDF_CONTENT_TYPE))
    }

    fn read(&self, max_bytes: u64) -> Result<Vec<u8>> {
        let data = match &self.source {
            CandidateSource::Path(path) => {
                if !path.exists() {
                    return Err(Error::PdfNotFound {
                        path: path.display().to_string(),
                    });
                }
                let size = std::fs::metadata(path)?.len();
                if size > max_bytes {
                    return Err(Error::UploadTooLarge {
                        size,
                        max_size: max_bytes,
                    });
                }
                std::fs::read(path)?
            }
            CandidateSource::Bytes(data) => data.clone(),
            CandidateSource::Base64(encoded) => {
                base64::engine::general_purpose::STANDARD.decode(encoded.trim())?
            }
        };

        let size = data.len() as u64;
        if size > max_bytes {
            return Err(Error::UploadTooLarge {
                size,
                max_size: max_bytes,
            });
        }

        check_pdf_header(&data)?;
        Ok(data)
    }
}

/// A candidate that could not be turned into a document
#[derive(Debug)]
pub struct UploadFailure {
    pub file_name: String,
    pub error: Error,
}

/// Outcome of one upload batch
#[derive(Debug, Default)]
pub struct UploadReport {
    /// PDF-typed candidates processed (the filtered batch)
    pub batch_size: usize,
    /// Candidates dropped by the content-type filter
    pub rejected: usize,
    pub uploaded: Vec<Arc<UploadedDocument>>,
    pub failed: Vec<UploadFailure>,
}

/// A filled copy ready to be saved
#[derive(Debug, Clone)]
pub struct ExportedPdf {
    pub document_id: String,
    /// `filled-<name>-<unix ms>.pdf`
    pub file_name: String,
    pub data: Vec<u8>,
    pub result: FillFormResultInfo,
}

/// Document list plus selection for one client
#[derive(Debug, Default)]
pub struct Session {
    documents: Vec<Arc<UploadedDocument>>,
    selected: Option<Arc<UploadedDocument>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Documents in upload order
    pub fn documents(&self) -> &[Arc<UploadedDocument>] {
        &self.documents
    }

    pub fn selected(&self) -> Option<&Arc<UploadedDocument>> {
        self.selected.as_ref()
    }

    pub fn document(&self, id: &str) -> Result<Arc<UploadedDocument>> {
        self.documents
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| Error::DocumentNotFound { id: id.to_string() })
    }

    /// The document with `id`, or the selected one when `id` is `None`
    pub fn resolve(&self, id: Option<&str>) -> Result<Arc<UploadedDocument>> {
        match id {
            Some(id) => self.document(id),
            None => self.selected.clone().ok_or(Error::NoDocumentSelected),
        }
    }

    /// Upload a batch of candidates.
    ///
    /// Candidates whose content type is not PDF are dropped; if none remain the
    /// batch is rejected with [`Error::NoPdfFiles`] and the session is left
    /// untouched. Survivors are processed one at a time. A file that cannot be
    /// read is recorded in [`UploadReport::failed`] and the batch moves on.
    /// `progress` receives 0, then the completed percentage after each file,
    /// then 0 again.
    pub fn upload_batch<F>(
        &mut self,
        candidates: Vec<UploadCandidate>,
        max_upload_bytes: u64,
        progress: F,
    ) -> Result<UploadReport>
    where
        F: FnMut(u8),
    {
        let report = Self::prepare_batch(candidates, max_upload_bytes, progress)?;
        self.commit_batch(&report);
        Ok(report)
    }

    /// Read and parse a batch without touching any session.
    ///
    /// Same filtering, progress and failure rules as [`Session::upload_batch`];
    /// the parsed documents are added later with [`Session::commit_batch`].
    pub fn prepare_batch<F>(
        candidates: Vec<UploadCandidate>,
        max_upload_bytes: u64,
        mut progress: F,
    ) -> Result<UploadReport>
    where
        F: FnMut(u8),
    {
        let total_candidates = candidates.len();
        let pdfs: Vec<UploadCandidate> = candidates.into_iter().filter(|c| c.is_pdf()).collect();
        let rejected = total_candidates - pdfs.len();

        if pdfs.is_empty() {
            return Err(Error::NoPdfFiles { rejected });
        }

        let total = pdfs.len();
        let mut report = UploadReport {
            batch_size: total,
            rejected,
            ..UploadReport::default()
        };

        tracing::info!(files = total, rejected, "Processing upload batch");
        progress(0);

        for (index, candidate) in pdfs.into_iter().enumerate() {
            match candidate.read(max_upload_bytes) {
                Ok(data) => {
                    let document = Arc::new(build_document(candidate.file_name, data));
                    tracing::info!(
                        id = %document.id,
                        name = %document.file_name,
                        size = document.size,
                        fields = document.fields.len(),
                        "Document uploaded"
                    );
                    report.uploaded.push(document);
                }
                Err(e) => {
                    tracing::warn!(file = %candidate.file_name, error = %e, "Upload failed");
                    report.failed.push(UploadFailure {
                        file_name: candidate.file_name,
                        error: e,
                    });
                }
            }

            let percent = ((index + 1) as f64 / total as f64 * 100.0).round() as u8;
            tracing::debug!(progress = percent, "Upload progress");
            progress(percent);
        }

        progress(0);
        tracing::info!(
            uploaded = report.uploaded.len(),
            failed = report.failed.len(),
            "Upload batch finished"
        );

        Ok(report)
    }

    /// Append a prepared batch in upload order. The first document becomes
    /// selected when nothing is selected yet.
    pub fn commit_batch(&mut self, report: &UploadReport) {
        for document in &report.uploaded {
            self.documents.push(document.clone());
            if self.selected.is_none() {
                self.selected = Some(document.clone());
            }
        }
    }

    /// Make the document with `id` the selected one
    pub fn select_document(&mut self, id: &str) -> Result<Arc<UploadedDocument>> {
        let document = self.document(id)?;
        self.selected = Some(document.clone());
        Ok(document)
    }

    /// Replace one field's value.
    ///
    /// The document is rebuilt with the new value and swapped into the list;
    /// if it is the selected document, the selection gets the same new value.
    pub fn set_field_value(
        &mut self,
        document_id: &str,
        field_id: &str,
        value: FieldValue,
    ) -> Result<Arc<UploadedDocument>> {
        let index = self
            .documents
            .iter()
            .position(|d| d.id == document_id)
            .ok_or_else(|| Error::DocumentNotFound {
                id: document_id.to_string(),
            })?;

        let updated = Arc::new(self.documents[index].with_field_value(field_id, value)?);
        self.documents[index] = updated.clone();
        if self
            .selected
            .as_ref()
            .is_some_and(|s| s.id == document_id)
        {
            self.selected = Some(updated.clone());
        }

        Ok(updated)
    }

    /// Completion of the selected document; 0 when nothing is selected
    pub fn completion_percentage(&self) -> u8 {
        self.selected
            .as_ref()
            .map(|d| d.completion_percentage())
            .unwrap_or(0)
    }

    /// Fill a document's values into a fresh copy of its original bytes
    pub fn export(&self, document_id: Option<&str>, timestamp_ms: i64) -> Result<ExportedPdf> {
        let document = self.resolve(document_id)?;
        export_document(&document, timestamp_ms)
    }
}

/// Fill `document` and name the result. Works on a snapshot, so it can run
/// without holding the session.
pub fn export_document(document: &UploadedDocument, timestamp_ms: i64) -> Result<ExportedPdf> {
    let filled = fill_form_fields(&document.original_bytes, &document.fields)?;
    let file_name = filled_file_name(&document.file_name, timestamp_ms);

    tracing::info!(
        file = %file_name,
        filled = filled.result.fields_filled,
        skipped = filled.result.fields_skipped.len(),
        "Export produced"
    );

    Ok(ExportedPdf {
        document_id: document.id.clone(),
        file_name,
        data: filled.data,
        result: filled.result,
    })
}

fn build_document(file_name: String, data: Vec<u8>) -> UploadedDocument {
    let id = uuid::Uuid::new_v4().to_string();
    let detected = detect_form(&data);

    UploadedDocument {
        preview: PreviewHandle::for_document(&id, detected.page_count),
        id,
        file_name,
        size: data.len() as u64,
        uploaded_at: Utc::now(),
        original_bytes: Arc::from(data),
        fields: detected.fields,
    }
}
