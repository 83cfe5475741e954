//! Parse job orchestration: file type detection, extractor routing,
//! validation, and metrics bookkeeping.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::ParseError;
use crate::metrics::MetricsCollector;
use crate::profile;
use crate::skills::SkillsCatalog;
use crate::storage::DocumentStore;

use super::docx::DocxExtractor;
use super::pdf::PdfExtractor;
use super::ExtractorOutput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Docx,
    Pdf,
}

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Docx => "docx",
            FileType::Pdf => "pdf",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub file_path: String,
    #[serde(default)]
    pub job_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParseJobResponse {
    pub job_id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,
}

impl ParseJobResponse {
    fn failed(job_id: String, started_at: DateTime<Utc>, error: String) -> Self {
        Self {
            job_id,
            status: "failed".to_string(),
            result: None,
            error: Some(error),
            started_at,
            completed_at: Utc::now(),
            processing_time_ms: None,
        }
    }
}

pub fn generate_job_id() -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("job_{}_{}", Utc::now().timestamp(), &uuid[..8])
}

/// Determines the file type from the filename extension, falling back to
/// magic bytes when the extension is absent or unrecognized.
pub fn detect_file_type(file_path: &str, bytes: &[u8]) -> Result<FileType, ParseError> {
    let extension = file_path
        .rsplit('.')
        .next()
        .filter(|_| file_path.contains('.'))
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("docx") => return Ok(FileType::Docx),
        Some("pdf") => return Ok(FileType::Pdf),
        _ => {}
    }

    if bytes.starts_with(b"PK\x03\x04") {
        return Ok(FileType::Docx);
    }
    if bytes.starts_with(b"%PDF") {
        return Ok(FileType::Pdf);
    }

    Err(ParseError::UnsupportedFormat(
        extension.unwrap_or_else(|| "unknown".to_string()),
    ))
}

/// Routes parse jobs to the right extractor and owns the job lifecycle.
pub struct ParserService {
    store: Arc<dyn DocumentStore>,
    catalog: Arc<SkillsCatalog>,
    metrics: Arc<MetricsCollector>,
    max_file_size: u64,
    /// Finished jobs by id, for status lookups. In-memory only; restarts
    /// forget history.
    jobs: Mutex<HashMap<String, ParseJobResponse>>,
}

impl ParserService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        catalog: Arc<SkillsCatalog>,
        metrics: Arc<MetricsCollector>,
        max_file_size: u64,
    ) -> Self {
        Self {
            store,
            catalog,
            metrics,
            max_file_size,
            jobs: Mutex::new(HashMap::new()),
        }
    }

    pub async fn parse_resume(&self, request: ParseRequest) -> ParseJobResponse {
        let response = self.run_job(request).await;
        self.jobs
            .lock()
            .expect("jobs lock poisoned")
            .insert(response.job_id.clone(), response.clone());
        response
    }

    pub fn job_status(&self, job_id: &str) -> Option<ParseJobResponse> {
        self.jobs.lock().expect("jobs lock poisoned").get(job_id).cloned()
    }

    async fn run_job(&self, request: ParseRequest) -> ParseJobResponse {
        let job_id = request.job_id.unwrap_or_else(generate_job_id);
        let started_at = Utc::now();

        tracing::info!(job_id, file_path = %request.file_path, "Parser job started");

        let bytes = match self.store.read_decrypted(&request.file_path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                let error = ParseError::from(e);
                tracing::error!(job_id, error = %error, "Document read failed");
                return ParseJobResponse::failed(job_id, started_at, format!("{}: {error}", error.kind()));
            }
        };

        if bytes.len() as u64 > self.max_file_size {
            let error = ParseError::FileTooLarge(self.max_file_size);
            tracing::error!(job_id, file_size = bytes.len(), "Document too large");
            return ParseJobResponse::failed(job_id, started_at, format!("{}: {error}", error.kind()));
        }

        let file_type = match detect_file_type(&request.file_path, &bytes) {
            Ok(file_type) => file_type,
            Err(e) => {
                tracing::error!(job_id, error = %e, "File type detection failed");
                return ParseJobResponse::failed(job_id, started_at, format!("{}: {e}", e.kind()));
            }
        };

        let trace_id =
            self.metrics
                .record_parse_start(&job_id, file_type.as_str(), bytes.len() as u64);
        let timer = Instant::now();

        tracing::info!(
            job_id,
            file_type = file_type.as_str(),
            file_size_bytes = bytes.len(),
            metrics_trace_id = trace_id,
            "File type detected"
        );

        let extraction = self.run_extractor(file_type, bytes).await;
        let duration_ms = timer.elapsed().as_millis() as u64;

        let output = match extraction {
            Ok(output) => output,
            Err(e) => {
                self.metrics.record_parse_failure(&trace_id, duration_ms, e.kind());
                tracing::error!(job_id, error = %e, duration_ms, "Parser job failed");
                return ParseJobResponse::failed(job_id, started_at, format!("{}: {e}", e.kind()));
            }
        };

        let payload = profile::transform(&output, &request.file_path, duration_ms);
        let outcome = profile::validate_profile(payload, false);

        if !outcome.is_valid {
            let error = validation_error(&outcome.errors);
            self.metrics.record_parse_failure(&trace_id, duration_ms, error.kind());
            tracing::warn!(
                job_id,
                errors = ?outcome.errors,
                "Parser output validation failed"
            );
            return ParseJobResponse::failed(job_id, started_at, format!("{}: {error}", error.kind()));
        }

        let Some(mut record) = outcome.profile else {
            let error = ParseError::FieldValidationFailure(
                "validation reported success without a profile".to_string(),
            );
            self.metrics.record_parse_failure(&trace_id, duration_ms, error.kind());
            return ParseJobResponse::failed(job_id, started_at, format!("{}: {error}", error.kind()));
        };
        record.warnings.extend(outcome.warnings);

        self.metrics.record_parse_success(
            &trace_id,
            duration_ms,
            record.metadata.sections_detected.len(),
            record.skills.len(),
            record.warnings.len(),
        );

        tracing::info!(
            job_id,
            file_type = file_type.as_str(),
            sections_extracted = record.metadata.sections_detected.len(),
            skills_extracted = record.skills.len(),
            warnings = record.warnings.len(),
            duration_ms,
            metrics_trace_id = trace_id,
            "Parser job completed"
        );

        ParseJobResponse {
            job_id,
            status: "completed".to_string(),
            result: serde_json::to_value(&record).ok(),
            error: None,
            started_at,
            completed_at: Utc::now(),
            processing_time_ms: Some(duration_ms),
        }
    }

    /// Extraction is CPU-bound, so it runs off the async executor.
    async fn run_extractor(
        &self,
        file_type: FileType,
        bytes: bytes::Bytes,
    ) -> Result<ExtractorOutput, ParseError> {
        let catalog = Arc::clone(&self.catalog);
        let handle = tokio::task::spawn_blocking(move || match file_type {
            FileType::Docx => DocxExtractor::extract(&bytes, &catalog),
            FileType::Pdf => PdfExtractor::extract(&bytes, &catalog),
        });

        handle
            .await
            .map_err(|e| ParseError::ExtractionFailure(format!("extraction task failed: {e}")))?
    }
}

fn validation_error(errors: &[String]) -> ParseError {
    let joined = errors.join("; ");
    if errors.iter().any(|e| e.contains("Prohibited derived PII")) {
        ParseError::PrivacyViolation(joined)
    } else if errors.iter().any(|e| e.contains("Incompatible schema version")) {
        ParseError::SchemaIncompatible(joined)
    } else {
        ParseError::FieldValidationFailure(joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalDocumentStore;
    use std::io::Write;

    fn service_for(dir: &std::path::Path) -> ParserService {
        ParserService::new(
            Arc::new(LocalDocumentStore::new(dir)),
            Arc::new(SkillsCatalog::builtin()),
            Arc::new(MetricsCollector::new()),
            10 * 1024 * 1024,
        )
    }

    fn sample_docx_bytes() -> Vec<u8> {
        use docx_rs::{Docx, Paragraph, Run};

        let mut docx = Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Jane Doe")))
            .add_paragraph(
                Paragraph::new().add_run(Run::new().add_text("jane.doe@example.com")),
            )
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Experience").bold()))
            .add_paragraph(
                Paragraph::new().add_run(Run::new().add_text("Senior Engineer | Acme Corp")),
            )
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("2020 - 2023")))
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Skills").bold()))
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Python, Docker")));

        let mut cursor = std::io::Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).unwrap();
        cursor.into_inner()
    }

    #[test]
    fn test_job_id_format() {
        let id = generate_job_id();
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts[0], "job");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 8);
    }

    #[test]
    fn test_job_ids_are_unique() {
        assert_ne!(generate_job_id(), generate_job_id());
    }

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(detect_file_type("cv.docx", b"").unwrap(), FileType::Docx);
        assert_eq!(detect_file_type("cv.PDF", b"").unwrap(), FileType::Pdf);
    }

    #[test]
    fn test_detect_by_magic_bytes() {
        assert_eq!(detect_file_type("cv", b"PK\x03\x04rest").unwrap(), FileType::Docx);
        assert_eq!(detect_file_type("cv", b"%PDF-1.7").unwrap(), FileType::Pdf);
    }

    #[test]
    fn test_detect_unsupported() {
        let err = detect_file_type("cv.txt", b"plain text").unwrap_err();
        assert_eq!(err.kind(), "UnsupportedFormat");
    }

    #[tokio::test]
    async fn test_missing_file_fails_job() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_for(dir.path());

        let response = service
            .parse_resume(ParseRequest {
                file_path: "nope.docx".to_string(),
                job_id: None,
            })
            .await;

        assert_eq!(response.status, "failed");
        assert!(response.error.unwrap().starts_with("DocumentNotFound"));
    }

    #[tokio::test]
    async fn test_unsupported_file_fails_job() {
        let dir = tempfile::tempdir().unwrap();
        let mut f = std::fs::File::create(dir.path().join("cv.txt")).unwrap();
        f.write_all(b"plain text resume").unwrap();

        let service = service_for(dir.path());
        let response = service
            .parse_resume(ParseRequest {
                file_path: "cv.txt".to_string(),
                job_id: Some("job_1_abcd1234".to_string()),
            })
            .await;

        assert_eq!(response.job_id, "job_1_abcd1234");
        assert_eq!(response.status, "failed");
        assert!(response.error.unwrap().starts_with("UnsupportedFormat"));
    }

    #[tokio::test]
    async fn test_oversized_file_fails_job() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("big.docx"), vec![0u8; 64]).unwrap();

        let service = ParserService::new(
            Arc::new(LocalDocumentStore::new(dir.path())),
            Arc::new(SkillsCatalog::builtin()),
            Arc::new(MetricsCollector::new()),
            32,
        );
        let response = service
            .parse_resume(ParseRequest {
                file_path: "big.docx".to_string(),
                job_id: None,
            })
            .await;

        assert_eq!(response.status, "failed");
        assert!(response.error.unwrap().starts_with("FileTooLarge"));
    }

    #[tokio::test]
    async fn test_docx_job_completes_with_profile() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("jane.docx"), sample_docx_bytes()).unwrap();

        let service = service_for(dir.path());
        let response = service
            .parse_resume(ParseRequest {
                file_path: "jane.docx".to_string(),
                job_id: None,
            })
            .await;

        assert_eq!(response.status, "completed", "error: {:?}", response.error);
        let result = response.result.unwrap();
        assert_eq!(result["extraction_method"], "docx_deterministic");
        assert_eq!(result["source_file"], "jane.docx");
        assert_eq!(result["contact"]["email"], "jane.doe@example.com");
        assert_eq!(result["experience"][0]["position"], "Senior Engineer");
        assert!(response.processing_time_ms.is_some());
    }

    #[tokio::test]
    async fn test_job_status_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_for(dir.path());

        let response = service
            .parse_resume(ParseRequest {
                file_path: "nope.docx".to_string(),
                job_id: None,
            })
            .await;

        let stored = service.job_status(&response.job_id).unwrap();
        assert_eq!(stored.status, "failed");
        assert!(service.job_status("job_0_deadbeef").is_none());
    }

    #[tokio::test]
    async fn test_corrupt_docx_records_failure_metric() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.docx"), b"not really a docx").unwrap();

        let metrics = Arc::new(MetricsCollector::new());
        let service = ParserService::new(
            Arc::new(LocalDocumentStore::new(dir.path())),
            Arc::new(SkillsCatalog::builtin()),
            Arc::clone(&metrics),
            10 * 1024 * 1024,
        );

        let response = service
            .parse_resume(ParseRequest {
                file_path: "bad.docx".to_string(),
                job_id: None,
            })
            .await;

        assert_eq!(response.status, "failed");
        assert!(response.error.unwrap().starts_with("ExtractionFailure"));
        let snap = metrics.snapshot();
        assert_eq!(snap.failed_parses, 1);
        assert_eq!(snap.total_parses, 1);
    }
}
