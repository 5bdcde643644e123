//! Client-side checks for picked files, run before a file is staged.
//!
//! The API re-validates every upload; these only spare the user a round trip.

use thiserror::Error;

use super::config::UploadLimits;

const PDF_MIME: &str = "application/pdf";
const BYTES_PER_MB: u64 = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Exam,
    Diploma,
    AttendanceSheet,
}

impl FileKind {
    pub fn label(&self) -> &'static str {
        match self {
            FileKind::Exam => "exam",
            FileKind::Diploma => "diploma",
            FileKind::AttendanceSheet => "attendance sheet",
        }
    }

    pub fn limit_mb(&self, limits: &UploadLimits) -> u32 {
        match self {
            FileKind::Exam => limits.exam_mb,
            FileKind::Diploma => limits.diploma_mb,
            FileKind::AttendanceSheet => limits.attendance_sheet_mb,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("{kind} file must be a PDF (got \"{name}\")")]
    NotPdf { kind: &'static str, name: String },

    #[error("{kind} file is empty")]
    Empty { kind: &'static str },

    #[error("{kind} file exceeds {limit_mb} MB")]
    TooLarge { kind: &'static str, limit_mb: u32 },
}

fn looks_like_pdf(name: &str, mime: &str) -> bool {
    if mime.trim().eq_ignore_ascii_case(PDF_MIME) {
        return true;
    }
    // Some browsers leave the MIME type blank; fall back to the extension.
    mime.trim().is_empty() && name.to_ascii_lowercase().ends_with(".pdf")
}

/// Validate a picked file by name, MIME type and size in bytes.
pub fn validate_upload(
    kind: FileKind,
    name: &str,
    mime: &str,
    size_bytes: u64,
    limits: &UploadLimits,
) -> Result<(), UploadError> {
    if !looks_like_pdf(name, mime) {
        return Err(UploadError::NotPdf {
            kind: kind.label(),
            name: name.to_string(),
        });
    }
    if size_bytes == 0 {
        return Err(UploadError::Empty { kind: kind.label() });
    }
    let limit_mb = kind.limit_mb(limits);
    if size_bytes > u64::from(limit_mb) * BYTES_PER_MB {
        return Err(UploadError::TooLarge {
            kind: kind.label(),
            limit_mb,
        });
    }
    Ok(())
}
