//! Error types for the pdf2lines library.
//!
//! Two tiers of failure:
//!
//! * [`ExtractError`] — **Fatal**: the document cannot be read at all
//!   (missing file, not a PDF, corrupt structure, pdfium unavailable).
//!   Returned as `Err(ExtractError)` and no partial result is produced.
//!
//! * [`PageError`] — **Non-fatal**: the OCR fallback failed on one page.
//!   Stored in the page's [`crate::output::OcrOutcome`]; the page keeps its
//!   native text lines and extraction continues with the next page.
//!
//! A missing OCR engine is neither: it is a capability, see
//! [`crate::pipeline::ocr::OcrCapability`].

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf2lines library.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// The text layer of a page could not be read.
    #[error("Native text extraction failed for page {page}: {detail}")]
    TextExtractionFailed { page: usize, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
You can:\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium.\n\
  • Place libpdfium next to the working directory.\n\
  • Install pdfium system-wide so the dynamic loader can find it.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (temp file I/O, blocking task panicked).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single page's OCR fallback.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum PageError {
    /// Page rasterisation failed.
    #[error("Page {page}: rasterisation failed: {detail}")]
    RenderFailed { page: usize, detail: String },

    /// The OCR engine failed on the rasterised page.
    #[error("Page {page}: OCR failed: {detail}")]
    OcrFailed { page: usize, detail: String },
}

impl PageError {
    /// 1-indexed page number the error belongs to.
    pub fn page(&self) -> usize {
        match self {
            PageError::RenderFailed { page, .. } | PageError::OcrFailed { page, .. } => *page,
        }
    }
}

/// Errors raised by an [`crate::pipeline::ocr::OcrEngine`] implementation.
///
/// Always converted to [`PageError::OcrFailed`] by the extractor.
#[derive(Debug, Error)]
pub enum OcrError {
    /// Writing the temporary bitmap or spawning the engine failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The rasterised page could not be encoded for the engine.
    #[error("Image encoding failed: {0}")]
    Encode(String),

    /// The engine ran but exited unsuccessfully.
    #[error("'{engine}' exited with {status}: {stderr}")]
    EngineFailed {
        engine: String,
        status: String,
        stderr: String,
    },
}
