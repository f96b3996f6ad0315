//! OCR engine seam and the Tesseract command-line implementation.
//!
//! Availability is decided once, when the extractor is built, and stored as
//! an [`OcrCapability`]. Tests substitute [`OcrCapability::with_engine`] or
//! [`OcrCapability::Unavailable`] without touching the environment.

use crate::config::ExtractionConfig;
use crate::error::OcrError;
use crate::pipeline::probe::{is_executable_file, ExecutableProbe, TESSERACT_BIN};
use image::{DynamicImage, ImageFormat};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Recognises text on a rasterised page.
pub trait OcrEngine: Send + Sync {
    /// Short engine name for logs.
    fn name(&self) -> &str;

    /// Return the recognised text; line breaks separate lines.
    fn recognize(&self, page: &DynamicImage) -> Result<String, OcrError>;
}

/// Whether this extractor can run OCR, fixed at construction.
#[derive(Clone, Default)]
pub enum OcrCapability {
    Available(Arc<dyn OcrEngine>),
    #[default]
    Unavailable,
}

impl OcrCapability {
    pub fn with_engine(engine: impl OcrEngine + 'static) -> Self {
        OcrCapability::Available(Arc::new(engine))
    }

    /// Probe for a Tesseract binary according to `config`.
    ///
    /// An explicit `ocr_binary` is used as-is when it is an executable file;
    /// otherwise the `PATH` lookup and the fixed fallback paths are tried in
    /// order.
    pub fn detect(config: &ExtractionConfig) -> Self {
        match resolve_binary(config) {
            Some(path) => {
                info!("OCR enabled: {}", path.display());
                OcrCapability::with_engine(TesseractEngine::new(path, &config.ocr_language))
            }
            None => {
                warn!("Tesseract OCR not found. OCR features will be disabled.");
                OcrCapability::Unavailable
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, OcrCapability::Available(_))
    }

    pub fn engine(&self) -> Option<&dyn OcrEngine> {
        match self {
            OcrCapability::Available(engine) => Some(engine.as_ref()),
            OcrCapability::Unavailable => None,
        }
    }
}

impl fmt::Debug for OcrCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OcrCapability::Available(engine) => {
                f.debug_tuple("Available").field(&engine.name()).finish()
            }
            OcrCapability::Unavailable => f.write_str("Unavailable"),
        }
    }
}

fn resolve_binary(config: &ExtractionConfig) -> Option<PathBuf> {
    if let Some(ref explicit) = config.ocr_binary {
        if is_executable_file(explicit) {
            return Some(explicit.clone());
        }
        warn!(
            "Configured OCR binary '{}' is not an executable file; probing instead",
            explicit.display()
        );
    }
    ExecutableProbe::search_then_fixed(TESSERACT_BIN, &config.ocr_fallback_paths).resolve()
}

/// Runs the `tesseract` CLI on a temporary PNG of the page.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    binary: PathBuf,
    language: String,
}

impl TesseractEngine {
    pub fn new(binary: impl Into<PathBuf>, language: &str) -> Self {
        Self {
            binary: binary.into(),
            language: language.to_string(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn recognize(&self, page: &DynamicImage) -> Result<String, OcrError> {
        // Dropped (and deleted) when this function returns.
        let bitmap = tempfile::Builder::new()
            .prefix("pdf2lines-page-")
            .suffix(".png")
            .tempfile()?;

        page.save_with_format(bitmap.path(), ImageFormat::Png)
            .map_err(|e| OcrError::Encode(e.to_string()))?;

        debug!(
            "Running {} on {}x{} px bitmap",
            self.binary.display(),
            page.width(),
            page.height()
        );

        let output = Command::new(&self.binary)
            .arg(bitmap.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .output()?;

        if !output.status.success() {
            return Err(OcrError::EngineFailed {
                engine: self.binary.display().to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
