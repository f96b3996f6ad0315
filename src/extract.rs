//! The content extractor: native text first, OCR where a page needs it.
//!
//! One pass over the document, one page at a time, in page order. For each
//! page the text layer is cleaned into lines; if the page is text-sparse or
//! embeds a raster image, the page is rasterised and OCR'd and any OCR line
//! not already on the page is appended. An OCR failure only costs that page
//! its OCR lines. A missing or unreadable PDF fails the whole call.

use crate::config::ExtractionConfig;
use crate::error::{ExtractError, PageError};
use crate::output::{DocumentResult, OcrOutcome, PageRecord};
use crate::pipeline::document::{self, PageSource, PdfiumDocument};
use crate::pipeline::ocr::{OcrCapability, OcrEngine};
use crate::pipeline::{input, lines};
use crate::source::ContentSource;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Extracts per-page text lines from PDFs.
///
/// OCR availability is probed once in [`ContentExtractor::new`] and kept for
/// the lifetime of the extractor.
///
/// # Example
/// ```rust,no_run
/// use pdf2lines::{ContentExtractor, ExtractionConfig};
///
/// let extractor = ContentExtractor::new(ExtractionConfig::default());
/// let doc = extractor.extract("service.pdf")?;
/// for page in &doc.pages {
///     println!("--- Page {} ---", page.page);
///     println!("{}", page.lines.join("\n"));
/// }
/// # Ok::<(), pdf2lines::ExtractError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    config: ExtractionConfig,
    ocr: OcrCapability,
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new(ExtractionConfig::default())
    }
}

impl ContentExtractor {
    /// Build an extractor, probing for the OCR engine.
    ///
    /// With [`crate::OcrMode::Off`] no probing happens.
    pub fn new(config: ExtractionConfig) -> Self {
        let ocr = if config.ocr_mode == crate::config::OcrMode::Off {
            debug!("OCR mode is off; skipping engine probe");
            OcrCapability::Unavailable
        } else {
            OcrCapability::detect(&config)
        };
        Self { config, ocr }
    }

    /// Build an extractor with a fixed OCR capability.
    pub fn with_capability(config: ExtractionConfig, ocr: OcrCapability) -> Self {
        Self { config, ocr }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn ocr_capability(&self) -> &OcrCapability {
        &self.ocr
    }

    /// Extract every page of the PDF at `path`.
    ///
    /// # Errors
    /// Fatal errors only: missing file, not a PDF, corrupt or encrypted PDF,
    /// pdfium unavailable, unreadable text layer. Per-page OCR failures are
    /// reported in [`PageRecord::ocr`].
    pub fn extract(&self, path: impl AsRef<Path>) -> Result<DocumentResult, ExtractError> {
        let start = Instant::now();
        let path = input::validate_pdf_path(path.as_ref())?;
        info!("Starting extraction: {}", path.display());

        let pdfium = document::bind_pdfium(&self.config)?;
        let doc = PdfiumDocument::open(&pdfium, &path, self.config.password.as_deref())?;
        let result = self.extract_pages(&doc)?;

        info!(
            "Extraction complete: {} pages, {} lines, {}ms",
            result.page_count(),
            result.lines().count(),
            start.elapsed().as_millis()
        );
        Ok(result)
    }

    /// Run [`Self::extract`] on Tokio's blocking pool.
    ///
    /// pdfium and the OCR subprocess both block, so they stay off the async
    /// worker threads.
    pub async fn extract_async(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<DocumentResult, ExtractError> {
        let extractor = self.clone();
        let path = path.as_ref().to_path_buf();

        tokio::task::spawn_blocking(move || extractor.extract(&path))
            .await
            .map_err(|e| ExtractError::Internal(format!("Extraction task panicked: {}", e)))?
    }

    /// Extract from PDF bytes held in memory, e.g. an upload.
    ///
    /// The bytes are written to a managed temp file that is deleted on
    /// return.
    pub fn extract_from_bytes(&self, bytes: &[u8]) -> Result<DocumentResult, ExtractError> {
        let mut tmp = tempfile::Builder::new()
            .suffix(".pdf")
            .tempfile()
            .map_err(|e| ExtractError::Internal(format!("tempfile: {e}")))?;
        tmp.write_all(bytes)
            .map_err(|e| ExtractError::Internal(format!("tempfile write: {e}")))?;
        tmp.flush()
            .map_err(|e| ExtractError::Internal(format!("tempfile flush: {e}")))?;
        self.extract(tmp.path())
    }

    /// Produce the flat raw text for a content source.
    ///
    /// PDFs yield [`DocumentResult::joined_text`]; forms yield
    /// [`crate::ServiceForm::to_raw_text`].
    pub fn raw_text(&self, source: &ContentSource) -> Result<String, ExtractError> {
        match source {
            ContentSource::Pdf(path) => Ok(self.extract(path)?.joined_text()),
            ContentSource::PdfBytes(bytes) => Ok(self.extract_from_bytes(bytes)?.joined_text()),
            ContentSource::Form(form) => Ok(form.to_raw_text()),
        }
    }

    /// Extract every page of an already-open document.
    pub fn extract_pages(&self, source: &dyn PageSource) -> Result<DocumentResult, ExtractError> {
        let total = source.page_count();
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_extraction_start(total);
        }

        let mut pages = Vec::with_capacity(total);
        for index in 0..total {
            pages.push(self.extract_page(source, index, total)?);
        }
        let result = DocumentResult { pages };

        if let Some(ref cb) = self.config.progress_callback {
            let ocr_pages = result.pages.iter().filter(|p| p.ocr.ran()).count();
            cb.on_extraction_complete(total, ocr_pages);
        }
        Ok(result)
    }

    fn extract_page(
        &self,
        source: &dyn PageSource,
        index: usize,
        total: usize,
    ) -> Result<PageRecord, ExtractError> {
        let page_num = index + 1;
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_page_start(page_num, total);
        }

        let native = source.native_page(index)?;
        let mut page_lines = lines::split_clean_lines(&native.text);
        let native_lines = page_lines.len();

        let wants_ocr = self.config.ocr_mode.wants_ocr(
            native_lines,
            native.image_count > 0,
            self.config.min_native_lines,
        );

        let ocr = match (wants_ocr, self.ocr.engine()) {
            (false, _) => OcrOutcome::NotNeeded,
            (true, None) => OcrOutcome::Unavailable,
            (true, Some(engine)) => match self.run_ocr(source, index, engine) {
                Ok(ocr_lines) => {
                    let added = lines::merge_unique(&mut page_lines, ocr_lines);
                    OcrOutcome::Applied { added }
                }
                Err(error) => {
                    warn!("{}", error);
                    if let Some(ref cb) = self.config.progress_callback {
                        cb.on_page_warning(page_num, total, &error.to_string());
                    }
                    OcrOutcome::Failed { error }
                }
            },
        };

        debug!(
            "Page {}: {} native lines, {} images, ocr {:?}, {} lines total",
            page_num,
            native_lines,
            native.image_count,
            ocr,
            page_lines.len()
        );

        if let Some(ref cb) = self.config.progress_callback {
            cb.on_page_complete(page_num, total, page_lines.len());
        }

        Ok(PageRecord {
            page: page_num,
            lines: page_lines,
            native_lines,
            ocr,
        })
    }

    fn run_ocr(
        &self,
        source: &dyn PageSource,
        index: usize,
        engine: &dyn OcrEngine,
    ) -> Result<Vec<String>, PageError> {
        let bitmap = source.rasterize(
            index,
            self.config.ocr_dpi,
            self.config.max_rendered_pixels,
        )?;
        let text = engine
            .recognize(&bitmap)
            .map_err(|e| PageError::OcrFailed {
                page: index + 1,
                detail: format!("{} {}", engine.name(), e),
            })?;
        Ok(lines::split_clean_lines(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OcrMode;
    use crate::error::OcrError;
    use crate::pipeline::document::NativePage;
    use image::DynamicImage;

    struct OnePage {
        text: &'static str,
        images: usize,
    }

    impl PageSource for OnePage {
        fn page_count(&self) -> usize {
            1
        }

        fn native_page(&self, _index: usize) -> Result<NativePage, ExtractError> {
            Ok(NativePage {
                text: self.text.to_string(),
                image_count: self.images,
            })
        }

        fn rasterize(&self, _: usize, _: u32, _: u32) -> Result<DynamicImage, PageError> {
            Ok(DynamicImage::new_rgb8(2, 2))
        }
    }

    struct Echo(&'static str);

    impl OcrEngine for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn recognize(&self, _page: &DynamicImage) -> Result<String, OcrError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn off_mode_skips_probe() {
        let config = ExtractionConfig::builder()
            .ocr_mode(OcrMode::Off)
            .build()
            .unwrap();
        let extractor = ContentExtractor::new(config);
        assert!(!extractor.ocr_capability().is_available());
    }

    #[test]
    fn ocr_lines_follow_native_lines() {
        let extractor = ContentExtractor::with_capability(
            ExtractionConfig::default(),
            OcrCapability::with_engine(Echo("Header\nFrom the scan")),
        );
        let doc = extractor
            .extract_pages(&OnePage {
                text: "Header\r\nBody",
                images: 0,
            })
            .unwrap();

        let page = &doc.pages[0];
        assert_eq!(page.page, 1);
        assert_eq!(page.lines, vec!["Header", "Body", "From the scan"]);
        assert_eq!(page.native_lines, 2);
        assert_eq!(page.ocr, OcrOutcome::Applied { added: 1 });
    }

    #[test]
    fn always_mode_ocrs_dense_pages() {
        let config = ExtractionConfig::builder()
            .ocr_mode(OcrMode::Always)
            .build()
            .unwrap();
        let extractor =
            ContentExtractor::with_capability(config, OcrCapability::with_engine(Echo("extra")));
        let doc = extractor
            .extract_pages(&OnePage {
                text: "1\n2\n3\n4\n5\n6",
                images: 0,
            })
            .unwrap();
        assert_eq!(doc.pages[0].lines.len(), 7);
    }

    #[test]
    fn custom_threshold() {
        let config = ExtractionConfig::builder()
            .min_native_lines(2)
            .build()
            .unwrap();
        let extractor =
            ContentExtractor::with_capability(config, OcrCapability::with_engine(Echo("extra")));
        let doc = extractor
            .extract_pages(&OnePage {
                text: "one\ntwo",
                images: 0,
            })
            .unwrap();
        assert_eq!(doc.pages[0].ocr, OcrOutcome::NotNeeded);
    }

    #[test]
    fn missing_file_is_fatal() {
        let extractor =
            ContentExtractor::with_capability(ExtractionConfig::default(), OcrCapability::Unavailable);
        let err = extractor.extract("/no/such/service.pdf").unwrap_err();
        assert!(matches!(err, ExtractError::FileNotFound { .. }));
    }
}
