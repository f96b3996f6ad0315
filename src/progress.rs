//! Progress-callback trait for per-page extraction events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to receive
//! events as the extractor walks the document. Pages are processed strictly
//! in order on a single thread, so events arrive in page order.
//!
//! # Example
//!
//! ```rust
//! use pdf2lines::{ExtractionConfig, ExtractionProgressCallback};
//! use std::sync::Arc;
//!
//! struct Printer;
//!
//! impl ExtractionProgressCallback for Printer {
//!     fn on_page_complete(&self, page_num: usize, total_pages: usize, line_count: usize) {
//!         eprintln!("page {page_num}/{total_pages}: {line_count} lines");
//!     }
//! }
//!
//! let config = ExtractionConfig::builder()
//!     .progress_callback(Arc::new(Printer))
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the extractor as it processes each page.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once after the document is opened.
    fn on_extraction_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called before native text extraction of a page.
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called once the page record is final.
    ///
    /// # Arguments
    /// * `page_num`   — 1-indexed page number
    /// * `total_pages` — total pages in the document
    /// * `line_count` — number of lines in the page record
    fn on_page_complete(&self, page_num: usize, total_pages: usize, line_count: usize) {
        let _ = (page_num, total_pages, line_count);
    }

    /// Called when the OCR fallback failed on a page. The page still
    /// completes with its native lines.
    fn on_page_warning(&self, page_num: usize, total_pages: usize, warning: &str) {
        let _ = (page_num, total_pages, warning);
    }

    /// Called once after every page has been emitted.
    ///
    /// # Arguments
    /// * `total_pages` — pages in the document
    /// * `ocr_pages`   — pages whose OCR fallback ran successfully
    fn on_extraction_complete(&self, total_pages: usize, ocr_pages: usize) {
        let _ = (total_pages, ocr_pages);
    }
}

/// A no-op implementation, the default when no callback is configured.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;
