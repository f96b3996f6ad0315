//! # pdf2lines
//!
//! Extract per-page text lines from PDF documents, falling back to Tesseract
//! OCR on pages that look scanned or carry images.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input    check the file exists and starts with %PDF
//!  ├─ 2. Native   read each page's text layer via pdfium
//!  ├─ 3. Clean    collapse spaces/tabs, trim, drop empty lines
//!  ├─ 4. Decide   OCR if < 5 native lines or the page embeds an image
//!  ├─ 5. OCR      rasterise at 200 DPI, run tesseract, clean the same way
//!  ├─ 6. Merge    append OCR lines not already on the page (exact match)
//!  └─ 7. Output   one PageRecord per page, in page order
//! ```
//!
//! OCR is optional. If no `tesseract` binary is found when the extractor is
//! built, pages are extracted from their text layer only and nothing fails.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2lines::{ContentExtractor, ExtractionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let extractor = ContentExtractor::new(ExtractionConfig::default());
//!     let doc = extractor.extract("service.pdf")?;
//!     println!("{}", doc.joined_text());
//!     eprintln!("{:?}", doc.stats());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2lines` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod source;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder, OcrMode};
pub use error::{ExtractError, OcrError, PageError};
pub use extract::ContentExtractor;
pub use output::{DocumentResult, ExtractionStats, OcrOutcome, PageRecord};
pub use pipeline::document::{NativePage, PageSource};
pub use pipeline::ocr::{OcrCapability, OcrEngine, TesseractEngine};
pub use pipeline::probe::{ExecutableProbe, ProbeStrategy};
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use source::{ContentSource, ServiceForm};
