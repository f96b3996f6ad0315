//! Pipeline stages for per-page content extraction.
//!
//! ```text
//! input ──▶ document ──▶ lines ──▶ (ocr decision) ──▶ document::rasterize ──▶ ocr ──▶ lines::merge
//! (path)    (pdfium)     (clean)                       (bitmap)               (tesseract)
//! ```
//!
//! 1. [`input`]    — check the path is an existing, readable PDF
//! 2. [`document`] — open the PDF via pdfium; text layer, image count, bitmaps
//! 3. [`lines`]    — whitespace cleanup and exact-match merge of text sources
//! 4. [`ocr`]      — the OCR engine seam and the Tesseract CLI engine
//! 5. [`probe`]    — ordered lookup of the OCR binary

pub mod document;
pub mod input;
pub mod lines;
pub mod ocr;
pub mod probe;
