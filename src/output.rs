//! Extraction results: per-page records and the document they form.

use crate::error::PageError;
use serde::{Deserialize, Serialize};

/// What happened to the OCR fallback on one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OcrOutcome {
    /// The page had enough native text and no images (or OCR mode is `Off`).
    NotNeeded,
    /// OCR was wanted but no engine is available.
    Unavailable,
    /// OCR ran; `added` lines were new to the page.
    Applied { added: usize },
    /// Rasterisation or recognition failed; the page kept its native lines.
    Failed { error: PageError },
}

impl OcrOutcome {
    pub fn ran(&self) -> bool {
        matches!(self, OcrOutcome::Applied { .. })
    }
}

/// Cleaned text lines of one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// 1-indexed page number.
    pub page: usize,
    /// Non-empty, whitespace-normalised lines: native lines first, then OCR
    /// lines not already present.
    pub lines: Vec<String>,
    /// How many of `lines` came from the text layer.
    pub native_lines: usize,
    pub ocr: OcrOutcome,
}

/// All page records of one document, in physical page order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentResult {
    pub pages: Vec<PageRecord>,
}

impl DocumentResult {
    /// Every line of every page joined with `\n`, the form the slide
    /// generator consumes.
    pub fn joined_text(&self) -> String {
        self.lines().collect::<Vec<_>>().join("\n")
    }

    /// Iterate over all lines across pages, in order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.pages
            .iter()
            .flat_map(|p| p.lines.iter().map(String::as_str))
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn stats(&self) -> ExtractionStats {
        let mut stats = ExtractionStats {
            total_pages: self.pages.len(),
            ..Default::default()
        };
        for page in &self.pages {
            stats.total_lines += page.lines.len();
            stats.native_lines += page.native_lines;
            match page.ocr {
                OcrOutcome::Applied { added } => {
                    stats.ocr_pages += 1;
                    stats.ocr_lines += added;
                }
                OcrOutcome::Failed { .. } => stats.ocr_failures += 1,
                OcrOutcome::Unavailable => stats.ocr_skipped += 1,
                OcrOutcome::NotNeeded => {}
            }
            if page.lines.is_empty() {
                stats.empty_pages += 1;
            }
        }
        stats
    }
}

/// Summary counts over a [`DocumentResult`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    pub total_pages: usize,
    pub total_lines: usize,
    pub native_lines: usize,
    /// Pages on which OCR ran successfully.
    pub ocr_pages: usize,
    /// Lines contributed by OCR after dedup.
    pub ocr_lines: usize,
    pub ocr_failures: usize,
    /// Pages that wanted OCR but had no engine.
    pub ocr_skipped: usize,
    pub empty_pages: usize,
}
