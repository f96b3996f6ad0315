//! Line cleanup and merging shared by the native and OCR text sources.
//!
//! Both sources go through [`split_clean_lines`], so a line that pdfium and
//! Tesseract read identically ends up as the same string and is caught by
//! the exact-match dedup in [`merge_unique`]. Near-duplicates ("Eligibility
//! Criteria" vs "Eligibility Criteria:") are kept.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_HORIZONTAL_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());

/// Collapse runs of spaces/tabs to one space and trim the ends.
///
/// Idempotent: `clean_line(&clean_line(s)) == clean_line(s)`.
pub fn clean_line(line: &str) -> String {
    RE_HORIZONTAL_WS.replace_all(line, " ").trim().to_string()
}

/// Split raw text into cleaned, non-empty lines in document order.
///
/// pdfium separates lines with `\r\n`; Tesseract with `\n`. Both are handled.
pub fn split_clean_lines(text: &str) -> Vec<String> {
    text.split(['\n', '\r'])
        .map(clean_line)
        .filter(|l| !l.is_empty())
        .collect()
}

/// Append each candidate not already present verbatim in `lines`.
///
/// Returns how many lines were appended. Candidates appended earlier in the
/// same call count as present.
pub fn merge_unique(lines: &mut Vec<String>, candidates: Vec<String>) -> usize {
    let before = lines.len();
    for candidate in candidates {
        if !lines.contains(&candidate) {
            lines.push(candidate);
        }
    }
    lines.len() - before
}
