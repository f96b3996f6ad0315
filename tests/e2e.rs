//! End-to-end tests against real PDFs.
//!
//! A small three-page PDF is generated in memory; larger samples are read
//! from `./test_cases/` when present. These need libpdfium (and, for the
//! scanned-sample tests, a tesseract install), so they are gated behind the
//! `E2E_ENABLED` environment variable.
//!
//! Run with:
//!   E2E_ENABLED=1 PDFIUM_LIB_PATH=./libpdfium.so cargo test --test e2e -- --nocapture

use image::DynamicImage;
use pdf2lines::pipeline::document::{bind_pdfium, PdfiumDocument};
use pdf2lines::{
    ContentExtractor, ExtractError, ExtractionConfig, OcrCapability, OcrEngine, OcrError,
    OcrMode, OcrOutcome, PageSource,
};
use std::path::PathBuf;

// ── Test helpers ─────────────────────────────────────────────────────────────

fn test_cases_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_cases")
}

/// Skip this test if E2E_ENABLED is not set *or* no PDF file at `path`.
macro_rules! e2e_skip_unless_ready {
    ($path:expr) => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        let p: PathBuf = $path;
        if !p.exists() {
            println!("SKIP — test file not found: {}", p.display());
            return;
        }
        p
    }};
}

macro_rules! e2e_skip_unless_enabled {
    () => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
    }};
}

fn native_only() -> ContentExtractor {
    let config = ExtractionConfig::builder()
        .ocr_mode(OcrMode::Off)
        .build()
        .expect("valid config");
    ContentExtractor::new(config)
}

// ── Native text ──────────────────────────────────────────────────────────────

#[test]
fn text_pdf_extracts_without_ocr() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("service_text.pdf"));

    let doc = native_only().extract(&path).expect("extraction should succeed");

    assert!(doc.page_count() > 0);
    assert!(doc.pages.iter().all(|p| p.ocr == OcrOutcome::NotNeeded));
    assert!(doc.lines().all(|l| !l.is_empty() && l == l.trim()));
    for (i, page) in doc.pages.iter().enumerate() {
        assert_eq!(page.page, i + 1);
    }
    println!("{:?}", doc.stats());
}

#[test]
fn extraction_twice_is_identical() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("service_text.pdf"));

    let extractor = native_only();
    let a = extractor.extract(&path).expect("first run");
    let b = extractor.extract(&path).expect("second run");
    assert_eq!(a, b);
}

#[test]
fn bytes_match_path() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("service_text.pdf"));

    let extractor = native_only();
    let from_path = extractor.extract(&path).expect("path");
    let bytes = std::fs::read(&path).expect("read");
    let from_bytes = extractor.extract_from_bytes(&bytes).expect("bytes");
    assert_eq!(from_path, from_bytes);
}

#[test]
fn corrupt_pdf_is_fatal() {
    e2e_skip_unless_enabled!();

    let err = native_only()
        .extract_from_bytes(b"%PDF-1.4\nthis is not really a pdf")
        .unwrap_err();
    assert!(matches!(err, ExtractError::CorruptPdf { .. }), "got {err:?}");
}

// ── OCR fallback ─────────────────────────────────────────────────────────────

#[test]
fn scanned_pdf_uses_ocr_when_available() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("service_scanned.pdf"));

    let extractor = ContentExtractor::new(ExtractionConfig::default());
    if !extractor.ocr_capability().is_available() {
        println!("SKIP — tesseract not installed");
        return;
    }

    let doc = extractor.extract(&path).expect("extraction should succeed");
    assert!(doc.pages.iter().any(|p| p.ocr.ran()));
    assert!(!doc.joined_text().trim().is_empty());
}

#[test]
fn scanned_pdf_without_ocr_degrades() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("service_scanned.pdf"));

    let extractor =
        ContentExtractor::with_capability(ExtractionConfig::default(), OcrCapability::Unavailable);
    let doc = extractor.extract(&path).expect("no error without OCR");
    assert!(doc.pages.iter().all(|p| !p.ocr.ran()));
}

#[tokio::test]
async fn async_extraction_matches_sync() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("service_text.pdf"));

    let extractor = native_only();
    let sync = extractor.extract(&path).expect("sync");
    let async_doc = extractor.extract_async(&path).await.expect("async");
    assert_eq!(sync, async_doc);
}

// ── Generated fixture ────────────────────────────────────────────────────────
//
// Page 1: six text lines, no images.
// Page 2: one image XObject drawn directly, no text.
// Page 3: eight text lines plus a Form XObject that draws the same image.

fn stream(dict: &str, data: &[u8]) -> Vec<u8> {
    let mut out = format!("<< {dict} /Length {} >>\nstream\n", data.len()).into_bytes();
    out.extend_from_slice(data);
    out.extend_from_slice(b"\nendstream");
    out
}

fn text_content(lines: &[String]) -> String {
    let mut ops = String::from("BT /F1 12 Tf 16 TL 72 720 Td ");
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            ops.push_str("T* ");
        }
        ops.push_str(&format!("({line}) Tj "));
    }
    ops.push_str("ET");
    ops
}

/// Serialise numbered objects (1-based) with a valid xref table.
fn assemble_pdf(objects: &[Vec<u8>]) -> Vec<u8> {
    let mut pdf = b"%PDF-1.7\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n", i + 1).as_bytes());
        pdf.extend_from_slice(body);
        pdf.extend_from_slice(b"\nendobj\n");
    }
    let xref = pdf.len();
    pdf.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
    for offset in offsets {
        pdf.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    pdf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref}\n%%EOF\n",
            objects.len() + 1
        )
        .as_bytes(),
    );
    pdf
}

fn service_lines(prefix: &str, n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("{prefix} line {i}")).collect()
}

fn mixed_content_pdf() -> Vec<u8> {
    let page = |resources: &str, contents: usize| {
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << {resources} >> /Contents {contents} 0 R >>"
        )
        .into_bytes()
    };

    let mut dense = text_content(&service_lines("Eligibility", 8));
    dense.push_str(" q 100 0 0 100 400 80 cm /Fm0 Do Q");

    assemble_pdf(&[
        b"<< /Type /Catalog /Pages 2 0 R >>".to_vec(),
        b"<< /Type /Pages /Kids [3 0 R 4 0 R 5 0 R] /Count 3 >>".to_vec(),
        page("/Font << /F1 6 0 R >>", 7),
        page("/XObject << /Im0 8 0 R >>", 9),
        page("/Font << /F1 6 0 R >> /XObject << /Fm0 10 0 R >>", 11),
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_vec(),
        stream("", text_content(&service_lines("Apply", 6)).as_bytes()),
        stream(
            "/Type /XObject /Subtype /Image /Width 2 /Height 2 \
             /ColorSpace /DeviceGray /BitsPerComponent 8",
            &[0x00, 0xff, 0xff, 0x00],
        ),
        stream("", b"q 200 0 0 200 100 400 cm /Im0 Do Q"),
        stream(
            "/Type /XObject /Subtype /Form /BBox [0 0 1 1] \
             /Resources << /XObject << /Im0 8 0 R >> >>",
            b"/Im0 Do",
        ),
        stream("", dense.as_bytes()),
    ])
}

struct CannedOcr;

impl OcrEngine for CannedOcr {
    fn name(&self) -> &str {
        "canned"
    }

    fn recognize(&self, _page: &DynamicImage) -> Result<String, OcrError> {
        Ok("Scanned notice\n".to_string())
    }
}

#[test]
fn images_inside_form_xobjects_are_counted() {
    e2e_skip_unless_enabled!();

    let dir = tempfile::TempDir::new().expect("tempdir");
    let path = dir.path().join("mixed.pdf");
    std::fs::write(&path, mixed_content_pdf()).expect("write fixture");

    let config = ExtractionConfig::default();
    let pdfium = bind_pdfium(&config).expect("libpdfium");
    let doc = PdfiumDocument::open(&pdfium, &path, None).expect("open fixture");

    assert_eq!(doc.page_count(), 3);
    let counts: Vec<usize> = (0..3)
        .map(|i| doc.native_page(i).expect("native page").image_count)
        .collect();
    assert_eq!(counts, vec![0, 1, 1]);
    assert!(doc.native_page(0).unwrap().text.contains("Apply line 1"));
    assert!(doc.native_page(1).unwrap().text.trim().is_empty());
}

#[test]
fn form_wrapped_image_triggers_ocr_on_dense_page() {
    e2e_skip_unless_enabled!();

    let extractor = ContentExtractor::with_capability(
        ExtractionConfig::default(),
        OcrCapability::with_engine(CannedOcr),
    );
    let doc = extractor
        .extract_from_bytes(&mixed_content_pdf())
        .expect("extraction should succeed");

    assert_eq!(doc.page_count(), 3);

    assert_eq!(doc.pages[0].ocr, OcrOutcome::NotNeeded);
    assert!(doc.pages[0].native_lines >= 5);

    assert_eq!(doc.pages[1].native_lines, 0);
    assert_eq!(doc.pages[1].lines, vec!["Scanned notice"]);

    let dense = &doc.pages[2];
    assert!(dense.native_lines >= 5, "got {dense:?}");
    assert_eq!(dense.ocr, OcrOutcome::Applied { added: 1 });
    assert_eq!(dense.lines.last().map(String::as_str), Some("Scanned notice"));
}
