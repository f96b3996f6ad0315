//! CLI binary for pdf2lines.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ExtractionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2lines::{
    ContentExtractor, DocumentResult, ExtractionConfig, ExtractionProgressCallback, OcrCapability,
    OcrMode, ProgressCallback,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress bar with one log line per page.
struct CliProgressCallback {
    bar: ProgressBar,
    warnings: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Extracting");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            warnings: AtomicUsize::new(0),
        })
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_extraction_start(&self, total_pages: usize) {
        self.bar.set_length(total_pages as u64);
        self.bar.reset_eta();
    }

    fn on_page_start(&self, page_num: usize, _total: usize) {
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_complete(&self, page_num: usize, total: usize, line_count: usize) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            green("✓"),
            page_num,
            total,
            dim(&format!("{line_count:>4} lines")),
        ));
        self.bar.inc(1);
    }

    fn on_page_warning(&self, page_num: usize, total: usize, warning: &str) {
        self.warnings.fetch_add(1, Ordering::SeqCst);

        // Truncate very long engine output to keep the log tidy.
        let msg: String = if warning.chars().count() > 80 {
            let head: String = warning.chars().take(79).collect();
            format!("{head}\u{2026}")
        } else {
            warning.to_string()
        };

        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            yellow("⚠"),
            page_num,
            total,
            yellow(&msg),
        ));
    }

    fn on_extraction_complete(&self, total_pages: usize, ocr_pages: usize) {
        self.bar.finish_and_clear();
        let warnings = self.warnings.load(Ordering::SeqCst);
        eprintln!(
            "{} {} pages extracted  ({} via OCR{})",
            if warnings == 0 { green("✔") } else { yellow("⚠") },
            bold(&total_pages.to_string()),
            ocr_pages,
            if warnings == 0 {
                String::new()
            } else {
                format!(", {warnings} OCR failures")
            },
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Joined text of all pages (stdout)
  pdf2lines service.pdf

  # Write to a file
  pdf2lines service.pdf -o service.txt

  # First 10 lines of every page
  pdf2lines --preview 10 service.pdf

  # Per-page records with OCR outcomes as JSON
  pdf2lines --json service.pdf > service.json

  # Native text only
  pdf2lines --ocr off service.pdf

  # Scanned Bengali leaflet at higher resolution
  pdf2lines --lang ben+eng --dpi 300 leaflet.pdf

  # Which OCR engine would be used?
  pdf2lines --probe-only

OCR DECISION (--ocr auto):
  A page is OCR'd when its text layer yields fewer than --min-lines
  non-empty lines, or when it embeds at least one raster image. OCR lines
  already present on the page are not repeated.

ENVIRONMENT VARIABLES:
  TESSERACT_CMD     Path to the tesseract binary (skips PATH probing)
  PDFIUM_LIB_PATH   Path to an existing libpdfium
  RUST_LOG          Log filter, e.g. pdf2lines=debug
"#;

/// Extract per-page text lines from PDFs, with OCR fallback.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2lines",
    version,
    about = "Extract per-page text lines from PDFs, with Tesseract OCR fallback",
    long_about = "Extract the text of a PDF page by page. Native text is read from the PDF \
text layer; pages that look scanned or carry images are rasterised and read with Tesseract, \
and any new lines are appended to the page.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path.
    #[arg(required_unless_present = "probe_only")]
    input: Option<PathBuf>,

    /// Write output to this file instead of stdout.
    #[arg(short, long, env = "PDF2LINES_OUTPUT")]
    output: Option<PathBuf>,

    /// OCR rasterisation DPI (72–600).
    #[arg(long, env = "PDF2LINES_DPI", default_value_t = 200,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// When to OCR: auto, off, always.
    #[arg(long, env = "PDF2LINES_OCR", value_enum, default_value = "auto")]
    ocr: OcrArg,

    /// Pages with fewer native lines than this are OCR'd in auto mode.
    #[arg(long, env = "PDF2LINES_MIN_LINES", default_value_t = 5)]
    min_lines: usize,

    /// Tesseract language code(s), e.g. eng or eng+hin.
    #[arg(long, env = "PDF2LINES_LANG", default_value = "eng")]
    lang: String,

    /// Path to the tesseract binary.
    #[arg(long, env = "TESSERACT_CMD")]
    tesseract: Option<PathBuf>,

    /// Path to libpdfium.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2LINES_PASSWORD")]
    password: Option<String>,

    /// Output per-page records as JSON instead of joined text.
    #[arg(long, conflicts_with = "preview")]
    json: bool,

    /// Print only the first N lines of each page under a page header.
    #[arg(long, value_name = "N")]
    preview: Option<usize>,

    /// Disable progress bar.
    #[arg(long, env = "PDF2LINES_NO_PROGRESS")]
    no_progress: bool,

    /// Report the OCR engine that would be used, then exit.
    #[arg(long)]
    probe_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2LINES_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2LINES_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum OcrArg {
    Auto,
    Off,
    Always,
}

impl From<OcrArg> for OcrMode {
    fn from(v: OcrArg) -> Self {
        match v {
            OcrArg::Auto => OcrMode::Auto,
            OcrArg::Off => OcrMode::Off,
            OcrArg::Always => OcrMode::Always,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar already reports per-page status; keep INFO logs out
    // of its way unless asked for.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.probe_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let progress: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ExtractionProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress)?;
    let extractor = ContentExtractor::new(config);

    // ── Probe-only mode ──────────────────────────────────────────────────
    if cli.probe_only {
        match extractor.ocr_capability() {
            OcrCapability::Available(engine) => println!("OCR engine:   {}", engine.name()),
            OcrCapability::Unavailable => println!("OCR engine:   none (native text only)"),
        }
        println!("OCR language: {}", extractor.config().ocr_language);
        println!("OCR DPI:      {}", extractor.config().ocr_dpi);
        return Ok(());
    }

    let input = cli
        .input
        .as_ref()
        .context("An input PDF path is required")?;

    // ── Run extraction ───────────────────────────────────────────────────
    let start = Instant::now();
    let doc = extractor
        .extract_async(input)
        .await
        .with_context(|| format!("Extraction failed for {}", input.display()))?;

    let rendered = render_output(&doc, &cli)?;

    if let Some(ref output_path) = cli.output {
        write_atomic(output_path, &rendered)?;
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(rendered.as_bytes())
            .context("Failed to write to stdout")?;
        if !rendered.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }

    if !cli.quiet {
        let stats = doc.stats();
        eprintln!(
            "   {} pages  {} lines  ({} from OCR)  {}ms{}",
            stats.total_pages,
            stats.total_lines,
            stats.ocr_lines,
            start.elapsed().as_millis(),
            cli.output
                .as_ref()
                .map(|p| format!("  →  {}", bold(&p.display().to_string())))
                .unwrap_or_default(),
        );
        if stats.ocr_skipped > 0 {
            eprintln!(
                "   {}",
                dim(&format!(
                    "{} pages looked scanned but no OCR engine was available",
                    stats.ocr_skipped
                ))
            );
        }
    }

    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ExtractionConfig> {
    let mut builder = ExtractionConfig::builder()
        .ocr_dpi(cli.dpi)
        .ocr_mode(cli.ocr.clone().into())
        .min_native_lines(cli.min_lines)
        .ocr_language(&cli.lang);

    if let Some(ref bin) = cli.tesseract {
        builder = builder.ocr_binary(bin);
    }
    if let Some(ref lib) = cli.pdfium_lib {
        builder = builder.pdfium_library(lib);
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Render the document in the format the flags ask for.
fn render_output(doc: &DocumentResult, cli: &Cli) -> Result<String> {
    if cli.json {
        return serde_json::to_string_pretty(doc).context("Failed to serialise output");
    }
    if let Some(n) = cli.preview {
        return Ok(preview(doc, n));
    }
    Ok(doc.joined_text())
}

fn preview(doc: &DocumentResult, max_lines: usize) -> String {
    let mut out = String::new();
    for page in &doc.pages {
        out.push_str(&format!("--- Page {} ---\n", page.page));
        for line in page.lines.iter().take(max_lines) {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

/// Write via a temp file and rename so readers never see a partial file.
///
/// The temp file gets a unique name in the target directory, so no sibling
/// file is ever clobbered.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
            parent
        }
        None => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create a temp file in {}", parent.display()))?;
    tmp.write_all(contents.as_bytes())
        .with_context(|| format!("Failed to write {}", tmp.path().display()))?;
    tmp.persist(path)
        .with_context(|| format!("Failed to move output into {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_atomic_leaves_siblings_alone() {
        let dir = TempDir::new().unwrap();
        let sibling = dir.path().join("report.tmp");
        std::fs::write(&sibling, "keep me").unwrap();

        let target = dir.path().join("report.txt");
        write_atomic(&target, "line one\nline two").unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "line one\nline two");
        assert_eq!(std::fs::read_to_string(&sibling).unwrap(), "keep me");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn write_atomic_replaces_and_creates_parents() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out").join("lines.txt");

        write_atomic(&target, "old").unwrap();
        write_atomic(&target, "new").unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "new");
    }
}
