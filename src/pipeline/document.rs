//! Page access: the [`PageSource`] seam and its pdfium implementation.
//!
//! The extractor only needs three things from a document: how many pages it
//! has, each page's text layer plus whether it embeds raster images, and a
//! bitmap of a page for OCR. [`PdfiumDocument`] provides them from a real
//! PDF; tests provide them from memory.

use crate::config::ExtractionConfig;
use crate::error::{ExtractError, PageError};
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What native extraction sees on one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NativePage {
    /// Raw text layer, line breaks intact.
    pub text: String,
    /// Number of embedded raster image objects.
    pub image_count: usize,
}

/// A document the extractor can walk page by page.
///
/// Indices are 0-based; page numbers in errors are 1-based.
pub trait PageSource {
    fn page_count(&self) -> usize;

    /// Read the text layer and count embedded images. Failure is fatal.
    fn native_page(&self, index: usize) -> Result<NativePage, ExtractError>;

    /// Render the page for OCR. Failure only affects this page.
    fn rasterize(&self, index: usize, dpi: u32, max_pixels: u32)
        -> Result<DynamicImage, PageError>;
}

/// Bind to a pdfium library.
///
/// Resolution order: `config.pdfium_library`, `PDFIUM_LIB_PATH`, the
/// platform library name in the working directory, then the system loader.
pub fn bind_pdfium(config: &ExtractionConfig) -> Result<Pdfium, ExtractError> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(ref p) = config.pdfium_library {
        candidates.push(p.clone());
    }
    if let Some(p) = std::env::var_os("PDFIUM_LIB_PATH") {
        candidates.push(PathBuf::from(p));
    }
    candidates.push(PathBuf::from(".").join(platform_library_name()));

    let mut last_error = String::from("no candidate library found");
    for candidate in candidates.iter().filter(|p| p.exists()) {
        match Pdfium::bind_to_library(candidate) {
            Ok(bindings) => {
                debug!("Bound pdfium from {}", candidate.display());
                return Ok(Pdfium::new(bindings));
            }
            Err(e) => last_error = format!("{}: {:?}", candidate.display(), e),
        }
    }

    Pdfium::bind_to_system_library()
        .map(Pdfium::new)
        .map_err(|e| ExtractError::PdfiumBindingFailed(format!("{last_error}; system: {e:?}")))
}

/// Count raster images drawn by `object`, looking inside Form XObjects.
fn raster_images_in(object: &PdfPageObject) -> usize {
    match object.object_type() {
        PdfPageObjectType::Image => 1,
        PdfPageObjectType::XObjectForm => object
            .as_x_object_form_object()
            .map(|form| form.iter().map(|inner| raster_images_in(&inner)).sum())
            .unwrap_or(0),
        _ => 0,
    }
}

fn platform_library_name() -> String {
    format!(
        "{}pdfium{}",
        std::env::consts::DLL_PREFIX,
        std::env::consts::DLL_SUFFIX
    )
}

/// A PDF opened read-only through pdfium.
///
/// The document is closed when this value is dropped.
pub struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
}

impl<'a> PdfiumDocument<'a> {
    /// Open `path`, mapping pdfium load errors to fatal extraction errors.
    pub fn open(
        pdfium: &'a Pdfium,
        path: &Path,
        password: Option<&'a str>,
    ) -> Result<Self, ExtractError> {
        let document = pdfium.load_pdf_from_file(path, password).map_err(|e| {
            let err_str = format!("{:?}", e);
            if err_str.contains("Password") || err_str.contains("password") {
                if password.is_some() {
                    ExtractError::WrongPassword {
                        path: path.to_path_buf(),
                    }
                } else {
                    ExtractError::PasswordRequired {
                        path: path.to_path_buf(),
                    }
                }
            } else {
                ExtractError::CorruptPdf {
                    path: path.to_path_buf(),
                    detail: err_str,
                }
            }
        })?;

        info!("PDF loaded: {} pages", document.pages().len());
        Ok(Self { document })
    }

    fn page(&self, index: usize) -> Result<PdfPage<'a>, String> {
        let index = PdfPageIndex::try_from(index).map_err(|e| e.to_string())?;
        self.document
            .pages()
            .get(index)
            .map_err(|e| format!("{:?}", e))
    }
}

impl PageSource for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn native_page(&self, index: usize) -> Result<NativePage, ExtractError> {
        let failed = |detail: String| ExtractError::TextExtractionFailed {
            page: index + 1,
            detail,
        };

        let page = self.page(index).map_err(failed)?;
        let text = page
            .text()
            .map_err(|e| failed(format!("{:?}", e)))?
            .all();
        let image_count = page.objects().iter().map(|o| raster_images_in(&o)).sum();

        Ok(NativePage { text, image_count })
    }

    fn rasterize(
        &self,
        index: usize,
        dpi: u32,
        max_pixels: u32,
    ) -> Result<DynamicImage, PageError> {
        let failed = |detail: String| PageError::RenderFailed {
            page: index + 1,
            detail,
        };

        let page = self.page(index).map_err(failed)?;

        // PDF user space is 72 units per inch.
        let max_pixels = i32::try_from(max_pixels).unwrap_or(i32::MAX);
        let render_config = PdfRenderConfig::new()
            .scale_page_by_factor(dpi as f32 / 72.0)
            .set_maximum_width(max_pixels)
            .set_maximum_height(max_pixels);

        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| failed(format!("{:?}", e)))?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px at {} DPI",
            index + 1,
            image.width(),
            image.height(),
            dpi
        );
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_library_name_has_pdfium() {
        let name = platform_library_name();
        assert!(name.contains("pdfium"));
        if cfg!(target_os = "linux") {
            assert_eq!(name, "libpdfium.so");
        }
        if cfg!(windows) {
            assert_eq!(name, "pdfium.dll");
        }
    }
}
