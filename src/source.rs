//! Where the raw service text comes from: an uploaded PDF or the service
//! form.
//!
//! Both end up as one flat text blob, which is what the slide generator
//! consumes. See [`crate::ContentExtractor::raw_text`].

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The four fields of the service description form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceForm {
    pub name: String,
    pub description: String,
    pub how_to_apply: String,
    pub eligibility: String,
}

impl ServiceForm {
    /// Fields joined with `\n` in form order: name, description,
    /// application process, eligibility. Empty fields are kept as empty
    /// lines.
    pub fn to_raw_text(&self) -> String {
        [
            self.name.as_str(),
            self.description.as_str(),
            self.how_to_apply.as_str(),
            self.eligibility.as_str(),
        ]
        .join("\n")
    }
}

/// Input to the "get content" step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    /// A PDF on disk.
    Pdf(PathBuf),
    /// An uploaded PDF held in memory.
    PdfBytes(Vec<u8>),
    /// A filled-in service form; no extraction needed.
    Form(ServiceForm),
}

impl From<ServiceForm> for ContentSource {
    fn from(form: ServiceForm) -> Self {
        ContentSource::Form(form)
    }
}

impl From<PathBuf> for ContentSource {
    fn from(path: PathBuf) -> Self {
        ContentSource::Pdf(path)
    }
}
