//! Locating external binaries: an ordered list of probe strategies.
//!
//! The OCR engine is found by trying each [`ProbeStrategy`] in turn; the
//! first strategy that yields an existing file wins. The platform-specific
//! part is only the default list of fixed paths, see
//! [`default_tesseract_paths`].

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Executable name of the Tesseract OCR engine.
pub const TESSERACT_BIN: &str = "tesseract";

/// One way of finding a binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeStrategy {
    /// Look the name up in the directories of `PATH`.
    SearchPath(String),
    /// Use this absolute path if it exists.
    Fixed(PathBuf),
}

/// Ordered probe list; the first hit wins.
#[derive(Debug, Clone, Default)]
pub struct ExecutableProbe {
    strategies: Vec<ProbeStrategy>,
}

impl ExecutableProbe {
    pub fn new(strategies: Vec<ProbeStrategy>) -> Self {
        Self { strategies }
    }

    /// `PATH` lookup for `name`, then each of `fallbacks` in order.
    pub fn search_then_fixed(name: &str, fallbacks: &[PathBuf]) -> Self {
        let mut strategies = vec![ProbeStrategy::SearchPath(name.to_string())];
        strategies.extend(fallbacks.iter().cloned().map(ProbeStrategy::Fixed));
        Self { strategies }
    }

    pub fn strategies(&self) -> &[ProbeStrategy] {
        &self.strategies
    }

    /// Resolve against the current process `PATH`.
    pub fn resolve(&self) -> Option<PathBuf> {
        self.resolve_with_path_var(std::env::var_os("PATH"))
    }

    /// Resolve against an explicit `PATH` value instead of the environment.
    pub fn resolve_with_path_var(&self, path_var: Option<OsString>) -> Option<PathBuf> {
        for strategy in &self.strategies {
            let hit = match strategy {
                ProbeStrategy::SearchPath(name) => path_var
                    .as_ref()
                    .and_then(|var| search_path(name, var)),
                ProbeStrategy::Fixed(path) => is_executable_file(path).then(|| path.clone()),
            };
            if let Some(found) = hit {
                debug!("Probe {:?} → {}", strategy, found.display());
                return Some(found);
            }
        }
        None
    }
}

/// Well-known Tesseract install locations for the current platform.
///
/// Windows installers default to Program Files (64- or 32-bit) or a
/// per-user AppData directory; Linux packages install to `/usr/bin`.
pub fn default_tesseract_paths() -> Vec<PathBuf> {
    if cfg!(windows) {
        let mut paths = vec![
            PathBuf::from(r"C:\Program Files\Tesseract-OCR\tesseract.exe"),
            PathBuf::from(r"C:\Program Files (x86)\Tesseract-OCR\tesseract.exe"),
        ];
        if let Some(home) = dirs::home_dir() {
            paths.push(
                home.join("AppData")
                    .join("Local")
                    .join("Tesseract-OCR")
                    .join("tesseract.exe"),
            );
        }
        paths.push(PathBuf::from("/usr/bin/tesseract"));
        paths
    } else {
        vec![PathBuf::from("/usr/bin/tesseract")]
    }
}

fn search_path(name: &str, path_var: &OsString) -> Option<PathBuf> {
    std::env::split_paths(path_var)
        .filter(|dir| !dir.as_os_str().is_empty())
        .flat_map(|dir| candidate_names(name).into_iter().map(move |n| dir.join(n)))
        .find(|candidate| is_executable_file(candidate))
}

fn candidate_names(name: &str) -> Vec<String> {
    if cfg!(windows) && Path::new(name).extension().is_none() {
        vec![format!("{name}.exe"), name.to_string()]
    } else {
        vec![name.to_string()]
    }
}

#[cfg(unix)]
pub(crate) fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
pub(crate) fn is_executable_file(path: &Path) -> bool {
    path.is_file()
}
