//! Bootstrap script injection into the web client's `index.html`
//!
//! The preferred path patches the file on disk. When that is impossible
//! (no web directory, no index file, unwritable file) a transformation is
//! registered instead so the server rewrites the page on the fly. Removal
//! always retracts both.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Tag added to the page
pub const SCRIPT_TAG: &str = r#"<script src="../Seasonals/Resources/seasonals.js" defer></script>"#;
/// Tag written by older releases
pub const LEGACY_SCRIPT_TAG: &str = r#"<script src="/Seasonals/Resources/seasonals.js" defer></script>"#;
/// The tag is inserted right before this marker (matched case-insensitively)
pub const BODY_MARKER: &str = "</body>";

/// Fixed id of the fallback transformation
pub const TRANSFORMATION_ID: &str = "ef1e863f-cbb0-4e47-9f23-f0cbb1826ad4";
/// File the fallback transformation applies to
pub const TRANSFORMATION_PATTERN: &str = "index.html";

const INDEX_FILE: &str = "index.html";

/// Injection errors
#[derive(Debug, thiserror::Error)]
pub enum InjectError {
    #[error("web path is not configured")]
    NoWebPath,

    #[error("index.html not found at {0}")]
    IndexMissing(PathBuf),

    #[error("failed to read {0}: {1}")]
    Read(PathBuf, #[source] io::Error),

    #[error("failed to write {0}: {1}")]
    Write(PathBuf, #[source] io::Error),

    #[error("transformation service unavailable: {0}")]
    Registry(String),
}

/// A page rewrite registered with the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformation {
    pub id: &'static str,
    pub file_name_pattern: &'static str,
}

impl Transformation {
    /// The transformation that adds the bootstrap tag
    pub fn seasonals() -> Self {
        Self {
            id: TRANSFORMATION_ID,
            file_name_pattern: TRANSFORMATION_PATTERN,
        }
    }

    /// Rewrite a page body; returns the input unchanged if nothing applies
    pub fn apply(&self, contents: &str) -> String {
        patch_index_html(contents).unwrap_or_else(|| contents.to_string())
    }
}

/// Server-side file transformation service
pub trait TransformationRegistry {
    fn register(&mut self, transformation: &Transformation) -> Result<(), InjectError>;

    /// Remove a registration; unknown ids are not an error
    fn unregister(&mut self, id: &str) -> Result<(), InjectError>;
}

/// Used when no transformation service is installed
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTransformationService;

impl TransformationRegistry for NoTransformationService {
    fn register(&mut self, _transformation: &Transformation) -> Result<(), InjectError> {
        Err(InjectError::Registry("file transformation plugin not found".to_string()))
    }

    fn unregister(&mut self, _id: &str) -> Result<(), InjectError> {
        Ok(())
    }
}

/// Keeps registrations in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistry {
    registered: Vec<Transformation>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.registered.iter().any(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }
}

impl TransformationRegistry for MemoryRegistry {
    fn register(&mut self, transformation: &Transformation) -> Result<(), InjectError> {
        if !self.is_registered(transformation.id) {
            self.registered.push(transformation.clone());
        }
        Ok(())
    }

    fn unregister(&mut self, id: &str) -> Result<(), InjectError> {
        self.registered.retain(|t| t.id != id);
        Ok(())
    }
}

/// Result of an injection attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectOutcome {
    /// The tag was written into the file
    Injected,
    /// A current or legacy tag is already there
    AlreadyPresent,
    /// The file has no `</body>`; left untouched
    NoBodyMarker,
    /// The file could not be patched; a transformation was registered
    Fallback,
    /// Neither patching nor the fallback worked
    Failed,
}

impl InjectOutcome {
    pub fn is_failed(&self) -> bool {
        *self == InjectOutcome::Failed
    }
}

/// Result of a removal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotPresent,
    /// No web directory or index file to clean
    NoIndex,
    Failed,
}

impl RemoveOutcome {
    pub fn is_failed(&self) -> bool {
        *self == RemoveOutcome::Failed
    }
}

/// Insert the tag before the first `</body>` unless a tag is already present
///
/// Returns `None` when nothing needs to change or no marker exists.
pub fn patch_index_html(contents: &str) -> Option<String> {
    if contains_tag(contents) {
        return None;
    }
    let index = contents.to_ascii_lowercase().find(BODY_MARKER)?;
    let mut patched = String::with_capacity(contents.len() + SCRIPT_TAG.len() + 1);
    patched.push_str(&contents[..index]);
    patched.push_str(SCRIPT_TAG);
    patched.push('\n');
    patched.push_str(&contents[index..]);
    Some(patched)
}

/// Strip every current and legacy tag, with or without its trailing newline
pub fn strip_script_tags(contents: &str) -> String {
    let mut stripped = contents.to_string();
    for tag in [SCRIPT_TAG, LEGACY_SCRIPT_TAG] {
        stripped = stripped
            .replace(&format!("{tag}\r\n"), "")
            .replace(&format!("{tag}\n"), "")
            .replace(tag, "");
    }
    stripped
}

fn contains_tag(contents: &str) -> bool {
    contents.contains(SCRIPT_TAG) || contents.contains(LEGACY_SCRIPT_TAG)
}

/// Adds and removes the bootstrap tag
#[derive(Debug, Clone)]
pub struct ScriptInjector {
    web_path: Option<PathBuf>,
}

impl ScriptInjector {
    pub fn new(web_path: Option<PathBuf>) -> Self {
        Self { web_path }
    }

    pub fn web_path(&self) -> Option<&Path> {
        self.web_path.as_deref()
    }

    fn index_path(&self) -> Result<PathBuf, InjectError> {
        let web_path = self.web_path.as_ref().ok_or(InjectError::NoWebPath)?;
        let index = web_path.join(INDEX_FILE);
        if !index.is_file() {
            return Err(InjectError::IndexMissing(index));
        }
        Ok(index)
    }

    fn try_inject(&self) -> Result<InjectOutcome, InjectError> {
        let index = self.index_path()?;
        let contents = fs::read_to_string(&index).map_err(|e| InjectError::Read(index.clone(), e))?;

        if contains_tag(&contents) {
            log::info!("Seasonals script already present in {}", index.display());
            return Ok(InjectOutcome::AlreadyPresent);
        }
        let Some(patched) = patch_index_html(&contents) else {
            log::warn!("No {BODY_MARKER} in {}; script not injected", index.display());
            return Ok(InjectOutcome::NoBodyMarker);
        };

        fs::write(&index, patched).map_err(|e| InjectError::Write(index.clone(), e))?;
        log::info!("Successfully injected Seasonals script into {}", index.display());
        Ok(InjectOutcome::Injected)
    }

    /// Patch `index.html`, falling back to a registered transformation
    pub fn inject(&self, registry: &mut dyn TransformationRegistry) -> InjectOutcome {
        match self.try_inject() {
            Ok(outcome) => outcome,
            Err(e) => {
                log::warn!("{e}. Attempting fallback.");
                register_fallback(registry)
            }
        }
    }

    fn try_remove(&self) -> Result<RemoveOutcome, InjectError> {
        let index = match self.index_path() {
            Ok(index) => index,
            Err(InjectError::NoWebPath | InjectError::IndexMissing(_)) => return Ok(RemoveOutcome::NoIndex),
            Err(e) => return Err(e),
        };
        let contents = fs::read_to_string(&index).map_err(|e| InjectError::Read(index.clone(), e))?;

        if !contains_tag(&contents) {
            log::info!("Seasonals script tag not found in {}. No removal necessary.", index.display());
            return Ok(RemoveOutcome::NotPresent);
        }

        fs::write(&index, strip_script_tags(&contents)).map_err(|e| InjectError::Write(index.clone(), e))?;
        log::info!("Successfully removed Seasonals script from {}", index.display());
        Ok(RemoveOutcome::Removed)
    }

    /// Unregister the transformation and strip the tag from `index.html`
    pub fn remove(&self, registry: &mut dyn TransformationRegistry) -> RemoveOutcome {
        match registry.unregister(TRANSFORMATION_ID) {
            Ok(()) => log::debug!("File transformation unregistered"),
            Err(e) => log::warn!("Error unregistering file transformation: {e}"),
        }

        match self.try_remove() {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("Error removing Seasonals script: {e}");
                RemoveOutcome::Failed
            }
        }
    }
}

fn register_fallback(registry: &mut dyn TransformationRegistry) -> InjectOutcome {
    log::info!("Seasonals fallback: registering file transformation");
    match registry.register(&Transformation::seasonals()) {
        Ok(()) => {
            log::info!("File transformation registered successfully.");
            InjectOutcome::Fallback
        }
        Err(e) => {
            log::warn!("{e}. Fallback injection skipped.");
            InjectOutcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "<html><head></head><body><div id=\"app\"></div></BODY></html>";

    #[test]
    fn test_patch_before_body_case_insensitive() {
        let patched = patch_index_html(PAGE).unwrap();
        assert!(patched.contains(&format!("{SCRIPT_TAG}\n</BODY>")));
        assert_eq!(patch_index_html(&patched), None);
    }

    #[test]
    fn test_legacy_tag_counts_as_present() {
        let page = PAGE.replace("</BODY>", &format!("{LEGACY_SCRIPT_TAG}\n</BODY>"));
        assert_eq!(patch_index_html(&page), None);
    }

    #[test]
    fn test_no_marker() {
        assert_eq!(patch_index_html("<html></html>"), None);
    }

    #[test]
    fn test_strip_all_variants() {
        let page = format!("<body>{SCRIPT_TAG}\n{LEGACY_SCRIPT_TAG}{SCRIPT_TAG}\r\n</body>");
        assert_eq!(strip_script_tags(&page), "<body></body>");
    }

    #[test]
    fn test_transformation_apply() {
        let transformation = Transformation::seasonals();
        assert_eq!(transformation.file_name_pattern, "index.html");
        let once = transformation.apply(PAGE);
        assert_eq!(transformation.apply(&once), once);
    }

    #[test]
    fn test_no_web_path_falls_back() {
        let mut registry = MemoryRegistry::new();
        let injector = ScriptInjector::new(None);
        assert_eq!(injector.inject(&mut registry), InjectOutcome::Fallback);
        assert!(registry.is_registered(TRANSFORMATION_ID));

        assert_eq!(injector.remove(&mut registry), RemoveOutcome::NoIndex);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_fallback_without_service() {
        let injector = ScriptInjector::new(None);
        let outcome = injector.inject(&mut NoTransformationService);
        assert_eq!(outcome, InjectOutcome::Failed);
        assert!(outcome.is_failed());
        assert!(!InjectOutcome::Fallback.is_failed());
        assert!(!injector.remove(&mut NoTransformationService).is_failed());
    }
}
