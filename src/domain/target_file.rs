use std::path::Path;

use serde::Serialize;

use crate::domain::BuildError;

/// Source file a launch operates on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetFile {
    pub absolute_path: String,
    pub file_name: String,
    pub containing_directory: String,
}

impl TargetFile {
    /// Describe the document at `path`.
    ///
    /// Relative paths are resolved against `base`; the file does not need to exist.
    pub fn from_document(path: &Path, base: &Path) -> Result<Self, BuildError> {
        let absolute = if path.is_absolute() { path.to_path_buf() } else { base.join(path) };

        let absolute_path = utf8(&absolute)?.to_string();
        let file_name = absolute
            .file_name()
            .map(|name| name.to_str().ok_or_else(|| non_utf8(&absolute)))
            .transpose()?
            .ok_or_else(|| BuildError::NoActiveEditor)?
            .to_string();
        let containing_directory = match absolute.parent() {
            Some(parent) => utf8(parent)?.to_string(),
            None => String::new(),
        };

        Ok(Self { absolute_path, file_name, containing_directory })
    }
}

pub(crate) fn utf8(path: &Path) -> Result<&str, BuildError> {
    path.to_str().ok_or_else(|| non_utf8(path))
}

fn non_utf8(path: &Path) -> BuildError {
    BuildError::NonUtf8Path(path.to_string_lossy().into_owned())
}
