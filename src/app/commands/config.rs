//! `config init` and `config show`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::adapters::settings_files::{
    settings_document, workspace_settings_path, write_workspace_settings,
};
use crate::app::config_resolver::{self, ResolvedConfig};
use crate::domain::{AppError, ConfigError, ShellKind};
use crate::ports::SettingsSource;

/// Write `namePath` (and optionally `shell`) into the workspace settings file.
///
/// Returns the path of the settings file.
pub fn init(
    workspace: &Path,
    name_path: &str,
    shell: Option<ShellKind>,
) -> Result<PathBuf, AppError> {
    let name_path = name_path.trim();
    if name_path.is_empty() {
        return Err(ConfigError::MissingRootPath.into());
    }

    let path = workspace_settings_path(workspace);
    let existing = if path.is_file() { Some(fs::read_to_string(&path)?) } else { None };
    let content = settings_document(existing.as_deref(), name_path, shell)?;
    write_workspace_settings(workspace, &content)
}

/// Resolved configuration and where it came from.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigReport {
    pub origin: String,
    #[serde(flatten)]
    pub config: ResolvedConfig,
}

pub fn show<S>(source: Option<&S>) -> Result<ConfigReport, AppError>
where
    S: SettingsSource + ?Sized,
{
    let config = config_resolver::resolve(source)?;
    // `resolve` fails on a missing source.
    let origin = source.map(|s| s.origin()).unwrap_or_default();
    Ok(ConfigReport { origin, config })
}
