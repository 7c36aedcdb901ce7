//! Layered TOML settings files.
//!
//! Lookup order, highest priority first: command-line overrides, the
//! workspace file (`<workspace>/.name/settings.toml`), the user file
//! (`$HOME/.config/name-launch/settings.toml`).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use toml::{Table, Value};
use tracing::debug;

use crate::domain::settings::{SETTINGS_FILE, USER_SETTINGS_DIR, WORKSPACE_SETTINGS_DIR, keys};
use crate::domain::{AppError, ConfigError, ShellKind};
use crate::ports::SettingsSource;

#[derive(Debug, Clone)]
struct SettingsLayer {
    origin: PathBuf,
    table: Table,
}

/// Settings read from the user and workspace settings files.
#[derive(Debug, Clone, Default)]
pub struct FileSettingsSource {
    overrides: BTreeMap<String, String>,
    /// Highest priority first.
    layers: Vec<SettingsLayer>,
}

impl FileSettingsSource {
    /// Load the settings files that exist for `workspace` and `home`.
    ///
    /// Returns `None` when there is neither a settings file nor an override,
    /// meaning no configuration is available at all.
    pub fn load(
        workspace: Option<&Path>,
        home: Option<&Path>,
        overrides: BTreeMap<String, String>,
    ) -> Result<Option<Self>, AppError> {
        let mut candidates = Vec::new();
        if let Some(workspace) = workspace {
            candidates.push(workspace_settings_path(workspace));
        }
        if let Some(home) = home {
            candidates.push(user_settings_path(home));
        }

        let mut layers = Vec::new();
        for path in candidates {
            if !path.is_file() {
                continue;
            }
            let content = fs::read_to_string(&path).map_err(|e| ConfigError::Unreadable {
                path: path.display().to_string(),
                details: e.to_string(),
            })?;
            let table: Table = toml::from_str(&content).map_err(|e| ConfigError::Unreadable {
                path: path.display().to_string(),
                details: e.to_string(),
            })?;
            debug!(path = %path.display(), "loaded settings file");
            layers.push(SettingsLayer { origin: path, table });
        }

        if layers.is_empty() && overrides.is_empty() {
            return Ok(None);
        }

        Ok(Some(Self { overrides, layers }))
    }

    /// Build a source from in-memory TOML, for callers that already hold the content.
    pub fn from_toml(origin: impl Into<PathBuf>, content: &str) -> Result<Self, AppError> {
        let table: Table = toml::from_str(content)?;
        Ok(Self {
            overrides: BTreeMap::new(),
            layers: vec![SettingsLayer { origin: origin.into(), table }],
        })
    }

    pub fn with_override(mut self, key: &str, value: impl Into<String>) -> Self {
        self.overrides.insert(key.to_string(), value.into());
        self
    }
}

impl SettingsSource for FileSettingsSource {
    fn get(&self, key: &str) -> Option<String> {
        if let Some(value) = self.overrides.get(key) {
            return Some(value.clone());
        }
        self.layers.iter().find_map(|layer| lookup(&layer.table, key).and_then(scalar_to_string))
    }

    fn origin(&self) -> String {
        let mut origins: Vec<String> =
            self.layers.iter().map(|layer| layer.origin.display().to_string()).collect();
        if !self.overrides.is_empty() {
            origins.insert(0, "command line".to_string());
        }
        origins.join(", ")
    }
}

pub fn workspace_settings_path(workspace: &Path) -> PathBuf {
    workspace.join(WORKSPACE_SETTINGS_DIR).join(SETTINGS_FILE)
}

pub fn user_settings_path(home: &Path) -> PathBuf {
    home.join(USER_SETTINGS_DIR).join(SETTINGS_FILE)
}

/// Settings file content with `namePath` (and optionally `shell`) set.
///
/// Other keys in `existing` are kept.
pub fn settings_document(
    existing: Option<&str>,
    name_path: &str,
    shell: Option<ShellKind>,
) -> Result<String, AppError> {
    let mut table: Table = match existing {
        Some(content) => toml::from_str(content)?,
        None => Table::new(),
    };
    table.remove(keys::TOOL_ROOT_PATH);
    table.insert(keys::NAME_PATH.to_string(), Value::String(name_path.to_string()));
    if let Some(shell) = shell {
        table.insert(keys::SHELL.to_string(), Value::String(shell.name().to_string()));
    }
    Ok(toml::to_string(&table)?)
}

/// Write the workspace settings file, creating `.name/` as needed.
pub fn write_workspace_settings(workspace: &Path, content: &str) -> Result<PathBuf, AppError> {
    let path = workspace_settings_path(workspace);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, content)?;
    Ok(path)
}

fn lookup<'a>(table: &'a Table, key: &str) -> Option<&'a Value> {
    let mut segments = key.split('.');
    let first = segments.next()?;
    let mut value = table.get(first)?;
    for segment in segments {
        value = value.as_table()?.get(segment)?;
    }
    Some(value)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Float(f) => Some(f.to_string()),
        Value::Boolean(b) => Some(b.to_string()),
        Value::Datetime(d) => Some(d.to_string()),
        Value::Array(_) | Value::Table(_) => None,
    }
}
