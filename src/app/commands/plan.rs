//! `plan`: show the command plan without executing it.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::adapters::EmbeddedShellTemplates;
use crate::app::command_builder;
use crate::app::config_resolver;
use crate::domain::target_file::utf8;
use crate::domain::{AppError, BuildError, CommandPlan, LaunchMode, ShellKind, TargetFile, ToolPaths};
use crate::ports::SettingsSource;

/// Output format for `plan`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PlanFormat {
    /// One command per line
    #[default]
    Text,
    Json,
    Yaml,
    /// A script for the selected shell
    Script,
}

#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub document: Option<PathBuf>,
    pub workspace: Option<PathBuf>,
    pub mode: LaunchMode,
    /// Render for this shell instead of the configured one.
    pub shell: Option<ShellKind>,
}

/// A built plan together with what it was built from.
#[derive(Debug, Clone, Serialize)]
pub struct PlanOutput {
    pub tool_paths: ToolPaths,
    pub target: TargetFile,
    pub plan: CommandPlan,
    #[serde(skip)]
    script: String,
}

impl PlanOutput {
    pub fn render(&self, format: PlanFormat) -> Result<String, AppError> {
        Ok(match format {
            PlanFormat::Text => self.plan.lines().collect::<Vec<_>>().join("\n"),
            PlanFormat::Json => serde_json::to_string_pretty(self)?,
            PlanFormat::Yaml => serde_yaml::to_string(self)?.trim_end().to_string(),
            PlanFormat::Script => self.script.trim_end().to_string(),
        })
    }
}

pub fn execute<S>(source: Option<&S>, request: &PlanRequest) -> Result<PlanOutput, AppError>
where
    S: SettingsSource + ?Sized,
{
    let mut config = config_resolver::resolve(source)?;
    if let Some(shell) = request.shell {
        config.tool_paths = ToolPaths::derive(&config.tool_paths.root_path, shell);
        config.shell = shell;
    }

    let base = request.workspace.as_deref().unwrap_or(Path::new("."));
    let target = match request.document.as_deref() {
        Some(document) => TargetFile::from_document(document, base)?,
        None => return Err(BuildError::NoActiveEditor.into()),
    };
    let workspace_root = request.workspace.as_deref().map(utf8).transpose()?;

    let templates = EmbeddedShellTemplates::new()?;
    let renderer = templates.renderer(config.shell)?;
    let plan = command_builder::build(
        &renderer,
        &config.tool_paths,
        Some(&target),
        workspace_root,
        request.mode,
    )?;
    let script = renderer.script(&plan);

    Ok(PlanOutput { tool_paths: config.tool_paths, target, plan, script })
}
