//! `plan` command.

use std::path::PathBuf;

use crate::app::api::{self, PlanFormat};
use crate::domain::{AppError, LaunchMode, ShellKind};

pub fn run_plan(
    file: Option<PathBuf>,
    workspace: Option<PathBuf>,
    mode: LaunchMode,
    shell: Option<ShellKind>,
    format: PlanFormat,
    name_path: Option<&str>,
) -> Result<(), AppError> {
    let workspace = super::workspace_or_cwd(workspace)?;
    let document = super::document_path(file)?;

    let output = api::plan_at(workspace, document, mode, shell, name_path)?;
    println!("{}", output.render(format)?);
    Ok(())
}
