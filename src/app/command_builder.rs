//! Builds the command plan for the assembler and emulator phases.

use crate::adapters::catalogs::ShellRenderer;
use crate::domain::command_plan::{DEBUG_FLAG, LINEINFO_FLAG, LINEINFO_SUFFIX, OBJECT_SUFFIX};
use crate::domain::{
    BuildError, CommandPlan, CommandStep, LaunchMode, Phase, PlannedCommand, TargetFile, ToolPaths,
};

/// Build the ordered command plan.
///
/// The object file lands in the workspace root as `<file name>.o`, and the
/// assembler writes its line info next to it as `<file name>.o.li`.
pub fn build(
    renderer: &ShellRenderer<'_>,
    tool_paths: &ToolPaths,
    target: Option<&TargetFile>,
    workspace_root: Option<&str>,
    mode: LaunchMode,
) -> Result<CommandPlan, BuildError> {
    let target = target.ok_or(BuildError::NoActiveEditor)?;
    let workspace_root = workspace_root.ok_or(BuildError::NoWorkspaceOpen)?;

    let shell = renderer.shell();
    let output_base = shell.join(workspace_root, &[&target.file_name]);
    let object_path = format!("{}{}", output_base, OBJECT_SUFFIX);
    let lineinfo_path = format!("{}{}", object_path, LINEINFO_SUFFIX);

    let assembler_args = vec![
        tool_paths.default_config_path.clone(),
        target.absolute_path.clone(),
        object_path.clone(),
        LINEINFO_FLAG.to_string(),
    ];

    let mut emulator_args = vec![target.absolute_path.clone(), object_path, lineinfo_path];
    if mode.is_debug() {
        emulator_args.push(DEBUG_FLAG.to_string());
    }

    let steps = [
        (Phase::Assembler, CommandStep::ChangeDir { dir: tool_paths.assembler_path.clone() }),
        (Phase::Assembler, CommandStep::build()),
        (Phase::Assembler, CommandStep::run(assembler_args)),
        (Phase::Emulator, CommandStep::ChangeDir { dir: tool_paths.emulator_path.clone() }),
        (Phase::Emulator, CommandStep::build()),
        (Phase::Emulator, CommandStep::run(emulator_args)),
    ];

    let mut commands = Vec::with_capacity(steps.len());
    for (phase, step) in steps {
        let line = renderer.render_step(&step)?;
        commands.push(PlannedCommand { phase, step, line });
    }

    Ok(CommandPlan::new(shell, mode, commands))
}
