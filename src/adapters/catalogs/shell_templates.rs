//! Shell template tables loaded from embedded assets.
//!
//! Each supported shell has one `src/assets/shells/<shell>.toml` table that
//! describes how to start the shell and how to render every kind of plan step.

use std::collections::HashMap;
use std::path::PathBuf;

use include_dir::{Dir, include_dir};
use minijinja::{Environment, UndefinedBehavior, context};
use serde::Deserialize;

use crate::domain::{AppError, BuildError, CommandPlan, CommandStep, ShellKind};
use crate::ports::SessionOptions;

static SHELLS_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/src/assets/shells");

/// Template table for one shell.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShellTemplateTable {
    /// Interactive shell program reading commands from stdin.
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// First line of an exported script.
    #[serde(default)]
    pub script_header: Option<String>,
    /// Renders a `cd`; receives `dir`.
    pub change_dir: String,
    /// Renders a program invocation; receives `program` and `args`.
    pub invoke: String,
}

/// All shell template tables, keyed by shell.
#[derive(Debug, Clone)]
pub struct EmbeddedShellTemplates {
    tables: HashMap<ShellKind, ShellTemplateTable>,
}

impl EmbeddedShellTemplates {
    /// Load every embedded table. Fails if a supported shell has no table.
    pub fn new() -> Result<Self, AppError> {
        let mut tables = HashMap::new();

        for shell in ShellKind::ALL {
            let file_name = format!("{}.toml", shell.name());
            let file = SHELLS_DIR.get_file(&file_name).ok_or_else(|| {
                AppError::Internal(format!("Missing shell template table '{}'", file_name))
            })?;
            let content = file.contents_utf8().ok_or_else(|| {
                AppError::Internal(format!("Shell template table '{}' is not UTF-8", file_name))
            })?;
            let table: ShellTemplateTable = toml::from_str(content).map_err(|e| {
                AppError::Internal(format!("Invalid shell template table '{}': {}", file_name, e))
            })?;
            tables.insert(shell, table);
        }

        Ok(Self { tables })
    }

    /// Renderer bound to one shell.
    pub fn renderer(&self, shell: ShellKind) -> Result<ShellRenderer<'_>, AppError> {
        let table = self.tables.get(&shell).ok_or_else(|| {
            AppError::Internal(format!("No shell template table for '{}'", shell))
        })?;

        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_filter("quote", move |value: String| -> String { shell.quote(&value) });

        Ok(ShellRenderer { shell, table, env })
    }
}

/// Renders plan steps and session settings for one shell.
pub struct ShellRenderer<'a> {
    shell: ShellKind,
    table: &'a ShellTemplateTable,
    env: Environment<'static>,
}

impl ShellRenderer<'_> {
    pub fn shell(&self) -> ShellKind {
        self.shell
    }

    /// Render one step to the line sent to the shell.
    pub fn render_step(&self, step: &CommandStep) -> Result<String, BuildError> {
        match step {
            CommandStep::ChangeDir { dir } => {
                self.render("change_dir", &self.table.change_dir, context! { dir => dir })
            }
            CommandStep::Invoke { program, args } => self.render(
                "invoke",
                &self.table.invoke,
                context! { program => program, args => args },
            ),
        }
    }

    /// Options for starting an interactive session of this shell.
    pub fn session_options(
        &self,
        name: &str,
        close_on_exit: bool,
        working_dir: Option<PathBuf>,
    ) -> SessionOptions {
        SessionOptions {
            name: name.to_string(),
            program: self.table.program.clone(),
            args: self.table.args.clone(),
            line_ending: self.shell.line_ending().to_string(),
            close_on_exit,
            working_dir,
        }
    }

    /// The whole plan as a script for this shell.
    pub fn script(&self, plan: &CommandPlan) -> String {
        let line_ending = self.shell.line_ending();
        let mut script = String::new();
        if let Some(header) = &self.table.script_header {
            script.push_str(header);
            script.push_str(line_ending);
        }
        for line in plan.lines() {
            script.push_str(line);
            script.push_str(line_ending);
        }
        script
    }

    fn render(
        &self,
        name: &str,
        template: &str,
        ctx: minijinja::Value,
    ) -> Result<String, BuildError> {
        self.env.render_str(template, ctx).map_err(|e| BuildError::Template {
            shell: self.shell.to_string(),
            template: name.to_string(),
            details: e.to_string(),
        })
    }
}
