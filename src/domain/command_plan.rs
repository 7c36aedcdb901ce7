//! Command plans: the ordered shell commands that build and run the toolchain.

use serde::Serialize;

use crate::domain::{LaunchMode, ShellKind};

/// Program used to build and run both toolchain components.
pub const TOOLCHAIN_PROGRAM: &str = "cargo";
pub const BUILD_ARGS: [&str; 2] = ["build", "--release"];
pub const RUN_SUBCOMMAND: &str = "run";

/// Assembler flag that emits the line-info sidecar next to the object file.
pub const LINEINFO_FLAG: &str = "--lineinfo";
/// Emulator flag that starts its debug-adapter server.
pub const DEBUG_FLAG: &str = "--debug";

pub const OBJECT_SUFFIX: &str = ".o";
pub const LINEINFO_SUFFIX: &str = ".li";

/// Toolchain component a command belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Assembler,
    Emulator,
}

/// A single structured step, before rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandStep {
    ChangeDir { dir: String },
    Invoke { program: String, args: Vec<String> },
}

impl CommandStep {
    pub fn build() -> Self {
        CommandStep::Invoke {
            program: TOOLCHAIN_PROGRAM.to_string(),
            args: BUILD_ARGS.iter().map(|arg| arg.to_string()).collect(),
        }
    }

    pub fn run(args: Vec<String>) -> Self {
        let mut full = Vec::with_capacity(args.len() + 1);
        full.push(RUN_SUBCOMMAND.to_string());
        full.extend(args);
        CommandStep::Invoke { program: TOOLCHAIN_PROGRAM.to_string(), args: full }
    }
}

/// A step together with the shell line it renders to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedCommand {
    pub phase: Phase,
    pub step: CommandStep,
    pub line: String,
}

/// A process invocation derived from a plan, with the working directory
/// that the preceding `cd` steps would have left the shell in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub working_dir: String,
    pub program: String,
    pub args: Vec<String>,
    /// The rendered shell line, for messages.
    pub display: String,
}

/// Ordered, immutable sequence of shell commands for one launch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandPlan {
    shell: ShellKind,
    mode: LaunchMode,
    commands: Vec<PlannedCommand>,
}

impl CommandPlan {
    pub(crate) fn new(shell: ShellKind, mode: LaunchMode, commands: Vec<PlannedCommand>) -> Self {
        Self { shell, mode, commands }
    }

    pub fn shell(&self) -> ShellKind {
        self.shell
    }

    pub fn mode(&self) -> LaunchMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn commands(&self) -> &[PlannedCommand] {
        &self.commands
    }

    /// Rendered shell lines in execution order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().map(|command| command.line.as_str())
    }

    /// Resolve the plan into process invocations, tracking `cd` steps.
    ///
    /// `start_dir` is the directory the first invocation runs in when the plan
    /// does not change directory before it.
    pub fn invocations(&self, start_dir: &str) -> Vec<Invocation> {
        let mut working_dir = start_dir.to_string();
        let mut invocations = Vec::new();

        for command in &self.commands {
            match &command.step {
                CommandStep::ChangeDir { dir } => working_dir = dir.clone(),
                CommandStep::Invoke { program, args } => invocations.push(Invocation {
                    working_dir: working_dir.clone(),
                    program: program.clone(),
                    args: args.clone(),
                    display: command.line.clone(),
                }),
            }
        }

        invocations
    }
}
