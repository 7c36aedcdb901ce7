//! CLI Adapter.

mod config;
mod endpoint;
mod launch;
mod plan;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::app::api::PlanFormat;
use crate::app::observability;
use crate::domain::{AppError, LaunchMode, ShellKind};

#[derive(Parser)]
#[command(name = "name-launch")]
#[command(version)]
#[command(about = "Build, run and debug NAME assembly programs", long_about = None)]
struct Cli {
    /// Root of the NAME toolchain checkout (overrides the settings files)
    #[arg(long, global = true, value_name = "PATH")]
    name_path: Option<String>,
    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble and run a source file in the emulator
    #[clap(visible_alias = "s")]
    Start {
        /// Assembly source file
        file: Option<PathBuf>,
        /// Workspace root that receives the object file (defaults to current directory)
        #[arg(short, long)]
        workspace: Option<PathBuf>,
    },
    /// Assemble and run a source file, then start debugging
    #[clap(visible_alias = "d")]
    Debug {
        /// Assembly source file
        file: Option<PathBuf>,
        /// Workspace root that receives the object file (defaults to current directory)
        #[arg(short, long)]
        workspace: Option<PathBuf>,
    },
    /// Print the commands a launch would run
    #[clap(visible_alias = "p")]
    Plan {
        /// Assembly source file
        file: Option<PathBuf>,
        /// Workspace root that receives the object file (defaults to current directory)
        #[arg(short, long)]
        workspace: Option<PathBuf>,
        /// Plan the debug launch
        #[arg(long)]
        debug: bool,
        /// Shell to render for (posix, cmd, powershell)
        #[arg(long, value_parser = parse_shell)]
        shell: Option<ShellKind>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = PlanFormat::Text)]
        format: PlanFormat,
    },
    /// Workspace settings
    #[clap(visible_alias = "c")]
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },
    /// Show the debug adapter endpoint
    Endpoint {
        /// Check whether something is listening on it
        #[arg(long)]
        check: bool,
    },
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();
    observability::init_tracing(cli.verbose);

    let name_path = cli.name_path.as_deref();
    let result: Result<(), AppError> = match cli.command {
        Commands::Start { file, workspace } => {
            launch::run_launch(file, workspace, LaunchMode::Run, name_path)
        }
        Commands::Debug { file, workspace } => {
            launch::run_launch(file, workspace, LaunchMode::RunAndDebug, name_path)
        }
        Commands::Plan { file, workspace, debug, shell, format } => {
            let mode = if debug { LaunchMode::RunAndDebug } else { LaunchMode::Run };
            plan::run_plan(file, workspace, mode, shell, format, name_path)
        }
        Commands::Config { command } => config::run_config(command, name_path),
        Commands::Endpoint { check } => endpoint::run_endpoint(check),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn parse_shell(value: &str) -> Result<ShellKind, String> {
    ShellKind::from_name(value)
        .ok_or_else(|| format!("unknown shell '{}' (expected posix, cmd or powershell)", value))
}

/// Single-threaded runtime for the async parts of a command.
fn runtime() -> Result<tokio::runtime::Runtime, AppError> {
    Ok(tokio::runtime::Builder::new_current_thread().enable_all().build()?)
}

/// Workspace directory, defaulting to the current directory.
fn workspace_or_cwd(workspace: Option<PathBuf>) -> Result<PathBuf, AppError> {
    let cwd = std::env::current_dir()?;
    Ok(match workspace {
        Some(dir) => absolutize(&cwd, dir),
        None => cwd,
    })
}

/// The source file as given on the command line, resolved against the current directory.
fn document_path(file: Option<PathBuf>) -> Result<Option<PathBuf>, AppError> {
    match file {
        Some(file) => Ok(Some(absolutize(&std::env::current_dir()?, file))),
        None => Ok(None),
    }
}

fn absolutize(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() { path } else { base.join(path) }
}
