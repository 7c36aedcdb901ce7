//! `config` commands.

use std::io::ErrorKind;

use clap::Subcommand;
use dialoguer::{Error as DialoguerError, Input};

use crate::app::api;
use crate::domain::{AppError, ShellKind};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write .name/settings.toml in the current directory
    #[clap(visible_alias = "i")]
    Init {
        /// Shell to render commands for (posix, cmd, powershell)
        #[arg(long, value_parser = super::parse_shell)]
        shell: Option<ShellKind>,
    },
    /// Print the resolved configuration
    Show,
}

pub fn run_config(command: ConfigCommands, name_path: Option<&str>) -> Result<(), AppError> {
    match command {
        ConfigCommands::Init { shell } => run_init(name_path, shell),
        ConfigCommands::Show => run_show(name_path),
    }
}

fn run_init(name_path: Option<&str>, shell: Option<ShellKind>) -> Result<(), AppError> {
    let name_path = match name_path {
        Some(path) => path.to_string(),
        None => match prompt_name_path()? {
            Some(path) => path,
            None => return Ok(()),
        },
    };

    let path = api::config_init(&name_path, shell)?;
    println!("✅ Wrote {}", path.display());
    Ok(())
}

fn prompt_name_path() -> Result<Option<String>, AppError> {
    match Input::new().with_prompt("Path to the NAME toolchain").interact_text() {
        Ok(value) => Ok(Some(value)),
        Err(DialoguerError::IO(err)) if err.kind() == ErrorKind::Interrupted => Ok(None),
        Err(err) => Err(AppError::Validation(format!("Failed to read NAME path: {}", err))),
    }
}

fn run_show(name_path: Option<&str>) -> Result<(), AppError> {
    let workspace = super::workspace_or_cwd(None)?;
    let report = api::config_show_at(&workspace, name_path)?;
    let config = &report.config;

    println!("Settings:   {}", report.origin);
    println!("Root:       {}", config.tool_paths.root_path);
    println!("Assembler:  {}", config.tool_paths.assembler_path);
    println!("Config:     {}", config.tool_paths.default_config_path);
    println!("Emulator:   {}", config.tool_paths.emulator_path);
    println!("Shell:      {}", config.shell);
    println!("Sequencing: {}", config.sequencing.name());
    println!("Session:    {}", config.session.name);
    println!("Debug:      {} after {} ms", config.debug.endpoint, config.debug.delay.as_millis());
    Ok(())
}
