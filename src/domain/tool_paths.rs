use serde::Serialize;

use crate::domain::ShellKind;

pub const ASSEMBLER_DIR: &str = "name-as";
pub const EMULATOR_DIR: &str = "name-emu";
pub const CONFIGS_DIR: &str = "configs";
pub const DEFAULT_CONFIG_FILE: &str = "default.toml";

/// Locations of the NAME toolchain, derived from the configured root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolPaths {
    pub root_path: String,
    pub assembler_path: String,
    pub default_config_path: String,
    pub emulator_path: String,
}

impl ToolPaths {
    /// Derive every tool path from `root_path`.
    ///
    /// Pure string composition: nothing is checked on disk.
    pub fn derive(root_path: &str, shell: ShellKind) -> Self {
        let assembler_path = shell.join(root_path, &[ASSEMBLER_DIR]);
        let default_config_path =
            shell.join(&assembler_path, &[CONFIGS_DIR, DEFAULT_CONFIG_FILE]);
        let emulator_path = shell.join(root_path, &[EMULATOR_DIR]);

        Self { root_path: root_path.to_string(), assembler_path, default_config_path, emulator_path }
    }
}
