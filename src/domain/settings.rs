//! Settings keys and file locations.

/// Directory holding workspace settings, relative to the workspace root.
pub const WORKSPACE_SETTINGS_DIR: &str = ".name";
/// User settings directory, relative to `$HOME`.
pub const USER_SETTINGS_DIR: &str = ".config/name-launch";
pub const SETTINGS_FILE: &str = "settings.toml";

/// Name of the shell session the toolchain runs in.
pub const DEFAULT_SESSION_NAME: &str = "NAME Emulator";

/// Keys understood by the settings lookup. Nested keys use dotted paths
/// into the TOML tables (`debug.port` is `port` under `[debug]`).
pub mod keys {
    pub const NAME_PATH: &str = "namePath";
    /// Accepted in place of `namePath`.
    pub const TOOL_ROOT_PATH: &str = "toolRootPath";
    pub const SHELL: &str = "shell";
    pub const SEQUENCING: &str = "sequencing";
    pub const TERMINAL_NAME: &str = "terminal.name";
    pub const TERMINAL_CLOSE_ON_EXIT: &str = "terminal.closeOnExit";
    pub const DEBUG_HOST: &str = "debug.host";
    pub const DEBUG_PORT: &str = "debug.port";
    pub const DEBUG_DELAY_MS: &str = "debug.delayMs";
    pub const DEBUG_READINESS: &str = "debug.readiness";
    pub const DEBUG_POLL_INTERVAL_MS: &str = "debug.pollIntervalMs";
    pub const DEBUG_ATTACH_COMMAND: &str = "debug.attachCommand";
}
