use std::io;

use thiserror::Error;

/// Settings could not be turned into a launch configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No settings source is available at all.
    #[error(
        "Failed to find NAME configuration. Run 'name-launch config init' or pass --name-path"
    )]
    MissingConfiguration,

    /// The root path setting is absent or blank.
    #[error(
        "Failed to find a path for NAME, please set 'namePath' in the user or workspace settings"
    )]
    MissingRootPath,

    /// An optional setting holds a value that cannot be used.
    #[error("Invalid value '{value}' for setting '{key}': {reason}")]
    InvalidSetting { key: String, value: String, reason: String },

    /// A settings file exists but could not be read or parsed.
    #[error("Failed to read settings file {path}: {details}")]
    Unreadable { path: String, details: String },
}

/// The command plan could not be constructed from the invocation context.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("No active file. Pass the source file to assemble and run")]
    NoActiveEditor,

    #[error("Open a folder/workspace first")]
    NoWorkspaceOpen,

    #[error("Path contains invalid unicode: {0}")]
    NonUtf8Path(String),

    #[error("Failed to render '{template}' command for {shell}: {details}")]
    Template { shell: String, template: String, details: String },
}

/// A session, process or debugger endpoint could not be reached.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("Failed to start '{program}' for session '{session}': {details}")]
    Spawn { session: String, program: String, details: String },

    #[error("Session '{0}' is closed")]
    SessionClosed(String),

    #[error("Unknown session handle #{0}")]
    UnknownSession(u64),

    #[error("Failed to write to session '{session}': {details}")]
    Write { session: String, details: String },

    #[error("Failed waiting for '{name}': {details}")]
    Wait { name: String, details: String },

    #[error("Command '{command}' failed with {}", describe_exit(.code))]
    StepFailed { command: String, code: Option<i32> },

    #[error("Failed to start debugger for {endpoint}: {details}")]
    Attach { endpoint: String, details: String },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Library-wide error type for name-launch operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Invalid user input outside of the settings files.
    #[error("{0}")]
    Validation(String),

    /// Embedded assets are missing or malformed.
    #[error("Internal error: {0}")]
    Internal(String),
}
