use serde::{Deserialize, Serialize};

/// Which of the two host actions is being executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LaunchMode {
    /// Build and run the toolchain.
    Run,
    /// Build and run with the emulator's debug flag, then start debugging.
    RunAndDebug,
}

impl LaunchMode {
    pub fn is_debug(self) -> bool {
        matches!(self, LaunchMode::RunAndDebug)
    }

    pub fn label(self) -> &'static str {
        match self {
            LaunchMode::Run => "run",
            LaunchMode::RunAndDebug => "run-and-debug",
        }
    }
}

/// How the commands of a plan are sequenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sequencing {
    /// Stream every command into one interactive shell without waiting.
    #[default]
    Stream,
    /// Run each command as its own process and stop at the first failure.
    Gated,
}

impl Sequencing {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "stream" => Some(Sequencing::Stream),
            "gated" => Some(Sequencing::Gated),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Sequencing::Stream => "stream",
            Sequencing::Gated => "gated",
        }
    }
}
