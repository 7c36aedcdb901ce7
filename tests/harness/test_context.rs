//! Shared testing harness for `name-launch` integration tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated `$HOME` and workspace for CLI exercises.
pub(crate) struct TestContext {
    root: TempDir,
    home: PathBuf,
    work_dir: PathBuf,
}

impl TestContext {
    pub(crate) fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        // The binary sees the resolved current directory, so compare against that.
        let base = root.path().canonicalize().expect("Failed to resolve temp directory");
        let home = base.join("home");
        let work_dir = base.join("work");
        fs::create_dir_all(&home).expect("Failed to create test home directory");
        fs::create_dir_all(&work_dir).expect("Failed to create test work directory");
        Self { root, home, work_dir }
    }

    /// Absolute path to the emulated `$HOME` directory.
    pub(crate) fn home(&self) -> &Path {
        &self.home
    }

    /// Path to the workspace directory used for CLI invocations.
    pub(crate) fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Scratch directory outside home and workspace.
    pub(crate) fn scratch(&self, name: &str) -> PathBuf {
        let dir = self.home.parent().expect("home has a parent").join(name);
        fs::create_dir_all(&dir).expect("Failed to create scratch directory");
        dir
    }

    /// Build a command for invoking the compiled binary within the workspace.
    pub(crate) fn cli(&self) -> Command {
        self.cli_in(self.work_dir())
    }

    /// Build a command for invoking the compiled binary within a custom directory.
    pub(crate) fn cli_in<P: AsRef<Path>>(&self, dir: P) -> Command {
        let mut cmd = Command::cargo_bin("name-launch").expect("Failed to locate name-launch binary");
        cmd.current_dir(dir.as_ref()).env("HOME", self.home()).env_remove("NAME_LAUNCH_LOG");
        cmd
    }

    /// Write a source file into the workspace and return its path.
    pub(crate) fn write_source(&self, name: &str) -> PathBuf {
        let path = self.work_dir.join(name);
        fs::write(&path, "addi $t0, $zero, 1\n").expect("Failed to write source file");
        path
    }

    /// Write `<workspace>/.name/settings.toml`.
    pub(crate) fn write_workspace_settings(&self, content: &str) {
        let dir = self.work_dir.join(".name");
        fs::create_dir_all(&dir).expect("Failed to create .name directory");
        fs::write(dir.join("settings.toml"), content).expect("Failed to write workspace settings");
    }

    /// Write `$HOME/.config/name-launch/settings.toml`.
    pub(crate) fn write_user_settings(&self, content: &str) {
        let dir = self.home.join(".config").join("name-launch");
        fs::create_dir_all(&dir).expect("Failed to create user settings directory");
        fs::write(dir.join("settings.toml"), content).expect("Failed to write user settings");
    }

    pub(crate) fn workspace_settings_path(&self) -> PathBuf {
        self.work_dir.join(".name").join("settings.toml")
    }
}
