//! A NAME toolchain checkout whose `cargo` only logs its invocations.

use std::fs;
use std::path::{Path, PathBuf};

pub(crate) struct FakeToolchain {
    root: PathBuf,
    bin_dir: PathBuf,
    log: PathBuf,
    input: PathBuf,
}

impl FakeToolchain {
    /// Create `name-as/`, `name-emu/` and a logging `cargo` under `dir`.
    ///
    /// `cargo` exits with `fail_code` when its arguments contain `fail_on`.
    /// `cargo run` in `name-emu` reads one line of input, like the emulator's
    /// debug prompt does.
    #[cfg(unix)]
    pub(crate) fn create(dir: &Path, fail_on: Option<(&str, i32)>) -> Self {
        use std::os::unix::fs::PermissionsExt;

        let root = dir.join("name");
        fs::create_dir_all(root.join("name-as").join("configs")).unwrap();
        fs::create_dir_all(root.join("name-emu")).unwrap();
        fs::write(root.join("name-as/configs/default.toml"), "").unwrap();

        let bin_dir = dir.join("bin");
        fs::create_dir_all(&bin_dir).unwrap();
        let log = dir.join("cargo.log");
        let input = dir.join("emulator-input.txt");

        let failure = match fail_on {
            Some((pattern, code)) => format!(
                "case \"$*\" in *{}*) exit {} ;; esac\n",
                pattern, code
            ),
            None => String::new(),
        };
        let reader = format!(
            "if [ \"$(basename \"$PWD\")\" = name-emu ] && [ \"$1\" = run ]; then\n\
             if read -r answer; then echo \"$answer\" > '{0}'; else echo EOF > '{0}'; fi\n\
             fi\n",
            input.display()
        );
        let script = format!(
            "#!/bin/sh\necho \"$(basename \"$PWD\") $*\" >> '{}'\n{}{}exit 0\n",
            log.display(),
            failure,
            reader
        );
        let cargo = bin_dir.join("cargo");
        fs::write(&cargo, script).unwrap();
        fs::set_permissions(&cargo, fs::Permissions::from_mode(0o755)).unwrap();

        Self { root, bin_dir, log, input }
    }

    pub(crate) fn root(&self) -> &Path {
        &self.root
    }

    /// `PATH` with the fake `cargo` first.
    pub(crate) fn path_env(&self) -> String {
        let inherited = std::env::var("PATH").unwrap_or_default();
        format!("{}:{}", self.bin_dir.display(), inherited)
    }

    /// Logged invocations as `<dir name> <args>`.
    pub(crate) fn invocations(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .map(|content| content.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

impl FakeToolchain {
    /// The line the emulator read, or `EOF`. `None` when it never ran.
    pub(crate) fn emulator_input(&self) -> Option<String> {
        fs::read_to_string(&self.input).ok().map(|content| content.trim_end().to_string())
    }
}
