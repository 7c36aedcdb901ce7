mod fake_debug;
mod fake_shell;
mod fake_step_runner;
mod memory_settings;

#[allow(unused_imports)]
pub use fake_debug::{FakeProbe, RecordingDebugHost};
#[allow(unused_imports)]
pub use fake_shell::FakeShellLauncher;
#[allow(unused_imports)]
pub use fake_step_runner::FakeStepRunner;
#[allow(unused_imports)]
pub use memory_settings::MemorySettings;
