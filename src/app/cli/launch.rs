//! `start` and `debug` commands.

use std::path::PathBuf;

use crate::app::api::{self, LaunchReport};
use crate::domain::{AppError, LaunchMode, TriggerState};

pub fn run_launch(
    file: Option<PathBuf>,
    workspace: Option<PathBuf>,
    mode: LaunchMode,
    name_path: Option<&str>,
) -> Result<(), AppError> {
    let workspace = super::workspace_or_cwd(workspace)?;
    let document = super::document_path(file)?;

    let runtime = super::runtime()?;
    let result = runtime.block_on(async {
        let started = api::launch_at(workspace, document, mode, name_path).await?;
        print_started(&started.report);

        let state = started.finish().await?;
        if mode.is_debug() && state == TriggerState::Idle {
            println!("⚠️  Toolchain exited before the debugger was started");
        }
        Ok::<(), AppError>(())
    });
    // A read of the terminal still pending in the input forwarder cannot be cancelled.
    runtime.shutdown_background();
    result
}

fn print_started(report: &LaunchReport) {
    match &report.session {
        Some(session) => println!(
            "✅ Sent {} command(s) to session \"{}\"",
            report.commands.len(),
            session.name()
        ),
        None => println!("✅ Built toolchain and started the emulator"),
    }
    if report.debug_token.is_some() {
        println!("🐞 Debugging starts once {} is ready", report.endpoint);
    }
}
