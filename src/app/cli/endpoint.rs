//! `endpoint` command.

use crate::app::api;
use crate::domain::AppError;

pub fn run_endpoint(check: bool) -> Result<(), AppError> {
    let workspace = super::workspace_or_cwd(None)?;
    let report = super::runtime()?.block_on(api::endpoint_at(&workspace, check))?;

    match report.listening {
        Some(true) => println!("✅ {} is accepting connections", report.endpoint),
        Some(false) => println!("⚠️  Nothing is listening on {}", report.endpoint),
        None => println!("{}", report.endpoint),
    }
    Ok(())
}
