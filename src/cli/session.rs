//! Session commands

use crate::cli::style::{check, warning, Stylize};
use anstream::println;
use anyhow::bail;
use sheet_intake::service::IntakeService;

/// Run `session start`
pub async fn run_session_start(service: &IntakeService, user: &str) -> anyhow::Result<()> {
    if service.start_session(user).await.success {
        println!("{} Session started for {}", check(), user.accent());
        Ok(())
    } else {
        bail!("could not start a session for {user}")
    }
}

/// Run `session check`
///
/// Prints `active` or `expired`; an expired session is not an error.
pub async fn run_session_check(service: &IntakeService, user: &str) {
    if service.check_session(user).await.expired {
        println!("{} {}", warning(), "expired".warn());
    } else {
        println!("{} {}", check(), "active".success());
    }
}
