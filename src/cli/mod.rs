//! CLI commands
//!
//! Command implementations for the `intake` binary.

mod progress;
mod session;
mod sheets;
mod submit;
mod upload;
pub mod style;

pub use session::{run_session_check, run_session_start};
pub use sheets::{run_init, run_sheets};
pub use submit::run_submit;
pub use upload::run_upload;

use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber
///
/// `RUST_LOG` wins when set; otherwise only warnings, or debug output for
/// this crate with `--verbose`.
pub fn init_logging(verbose: bool) {
    let fallback = if verbose {
        "warn,sheet_intake=debug,intake=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
