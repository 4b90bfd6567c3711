//! Intake components
//!
//! - blank-row search and dual-table append
//! - submission coordination under the process-wide lock
//! - upload validation, confirmation mail and the session timer

mod append;
mod coordinator;
mod locator;
mod notify;
mod progress;
mod session;
mod upload;

pub use append::{AppendOutcome, append_rows};
pub use coordinator::{
    COPY_FAILED_MESSAGE, LOCK_BUSY_MESSAGE, SUCCESS_MESSAGE, SubmissionCoordinator,
};
pub use locator::{find_first_blank_row, is_blank_row};
pub use notify::{FileLink, NotificationComposer, extract_file_id};
pub use progress::{NoopProgress, Phase, ProgressCallback};
pub use session::SessionGuard;
pub use upload::{UPLOAD_FAILED_MESSAGE, UploadGateway, file_extension, is_allowed};
