//! Terminal progress for submissions

use crate::cli::style::{check, spinner_style, warning, Stylize};
use anstream::{eprintln, println};
use async_trait::async_trait;
use indicatif::ProgressBar;
use sheet_intake::intake::{AppendOutcome, Phase, ProgressCallback};
use std::sync::Mutex;
use std::time::Duration;

/// Prints phases as they happen, with a spinner during the lock wait
pub struct CliProgress {
    spinner: Mutex<Option<ProgressBar>>,
}

impl CliProgress {
    pub const fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn clear_spinner(&self) {
        if let Ok(mut slot) = self.spinner.lock() {
            if let Some(spinner) = slot.take() {
                spinner.finish_and_clear();
            }
        }
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_phase(&self, phase: Phase) {
        match phase {
            Phase::RequestingLock => {
                let spinner = ProgressBar::new_spinner();
                spinner.set_style(spinner_style());
                spinner.set_message(format!("{phase}..."));
                spinner.enable_steady_tick(Duration::from_millis(80));
                if let Ok(mut slot) = self.spinner.lock() {
                    *slot = Some(spinner);
                }
            }
            Phase::LockHeld | Phase::Done => self.clear_spinner(),
            Phase::Appending | Phase::Notifying => {
                println!("{}", format!("{phase}...").muted());
            }
            Phase::Released => {}
        }
    }

    async fn on_rows_written(&self, sheet: &str, outcome: &AppendOutcome) {
        println!(
            "{} Wrote {} row{} to {} (row {}) and the consolidated sheet (row {})",
            check(),
            outcome.rows_written.accent(),
            if outcome.rows_written == 1 { "" } else { "s" },
            sheet.emphasis(),
            outcome.primary_row,
            outcome.consolidated_row
        );
    }

    async fn on_notification_failed(&self, reason: &str) {
        eprintln!("{} {}", warning(), reason.warn());
    }
}
