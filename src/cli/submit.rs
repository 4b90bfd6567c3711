//! Submit command - append form data from a JSON file

use crate::cli::progress::CliProgress;
use crate::cli::style::{check, Stylize};
use anstream::println;
use anyhow::{bail, Context};
use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;
use sheet_intake::service::IntakeService;
use sheet_intake::types::Submission;
use std::path::Path;

/// Run the submit command
pub async fn run_submit(
    service: &IntakeService,
    file: &Path,
    sheet: Option<&str>,
) -> anyhow::Result<()> {
    let raw = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("could not read {}", file.display()))?;
    let mut submission: Submission = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a valid submission", file.display()))?;

    if let Some(sheet) = sheet {
        submission.selected_sheet = sheet.to_string();
    }
    if submission.selected_sheet.trim().is_empty() {
        submission.selected_sheet = choose_sheet(service).await?;
    }

    println!(
        "Submitting {} entr{} to {}",
        submission.entries.len().accent(),
        if submission.entries.len() == 1 { "y" } else { "ies" },
        submission.selected_sheet.emphasis()
    );

    let result = service
        .submit_data_with_progress(&submission, &CliProgress::new())
        .await;

    if result.success {
        println!(
            "{} {}",
            check(),
            result.message.as_deref().unwrap_or_default()
        );
        Ok(())
    } else {
        bail!(
            "{}",
            result
                .error
                .unwrap_or_else(|| "submission failed".to_string())
        )
    }
}

async fn choose_sheet(service: &IntakeService) -> anyhow::Result<String> {
    let mut names = service.get_sheet_names().await;
    if names.is_empty() {
        bail!("no sheets to submit to; create one with `intake init <NAME>`");
    }

    let picked = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Sheet")
        .items(&names)
        .default(0)
        .interact()
        .context("no sheet given; pass --sheet when not running in a terminal")?;
    Ok(names.swap_remove(picked))
}
