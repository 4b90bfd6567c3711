//! Sheet commands - create and list sheets

use crate::cli::style::{bullet, check, Stylize};
use anstream::println;
use sheet_intake::config::IntakeConfig;
use sheet_intake::service::{init_sheets, IntakeService};
use sheet_intake::store::LocalTableStore;

/// Run the init command
pub async fn run_init(config: &IntakeConfig, sheets: &[String], headers: bool) -> anyhow::Result<()> {
    let store = LocalTableStore::open(config.sheets_dir())?;
    let created = init_sheets(&store, &config.consolidated_sheet, sheets, headers).await?;

    for name in &created {
        println!("{} {}", check(), name.accent());
    }
    println!(
        "{}",
        format!("Sheets stored in {}", config.sheets_dir().display()).muted()
    );
    Ok(())
}

/// Run the sheets command
pub async fn run_sheets(service: &IntakeService) {
    let names = service.get_sheet_names().await;
    if names.is_empty() {
        println!(
            "{}",
            "No sheets yet. Create some with `intake init <NAME>...`".muted()
        );
        return;
    }
    for name in names {
        println!("{} {name}", bullet());
    }
}
