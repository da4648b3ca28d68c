mod bootstrap;

use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use sales_core::models::Table;
use sales_core::settings::{OutputMode, Settings};
use sales_data::analysis::build_report;
use sales_data::reader::open_dataset_to;
use sales_ui::app::App;
use sales_ui::charts::charts_from_report;

fn main() -> Result<ExitCode> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Sales Explorer v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "File: {}, Chart: {}, Top: {}, Output: {}",
        settings.file.display(),
        settings.chart,
        settings.top,
        settings.output
    );

    let charts = settings.charts()?;
    let output = settings.output_mode()?;

    let mut stdout = io::stdout().lock();
    let Some(table) = load_dataset(&settings.file, settings.sheet.as_deref(), &mut stdout) else {
        return Ok(ExitCode::FAILURE);
    };

    drop(stdout);

    let report = build_report(&table, &settings.file, &charts, settings.top_n())?;

    match output {
        OutputMode::Json => println!("{}", report.to_json()?),
        OutputMode::Chart => {
            let views = charts_from_report(&report, &charts);
            let app = App::new(&settings.theme, settings.file.display().to_string(), table.len());
            app.run_charts(&views)?;
        }
    }

    tracing::info!("Sales Explorer finished");
    Ok(ExitCode::SUCCESS)
}

/// Load the dataset and refuse to continue without data rows.
///
/// Diagnostics go to `out`: the loader's own message followed by
/// `Error: Failed to open dataset` on a load failure, or
/// `Error: Dataset is empty` for a header-only file.
fn load_dataset<W: Write>(path: &Path, sheet: Option<&str>, out: &mut W) -> Option<Table> {
    let Some(table) = open_dataset_to(path, sheet, out) else {
        let _ = writeln!(out, "Error: Failed to open dataset");
        return None;
    };
    if table.is_empty() {
        tracing::warn!("{} has no data rows", path.display());
        let _ = writeln!(out, "Error: Dataset is empty");
        return None;
    }
    Some(table)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
