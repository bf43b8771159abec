use std::path::PathBuf;

use clap::Args;
use plateroi_core::{LabwareLayout, PartitionReport, RegionSummary};
use plateroi_engine::{LabwareRegionState, LoggingConfig, NamingContext, TemplateLabeler};
use serde::Serialize;

use crate::error::{CliError, Result};
use crate::files::LayoutFile;
use crate::output::{render_regions, render_report};

#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Labware layout (TOML).
    #[arg(long)]
    pub layout: PathBuf,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub barcode: String,
    pub occupied: usize,
    pub regions: Vec<RegionSummary>,
    pub report: PartitionReport,
}

pub fn run_check(args: CheckArgs) -> Result<()> {
    crate::logging::init(&LoggingConfig::default());
    let layout = LayoutFile::load(&args.layout)?.to_layout()?;
    let outcome = check(&layout)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{} ({} occupied)", outcome.barcode, outcome.occupied);
        print!("{}", render_regions(&outcome.regions));
        print!("{}", render_report(&outcome.report));
    }
    Ok(())
}

/// Build the identity partition of `layout` and check it.
pub fn check(layout: &LabwareLayout) -> Result<CheckOutcome> {
    let state = LabwareRegionState::from_layout(
        layout,
        &NamingContext::default(),
        &TemplateLabeler::default(),
    );
    let report = state.report();
    if report.has_errors() {
        return Err(CliError::InvariantViolation {
            barcode: layout.barcode().to_string(),
            report,
        });
    }
    Ok(CheckOutcome {
        barcode: layout.barcode().to_string(),
        occupied: state.occupied().len(),
        regions: state.summaries(),
        report,
    })
}
