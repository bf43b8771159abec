use std::path::PathBuf;

use clap::Args;
use plateroi_core::{LabwareLayout, PartitionReport, RegionSummary};
use plateroi_engine::{LabwareSession, Notification, RegionsConfig, SessionError};
use serde::Serialize;

use crate::error::{CliError, Result};
use crate::files::{LayoutFile, Script, ScriptFile, Step, load_config};
use crate::output::{render_regions, render_report, render_warnings};

#[derive(Debug, Clone, Args)]
pub struct ReplayArgs {
    /// Labware layout (TOML).
    #[arg(long)]
    pub layout: PathBuf,

    /// Operation script (TOML).
    #[arg(long)]
    pub script: PathBuf,

    /// Engine config (TOML, or JSON with a .json extension).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the outcome as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Everything a replay produced.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayOutcome {
    pub barcode: String,
    pub run_name: String,
    pub work_number: String,
    pub steps_applied: usize,
    pub steps_rejected: usize,
    pub warnings: Vec<Notification>,
    pub warnings_dropped: u64,
    pub regions: Vec<RegionSummary>,
    pub report: PartitionReport,
}

pub fn run_replay(args: ReplayArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    crate::logging::init(&config.logging);

    let layout = LayoutFile::load(&args.layout)?.to_layout()?;
    let script = ScriptFile::load(&args.script)?.to_script()?;
    let outcome = replay(&layout, &script, &config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", render_warnings(&outcome.warnings));
        print!("{}", render_regions(&outcome.regions));
        print!("{}", render_report(&outcome.report));
    }
    Ok(())
}

/// Drive `script` against a fresh session holding `layout`.
///
/// Rejected merges and splits become warnings; the replay continues.
pub fn replay(
    layout: &LabwareLayout,
    script: &Script,
    config: &RegionsConfig,
) -> Result<ReplayOutcome> {
    let labeler = config
        .to_labeler()
        .map_err(|e| CliError::invalid(format!("naming.template: {e}")))?;
    let mut session = LabwareSession::with_labeler(script.context.clone(), labeler);
    session.add_labware(layout)?;
    let mut queue = config.to_notification_queue();
    let barcode = layout.barcode();

    let mut applied = 0;
    let mut rejected = 0;
    for (index, step) in script.steps.iter().enumerate() {
        let result = match step {
            Step::Select(addresses) => session.select(barcode, addresses.iter().copied()),
            Step::Arm(color) => session.arm_color(barcode, *color),
            Step::Merge => session.merge(barcode, &mut queue),
            Step::Split => session.split(barcode, &mut queue),
        };
        match result {
            Ok(()) => applied += 1,
            Err(SessionError::Operation { error, .. }) => {
                tracing::info!(step = index + 1, action = %step, kind = %error.kind(), "step rejected");
                rejected += 1;
            }
            Err(other) => return Err(other.into()),
        }
    }

    let state = session
        .labware(barcode)
        .ok_or_else(|| SessionError::UnknownLabware {
            barcode: barcode.to_string(),
        })?;
    let report = state.report();
    if report.has_errors() {
        return Err(CliError::InvariantViolation {
            barcode: barcode.to_string(),
            report,
        });
    }

    Ok(ReplayOutcome {
        barcode: barcode.to_string(),
        run_name: script.context.run_name.clone(),
        work_number: script.context.work_number.clone(),
        steps_applied: applied,
        steps_rejected: rejected,
        warnings_dropped: queue.dropped(),
        warnings: queue.drain(),
        regions: state.summaries(),
        report,
    })
}
