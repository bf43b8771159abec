//! Plain-text rendering of region lists and warnings.

use std::fmt::Write as _;

use plateroi_core::{PartitionReport, RegionSummary};
use plateroi_engine::Notification;

/// Fixed-width table: name, color, addresses.
#[must_use]
pub fn render_regions(regions: &[RegionSummary]) -> String {
    let name_width = regions
        .iter()
        .map(|r| r.name.len())
        .chain(std::iter::once("NAME".len()))
        .max()
        .unwrap_or(4);

    let mut out = String::new();
    let _ = writeln!(out, "{:<name_width$}  {:>5}  ADDRESSES", "NAME", "COLOR");
    for region in regions {
        let color = region
            .color
            .map_or_else(|| "-".to_string(), |c| c.to_string());
        let addresses = region
            .addresses
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(out, "{:<name_width$}  {color:>5}  {addresses}", region.name);
    }
    out
}

#[must_use]
pub fn render_warnings(warnings: &[Notification]) -> String {
    let mut out = String::new();
    for n in warnings {
        let _ = writeln!(out, "warning [{}] {}: {}", n.kind, n.labware, n.message);
    }
    out
}

/// Report followed by a newline.
#[must_use]
pub fn render_report(report: &PartitionReport) -> String {
    format!("{report}\n")
}
