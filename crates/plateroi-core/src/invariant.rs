//! Structural checks over a labware region list.
//!
//! [`check_partition`] produces a [`PartitionReport`] listing every finding
//! with a stable [`PartitionIssueCode`]. Error-level findings break the
//! partition; warnings flag states the engine can legitimately produce but
//! a caller may want to surface (two regions sharing a color after merges
//! that never touched the older holder).

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::region::{ColorIndex, Region};

/// Severity of a partition finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum PartitionSeverity {
    Error,
    Warning,
}

/// Stable code for partition findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum PartitionIssueCode {
    /// An occupied address is covered by no region.
    UncoveredAddress,
    /// A region covers an address that is not occupied.
    UnoccupiedAddress,
    /// Two regions (or two groups) cover the same address.
    OverlappingAddress,
    /// A region holds no section groups.
    EmptyRegion,
    /// Two regions carry the same defined color.
    DuplicateColor,
    /// Two regions carry the same display name.
    DuplicateName,
}

impl PartitionIssueCode {
    #[must_use]
    pub const fn severity(self) -> PartitionSeverity {
        match self {
            Self::DuplicateColor => PartitionSeverity::Warning,
            _ => PartitionSeverity::Error,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UncoveredAddress => "uncovered_address",
            Self::UnoccupiedAddress => "unoccupied_address",
            Self::OverlappingAddress => "overlapping_address",
            Self::EmptyRegion => "empty_region",
            Self::DuplicateColor => "duplicate_color",
            Self::DuplicateName => "duplicate_name",
        }
    }
}

/// One finding.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PartitionIssue {
    pub code: PartitionIssueCode,
    pub severity: PartitionSeverity,
    /// Index of the offending region in the checked list, when relevant.
    pub region: Option<usize>,
    pub address: Option<Address>,
    pub message: String,
}

/// All findings for one region list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PartitionReport {
    pub issues: Vec<PartitionIssue>,
}

impl PartitionReport {
    /// Return true if any error-level finding exists.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.severity == PartitionSeverity::Error)
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Findings with the given code.
    pub fn with_code(&self, code: PartitionIssueCode) -> impl Iterator<Item = &PartitionIssue> {
        self.issues.iter().filter(move |issue| issue.code == code)
    }

    fn push(
        &mut self,
        code: PartitionIssueCode,
        region: Option<usize>,
        address: Option<Address>,
        message: String,
    ) {
        self.issues.push(PartitionIssue {
            code,
            severity: code.severity(),
            region,
            address,
            message,
        });
    }
}

impl fmt::Display for PartitionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return write!(f, "partition ok");
        }
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[{}] {}", issue.code.as_str(), issue.message)?;
        }
        Ok(())
    }
}

/// Check that `regions` exactly and disjointly cover `occupied` with no empty
/// region and unique names. Shared colors are reported as warnings.
#[must_use]
pub fn check_partition(occupied: &BTreeSet<Address>, regions: &[Region]) -> PartitionReport {
    let mut report = PartitionReport::default();
    let mut owner: BTreeMap<Address, usize> = BTreeMap::new();

    for (index, region) in regions.iter().enumerate() {
        if region.groups().is_empty() {
            report.push(
                PartitionIssueCode::EmptyRegion,
                Some(index),
                None,
                format!("region {index} holds no section groups"),
            );
        }
        for group in region.groups() {
            for &address in group.addresses() {
                if let Some(previous) = owner.insert(address, index) {
                    report.push(
                        PartitionIssueCode::OverlappingAddress,
                        Some(index),
                        Some(address),
                        format!("address {address} is covered by regions {previous} and {index}"),
                    );
                }
                if !occupied.contains(&address) {
                    report.push(
                        PartitionIssueCode::UnoccupiedAddress,
                        Some(index),
                        Some(address),
                        format!("region {index} covers unoccupied address {address}"),
                    );
                }
            }
        }
    }

    for &address in occupied {
        if !owner.contains_key(&address) {
            report.push(
                PartitionIssueCode::UncoveredAddress,
                None,
                Some(address),
                format!("occupied address {address} belongs to no region"),
            );
        }
    }

    let mut colors: BTreeMap<ColorIndex, usize> = BTreeMap::new();
    let mut names: BTreeMap<&str, usize> = BTreeMap::new();
    for (index, region) in regions.iter().enumerate() {
        if let Some(color) = region.color() {
            if let Some(previous) = colors.insert(color, index) {
                report.push(
                    PartitionIssueCode::DuplicateColor,
                    Some(index),
                    None,
                    format!("regions {previous} and {index} both carry color {color}"),
                );
            }
        }
        if let Some(previous) = names.insert(region.name(), index) {
            report.push(
                PartitionIssueCode::DuplicateName,
                Some(index),
                None,
                format!(
                    "regions {previous} and {index} share the name '{}'",
                    region.name()
                ),
            );
        }
    }

    report
}
