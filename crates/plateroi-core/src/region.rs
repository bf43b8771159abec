//! Section groups and regions: the cells of a labware partition.

use std::collections::BTreeSet;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::layout::SectionProvenance;

/// Small-integer color swatch index.
///
/// Colors are keys, not paint: the palette they map to belongs to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct ColorIndex(pub u8);

impl ColorIndex {
    #[inline]
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl From<u8> for ColorIndex {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl fmt::Display for ColorIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Addresses with identical provenance. Never split by any operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SectionGroup {
    addresses: BTreeSet<Address>,
    provenance: SectionProvenance,
}

impl SectionGroup {
    /// Returns `None` when `addresses` is empty.
    #[must_use]
    pub fn new(addresses: BTreeSet<Address>, provenance: SectionProvenance) -> Option<Self> {
        if addresses.is_empty() {
            None
        } else {
            Some(Self {
                addresses,
                provenance,
            })
        }
    }

    #[must_use]
    pub fn addresses(&self) -> &BTreeSet<Address> {
        &self.addresses
    }

    #[must_use]
    pub fn provenance(&self) -> &SectionProvenance {
        &self.provenance
    }

    /// Smallest address in the group.
    #[must_use]
    pub fn first_address(&self) -> Address {
        // Non-empty by construction.
        *self
            .addresses
            .first()
            .unwrap_or_else(|| unreachable!("section group is never empty"))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    /// Always false for a constructed group.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    #[must_use]
    pub fn contains(&self, address: Address) -> bool {
        self.addresses.contains(&address)
    }

    /// True if any of the group's addresses is in `selection`.
    #[must_use]
    pub fn intersects(&self, selection: &BTreeSet<Address>) -> bool {
        // Iterate the smaller side.
        if self.addresses.len() <= selection.len() {
            self.addresses.iter().any(|a| selection.contains(a))
        } else {
            selection.iter().any(|a| self.addresses.contains(a))
        }
    }
}

/// A named, optionally colored bundle of section groups.
///
/// A region always holds at least one group; constructors refuse to build
/// an empty one.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Region {
    name: String,
    color: Option<ColorIndex>,
    groups: Vec<SectionGroup>,
}

impl Region {
    /// Returns `None` when `groups` is empty. The name starts blank until
    /// a labeler assigns one.
    #[must_use]
    pub fn new(groups: Vec<SectionGroup>, color: Option<ColorIndex>) -> Option<Self> {
        if groups.is_empty() {
            None
        } else {
            Some(Self {
                name: String::new(),
                color,
                groups,
            })
        }
    }

    /// A colorless region holding exactly one group.
    #[must_use]
    pub fn singleton(group: SectionGroup) -> Self {
        Self {
            name: String::new(),
            color: None,
            groups: vec![group],
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn color(&self) -> Option<ColorIndex> {
        self.color
    }

    #[must_use]
    pub fn groups(&self) -> &[SectionGroup] {
        &self.groups
    }

    /// Consume the region, yielding its groups.
    #[must_use]
    pub fn into_groups(self) -> Vec<SectionGroup> {
        self.groups
    }

    /// All addresses covered, in address order.
    #[must_use]
    pub fn addresses(&self) -> BTreeSet<Address> {
        self.groups
            .iter()
            .flat_map(|g| g.addresses().iter().copied())
            .collect()
    }

    /// Smallest address covered; the canonical sort key for naming.
    #[must_use]
    pub fn first_address(&self) -> Address {
        self.groups
            .iter()
            .map(SectionGroup::first_address)
            .min()
            .unwrap_or_else(|| unreachable!("region is never empty"))
    }

    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Flatten to a submission-friendly view.
    #[must_use]
    pub fn summary(&self) -> RegionSummary {
        RegionSummary {
            name: self.name.clone(),
            color: self.color,
            addresses: self.addresses().into_iter().collect(),
        }
    }
}

/// Flat view of a region: name, color, addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RegionSummary {
    pub name: String,
    pub color: Option<ColorIndex>,
    pub addresses: Vec<Address>,
}

/// The initial partition: one colorless region per section group.
#[must_use]
pub fn identity_partition(groups: impl IntoIterator<Item = SectionGroup>) -> Vec<Region> {
    groups.into_iter().map(Region::singleton).collect()
}
