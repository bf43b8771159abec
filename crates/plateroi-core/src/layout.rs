//! Labware grid model: slots, provenance, and section grouping.
//!
//! A [`LabwareLayout`] is what the scanning collaborator hands over when a
//! labware is loaded: its barcode, grid dimensions and the occupied slots.
//! Occupied slots that share a [`SectionProvenance`] form one indivisible
//! [`SectionGroup`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::region::SectionGroup;

/// Where the section in a slot came from.
///
/// Two slots with equal provenance hold parts of the same planned section
/// and always move together.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SectionProvenance {
    /// Barcode of the source labware (block or tube).
    pub source_barcode: String,
    /// Source sample identifier.
    pub sample_id: u64,
    /// Planned new section number, when one was assigned.
    #[cfg_attr(feature = "serde", serde(default))]
    pub section_number: Option<u32>,
}

impl SectionProvenance {
    #[must_use]
    pub fn new(source_barcode: impl Into<String>, sample_id: u64, section_number: Option<u32>) -> Self {
        Self {
            source_barcode: source_barcode.into(),
            sample_id,
            section_number,
        }
    }
}

/// One grid position, empty or holding a section.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Slot {
    pub address: Address,
    #[cfg_attr(feature = "serde", serde(default))]
    pub section: Option<SectionProvenance>,
}

impl Slot {
    #[must_use]
    pub fn empty(address: Address) -> Self {
        Self {
            address,
            section: None,
        }
    }

    #[must_use]
    pub fn occupied(address: Address, section: SectionProvenance) -> Self {
        Self {
            address,
            section: Some(section),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_occupied(&self) -> bool {
        self.section.is_some()
    }
}

/// Structural problems in a layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    EmptyBarcode,
    ZeroDimension { rows: u16, columns: u16 },
    OutOfBounds { address: Address, rows: u16, columns: u16 },
    DuplicateSlot { address: Address },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBarcode => write!(f, "labware barcode must not be empty"),
            Self::ZeroDimension { rows, columns } => {
                write!(f, "labware grid {rows}x{columns} has a zero dimension")
            }
            Self::OutOfBounds {
                address,
                rows,
                columns,
            } => write!(
                f,
                "slot {address} lies outside the {rows}x{columns} labware grid"
            ),
            Self::DuplicateSlot { address } => write!(f, "slot {address} is listed twice"),
        }
    }
}

impl std::error::Error for LayoutError {}

/// A scanned labware with its slots.
///
/// Slots not listed are empty. Construction validates bounds and
/// uniqueness, so a `LabwareLayout` value is always well formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabwareLayout {
    barcode: String,
    rows: u16,
    columns: u16,
    slots: BTreeMap<Address, Slot>,
}

impl LabwareLayout {
    /// Validate and build a layout.
    pub fn new(
        barcode: impl Into<String>,
        rows: u16,
        columns: u16,
        slots: impl IntoIterator<Item = Slot>,
    ) -> Result<Self, LayoutError> {
        let barcode = barcode.into();
        if barcode.trim().is_empty() {
            return Err(LayoutError::EmptyBarcode);
        }
        if rows == 0 || columns == 0 {
            return Err(LayoutError::ZeroDimension { rows, columns });
        }

        let mut by_address = BTreeMap::new();
        for slot in slots {
            let address = slot.address;
            if address.row() >= rows || address.column() > columns {
                return Err(LayoutError::OutOfBounds {
                    address,
                    rows,
                    columns,
                });
            }
            if by_address.insert(address, slot).is_some() {
                return Err(LayoutError::DuplicateSlot { address });
            }
        }

        Ok(Self {
            barcode,
            rows,
            columns,
            slots: by_address,
        })
    }

    #[must_use]
    pub fn barcode(&self) -> &str {
        &self.barcode
    }

    #[must_use]
    pub fn rows(&self) -> u16 {
        self.rows
    }

    #[must_use]
    pub fn columns(&self) -> u16 {
        self.columns
    }

    /// Slots in address order.
    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots.values()
    }

    #[must_use]
    pub fn slot(&self, address: Address) -> Option<&Slot> {
        self.slots.get(&address)
    }

    /// Addresses that hold a section.
    #[must_use]
    pub fn occupied_addresses(&self) -> BTreeSet<Address> {
        self.slots
            .values()
            .filter(|slot| slot.is_occupied())
            .map(|slot| slot.address)
            .collect()
    }

    /// Group occupied slots by identical provenance.
    ///
    /// Groups come back ordered by their smallest address.
    #[must_use]
    pub fn section_groups(&self) -> Vec<SectionGroup> {
        let mut by_provenance: BTreeMap<&SectionProvenance, BTreeSet<Address>> = BTreeMap::new();
        for slot in self.slots.values() {
            if let Some(section) = &slot.section {
                by_provenance
                    .entry(section)
                    .or_default()
                    .insert(slot.address);
            }
        }

        let mut groups: Vec<SectionGroup> = by_provenance
            .into_iter()
            .filter_map(|(provenance, addresses)| SectionGroup::new(addresses, provenance.clone()))
            .collect();
        groups.sort_by_key(SectionGroup::first_address);
        groups
    }
}
