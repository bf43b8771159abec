//! Per-labware region state.
//!
//! [`LabwareRegionState`] owns the current region list behind an [`Arc`], the
//! selection tracker, and the last reported error. Operations compute a new
//! list with the pure engine functions and swap it in only on success; on
//! failure the previous `Arc` is kept, so callers can check pointer identity.

use std::collections::BTreeSet;
use std::sync::Arc;

use plateroi_core::{
    Address, ColorIndex, LabwareLayout, PartitionReport, Region, RegionSummary, check_partition,
    identity_partition,
};

use crate::error::RegionOpError;
use crate::labeling::{NamingContext, RegionLabeler, reindex_and_rename_regions};
use crate::partition::{create_or_update_region, remove_region};
use crate::selection::SelectionTracker;

/// Region list, selection, and error field for one labware.
#[derive(Debug, Clone)]
pub struct LabwareRegionState {
    barcode: String,
    occupied: BTreeSet<Address>,
    regions: Arc<Vec<Region>>,
    selection: SelectionTracker,
    last_error: Option<RegionOpError>,
}

impl LabwareRegionState {
    /// Start from the identity partition of `layout`.
    #[must_use]
    pub fn from_layout(
        layout: &LabwareLayout,
        context: &NamingContext,
        labeler: &dyn RegionLabeler,
    ) -> Self {
        let regions = reindex_and_rename_regions(
            identity_partition(layout.section_groups()),
            context,
            labeler,
        );
        tracing::debug!(
            labware = layout.barcode(),
            regions = regions.len(),
            "identity partition built"
        );
        Self {
            barcode: layout.barcode().to_string(),
            occupied: layout.occupied_addresses(),
            regions: Arc::new(regions),
            selection: SelectionTracker::new(),
            last_error: None,
        }
    }

    #[must_use]
    pub fn barcode(&self) -> &str {
        &self.barcode
    }

    #[must_use]
    pub fn occupied(&self) -> &BTreeSet<Address> {
        &self.occupied
    }

    /// The current list. Cloning the `Arc` is cheap and lets callers detect
    /// replacement with [`Arc::ptr_eq`].
    #[must_use]
    pub fn regions(&self) -> &Arc<Vec<Region>> {
        &self.regions
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    /// Error from the most recent operation, cleared by the next success.
    #[must_use]
    pub fn last_error(&self) -> Option<&RegionOpError> {
        self.last_error.as_ref()
    }

    pub fn select(&mut self, addresses: impl IntoIterator<Item = Address>) {
        self.selection.select(addresses);
    }

    pub fn arm_color(&mut self, color: ColorIndex) {
        self.selection.arm_color(color);
    }

    /// Merge the selection into a region with the armed color.
    ///
    /// On success the list is replaced and the selection tracker cleared.
    pub fn merge(
        &mut self,
        context: &NamingContext,
        labeler: &dyn RegionLabeler,
    ) -> Result<(), RegionOpError> {
        let result = create_or_update_region(
            &self.regions,
            self.selection.selected(),
            self.selection.armed_color(),
            context,
            labeler,
        );
        self.apply(result, SelectionTracker::clear)
    }

    /// Split the region carrying the armed color.
    ///
    /// On success the list is replaced and only the armed color is cleared.
    pub fn split(
        &mut self,
        context: &NamingContext,
        labeler: &dyn RegionLabeler,
    ) -> Result<(), RegionOpError> {
        let result = remove_region(
            &self.regions,
            self.selection.armed_color(),
            context,
            labeler,
        );
        self.apply(result, SelectionTracker::disarm)
    }

    /// Recompute names without changing structure (e.g. after the run name
    /// changed).
    pub fn relabel(&mut self, context: &NamingContext, labeler: &dyn RegionLabeler) {
        let renamed = reindex_and_rename_regions(self.regions.as_ref().clone(), context, labeler);
        self.regions = Arc::new(renamed);
    }

    /// Structural check of the current list against the occupied set.
    #[must_use]
    pub fn report(&self) -> PartitionReport {
        check_partition(&self.occupied, &self.regions)
    }

    #[must_use]
    pub fn summaries(&self) -> Vec<RegionSummary> {
        self.regions.iter().map(Region::summary).collect()
    }

    fn apply(
        &mut self,
        result: Result<Vec<Region>, RegionOpError>,
        reset: fn(&mut SelectionTracker),
    ) -> Result<(), RegionOpError> {
        match result {
            Ok(next) => {
                debug_assert!(
                    !check_partition(&self.occupied, &next).has_errors(),
                    "engine produced an invalid partition for {}",
                    self.barcode
                );
                self.regions = Arc::new(next);
                reset(&mut self.selection);
                self.last_error = None;
                Ok(())
            }
            Err(error) => {
                self.last_error = Some(error.clone());
                Err(error)
            }
        }
    }
}
