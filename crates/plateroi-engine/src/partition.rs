//! The partition engine: merge selected positions into a region, or split a
//! region back into singletons.
//!
//! Both operations are pure: they read the current region list and return a
//! complete replacement, or an error with nothing changed. Callers swap the
//! returned list in as one unit.
//!
//! # Merge (`create_or_update_region`)
//!
//! 1. Every group intersecting the selection (one shared address suffices)
//!    is pulled out of its region, in encounter order.
//! 2. A region that lost groups and carries the armed color is exploded into
//!    colorless singletons, freeing the color for the merged region. A region
//!    that lost groups under another color keeps the rest under that color.
//!    Regions the selection never touched are left alone, even if they carry
//!    the armed color.
//! 3. At least two groups must have been pulled out.
//! 4. The merged region comes first, then the reshaped regions; everything is
//!    renamed.
//!
//! # Split (`remove_region`)
//!
//! The region carrying the armed color is replaced by one colorless singleton
//! per group, appended after the remaining regions; everything is renamed.

use std::collections::BTreeSet;

use plateroi_core::{Address, ColorIndex, Region, SectionGroup};

use crate::error::RegionOpError;
use crate::labeling::{NamingContext, RegionLabeler, reindex_and_rename_regions};

/// Minimum number of section groups a merged region must hold.
pub const MIN_MERGE_GROUPS: usize = 2;

fn reject(error: RegionOpError) -> RegionOpError {
    tracing::warn!(kind = error.kind().as_str(), message = %error, "region operation rejected");
    error
}

/// Merge every group touched by `selected` into one region colored
/// `armed_color`.
pub fn create_or_update_region(
    regions: &[Region],
    selected: &BTreeSet<Address>,
    armed_color: Option<ColorIndex>,
    context: &NamingContext,
    labeler: &dyn RegionLabeler,
) -> Result<Vec<Region>, RegionOpError> {
    let span = tracing::debug_span!(
        "region.merge",
        selected = selected.len(),
        color = ?armed_color,
        regions = regions.len()
    );
    let _guard = span.enter();

    let color = armed_color.ok_or_else(|| reject(RegionOpError::NoColorSelected))?;
    if selected.is_empty() {
        return Err(reject(RegionOpError::NoAddressesSelected));
    }

    let mut moving: Vec<SectionGroup> = Vec::new();
    let mut reshaped: Vec<Region> = Vec::with_capacity(regions.len());

    for region in regions {
        let (taken, remaining): (Vec<SectionGroup>, Vec<SectionGroup>) = region
            .groups()
            .iter()
            .cloned()
            .partition(|group| group.intersects(selected));

        if taken.is_empty() {
            reshaped.push(region.clone());
            continue;
        }
        moving.extend(taken);

        if remaining.is_empty() {
            continue;
        }
        if region.color() == Some(color) {
            tracing::debug!(
                region = region.name(),
                exploded = remaining.len(),
                "armed color collision; exploding remainder"
            );
            reshaped.extend(remaining.into_iter().map(Region::singleton));
        } else if let Some(rest) = Region::new(remaining, region.color()) {
            reshaped.push(rest);
        }
    }

    if moving.len() < MIN_MERGE_GROUPS {
        return Err(reject(RegionOpError::InsufficientGroups {
            found: moving.len(),
        }));
    }

    let merged_groups = moving.len();
    let mut next = Vec::with_capacity(reshaped.len() + 1);
    next.extend(Region::new(moving, Some(color)));
    next.extend(reshaped);

    let next = reindex_and_rename_regions(next, context, labeler);
    tracing::debug!(
        merged_groups,
        regions = next.len(),
        "region merge applied"
    );
    Ok(next)
}

/// Split the region carrying `armed_color` into colorless singletons.
pub fn remove_region(
    regions: &[Region],
    armed_color: Option<ColorIndex>,
    context: &NamingContext,
    labeler: &dyn RegionLabeler,
) -> Result<Vec<Region>, RegionOpError> {
    let span = tracing::debug_span!(
        "region.split",
        color = ?armed_color,
        regions = regions.len()
    );
    let _guard = span.enter();

    let color = armed_color.ok_or_else(|| reject(RegionOpError::NoColorSelected))?;
    let target = regions
        .iter()
        .position(|region| region.color() == Some(color))
        .ok_or_else(|| reject(RegionOpError::ColorNotFound { color }))?;

    let mut next: Vec<Region> = Vec::with_capacity(regions.len() + regions[target].group_count());
    next.extend(
        regions
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != target)
            .map(|(_, region)| region.clone()),
    );
    next.extend(
        regions[target]
            .groups()
            .iter()
            .cloned()
            .map(Region::singleton),
    );

    let next = reindex_and_rename_regions(next, context, labeler);
    tracing::debug!(
        exploded = regions[target].group_count(),
        regions = next.len(),
        "region split applied"
    );
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labeling::TemplateLabeler;
    use plateroi_core::{SectionProvenance, check_partition, identity_partition};
    use tracing_test::traced_test;

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    fn sel(labels: &[&str]) -> BTreeSet<Address> {
        labels.iter().map(|l| addr(l)).collect()
    }

    fn group(labels: &[&str], sample: u64) -> SectionGroup {
        SectionGroup::new(sel(labels), SectionProvenance::new("SRC", sample, Some(1))).unwrap()
    }

    fn ctx() -> NamingContext {
        NamingContext::new("run", "W1")
    }

    fn merge(
        regions: &[Region],
        labels: &[&str],
        color: Option<u8>,
    ) -> Result<Vec<Region>, RegionOpError> {
        create_or_update_region(
            regions,
            &sel(labels),
            color.map(ColorIndex),
            &ctx(),
            &TemplateLabeler::default(),
        )
    }

    fn split(regions: &[Region], color: Option<u8>) -> Result<Vec<Region>, RegionOpError> {
        remove_region(
            regions,
            color.map(ColorIndex),
            &ctx(),
            &TemplateLabeler::default(),
        )
    }

    fn four_singletons() -> Vec<Region> {
        identity_partition([
            group(&["A1"], 1),
            group(&["A2"], 2),
            group(&["B1"], 3),
            group(&["B2"], 4),
        ])
    }

    fn find<'a>(regions: &'a [Region], label: &str) -> &'a Region {
        let a = addr(label);
        regions
            .iter()
            .find(|r| r.addresses().contains(&a))
            .expect("address covered")
    }

    #[test]
    fn merge_requires_armed_color() {
        assert_eq!(
            merge(&four_singletons(), &["A1", "A2"], None),
            Err(RegionOpError::NoColorSelected)
        );
    }

    #[test]
    fn merge_requires_selection() {
        assert_eq!(
            merge(&four_singletons(), &[], Some(0)),
            Err(RegionOpError::NoAddressesSelected)
        );
    }

    #[test]
    fn color_is_checked_before_selection() {
        assert_eq!(
            merge(&four_singletons(), &[], None),
            Err(RegionOpError::NoColorSelected)
        );
    }

    #[test]
    fn single_address_selection_is_insufficient() {
        assert_eq!(
            merge(&four_singletons(), &["A1"], Some(0)),
            Err(RegionOpError::InsufficientGroups { found: 1 })
        );
    }

    #[test]
    fn selecting_only_empty_positions_is_insufficient() {
        assert_eq!(
            merge(&four_singletons(), &["H12"], Some(0)),
            Err(RegionOpError::InsufficientGroups { found: 0 })
        );
    }

    #[test]
    fn merge_two_singletons() {
        let out = merge(&four_singletons(), &["A1", "A2"], Some(0)).unwrap();
        assert_eq!(out.len(), 3);
        let x = &out[0];
        assert_eq!(x.color(), Some(ColorIndex(0)));
        assert_eq!(x.addresses(), sel(&["A1", "A2"]));
        assert!(find(&out, "B1").color().is_none());
        assert!(find(&out, "B2").color().is_none());
        assert!(check_partition(&sel(&["A1", "A2", "B1", "B2"]), &out).is_clean());
    }

    #[test]
    fn untouched_region_keeps_duplicate_color() {
        let a = merge(&four_singletons(), &["A1", "A2"], Some(0)).unwrap();
        let b = merge(&a, &["B1", "B2"], Some(0)).unwrap();
        assert_eq!(b.len(), 2);
        let x = find(&b, "A1");
        let y = find(&b, "B1");
        assert_eq!(x.addresses(), sel(&["A1", "A2"]));
        assert_eq!(y.addresses(), sel(&["B1", "B2"]));
        assert_eq!(x.color(), Some(ColorIndex(0)));
        assert_eq!(y.color(), Some(ColorIndex(0)));
    }

    #[test]
    fn whole_group_moves_when_one_address_is_selected() {
        let regions = identity_partition([group(&["A1", "A2"], 1), group(&["B1"], 2)]);
        let out = merge(&regions, &["A2", "B1"], Some(3)).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].addresses(), sel(&["A1", "A2", "B1"]));
    }

    #[test]
    fn merged_groups_keep_encounter_order() {
        let regions = identity_partition([group(&["B1"], 1), group(&["A1"], 2), group(&["C1"], 3)]);
        let out = merge(&regions, &["A1", "B1", "C1"], Some(1)).unwrap();
        let firsts: Vec<Address> = out[0].groups().iter().map(SectionGroup::first_address).collect();
        assert_eq!(firsts, vec![addr("B1"), addr("A1"), addr("C1")]);
    }

    #[test]
    fn other_color_remainder_stays_together() {
        let regions = vec![
            Region::new(
                vec![group(&["A1"], 1), group(&["A2"], 2), group(&["A3"], 3)],
                Some(ColorIndex(4)),
            )
            .unwrap(),
            Region::singleton(group(&["B1"], 4)),
        ];
        let out = merge(&regions, &["A1", "B1"], Some(0)).unwrap();
        assert_eq!(out.len(), 2);
        let rest = find(&out, "A2");
        assert_eq!(rest.color(), Some(ColorIndex(4)));
        assert_eq!(rest.addresses(), sel(&["A2", "A3"]));
    }

    #[test]
    fn collision_explodes_remainder_into_colorless_singletons() {
        let regions = vec![
            Region::new(
                vec![group(&["A1"], 1), group(&["A2"], 2), group(&["A3"], 3)],
                Some(ColorIndex(2)),
            )
            .unwrap(),
            Region::singleton(group(&["B1"], 4)),
        ];
        let out = merge(&regions, &["A1", "B1"], Some(2)).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].addresses(), sel(&["A1", "B1"]));
        assert_eq!(out[0].color(), Some(ColorIndex(2)));
        for label in ["A2", "A3"] {
            let r = find(&out, label);
            assert_eq!(r.group_count(), 1);
            assert!(r.color().is_none());
        }
        assert!(!out.iter().any(|r| r.group_count() == 3));
    }

    #[test]
    fn collision_with_single_group_taken_is_still_insufficient() {
        let regions = vec![
            Region::new(
                vec![group(&["A1"], 1), group(&["A2"], 2), group(&["A3"], 3)],
                Some(ColorIndex(2)),
            )
            .unwrap(),
        ];
        assert_eq!(
            merge(&regions, &["A1"], Some(2)),
            Err(RegionOpError::InsufficientGroups { found: 1 })
        );
    }

    #[test]
    fn re_merging_a_whole_region_recolors_it() {
        let regions = vec![
            Region::new(vec![group(&["A1"], 1), group(&["A2"], 2)], Some(ColorIndex(1))).unwrap(),
        ];
        let out = merge(&regions, &["A1"], Some(5)).unwrap_err();
        assert_eq!(out, RegionOpError::InsufficientGroups { found: 1 });
        let out = merge(&regions, &["A1", "A2"], Some(5)).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].color(), Some(ColorIndex(5)));
    }

    #[test]
    fn remove_region_splits_into_singletons() {
        let g3 = Region::singleton(group(&["B1"], 3));
        let regions = vec![
            Region::new(vec![group(&["A1"], 1), group(&["A2"], 2)], Some(ColorIndex(1))).unwrap(),
            g3.clone(),
        ];
        let out = split(&regions, Some(1)).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].groups(), g3.groups());
        assert!(out.iter().all(|r| r.color().is_none() && r.group_count() == 1));
        assert_eq!(out[1].first_address(), addr("A1"));
        assert_eq!(out[2].first_address(), addr("A2"));
    }

    #[test]
    fn remove_count_is_old_minus_one_plus_groups() {
        let regions = vec![
            Region::new(
                vec![group(&["A1"], 1), group(&["A2"], 2), group(&["A3"], 3), group(&["A4"], 4)],
                Some(ColorIndex(9)),
            )
            .unwrap(),
            Region::singleton(group(&["B1"], 5)),
            Region::singleton(group(&["B2"], 6)),
        ];
        let out = split(&regions, Some(9)).unwrap();
        assert_eq!(out.len(), regions.len() - 1 + 4);
    }

    #[test]
    fn remove_errors() {
        let regions = four_singletons();
        assert_eq!(split(&regions, None), Err(RegionOpError::NoColorSelected));
        assert_eq!(
            split(&regions, Some(3)),
            Err(RegionOpError::ColorNotFound {
                color: ColorIndex(3)
            })
        );
    }

    #[test]
    fn names_are_recomputed_after_each_operation() {
        let out = merge(&four_singletons(), &["B1", "B2"], Some(0)).unwrap();
        let names: Vec<&str> = out.iter().map(Region::name).collect();
        // Canonical ranks: A1, A2, then the merged B-row region.
        assert_eq!(names, vec!["W1-run-R3", "W1-run-R1", "W1-run-R2"]);
    }

    #[test]
    #[traced_test]
    fn rejection_is_logged_with_kind() {
        let _ = merge(&four_singletons(), &["A1"], Some(0));
        assert!(logs_contain("region operation rejected"));
        assert!(logs_contain("insufficient_groups"));
    }
}
