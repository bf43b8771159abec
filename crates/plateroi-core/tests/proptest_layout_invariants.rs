//! Property-based invariant tests for addresses and layouts.
//!
//! 1. Address labels parse back to the address that printed them.
//! 2. Address order is row-major.
//! 3. Section groups cover the occupied set exactly and never overlap.
//! 4. The identity partition passes `check_partition` with no findings.
//! 5. Dropping a region or duplicating an address is always reported.

use std::collections::BTreeSet;

use plateroi_core::{
    Address, LabwareLayout, PartitionIssueCode, SectionProvenance, Slot, check_partition,
    identity_partition,
};
use proptest::prelude::*;

fn address_strategy() -> impl Strategy<Value = Address> {
    (0u16..800, 1u16..=48).prop_map(|(r, c)| Address::new(r, c).unwrap())
}

fn layout_strategy() -> impl Strategy<Value = LabwareLayout> {
    (1u16..=6, 1u16..=8)
        .prop_flat_map(|(rows, cols)| {
            let cells = usize::from(rows * cols);
            (
                Just(rows),
                Just(cols),
                prop::collection::vec(prop::option::weighted(0.7, (0u64..5, 0u32..2)), cells),
            )
        })
        .prop_map(|(rows, cols, cells)| {
            let slots = cells.into_iter().enumerate().map(|(i, cell)| {
                let i = i as u16;
                let address = Address::new(i / cols, i % cols + 1).unwrap();
                match cell {
                    Some((sample, section)) => Slot::occupied(
                        address,
                        SectionProvenance::new("BLK", sample, Some(section)),
                    ),
                    None => Slot::empty(address),
                }
            });
            LabwareLayout::new("LW", rows, cols, slots).unwrap()
        })
}

// ═════════════════════════════════════════════════════════════════════════
// 1-2. Addresses
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn labels_parse_back(a in address_strategy()) {
        let label = a.to_string();
        prop_assert!(label.starts_with(&a.row_label()));
        prop_assert_eq!(label.parse::<Address>().unwrap(), a);
        prop_assert_eq!(label.to_ascii_lowercase().parse::<Address>().unwrap(), a);
    }

    #[test]
    fn order_is_row_major(a in address_strategy(), b in address_strategy()) {
        prop_assert_eq!(a.cmp(&b), (a.row(), a.column()).cmp(&(b.row(), b.column())));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3-5. Layouts and partitions
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn section_groups_cover_occupied_exactly(layout in layout_strategy()) {
        let groups = layout.section_groups();
        let mut seen = BTreeSet::new();
        for g in &groups {
            for &a in g.addresses() {
                prop_assert!(seen.insert(a), "address {} in two groups", a);
            }
        }
        prop_assert_eq!(seen, layout.occupied_addresses());

        let firsts: Vec<Address> = groups.iter().map(|g| g.first_address()).collect();
        let mut sorted = firsts.clone();
        sorted.sort();
        prop_assert_eq!(firsts, sorted);
    }

    #[test]
    fn identity_partition_is_clean(layout in layout_strategy()) {
        let regions: Vec<_> = identity_partition(layout.section_groups())
            .into_iter()
            .enumerate()
            .map(|(i, r)| r.with_name(format!("R{}", i + 1)))
            .collect();
        let report = check_partition(&layout.occupied_addresses(), &regions);
        prop_assert!(report.is_clean(), "{}", report);
    }

    #[test]
    fn dropped_region_is_reported(layout in layout_strategy(), pick in any::<prop::sample::Index>()) {
        let mut regions: Vec<_> = identity_partition(layout.section_groups())
            .into_iter()
            .enumerate()
            .map(|(i, r)| r.with_name(format!("R{}", i + 1)))
            .collect();
        prop_assume!(!regions.is_empty());
        let removed = regions.remove(pick.index(regions.len()));

        let report = check_partition(&layout.occupied_addresses(), &regions);
        prop_assert!(report.has_errors());
        prop_assert_eq!(
            report.with_code(PartitionIssueCode::UncoveredAddress).count(),
            removed.addresses().len()
        );
    }

    #[test]
    fn duplicated_region_is_reported(layout in layout_strategy(), pick in any::<prop::sample::Index>()) {
        let mut regions: Vec<_> = identity_partition(layout.section_groups())
            .into_iter()
            .enumerate()
            .map(|(i, r)| r.with_name(format!("R{}", i + 1)))
            .collect();
        prop_assume!(!regions.is_empty());
        let copy = regions[pick.index(regions.len())].clone().with_name("copy");
        let overlap = copy.addresses().len();
        regions.push(copy);

        let report = check_partition(&layout.occupied_addresses(), &regions);
        prop_assert_eq!(
            report.with_code(PartitionIssueCode::OverlappingAddress).count(),
            overlap
        );
    }
}
