//! The user's working selection and armed color.

use std::collections::BTreeSet;

use plateroi_core::{Address, ColorIndex};

/// Transient selection state for one labware.
///
/// `select` replaces the selection wholesale; multi-select semantics belong
/// to the grid collaborator that produces the address set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionTracker {
    selected: BTreeSet<Address>,
    armed_color: Option<ColorIndex>,
}

impl SelectionTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, addresses: impl IntoIterator<Item = Address>) {
        self.selected = addresses.into_iter().collect();
    }

    pub fn arm_color(&mut self, color: ColorIndex) {
        self.armed_color = Some(color);
    }

    /// Reset selection and armed color (after a successful merge).
    pub fn clear(&mut self) {
        self.selected.clear();
        self.armed_color = None;
    }

    /// Reset the armed color only (after a successful split).
    pub fn disarm(&mut self) {
        self.armed_color = None;
    }

    #[must_use]
    pub fn selected(&self) -> &BTreeSet<Address> {
        &self.selected
    }

    #[must_use]
    pub fn armed_color(&self) -> Option<ColorIndex> {
        self.armed_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    #[test]
    fn select_replaces_instead_of_toggling() {
        let mut t = SelectionTracker::new();
        t.select([addr("A1"), addr("A2")]);
        t.select([addr("A2"), addr("B1")]);
        let got: Vec<_> = t.selected().iter().copied().collect();
        assert_eq!(got, vec![addr("A2"), addr("B1")]);
    }

    #[test]
    fn clear_resets_both_and_disarm_keeps_selection() {
        let mut t = SelectionTracker::new();
        t.select([addr("A1")]);
        t.arm_color(ColorIndex(2));
        t.disarm();
        assert_eq!(t.armed_color(), None);
        assert_eq!(t.selected().len(), 1);

        t.arm_color(ColorIndex(3));
        t.clear();
        assert_eq!(t, SelectionTracker::default());
    }
}
