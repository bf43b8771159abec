//! Validation errors for region operations.
//!
//! The engine performs no I/O, so every failure is a validation failure the
//! user can fix by changing the selection or the armed color. Each variant
//! has a stable [`RegionOpErrorKind`] for presentation layers to key on and a
//! human-readable message for the warning text.

use std::fmt;

use plateroi_core::ColorIndex;

/// Stable identifier for a region operation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum RegionOpErrorKind {
    NoColorSelected,
    NoAddressesSelected,
    InsufficientGroups,
    ColorNotFound,
}

impl RegionOpErrorKind {
    /// snake_case label for logs and structured output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoColorSelected => "no_color_selected",
            Self::NoAddressesSelected => "no_addresses_selected",
            Self::InsufficientGroups => "insufficient_groups",
            Self::ColorNotFound => "color_not_found",
        }
    }
}

impl fmt::Display for RegionOpErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a merge or split was rejected. A rejected operation changes nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionOpError {
    /// No color swatch is armed.
    NoColorSelected,
    /// The selection is empty.
    NoAddressesSelected,
    /// Fewer than two section groups would be combined.
    InsufficientGroups { found: usize },
    /// No region carries the armed color.
    ColorNotFound { color: ColorIndex },
}

impl RegionOpError {
    #[must_use]
    pub const fn kind(&self) -> RegionOpErrorKind {
        match self {
            Self::NoColorSelected => RegionOpErrorKind::NoColorSelected,
            Self::NoAddressesSelected => RegionOpErrorKind::NoAddressesSelected,
            Self::InsufficientGroups { .. } => RegionOpErrorKind::InsufficientGroups,
            Self::ColorNotFound { .. } => RegionOpErrorKind::ColorNotFound,
        }
    }

    /// User-facing warning text.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RegionOpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoColorSelected => write!(f, "select a region color first"),
            Self::NoAddressesSelected => write!(f, "select one or more slots first"),
            Self::InsufficientGroups { found } => write!(
                f,
                "a region needs at least 2 sections; the selection covers {found}"
            ),
            Self::ColorNotFound { color } => {
                write!(f, "no region uses color {color}")
            }
        }
    }
}

impl std::error::Error for RegionOpError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_stable() {
        assert_eq!(
            RegionOpError::NoColorSelected.kind().as_str(),
            "no_color_selected"
        );
        assert_eq!(
            RegionOpError::NoAddressesSelected.kind(),
            RegionOpErrorKind::NoAddressesSelected
        );
        assert_eq!(
            RegionOpError::InsufficientGroups { found: 1 }.kind().to_string(),
            "insufficient_groups"
        );
        assert_eq!(
            RegionOpError::ColorNotFound {
                color: ColorIndex(4)
            }
            .kind(),
            RegionOpErrorKind::ColorNotFound
        );
    }

    #[test]
    fn messages_carry_context() {
        assert!(
            RegionOpError::InsufficientGroups { found: 1 }
                .message()
                .contains("covers 1")
        );
        assert!(
            RegionOpError::ColorNotFound {
                color: ColorIndex(7)
            }
            .message()
            .contains('7')
        );
    }
}
