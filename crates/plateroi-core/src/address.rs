//! Grid addresses for labware positions.
//!
//! An [`Address`] names one physical position by a row label (`A`..`Z`,
//! then `AA`, `AB`, ...) and a 1-based column number, e.g. `B12`.
//!
//! Addresses order row-major: every position in row `A` sorts before any
//! position in row `B`, and within a row by column. Region naming relies on
//! this order.

use std::fmt;
use std::str::FromStr;

/// One position in a labware grid.
///
/// `row` is 0-based (`A` = 0); `column` is 1-based, as printed on labware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address {
    row: u16,
    column: u16,
}

impl Address {
    /// Build an address from a 0-based row index and a 1-based column.
    ///
    /// Returns `None` for column 0.
    #[must_use]
    pub const fn new(row: u16, column: u16) -> Option<Self> {
        if column == 0 {
            None
        } else {
            Some(Self { row, column })
        }
    }

    /// 0-based row index.
    #[inline]
    #[must_use]
    pub const fn row(self) -> u16 {
        self.row
    }

    /// 1-based column number.
    #[inline]
    #[must_use]
    pub const fn column(self) -> u16 {
        self.column
    }

    /// Row label in bijective base-26 (`A`, ..., `Z`, `AA`, ...).
    #[must_use]
    pub fn row_label(self) -> String {
        let mut n = u32::from(self.row) + 1;
        let mut letters = Vec::new();
        while n > 0 {
            let rem = ((n - 1) % 26) as u8;
            letters.push(char::from(b'A' + rem));
            n = (n - 1) / 26;
        }
        letters.iter().rev().collect()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row_label(), self.column)
    }
}

/// Failure to parse an address label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressParseError {
    /// The label was empty or whitespace.
    Empty,
    /// The label did not start with row letters.
    MissingRow { label: String },
    /// The row letters overflow the supported row range.
    RowOutOfRange { label: String },
    /// The column part was missing, non-numeric, or zero.
    InvalidColumn { label: String },
}

impl fmt::Display for AddressParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty address label"),
            Self::MissingRow { label } => write!(f, "address '{label}' has no row letters"),
            Self::RowOutOfRange { label } => write!(f, "address '{label}' row is out of range"),
            Self::InvalidColumn { label } => {
                write!(f, "address '{label}' has no valid 1-based column")
            }
        }
    }
}

impl std::error::Error for AddressParseError {}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        if label.is_empty() {
            return Err(AddressParseError::Empty);
        }

        let split = label
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(label.len());
        let (letters, digits) = label.split_at(split);
        if letters.is_empty() {
            return Err(AddressParseError::MissingRow {
                label: label.to_string(),
            });
        }

        let mut row: u32 = 0;
        for c in letters.chars() {
            let value = u32::from(c.to_ascii_uppercase() as u8 - b'A') + 1;
            row = row * 26 + value;
            if row > u32::from(u16::MAX) + 1 {
                return Err(AddressParseError::RowOutOfRange {
                    label: label.to_string(),
                });
            }
        }

        let column: u16 = Some(digits)
            .filter(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|d| d.parse().ok())
            .filter(|c| *c > 0)
            .ok_or_else(|| AddressParseError::InvalidColumn {
                label: label.to_string(),
            })?;

        Ok(Self {
            row: (row - 1) as u16,
            column,
        })
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse a list of labels, stopping at the first bad one.
pub fn parse_addresses<I, S>(labels: I) -> Result<Vec<Address>, AddressParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    labels.into_iter().map(|l| l.as_ref().parse()).collect()
}
