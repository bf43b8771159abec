#![forbid(unsafe_code)]

//! Core value types for labware region composition.
//!
//! # Role in plateroi
//! `plateroi-core` is the vocabulary shared by the engine and its callers:
//! grid [`Address`]es, the scanned [`LabwareLayout`], indivisible
//! [`SectionGroup`]s, and the colored [`Region`]s that partition a labware's
//! occupied positions.
//!
//! # How it fits in the system
//! The engine (`plateroi-engine`) transforms `Vec<Region>` values; this crate
//! only defines them and checks their structure ([`check_partition`]). It has
//! no logging and no I/O, so it stays trivially deterministic.

pub mod address;
pub mod invariant;
pub mod layout;
pub mod region;

pub use address::{Address, AddressParseError, parse_addresses};
pub use invariant::{
    PartitionIssue, PartitionIssueCode, PartitionReport, PartitionSeverity, check_partition,
};
pub use layout::{LabwareLayout, LayoutError, SectionProvenance, Slot};
pub use region::{ColorIndex, Region, RegionSummary, SectionGroup, identity_partition};
