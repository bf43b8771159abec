#![forbid(unsafe_code)]

//! Region composition engine for labware.
//!
//! # Role in plateroi
//! `plateroi-engine` owns the one stateful algorithm of the system: merging
//! selected positions into color-keyed regions and splitting them back
//! apart while the region list stays an exact partition of the occupied
//! positions.
//!
//! # This crate provides
//! - [`create_or_update_region`] and [`remove_region`]: pure transforms from
//!   one region list to the next, or a [`RegionOpError`].
//! - [`reindex_and_rename_regions`]: order-independent naming through a
//!   [`RegionLabeler`] ([`TemplateLabeler`] by default).
//! - [`SelectionTracker`] and [`LabwareRegionState`]: per-labware selection,
//!   atomic list replacement, and the scoped error field.
//! - [`LabwareSession`]: several labware on one page.
//! - [`RegionErrorSink`] / [`NotificationQueue`]: the presentation seam for
//!   rejected operations.
//! - [`RegionsConfig`]: policy-as-data tunables (TOML/JSON with the `config`
//!   feature).
//!
//! # How it fits in the system
//! Grid UIs feed address sets and color clicks in; submission code reads
//! [`plateroi_core::RegionSummary`] values out. Nothing here performs I/O
//! except the optional config loaders.

pub mod config;
pub mod error;
pub mod labeling;
pub mod notify;
pub mod partition;
pub mod selection;
pub mod session;
pub mod state;

pub use config::{ConfigError, LoggingConfig, NamingConfig, NotificationConfig, RegionsConfig};
pub use error::{RegionOpError, RegionOpErrorKind};
pub use labeling::{
    DEFAULT_TEMPLATE, NamingContext, RegionLabeler, TemplateError, TemplateLabeler,
    reindex_and_rename_regions,
};
pub use notify::{Notification, NotificationQueue, NullSink, RegionErrorSink, report_failure};
pub use partition::{MIN_MERGE_GROUPS, create_or_update_region, remove_region};
pub use selection::SelectionTracker;
pub use session::{LabwareSession, SessionError};
pub use state::LabwareRegionState;
