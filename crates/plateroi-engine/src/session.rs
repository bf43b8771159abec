//! Several labware on one page, sharing a naming context.
//!
//! [`LabwareSession`] routes selection events and operations to the right
//! [`LabwareRegionState`] by barcode, and forwards rejections to a
//! [`RegionErrorSink`].

use std::collections::BTreeMap;
use std::fmt;

use plateroi_core::{Address, ColorIndex, LabwareLayout, RegionSummary};

use crate::error::RegionOpError;
use crate::labeling::{NamingContext, RegionLabeler, TemplateLabeler};
use crate::notify::{RegionErrorSink, report_failure};
use crate::state::LabwareRegionState;

/// Failures at the session level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    UnknownLabware { barcode: String },
    DuplicateLabware { barcode: String },
    Operation { barcode: String, error: RegionOpError },
}

impl SessionError {
    /// The wrapped engine error, if this is one.
    #[must_use]
    pub fn operation_error(&self) -> Option<&RegionOpError> {
        match self {
            Self::Operation { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownLabware { barcode } => write!(f, "unknown labware {barcode}"),
            Self::DuplicateLabware { barcode } => {
                write!(f, "labware {barcode} is already loaded")
            }
            Self::Operation { barcode, error } => write!(f, "{barcode}: {error}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Operation { error, .. } => Some(error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Merge,
    Split,
}

/// All labware on a page.
pub struct LabwareSession {
    context: NamingContext,
    labeler: Box<dyn RegionLabeler + Send + Sync>,
    labware: BTreeMap<String, LabwareRegionState>,
}

impl fmt::Debug for LabwareSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabwareSession")
            .field("context", &self.context)
            .field("labware", &self.labware.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl LabwareSession {
    /// Session using the default [`TemplateLabeler`].
    #[must_use]
    pub fn new(context: NamingContext) -> Self {
        Self::with_labeler(context, TemplateLabeler::default())
    }

    #[must_use]
    pub fn with_labeler(
        context: NamingContext,
        labeler: impl RegionLabeler + Send + Sync + 'static,
    ) -> Self {
        Self {
            context,
            labeler: Box::new(labeler),
            labware: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn context(&self) -> &NamingContext {
        &self.context
    }

    /// Load a labware and build its identity partition.
    pub fn add_labware(&mut self, layout: &LabwareLayout) -> Result<(), SessionError> {
        let barcode = layout.barcode();
        if self.labware.contains_key(barcode) {
            return Err(SessionError::DuplicateLabware {
                barcode: barcode.to_string(),
            });
        }
        let state = LabwareRegionState::from_layout(layout, &self.context, self.labeler.as_ref());
        tracing::info!(
            labware = barcode,
            regions = state.regions().len(),
            "labware loaded"
        );
        self.labware.insert(barcode.to_string(), state);
        Ok(())
    }

    pub fn remove_labware(&mut self, barcode: &str) -> Option<LabwareRegionState> {
        self.labware.remove(barcode)
    }

    #[must_use]
    pub fn labware(&self, barcode: &str) -> Option<&LabwareRegionState> {
        self.labware.get(barcode)
    }

    /// Barcodes in sorted order.
    pub fn barcodes(&self) -> impl Iterator<Item = &str> {
        self.labware.keys().map(String::as_str)
    }

    pub fn select(
        &mut self,
        barcode: &str,
        addresses: impl IntoIterator<Item = Address>,
    ) -> Result<(), SessionError> {
        self.state_mut(barcode)?.select(addresses);
        Ok(())
    }

    pub fn arm_color(&mut self, barcode: &str, color: ColorIndex) -> Result<(), SessionError> {
        self.state_mut(barcode)?.arm_color(color);
        Ok(())
    }

    /// Merge the labware's selection; rejections go to `sink`.
    pub fn merge(
        &mut self,
        barcode: &str,
        sink: &mut dyn RegionErrorSink,
    ) -> Result<(), SessionError> {
        self.run(barcode, Op::Merge, sink)
    }

    /// Split the labware's armed-color region; rejections go to `sink`.
    pub fn split(
        &mut self,
        barcode: &str,
        sink: &mut dyn RegionErrorSink,
    ) -> Result<(), SessionError> {
        self.run(barcode, Op::Split, sink)
    }

    /// Replace the naming context and rename every labware's regions.
    pub fn set_context(&mut self, context: NamingContext) {
        self.context = context;
        for state in self.labware.values_mut() {
            state.relabel(&self.context, self.labeler.as_ref());
        }
    }

    pub fn summaries(&self, barcode: &str) -> Result<Vec<RegionSummary>, SessionError> {
        self.labware
            .get(barcode)
            .map(LabwareRegionState::summaries)
            .ok_or_else(|| SessionError::UnknownLabware {
                barcode: barcode.to_string(),
            })
    }

    fn state_mut(&mut self, barcode: &str) -> Result<&mut LabwareRegionState, SessionError> {
        self.labware
            .get_mut(barcode)
            .ok_or_else(|| SessionError::UnknownLabware {
                barcode: barcode.to_string(),
            })
    }

    fn run(
        &mut self,
        barcode: &str,
        op: Op,
        sink: &mut dyn RegionErrorSink,
    ) -> Result<(), SessionError> {
        let span = tracing::info_span!("labware.op", labware = barcode, op = ?op);
        let _guard = span.enter();

        let state = self
            .labware
            .get_mut(barcode)
            .ok_or_else(|| SessionError::UnknownLabware {
                barcode: barcode.to_string(),
            })?;
        let result = match op {
            Op::Merge => state.merge(&self.context, self.labeler.as_ref()),
            Op::Split => state.split(&self.context, self.labeler.as_ref()),
        };
        result.map_err(|error| {
            report_failure(sink, barcode, &error);
            SessionError::Operation {
                barcode: barcode.to_string(),
                error,
            }
        })
    }
}
