//! On-disk input formats: labware layouts, operation scripts, config.

use std::path::Path;

use plateroi_core::{
    Address, ColorIndex, LabwareLayout, SectionProvenance, Slot, parse_addresses,
};
use plateroi_engine::{NamingContext, RegionsConfig};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{CliError, Result};

/// Read and parse a TOML file.
pub fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| CliError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a [`RegionsConfig`]; `.json` files are read as JSON, anything else
/// as TOML. No path means defaults.
pub fn load_config(path: Option<&Path>) -> Result<RegionsConfig> {
    let Some(path) = path else {
        return Ok(RegionsConfig::default());
    };
    let config = if path.extension().is_some_and(|ext| ext == "json") {
        RegionsConfig::from_json_file(path)?
    } else {
        RegionsConfig::from_toml_file(path)?
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutFile {
    pub barcode: String,
    pub rows: u16,
    pub columns: u16,
    #[serde(default)]
    pub slots: Vec<SlotEntry>,
}

/// A slot line. Without `source_barcode` and `sample_id` the slot is empty.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlotEntry {
    pub address: String,
    #[serde(default)]
    pub source_barcode: Option<String>,
    #[serde(default)]
    pub sample_id: Option<u64>,
    #[serde(default)]
    pub section: Option<u32>,
}

impl SlotEntry {
    fn to_slot(&self) -> Result<Slot> {
        let address: Address = self.address.parse()?;
        match (&self.source_barcode, self.sample_id) {
            (Some(barcode), Some(sample_id)) => Ok(Slot::occupied(
                address,
                SectionProvenance::new(barcode.clone(), sample_id, self.section),
            )),
            (None, None) if self.section.is_none() => Ok(Slot::empty(address)),
            _ => Err(CliError::invalid(format!(
                "slot {address}: source_barcode and sample_id must be given together"
            ))),
        }
    }
}

impl LayoutFile {
    pub fn load(path: &Path) -> Result<Self> {
        read_toml(path)
    }

    pub fn to_layout(&self) -> Result<LabwareLayout> {
        let slots = self
            .slots
            .iter()
            .map(SlotEntry::to_slot)
            .collect::<Result<Vec<_>>>()?;
        Ok(LabwareLayout::new(
            self.barcode.clone(),
            self.rows,
            self.columns,
            slots,
        )?)
    }
}

// ---------------------------------------------------------------------------
// Script
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepOp {
    Merge,
    Split,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStep {
    select: Option<Vec<String>>,
    arm: Option<u8>,
    op: Option<StepOp>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptFile {
    #[serde(default)]
    pub run_name: String,
    #[serde(default)]
    pub work_number: String,
    #[serde(default)]
    steps: Vec<RawStep>,
}

/// One replayable user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Select(Vec<Address>),
    Arm(ColorIndex),
    Merge,
    Split,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Select(addresses) => {
                write!(f, "select [")?;
                for (i, a) in addresses.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{a}")?;
                }
                write!(f, "]")
            }
            Self::Arm(color) => write!(f, "arm {color}"),
            Self::Merge => write!(f, "merge"),
            Self::Split => write!(f, "split"),
        }
    }
}

/// A parsed script: naming context plus steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub context: NamingContext,
    pub steps: Vec<Step>,
}

impl ScriptFile {
    pub fn load(path: &Path) -> Result<Self> {
        read_toml(path)
    }

    pub fn to_script(&self) -> Result<Script> {
        let steps = self
            .steps
            .iter()
            .enumerate()
            .map(|(i, raw)| match (&raw.select, raw.arm, raw.op) {
                (Some(labels), None, None) => Ok(Step::Select(parse_addresses(labels)?)),
                (None, Some(color), None) => Ok(Step::Arm(ColorIndex(color))),
                (None, None, Some(StepOp::Merge)) => Ok(Step::Merge),
                (None, None, Some(StepOp::Split)) => Ok(Step::Split),
                _ => Err(CliError::invalid(format!(
                    "step {} must set exactly one of select, arm, op",
                    i + 1
                ))),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Script {
            context: NamingContext::new(self.run_name.clone(), self.work_number.clone()),
            steps,
        })
    }
}
