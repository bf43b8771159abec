use std::path::PathBuf;

use plateroi_core::{AddressParseError, LayoutError, PartitionReport};
use plateroi_engine::{ConfigError, SessionError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

/// Exit code for bad arguments or unreadable input files.
pub const EXIT_INPUT: i32 = 2;
/// Exit code when a region list fails the partition check.
pub const EXIT_INVARIANT: i32 = 3;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid address: {0}")]
    Address(#[from] AddressParseError),

    #[error("invalid layout: {0}")]
    Layout(#[from] LayoutError),

    #[error("session error: {0}")]
    Session(#[from] SessionError),

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("labware {barcode} failed the partition check:\n{report}")]
    InvariantViolation {
        barcode: String,
        report: PartitionReport,
    },
}

impl CliError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvariantViolation { .. } => EXIT_INVARIANT,
            _ => EXIT_INPUT,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
