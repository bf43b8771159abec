#![forbid(unsafe_code)]

//! `plateroi` command-line front end: replay operation scripts against
//! labware layouts and check partitions.

pub mod check;
pub mod cli;
pub mod error;
pub mod files;
pub mod logging;
pub mod output;
pub mod replay;

pub use cli::run_from_env;
pub use error::{CliError, Result};
