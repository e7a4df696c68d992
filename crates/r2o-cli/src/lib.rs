//! r2o command-line front end
//!
//! Configuration, the output layout and the convert command. The binary in
//! `main.rs` only wires these together.

pub mod cli;
pub mod config;
pub mod output;
pub mod run;

pub use config::{CliConfig, OutputConfig};
pub use output::{FailedPage, OutputLayout, PageWriter};
pub use run::{execute, RunSummary};
