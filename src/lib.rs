//! ESO Processor Library
//!
//! A Rust library for reading EnergyPlus simulation output files and
//! exposing their time-series results through a typed, read-only query
//! model.
//!
//! This library provides tools for:
//! - Parsing .eso files with proper dictionary/data section handling
//! - Querying results per environment, reporting frequency and variable
//! - Deriving timezone-aware timestamps for every reporting period
//! - Reading the .end status line and the .err warning log
//! - Invoking an EnergyPlus installation and collecting its output files
//! - Comprehensive error handling and recovery

pub mod end_file;
pub mod err_file;
pub mod error;
pub mod eso;
pub mod run;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use end_file::EndFile;
pub use err_file::ErrFile;
pub use error::{Error, Result};
pub use eso::{Environment, EsoFile, Frequency};
pub use run::{run, RunConfig, RunResult};
