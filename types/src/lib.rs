//! Core domain types for halo.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the shell: the engine owns the
//! state, the terminal front-end renders it, providers produce it.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod ids;
mod status;
pub mod ui;

pub use ids::{ItemHandle, PanelId, ParsePanelIdError, TimerId, TimerKind};
pub use status::{BatteryStatus, PowerProfile, StatusSnapshot, WifiStatus};

use std::io;

use thiserror::Error;

// ============================================================================
// Collaborator errors
// ============================================================================

/// Failure reported by an external collaborator (subprocess, sysfs, filesystem).
///
/// The engine never retries these. Reads fall back to the last known value,
/// actions are logged and otherwise ignored.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{program} exited with {status}")]
    Status { program: String, status: String },
    #[error("unexpected output from {program}: {output:?}")]
    Parse { program: String, output: String },
    #[error("{0} is unavailable")]
    Unavailable(String),
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl ProviderError {
    /// Shorthand for parse failures of a program's stdout.
    #[must_use]
    pub fn parse(program: &str, output: impl Into<String>) -> Self {
        Self::Parse {
            program: program.to_string(),
            output: output.into(),
        }
    }
}
