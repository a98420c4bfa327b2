//! Dashboard error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the dashboard pipeline.
///
/// Load-time failures are fatal at startup; configuration failures are
/// rejected where the offending input is parsed (CLI flag or menu prompt);
/// export failures are reported per artifact without aborting the render
/// pass. Empty filter selections and zero denominators are not errors at
/// all — the engines degrade to empty output and undefined shares.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Dataset file missing or unreadable
    #[error("cannot read dataset '{path}': {source}")]
    DatasetRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Header row lacks one of the six required columns
    #[error("dataset '{path}' is missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: &'static str },

    /// A record could not be decoded as CSV at all
    #[error("dataset '{path}' row {row} is not valid CSV: {source}")]
    MalformedRecord {
        path: PathBuf,
        row: usize,
        #[source]
        source: csv::Error,
    },

    /// A cell value failed to parse as its required type
    #[error("dataset '{path}' row {row}: invalid {column} value '{value}'")]
    InvalidCell {
        path: PathBuf,
        row: usize,
        column: &'static str,
        value: String,
    },

    /// Palette name outside the enumerated set
    #[error("unknown palette '{name}' (expected one of: default, paired, okabe-ito, custom)")]
    UnknownPalette { name: String },

    /// View mode outside the enumerated set
    #[error("unknown view mode '{name}' (expected 'by-specialisation' or 'year-summary')")]
    UnknownViewMode { name: String },

    /// Color value that is not a `#RRGGBB` hex string
    #[error("invalid color '{value}': expected an RGB hex value like #4169E1")]
    InvalidColor { value: String },

    /// Year or specialisation list that could not be parsed
    #[error("invalid {what} selection '{input}'")]
    InvalidSelection { what: &'static str, input: String },

    /// Failure while writing an exported artifact
    #[error("cannot write '{path}': {message}")]
    Export { path: PathBuf, message: String },
}

impl DashboardError {
    /// True for data-load failures, which are fatal at startup.
    pub fn is_data_load(&self) -> bool {
        matches!(
            self,
            DashboardError::DatasetRead { .. }
                | DashboardError::MissingColumn { .. }
                | DashboardError::MalformedRecord { .. }
                | DashboardError::InvalidCell { .. }
        )
    }

    /// True for configuration failures (palette, view mode, colors, selections).
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            DashboardError::UnknownPalette { .. }
                | DashboardError::UnknownViewMode { .. }
                | DashboardError::InvalidColor { .. }
                | DashboardError::InvalidSelection { .. }
        )
    }
}
