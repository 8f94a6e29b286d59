//! Error types for the interference engine
//!
//! The generators and scorers never fail: malformed bands surface as
//! warnings and physically invalid products are filtered. Errors are
//! reserved for the outer surfaces (configuration, band lookup, presets,
//! export) and for the quantitative stage's per-product skips.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for engine operations
pub type CoexResult<T> = Result<T, CoexError>;

/// Errors that can occur around an interference analysis
#[derive(Error, Debug)]
pub enum CoexError {
    /// Band code not present in the registry
    #[error("unknown band code: {0}")]
    UnknownBand(String),

    /// No configuration file at the requested location
    #[error("config not found: {0}")]
    ConfigNotFound(String),

    /// Configuration file exists but could not be read
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration could not be written
    #[error("failed to write config {path}: {source}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration could not be parsed
    #[error("failed to parse config: {0}")]
    ConfigParse(String),

    /// Configuration parsed but holds invalid values
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// System parameter preset name not recognised
    #[error("unknown system preset '{0}'")]
    UnknownPreset(String),

    /// Product type the power-budget model has no reference level for
    #[error("unsupported product for quantitative analysis: {0}")]
    UnsupportedProduct(String),

    /// Log file could not be opened
    #[error("failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Serialising results failed
    #[error("export failed: {0}")]
    Export(String),
}

impl CoexError {
    /// Whether the analysis can continue past this error.
    ///
    /// Per-product failures only drop that product; everything else aborts
    /// the surrounding operation.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CoexError::UnsupportedProduct(_) | CoexError::UnknownBand(_)
        )
    }
}

impl From<serde_yaml::Error> for CoexError {
    fn from(e: serde_yaml::Error) -> Self {
        CoexError::ConfigParse(e.to_string())
    }
}

impl From<serde_json::Error> for CoexError {
    fn from(e: serde_json::Error) -> Self {
        CoexError::Export(e.to_string())
    }
}
