//! Error type for the fallible edges of the crate.
//!
//! The per-sample core never returns errors. Only construction from runtime
//! data (Vec-backed R-type junctions, render configs, WAV files) can fail.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WdfError {
    #[error("R-type adaptor used before its scattering matrix was set")]
    ScatteringMatrixUnset,
    #[error("R-type adaptor expects {expected} ports, got {found}")]
    PortCount { expected: usize, found: usize },
    #[error("Scattering matrix must be {ports}x{ports}, got {rows} rows")]
    MatrixShape { ports: usize, rows: usize },
    #[error("Invalid value for {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("Unknown diode model '{0}'")]
    UnknownDiodeModel(String),
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}

pub type Result<T, E = WdfError> = std::result::Result<T, E>;
