//! Measurement and analysis core for the signal-correlation / BER platform.
//!
//! The modules cover the offline half of the measurement pipeline: immutable
//! signal containers parsed from the external generator's output files, the
//! direct conjugate-reversal correlation engine, the SNR sweep grid, and the
//! per-modulation BER result store consumed by the presentation layer.

pub mod correlation;
pub mod grid;
pub mod modulation;
pub mod prelude;
pub mod progress;
pub mod results;
pub mod signal;
pub mod telemetry;

/// Common error type for the analysis core.
#[derive(thiserror::Error, Debug)]
pub enum AnalysisError {
    #[error("empty input: {0}")]
    EmptyInput(String),
    #[error("data file not found: {0}")]
    FileMissing(String),
    #[error("malformed data file {path}: {reason}")]
    FileParse { path: String, reason: String },
    #[error("inconsistent series length: {0}")]
    InconsistentLength(String),
    #[error("results not ready: {0}")]
    NotReady(String),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
