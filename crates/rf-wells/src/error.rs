//! Error types for well-state operations.
//!
//! Everything here is fatal for the current run step: a well state that is
//! silently wrong corrupts the nonlinear solve, so there is no fallback or
//! partial recovery. Messages always name the offending well.

use rf_comms::CommsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WellError {
    #[error("Well must be exactly one of producer or injector: {well}")]
    BothOrNeitherRole { well: String },

    #[error("Unknown well: {well}")]
    UnknownWell { well: String },

    #[error("Perforation count mismatch for well {well}: expected {expected}, got {actual}")]
    PerforationCountMismatch {
        well: String,
        expected: usize,
        actual: usize,
    },

    #[error("Cell index mismatch in connection {connection} of well {well}")]
    CellIndexMismatch { well: String, connection: usize },

    #[error("Saturation function table mismatch in connection {connection} of well {well}")]
    SatnumMismatch { well: String, connection: usize },

    #[error(transparent)]
    Comms(#[from] CommsError),
}

pub type WellResult<T> = Result<T, WellError>;
