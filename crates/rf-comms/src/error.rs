//! Error types for collective operations.

use thiserror::Error;

/// Errors from collective calls. All of these are fatal for the run step:
/// a misaligned collective cannot be retried.
#[derive(Error, Debug)]
pub enum CommsError {
    #[error("Collective buffer size mismatch: {what} (local={local}, expected={expected})")]
    BufferSizeMismatch {
        what: &'static str,
        local: usize,
        expected: usize,
    },
}

pub type CommsResult<T> = Result<T, CommsError>;
