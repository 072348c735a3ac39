//! rf-comms: the inter-rank communication seam.
//!
//! Well state is replicated per rank (SPMD); the only cross-rank exchange is
//! through the [`Communicator`] trait. The handle is passed explicitly into
//! every operation that needs it, which keeps the reduction protocol testable
//! with a size-1 communicator and keeps no process-global state.

pub mod comm;
pub mod error;

pub use comm::{Communicator, SerialComm};
pub use error::{CommsError, CommsResult};
