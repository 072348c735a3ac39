//! rf-report: immutable well-report snapshot types.
//!
//! These types are what the output layer consumes; they carry plain SI
//! values and no references back into the live state. Serialization format
//! decisions (summary files, restart files) belong to the consumer.

pub mod types;

pub use types::*;
