//! Parity tooling for the ring router.
//!
//! Routers in different runtimes are checked against each other by routing
//! the same key corpus and comparing the resulting assignment artifacts:
//!
//! - [`corpus`] — deterministic key generation.
//! - [`artifact`] — reading and writing the JSON keys and assignment files.
//! - [`parity`] — comparing two assignment reports key by key.

pub mod artifact;
pub mod corpus;
mod error;
pub mod parity;

pub use artifact::{assign, read_keys, read_report, report_meta, write_keys, write_report};
pub use corpus::{CorpusConfig, generate_keys};
pub use error::HarnessError;
pub use parity::{Mismatch, ParityReport, compare};
