//! Shared building blocks for `subrefine`.
//!
//! Holds the data that flows between pipeline stages (host entries, probe
//! records, filter predicates), the typed configuration and the error type
//! every stage reports through.

pub mod config;
pub mod error;
pub mod macros;
pub mod models;

pub use error::{RefineError, Result};
