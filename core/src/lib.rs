//! Stage implementations of the `subrefine` pipeline.
//!
//! Data only flows forward:
//!
//! ```text
//! asset files --extract--> host list --probe tool--> raw artifact
//!             --parser--> probe table --filter--> filtered table
//! ```
//!
//! [`pipeline::Pipeline`] sequences the stages; each module can also be used on
//! its own.

pub mod extract;
pub mod filter;
pub mod layout;
pub mod parser;
pub mod pipeline;
pub mod probe;
pub mod table;

mod lines;
