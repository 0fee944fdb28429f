pub mod host;
pub mod predicate;
pub mod record;

pub use host::HostSet;
pub use predicate::{Combine, FilterPredicate};
pub use record::{ProbeRecord, StatusCodes};
