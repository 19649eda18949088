//! Domain models shared across the crate.

mod draft;
mod record;

pub use draft::{Draft, FilingEntry, FilingStatus};
pub use record::{Record, EMPTY_FIELD};
