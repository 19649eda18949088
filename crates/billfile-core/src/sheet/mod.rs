//! Sheet row ingestion: gviz payload parsing, column mapping, timestamp
//! handling, and row normalization.

pub mod columns;
pub mod gviz;
pub mod normalize;
pub mod timestamp;

pub use gviz::{parse_payload, GvizCell, GvizRow};
pub use normalize::{normalize_row, normalize_table};
