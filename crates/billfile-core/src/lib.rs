//! billfile-core - Core library for billfile
//!
//! This crate contains the shared models, sheet ingestion pipeline, and
//! filing session logic used by the billfile interfaces.

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod sheet;
pub mod util;

pub use client::SheetClient;
pub use config::SheetConfig;
pub use error::{Error, Result};
pub use models::{Draft, FilingEntry, FilingStatus, Record};
pub use session::{FilingRequest, FilingSession, Phase};
