//! Record model

use serde::Serialize;

/// Placeholder shown for business fields absent from the sheet row.
pub const EMPTY_FIELD: &str = "-";

/// One open (not yet filed) sheet row, derived from the raw export.
///
/// `id` is the positional index of the row within one fetch. It is stable
/// only for the lifetime of that fetch; upstream reordering may reassign it
/// on the next refresh, so it must never be treated as a durable key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Positional index within the fetched payload
    pub id: usize,
    /// Display-formatted timestamp (`DD/MM/YYYY HH:MM:SS`), `-` if absent
    pub timestamp: String,
    /// Original unparsed timestamp value, kept for delay computation
    #[serde(skip)]
    pub raw_timestamp: String,
    pub lift_number: String,
    pub bill_type: String,
    pub bill_number: String,
    pub party_name: String,
    pub product_name: String,
    pub quantity: String,
    pub transporter_name: String,
}

impl Record {
    /// Whether the record carries a usable lift number.
    ///
    /// The `-` placeholder counts as missing, so a defaulted field can never
    /// pass submission validation.
    #[must_use]
    pub fn has_lift_number(&self) -> bool {
        !self.lift_number.trim().is_empty() && self.lift_number != EMPTY_FIELD
    }
}
