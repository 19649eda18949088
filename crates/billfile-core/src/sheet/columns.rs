//! Positional column layout of the accounts sheet.
//!
//! Business fields are mapped by fixed integer offsets into each exported
//! row. That mapping is fragile to upstream schema drift, so it lives here
//! and nowhere else: a column move means editing this table only.

use super::gviz::GvizRow;

/// Named business columns and their fixed positions in the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Timestamp,
    LiftNumber,
    BillType,
    BillNumber,
    PartyName,
    ProductName,
    Quantity,
    TransporterName,
    /// "Actual" marker, filled upstream once a row has been filed
    ActualMarker,
}

impl Column {
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Timestamp => 0,
            Self::LiftNumber => 1,
            Self::BillType => 2,
            Self::BillNumber => 3,
            Self::PartyName => 4,
            Self::ProductName => 5,
            Self::Quantity => 6,
            Self::TransporterName => 9,
            Self::ActualMarker => 46,
        }
    }
}

/// First-column labels that identify title/legend rows, not data.
pub const FIRST_COLUMN_HEADER_LABELS: [&str; 2] =
    ["Timestamp", "Rectify The Mistake & Bilty Add"];

/// Second-column label that identifies the header row.
pub const SECOND_COLUMN_HEADER_LABEL: &str = "Lift Number";

/// Trimmed text value of the named column, `None` when absent or empty.
#[must_use]
pub fn field(row: &GvizRow, column: Column) -> Option<String> {
    row.value_at(column.index())
}
