//! Row normalization: raw gviz rows to typed `Record`s.
//!
//! Rule order matters and is preserved exactly: missing cell container,
//! then header/title detection, then the already-filed marker, then field
//! mapping, then the all-empty guard.

use crate::models::{Record, EMPTY_FIELD};

use super::columns::{
    field, Column, FIRST_COLUMN_HEADER_LABELS, SECOND_COLUMN_HEADER_LABEL,
};
use super::gviz::GvizRow;
use super::timestamp::format_sheet_timestamp;

/// Normalize a whole payload, keeping only open data rows.
///
/// Record ids are positional indices into the raw payload, so an excluded
/// row still consumes its index.
#[must_use]
pub fn normalize_table(rows: &[GvizRow]) -> Vec<Record> {
    rows.iter()
        .enumerate()
        .filter_map(|(index, row)| normalize_row(index, row))
        .collect()
}

/// Normalize one raw row, or `None` if it is not an open data row.
#[must_use]
pub fn normalize_row(index: usize, row: &GvizRow) -> Option<Record> {
    row.c.as_ref()?;

    // Title/legend rows carry a known label, or nothing, in the lead columns.
    let first = field(row, Column::Timestamp)?;
    if FIRST_COLUMN_HEADER_LABELS.contains(&first.as_str()) {
        return None;
    }
    if field(row, Column::LiftNumber).as_deref() == Some(SECOND_COLUMN_HEADER_LABEL) {
        return None;
    }

    // A filled "Actual" column means the row was already filed upstream
    // and must not resurface. This check runs before the emptiness guard.
    if field(row, Column::ActualMarker).is_some() {
        return None;
    }

    let lift_number = field(row, Column::LiftNumber);
    let bill_type = field(row, Column::BillType);
    let bill_number = field(row, Column::BillNumber);
    let party_name = field(row, Column::PartyName);
    let product_name = field(row, Column::ProductName);
    let quantity = field(row, Column::Quantity);
    let transporter_name = field(row, Column::TransporterName);

    // Stray blank rows: nothing mapped carries data.
    let business_fields = [
        &lift_number,
        &bill_type,
        &bill_number,
        &party_name,
        &product_name,
        &quantity,
        &transporter_name,
    ];
    if first.is_empty() && business_fields.iter().all(|value| value.is_none()) {
        return None;
    }

    Some(Record {
        id: index,
        timestamp: format_sheet_timestamp(&first),
        raw_timestamp: first,
        lift_number: or_placeholder(lift_number),
        bill_type: or_placeholder(bill_type),
        bill_number: or_placeholder(bill_number),
        party_name: or_placeholder(party_name),
        product_name: or_placeholder(product_name),
        quantity: or_placeholder(quantity),
        transporter_name: or_placeholder(transporter_name),
    })
}

fn or_placeholder(value: Option<String>) -> String {
    value.unwrap_or_else(|| EMPTY_FIELD.to_string())
}
