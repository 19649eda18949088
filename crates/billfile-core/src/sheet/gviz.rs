//! Wire types for the Google Sheets gviz JSON export.
//!
//! The export endpoint wraps a JSON table object in non-JSON prefix/suffix
//! text (a JS callback invocation), so the body must be sliced down to the
//! first `{` and the last `}` before parsing.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct GvizPayload {
    #[serde(default)]
    pub table: Option<GvizTable>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GvizTable {
    #[serde(default)]
    pub rows: Vec<GvizRow>,
}

/// One raw row: an ordered sequence of cell slots, each possibly absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GvizRow {
    #[serde(default)]
    pub c: Option<Vec<Option<GvizCell>>>,
}

/// One raw cell: a scalar value plus optional original formatting.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GvizCell {
    #[serde(default)]
    pub v: Option<Value>,
    #[serde(default)]
    pub f: Option<String>,
}

impl GvizRow {
    /// Cell value at `index`, coerced to trimmed text.
    ///
    /// Returns `None` for a missing cell slot, a null value, or a value
    /// that is empty after trimming.
    #[must_use]
    pub fn value_at(&self, index: usize) -> Option<String> {
        let cell = self.c.as_ref()?.get(index)?.as_ref()?;
        let text = match cell.v.as_ref()? {
            Value::String(text) => text.trim().to_string(),
            Value::Number(number) => number.to_string(),
            Value::Bool(flag) => flag.to_string(),
            Value::Null => return None,
            other => other.to_string(),
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Slice the embedded JSON object out of a gviz response body.
pub fn extract_embedded_json(body: &str) -> Result<&str> {
    let start = body.find('{');
    let end = body.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => Ok(&body[start..=end]),
        _ => Err(Error::MalformedPayload(
            "response does not contain an embedded JSON object".to_string(),
        )),
    }
}

/// Parse a gviz response body into its raw rows.
///
/// A payload without a `table` (or without rows) is a legitimate empty
/// sheet and yields an empty list; a body that cannot be parsed at all is
/// an error.
pub fn parse_payload(body: &str) -> Result<Vec<GvizRow>> {
    let json = extract_embedded_json(body)?;
    let payload: GvizPayload = serde_json::from_str(json)
        .map_err(|error| Error::MalformedPayload(format!("invalid table JSON: {error}")))?;
    Ok(payload.table.map(|table| table.rows).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extract_embedded_json_strips_callback_wrapper() {
        let body = "/*O_o*/\ngoogle.visualization.Query.setResponse({\"table\":{\"rows\":[]}});";
        let json = extract_embedded_json(body).unwrap();
        assert_eq!(json, "{\"table\":{\"rows\":[]}}");
    }

    #[test]
    fn extract_embedded_json_rejects_braceless_body() {
        assert!(extract_embedded_json("not a gviz response").is_err());
        assert!(extract_embedded_json("").is_err());
    }

    #[test]
    fn parse_payload_degrades_missing_table_to_empty_list() {
        assert_eq!(parse_payload("prefix {\"status\":\"ok\"} suffix").unwrap().len(), 0);
        assert_eq!(parse_payload("{\"table\":{}}").unwrap().len(), 0);
    }

    #[test]
    fn parse_payload_rejects_invalid_json() {
        assert!(parse_payload("xx{not json}yy").is_err());
    }

    #[test]
    fn value_at_handles_missing_and_scalar_cells() {
        let body = r#"{"table":{"rows":[
            {"c":[{"v":"  LIFT-1  "},null,{"v":7},{"v":null},{"v":true},{"v":"   "}]}
        ]}}"#;
        let rows = parse_payload(body).unwrap();
        let row = &rows[0];
        assert_eq!(row.value_at(0).as_deref(), Some("LIFT-1"));
        assert_eq!(row.value_at(1), None);
        assert_eq!(row.value_at(2).as_deref(), Some("7"));
        assert_eq!(row.value_at(3), None);
        assert_eq!(row.value_at(4).as_deref(), Some("true"));
        assert_eq!(row.value_at(5), None);
        assert_eq!(row.value_at(99), None);
    }

    #[test]
    fn value_at_without_cell_container_is_none() {
        let row = GvizRow::default();
        assert_eq!(row.value_at(0), None);
    }
}
