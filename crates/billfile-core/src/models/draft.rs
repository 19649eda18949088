//! Draft annotation collected while one record is being edited.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Filing status chosen by the user.
///
/// Serialized with the exact wire text the sheet-side script expects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilingStatus {
    #[serde(rename = "Done")]
    Done,
    #[default]
    #[serde(rename = "Not Done")]
    NotDone,
}

impl FilingStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Done => "Done",
            Self::NotDone => "Not Done",
        }
    }
}

impl fmt::Display for FilingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// In-progress annotation for the record currently being edited.
///
/// Exists only while exactly one record is selected; discarded on cancel or
/// successful submit, and never carried over to another selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub status: FilingStatus,
    pub remarks: String,
}

/// Wire payload written back to the sheet for one record.
///
/// JSON-encoded into the `formData` form field of the write request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingEntry {
    /// Submission moment, `DD/MM/YYYY HH:MM:SS`
    pub actual: String,
    /// Whole days elapsed since the record's raw timestamp, as text
    pub delay: String,
    pub status: FilingStatus,
    pub remarks: String,
}
