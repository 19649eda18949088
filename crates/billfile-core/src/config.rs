//! Sheet endpoint configuration.
//!
//! Identifies the published sheet being read, the tab within it, and the
//! Apps Script endpoint that accepts filing writes. All values are public
//! identifiers; no secret credentials are stored here.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::{is_http_url, normalize_text_option};

/// Seconds to wait after a confirmed submission before re-reading the sheet,
/// so the remote write settles before the next fetch.
const DEFAULT_SETTLE_DELAY_SECS: u64 = 2;

/// Endpoints and identifiers for one sheet-backed filing page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SheetConfig {
    /// Spreadsheet document id (the long token in the sheet URL)
    pub sheet_id: String,
    /// Tab name within the spreadsheet
    pub sheet_name: String,
    /// Apps Script web app URL accepting filing writes
    pub script_url: String,
    /// Tag distinguishing this page's writes from sibling features that
    /// share the same sheet
    pub feature_tag: String,
    /// Post-submit settle delay before the follow-up refresh, in seconds
    #[serde(default = "default_settle_delay_secs")]
    pub settle_delay_secs: u64,
}

const fn default_settle_delay_secs() -> u64 {
    DEFAULT_SETTLE_DELAY_SECS
}

impl SheetConfig {
    /// Build a validated config, trimming all identifiers.
    pub fn new(
        sheet_id: impl Into<String>,
        sheet_name: impl Into<String>,
        script_url: impl Into<String>,
        feature_tag: impl Into<String>,
    ) -> Result<Self> {
        let config = Self {
            sheet_id: sheet_id.into(),
            sheet_name: sheet_name.into(),
            script_url: script_url.into(),
            feature_tag: feature_tag.into(),
            settle_delay_secs: DEFAULT_SETTLE_DELAY_SECS,
        };
        config.validated()
    }

    /// Normalize fields and reject incomplete or malformed values.
    pub fn validated(mut self) -> Result<Self> {
        self.sheet_id = require(self.sheet_id, "sheet_id")?;
        self.sheet_name = require(self.sheet_name, "sheet_name")?;
        self.feature_tag = require(self.feature_tag, "feature_tag")?;

        let script_url = require(self.script_url, "script_url")?;
        if !is_http_url(&script_url) {
            return Err(Error::InvalidConfiguration(
                "script_url must include http:// or https://".to_string(),
            ));
        }
        self.script_url = script_url.trim_end_matches('/').to_string();
        Ok(self)
    }

    /// How long to wait after a confirmed submission before refreshing.
    #[must_use]
    pub const fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_secs)
    }
}

fn require(raw: String, field: &str) -> Result<String> {
    normalize_text_option(Some(raw))
        .ok_or_else(|| Error::InvalidConfiguration(format!("field '{field}' is required")))
}
