//! HTTP client for the sheet export endpoint and the Apps Script write
//! endpoint.

use serde::Deserialize;

use crate::config::SheetConfig;
use crate::error::{Error, Result};
use crate::models::Record;
use crate::session::FilingRequest;
use crate::sheet::{normalize_table, parse_payload};
use crate::util::compact_text;

const SHEET_EXPORT_BASE: &str = "https://docs.google.com/spreadsheets/d";

/// Response text fragments that indicate the script accepted the write.
const SUCCESS_INDICATORS: [&str; 5] = ["success", "updated", "submitted", "complete", "true"];

/// Response text fragments that indicate the script rejected the write.
const FAILURE_INDICATORS: [&str; 4] = ["error", "failed", "exception", "false"];

/// Client for one sheet-backed filing page.
#[derive(Clone)]
pub struct SheetClient {
    http: reqwest::Client,
    config: SheetConfig,
}

impl SheetClient {
    pub fn new(config: SheetConfig) -> Result<Self> {
        Ok(Self {
            http: reqwest::Client::builder().build()?,
            config,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &SheetConfig {
        &self.config
    }

    /// Fetch the sheet export and normalize it into open records.
    ///
    /// Any transport failure or non-2xx status is a fetch error; no partial
    /// record list is ever produced.
    pub async fn fetch_records(&self) -> Result<Vec<Record>> {
        let url = format!("{SHEET_EXPORT_BASE}/{}/gviz/tq", self.config.sheet_id);
        let cache_buster = chrono::Utc::now().timestamp_millis().to_string();

        let response = self
            .http
            .get(&url)
            .query(&[
                ("tqx", "out:json"),
                ("sheet", self.config.sheet_name.as_str()),
                ("cb", cache_buster.as_str()),
            ])
            .send()
            .await
            .map_err(|error| Error::Fetch(error.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Fetch(format!(
                "HTTP {} from sheet export",
                response.status().as_u16()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|error| Error::Fetch(error.to_string()))?;
        let rows = parse_payload(&body)?;
        let records = normalize_table(&rows);
        tracing::debug!(
            raw_rows = rows.len(),
            records = records.len(),
            sheet = %self.config.sheet_name,
            "normalized sheet export"
        );
        Ok(records)
    }

    /// Post one filing entry to the Apps Script endpoint.
    pub async fn submit_filing(&self, request: &FilingRequest) -> Result<()> {
        let form_data = serde_json::to_string(&request.entry)?;
        let fields = [
            ("action", "submitForm"),
            ("sheetName", self.config.sheet_name.as_str()),
            ("liftNo", request.lift_number.as_str()),
            ("type", self.config.feature_tag.as_str()),
            ("formData", form_data.as_str()),
        ];

        let response = self
            .http
            .post(&self.config.script_url)
            .form(&fields)
            .send()
            .await
            .map_err(|error| Error::Submission(error.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Submission(format!(
                "HTTP {} from write endpoint",
                response.status().as_u16()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|error| Error::Submission(error.to_string()))?;
        match interpret_script_response(&body) {
            Ok(()) => {
                tracing::info!(lift = %request.lift_number, "filing entry accepted");
                Ok(())
            }
            Err(reason) => {
                tracing::warn!(
                    lift = %request.lift_number,
                    reason = %compact_text(&reason),
                    "filing entry rejected"
                );
                Err(Error::Submission(reason))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScriptResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Decide whether a write response body means success or failure.
///
/// The script's output format is not guaranteed, so this is a two-stage
/// interpreter: strict structured parsing first, then a keyword scan over
/// the raw text. The scan treats the response as a failure only when a
/// failure indicator appears without any success indicator; plain-text
/// acknowledgements therefore still count as success.
pub fn interpret_script_response(body: &str) -> std::result::Result<(), String> {
    if let Ok(parsed) = serde_json::from_str::<ScriptResponse>(body) {
        let failed =
            parsed.success == Some(false) || (parsed.error.is_some() && parsed.success.is_none());
        if failed {
            return Err(parsed
                .error
                .or(parsed.message)
                .unwrap_or_else(|| "Form submission failed".to_string()));
        }
        return Ok(());
    }

    let lowered = body.to_lowercase();
    let has_success = SUCCESS_INDICATORS
        .iter()
        .any(|indicator| lowered.contains(indicator));
    let has_failure = FAILURE_INDICATORS
        .iter()
        .any(|indicator| lowered.contains(indicator));
    if has_failure && !has_success {
        Err(body.trim().to_string())
    } else {
        Ok(())
    }
}
