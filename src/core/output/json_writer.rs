//! JSON output: record arrays and the combined answer artifact.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::message::{ContextRecord, ParsedMessage};

/// Layout of the combined export timestamp, in its file name and its `timestamp` field.
pub const EXPORT_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Message structure for JSON output.
///
/// Carries the raw header fields plus an ISO timestamp when the header
/// forms a real calendar date.
#[derive(Serialize)]
struct JsonMessage<'a> {
    date: &'a str,
    time: &'a str,
    sender: Option<&'a str>,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
}

impl<'a> JsonMessage<'a> {
    fn from_parsed(msg: &'a ParsedMessage) -> Self {
        Self {
            date: &msg.date,
            time: &msg.time,
            sender: msg.sender(),
            message: &msg.message,
            timestamp: msg.timestamp().map(|ts| ts.format(ISO_FORMAT).to_string()),
        }
    }
}

/// Converts messages to a pretty JSON array.
///
/// # Format
/// ```json
/// [
///   {"date": "24/07/2025", "time": "11:23", "sender": "Ana",
///    "message": "Oi", "timestamp": "2025-07-24T11:23:00"}
/// ]
/// ```
pub fn to_messages_json(messages: &[ParsedMessage]) -> Result<String> {
    let json_messages: Vec<JsonMessage<'_>> =
        messages.iter().map(JsonMessage::from_parsed).collect();
    Ok(serde_json::to_string_pretty(&json_messages)?)
}

/// Writes messages as a pretty JSON array. See [`to_messages_json`].
pub fn write_messages_json(messages: &[ParsedMessage], output_path: &Path) -> Result<()> {
    let json = to_messages_json(messages)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Converts context records to a JSON array of `{role, content}` objects,
/// the same shape the chat APIs take.
pub fn to_context_json(records: &[ContextRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Writes context records as a pretty JSON array.
pub fn write_context_json(records: &[ContextRecord], output_path: &Path) -> Result<()> {
    let json = to_context_json(records)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// One model's section of a combined export: the request payload plus
/// either the raw response or the error that replaced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelExchange {
    /// Request body as sent.
    pub payload: Value,

    /// Raw response body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,

    /// Error message, when the call failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ModelExchange {
    /// A successful exchange.
    pub fn completed(payload: Value, response: Value) -> Self {
        Self {
            payload,
            response: Some(response),
            error: None,
        }
    }

    /// A failed exchange.
    pub fn failed(payload: Value, error: impl Into<String>) -> Self {
        Self {
            payload,
            response: None,
            error: Some(error.into()),
        }
    }

    /// Returns `true` if a response was received.
    pub fn is_completed(&self) -> bool {
        self.response.is_some()
    }
}

#[derive(Serialize)]
struct CombinedExport<'a> {
    timestamp: String,
    source_csv: String,
    #[serde(flatten)]
    models: BTreeMap<&'a str, &'a ModelExchange>,
}

/// File name of the combined export for `source` at `timestamp`.
///
/// Spaces in the source stem become underscores:
/// `Lead Ana.csv` → `Lead_Ana_ai_combined_20250724_112300.json`.
pub fn combined_export_name(source: &Path, timestamp: NaiveDateTime) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().replace(' ', "_"))
        .unwrap_or_default();
    format!(
        "{stem}_ai_combined_{}.json",
        timestamp.format(EXPORT_STAMP_FORMAT)
    )
}

/// Writes the combined answer artifact for one context table.
///
/// Creates `answers_dir` if needed and returns the path written.
///
/// # Format
/// ```json
/// {
///   "timestamp": "20250724_112300",
///   "source_csv": "context_lead_parsed.csv",
///   "claude": {"payload": {...}, "response": {...}},
///   "gpt": {"payload": {...}, "error": "gpt request failed (429): ..."}
/// }
/// ```
pub fn write_combined_export(
    answers_dir: &Path,
    source: &Path,
    timestamp: NaiveDateTime,
    exchanges: &[(&str, ModelExchange)],
) -> Result<PathBuf> {
    fs::create_dir_all(answers_dir)?;

    let export = CombinedExport {
        timestamp: timestamp.format(EXPORT_STAMP_FORMAT).to_string(),
        source_csv: source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        models: exchanges.iter().map(|(name, ex)| (*name, ex)).collect(),
    };

    let path = answers_dir.join(combined_export_name(source, timestamp));
    let json = serde_json::to_string_pretty(&export)?;
    fs::write(&path, json)?;
    Ok(path)
}
