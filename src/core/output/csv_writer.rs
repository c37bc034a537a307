//! CSV tables for parsed messages and context records.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::error::{ChatctxError, Result};
use crate::message::{ContextRecord, ParsedMessage, Role};

/// Column header of the messages table.
pub const MESSAGES_HEADER: [&str; 4] = ["date", "time", "sender", "message"];

/// Column header of the context table.
pub const CONTEXT_HEADER: [&str; 2] = ["role", "content"];

const BOM: char = '\u{feff}';

fn csv_writer<W: Write>(inner: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(b',')
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(inner)
}

fn write_messages_to<W: Write>(messages: &[ParsedMessage], inner: W) -> Result<W> {
    let mut writer = csv_writer(inner);
    writer.write_record(MESSAGES_HEADER)?;

    for msg in messages {
        writer.write_record([
            msg.date.as_str(),
            msg.time.as_str(),
            msg.sender().unwrap_or_default(),
            msg.message.as_str(),
        ])?;
    }

    writer.flush()?;
    writer.into_inner().map_err(|e| ChatctxError::Io(e.into_error()))
}

fn write_context_to<W: Write>(records: &[ContextRecord], inner: W) -> Result<W> {
    let mut writer = csv_writer(inner);
    writer.write_record(CONTEXT_HEADER)?;

    for record in records {
        writer.write_record([record.role.as_str(), record.content.as_str()])?;
    }

    writer.flush()?;
    writer.into_inner().map_err(|e| ChatctxError::Io(e.into_error()))
}

fn into_string(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| ChatctxError::invalid_format("CSV", e.to_string()))
}

/// Writes the messages table.
///
/// # Format
/// - Columns: `date`, `time`, `sender`, `message`
/// - Absent sender: empty field
/// - Delimiter `,`, line terminator `\n`, UTF-8
/// - One row per message, in input order
pub fn write_messages_csv(messages: &[ParsedMessage], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)?;
    write_messages_to(messages, file)?;
    Ok(())
}

/// Same format as [`write_messages_csv`], returned as a string.
pub fn to_messages_csv(messages: &[ParsedMessage]) -> Result<String> {
    into_string(write_messages_to(messages, Vec::new())?)
}

/// Writes the context table (`role`, `content`).
pub fn write_context_csv(records: &[ContextRecord], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)?;
    write_context_to(records, file)?;
    Ok(())
}

/// Same format as [`write_context_csv`], returned as a string.
pub fn to_context_csv(records: &[ContextRecord]) -> Result<String> {
    into_string(write_context_to(records, Vec::new())?)
}

/// Reads a messages table written by [`write_messages_csv`].
///
/// Empty `sender` fields come back as `None`.
pub fn read_messages_csv(path: &Path) -> Result<Vec<ParsedMessage>> {
    let content = fs::read_to_string(path)?;
    messages_from_csv(&content)
}

/// Parses a messages table from a string.
pub fn messages_from_csv(content: &str) -> Result<Vec<ParsedMessage>> {
    let content = content.strip_prefix(BOM).unwrap_or(content);
    let mut reader = csv::ReaderBuilder::new().from_reader(content.as_bytes());

    let mut messages = Vec::new();
    for row in reader.deserialize() {
        let msg: ParsedMessage = row?;
        messages.push(msg);
    }
    Ok(messages)
}

/// Reads a context table for a completion request.
///
/// - `role` and `content` columns are required (header names are trimmed
///   and compared case-insensitively; other columns are ignored)
/// - rows whose content is blank are skipped
/// - roles other than `assistant` become `user`
///
/// # Errors
///
/// [`ChatctxError::InvalidFormat`] if a column is missing or no rows remain.
pub fn read_context_csv(path: &Path) -> Result<Vec<ContextRecord>> {
    let content = fs::read_to_string(path)?;
    context_from_csv(&content)
}

/// Parses a context table from a string. See [`read_context_csv`].
pub fn context_from_csv(content: &str) -> Result<Vec<ContextRecord>> {
    let content = content.strip_prefix(BOM).unwrap_or(content);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };

    let (Some(role_idx), Some(content_idx)) = (column("role"), column("content")) else {
        return Err(ChatctxError::invalid_format(
            "context CSV",
            format!(
                "expected columns {:?}; got {:?}",
                CONTEXT_HEADER,
                headers.iter().collect::<Vec<_>>()
            ),
        ));
    };

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let text = row.get(content_idx).unwrap_or_default().trim();
        if text.is_empty() {
            continue;
        }
        let role = Role::from_cell(row.get(role_idx).unwrap_or_default());
        records.push(ContextRecord::new(role, text));
    }

    if records.is_empty() {
        return Err(ChatctxError::invalid_format(
            "context CSV",
            "no messages found (after skipping empty rows)",
        ));
    }

    Ok(records)
}
