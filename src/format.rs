//! Output format types for the chatctx library.
//!
//! These types don't depend on the CLI framework and can be used from
//! library code directly.
//!
//! # Example
//!
//! ```rust,no_run
//! use chatctx::format::{OutputFormat, write_to_format};
//! use chatctx::core::RoleMap;
//! use chatctx::ParsedMessage;
//! use std::path::Path;
//!
//! let messages = vec![ParsedMessage::new("24/07/2025", "11:23", Some("Ana"), "Oi")];
//! let context = RoleMap::default().to_context(&messages);
//!
//! let tables = write_to_format(&messages, &context, Path::new("out"), "lead", OutputFormat::Json)?;
//! assert!(tables.context.ends_with("context_lead_parsed.json"));
//! # Ok::<(), chatctx::ChatctxError>(())
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::output;
use crate::error::Result;
use crate::message::{ContextRecord, ParsedMessage};

/// Output format for the two record tables.
///
/// - [`Csv`](OutputFormat::Csv) - comma-delimited tables, what the `send` step reads
/// - [`Json`](OutputFormat::Json) - pretty JSON arrays
///
/// # Example
///
/// ```rust
/// use chatctx::format::OutputFormat;
/// use std::path::Path;
///
/// let format = OutputFormat::Json;
/// assert_eq!(format.extension(), "json");
/// assert_eq!(format.messages_path(Path::new("out"), "lead"), Path::new("out/lead_parsed.json"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    /// CSV tables (default)
    #[default]
    Csv,

    /// JSON arrays
    Json,
}

impl OutputFormat {
    /// Returns the file extension for this format (without dot).
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }

    /// Path of the messages table for a transcript stem: `<stem>_parsed.<ext>`.
    pub fn messages_path(&self, dir: &Path, stem: &str) -> PathBuf {
        dir.join(format!("{stem}_parsed.{}", self.extension()))
    }

    /// Path of the context table for a transcript stem: `context_<stem>_parsed.<ext>`.
    pub fn context_path(&self, dir: &Path, stem: &str) -> PathBuf {
        dir.join(format!("context_{stem}_parsed.{}", self.extension()))
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "CSV"),
            OutputFormat::Json => write!(f, "JSON"),
        }
    }
}

/// Paths written by [`write_to_format`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenTables {
    /// `<stem>_parsed.<ext>`
    pub messages: PathBuf,
    /// `context_<stem>_parsed.<ext>`
    pub context: PathBuf,
}

/// Writes both tables for one transcript into `dir` in the given format.
pub fn write_to_format(
    messages: &[ParsedMessage],
    context: &[ContextRecord],
    dir: &Path,
    stem: &str,
    format: OutputFormat,
) -> Result<WrittenTables> {
    let tables = WrittenTables {
        messages: format.messages_path(dir, stem),
        context: format.context_path(dir, stem),
    };

    match format {
        OutputFormat::Csv => {
            output::write_messages_csv(messages, &tables.messages)?;
            output::write_context_csv(context, &tables.context)?;
        }
        OutputFormat::Json => {
            output::write_messages_json(messages, &tables.messages)?;
            output::write_context_json(context, &tables.context)?;
        }
    }

    Ok(tables)
}
