//! Record types produced by the transcript parser.
//!
//! - [`ParsedMessage`] - one message recovered from a transcript header block
//! - [`ContextRecord`] - the `{role, content}` pair sent to a chat model
//! - [`Role`] - `assistant` or `user`
//!
//! # Example
//!
//! ```
//! use chatctx::{ParsedMessage, Role};
//!
//! let msg = ParsedMessage::new("24/07/2025", "11:22", Some("Ana"), "Oi!");
//! assert_eq!(msg.sender(), Some("Ana"));
//! assert!(!msg.is_system());
//!
//! let notice = ParsedMessage::system("24/07/2025", "11:20", "Ana created group");
//! assert!(notice.is_system());
//! assert_eq!(Role::default(), Role::User);
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Date and time layout used by transcript headers (`DD/MM/YYYY HH:MM`).
pub const HEADER_DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M";

/// A single message recovered from one header block.
///
/// `date` and `time` are kept exactly as they appear in the header so that
/// tables written from them reproduce the transcript. Use
/// [`timestamp`](Self::timestamp) for a typed value.
///
/// # Invariants
///
/// - `message` has no leading or trailing whitespace, but keeps every
///   internal newline of a multi-line message.
/// - `sender` is `None` exactly when no `Name: ` prefix could be recovered
///   (system notices, malformed headers).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedMessage {
    /// Header date, `DD/MM/YYYY`.
    pub date: String,

    /// Header time, `HH:MM`.
    pub time: String,

    /// Display name of the author, `None` for system messages.
    #[serde(default)]
    pub sender: Option<String>,

    /// Message text. May contain newlines.
    pub message: String,
}

impl ParsedMessage {
    /// Creates a message with all fields.
    pub fn new(
        date: impl Into<String>,
        time: impl Into<String>,
        sender: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
            sender: sender.map(str::to_string),
            message: message.into(),
        }
    }

    /// Creates a system message (no sender).
    pub fn system(
        date: impl Into<String>,
        time: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(date, time, None, message)
    }

    /// Returns the sender name, if any.
    pub fn sender(&self) -> Option<&str> {
        self.sender.as_deref()
    }

    /// Returns the message text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns `true` if the message has no sender.
    pub fn is_system(&self) -> bool {
        self.sender.is_none()
    }

    /// Returns `true` if the message text is empty.
    pub fn is_empty(&self) -> bool {
        self.message.is_empty()
    }

    /// Parses `date` and `time` into a timestamp.
    ///
    /// Returns `None` when the header digits don't form a real calendar
    /// date (e.g. `31/02/2025`), which the header pattern alone can't rule out.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        let combined = format!("{} {}", self.date, self.time);
        NaiveDateTime::parse_from_str(&combined, HEADER_DATETIME_FORMAT).ok()
    }
}

/// Conversational participant category for model input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Messages written by the agent whose follow-up is being generated.
    Assistant,
    /// Everyone else, including system notices.
    #[default]
    User,
}

impl Role {
    /// Returns the wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Assistant => "assistant",
            Role::User => "user",
        }
    }

    /// Reads a role from a table cell.
    ///
    /// Anything other than `assistant` (case-insensitive, surrounding
    /// whitespace ignored) is treated as [`Role::User`].
    pub fn from_cell(cell: &str) -> Self {
        if cell.trim().eq_ignore_ascii_case("assistant") {
            Role::Assistant
        } else {
            Role::User
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `{role, content}` pair, the unit of chat-completion input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextRecord {
    /// Who said it.
    pub role: Role,
    /// What was said.
    pub content: String,
}

impl ContextRecord {
    /// Creates a new record.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Shorthand for a `user` record.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Shorthand for an `assistant` record.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}
