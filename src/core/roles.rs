//! Sender identity to conversational role mapping.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ChatctxError, Result};
use crate::message::{ContextRecord, ParsedMessage, Role};

/// Identity treated as the assistant when no other table is configured.
pub const DEFAULT_ASSISTANT: &str = "Mavi – Mosaic";

/// Static table of identities that speak as the assistant.
///
/// Lookup is an exact string match on the sender. Any other sender,
/// including a system message with no sender at all, maps to
/// [`Role::User`]; a miss is the normal path, not an error.
///
/// # Example
///
/// ```rust
/// use chatctx::core::RoleMap;
/// use chatctx::Role;
///
/// let roles = RoleMap::empty().with_assistant("Corretor Bot");
/// assert_eq!(roles.role_for(Some("Corretor Bot")), Role::Assistant);
/// assert_eq!(roles.role_for(Some("Ana")), Role::User);
/// assert_eq!(roles.role_for(None), Role::User);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleMap {
    #[serde(default)]
    assistants: BTreeSet<String>,
}

impl Default for RoleMap {
    fn default() -> Self {
        Self::empty().with_assistant(DEFAULT_ASSISTANT)
    }
}

impl RoleMap {
    /// Creates a table with no assistant identities.
    pub fn empty() -> Self {
        Self {
            assistants: BTreeSet::new(),
        }
    }

    /// Creates a table from a list of assistant identities.
    pub fn from_assistants<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            assistants: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Loads a table from a JSON file of the form `{"assistants": ["Name"]}`.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            ChatctxError::Config(format!("invalid role file {}: {e}", path.display()))
        })
    }

    /// Adds an assistant identity.
    #[must_use]
    pub fn with_assistant(mut self, name: impl Into<String>) -> Self {
        self.assistants.insert(name.into());
        self
    }

    /// Returns `true` if `name` is a configured assistant identity.
    pub fn is_assistant(&self, name: &str) -> bool {
        self.assistants.contains(name)
    }

    /// Returns the configured assistant identities, sorted.
    pub fn assistants(&self) -> impl Iterator<Item = &str> {
        self.assistants.iter().map(String::as_str)
    }

    /// Maps a sender to its role.
    pub fn role_for(&self, sender: Option<&str>) -> Role {
        match sender {
            Some(name) if self.is_assistant(name) => Role::Assistant,
            _ => Role::User,
        }
    }

    /// Converts one parsed message into a context record.
    pub fn to_record(&self, message: &ParsedMessage) -> ContextRecord {
        ContextRecord::new(self.role_for(message.sender()), message.message.clone())
    }

    /// Converts parsed messages into context records, preserving order.
    pub fn to_context(&self, messages: &[ParsedMessage]) -> Vec<ContextRecord> {
        messages.iter().map(|m| self.to_record(m)).collect()
    }
}
