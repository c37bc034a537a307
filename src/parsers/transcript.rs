//! Transcript export parser.
//!
//! Supported line format:
//! - `24/07/2025 11:22 - Sender: Message`
//! - `24/07/2025 11:22 - System notice without a sender`
//!
//! Lines that don't start with a header continue the previous message.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::config::TranscriptConfig;
use crate::error::{ChatctxError, Result};
use crate::message::ParsedMessage;
use crate::parsing::{decompose, preamble, tokenize};

const BOM: char = '\u{feff}';

/// Messages recovered from one transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTranscript {
    /// Messages in transcript order.
    pub messages: Vec<ParsedMessage>,

    /// Bytes of text before the first header (not part of any message).
    pub preamble_len: usize,

    /// System messages dropped by [`TranscriptConfig::skip_system_messages`].
    pub skipped_system: usize,
}

impl ParsedTranscript {
    /// Number of messages kept.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` if no messages were kept.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Consumes the transcript, returning its messages.
    pub fn into_messages(self) -> Vec<ParsedMessage> {
        self.messages
    }
}

/// Parser for exported chat transcripts.
///
/// # Example
///
/// ```rust
/// use chatctx::parsers::TranscriptParser;
///
/// let parser = TranscriptParser::new();
/// let transcript = parser.parse_str("24/07/2025 11:23 - Ana: Oi, tudo bem?")?;
///
/// assert_eq!(transcript.len(), 1);
/// assert_eq!(transcript.messages[0].sender(), Some("Ana"));
/// # Ok::<(), chatctx::ChatctxError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct TranscriptParser {
    config: TranscriptConfig,
}

impl TranscriptParser {
    /// Creates a new parser with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with custom configuration.
    pub fn with_config(config: TranscriptConfig) -> Self {
        Self { config }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &TranscriptConfig {
        &self.config
    }

    /// Parses a transcript file.
    ///
    /// # Errors
    ///
    /// - [`ChatctxError::Io`] if the file can't be read
    /// - [`ChatctxError::MalformedInput`] if it isn't UTF-8 or has no header
    pub fn parse(&self, path: &Path) -> Result<ParsedTranscript> {
        let bytes = fs::read(path)?;
        let content = String::from_utf8(bytes).map_err(|e| {
            ChatctxError::malformed(format!("not valid UTF-8: {e}"), Some(path.to_path_buf()))
        })?;

        self.parse_content(&content, Some(path))
    }

    /// Parses transcript content from a string.
    pub fn parse_str(&self, content: &str) -> Result<ParsedTranscript> {
        self.parse_content(content, None)
    }

    fn parse_content(&self, content: &str, path: Option<&Path>) -> Result<ParsedTranscript> {
        let content = if self.config.strip_bom {
            content.strip_prefix(BOM).unwrap_or(content)
        } else {
            content
        };

        let blocks = tokenize(content);
        if blocks.is_empty() {
            return Err(ChatctxError::malformed(
                "no `DD/MM/YYYY HH:MM - ` header found",
                path.map(Path::to_path_buf),
            ));
        }

        let preamble_len = preamble(content, &blocks).len();
        if preamble_len > 0 {
            warn!(bytes = preamble_len, "ignoring text before the first header");
        }

        let mut transcript = ParsedTranscript {
            messages: Vec::with_capacity(blocks.len()),
            preamble_len,
            skipped_system: 0,
        };

        for block in &blocks {
            let message = decompose(block);
            if self.config.skip_system_messages && message.is_system() {
                transcript.skipped_system += 1;
                continue;
            }
            transcript.messages.push(message);
        }

        debug!(
            blocks = blocks.len(),
            kept = transcript.len(),
            skipped_system = transcript.skipped_system,
            "parsed transcript"
        );

        Ok(transcript)
    }
}
