//! Chat export parsers.
//!
//! - [`TranscriptParser`] - parses `DD/MM/YYYY HH:MM - Sender: Message` text exports
//!
//! # Example
//!
//! ```rust,no_run
//! use chatctx::parsers::TranscriptParser;
//! use std::path::Path;
//!
//! let parser = TranscriptParser::new();
//! let transcript = parser.parse(Path::new("conversa.txt"))?;
//! println!("{} messages", transcript.len());
//! # Ok::<(), chatctx::ChatctxError>(())
//! ```

mod transcript;

pub use transcript::{ParsedTranscript, TranscriptParser};
