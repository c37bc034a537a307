//! # chatctx
//!
//! Turns exported chat transcripts into conversational context tables and
//! asks large-language-model APIs for a follow-up message.
//!
//! ## Overview
//!
//! A transcript is a plain-text export where every message starts with a
//! `DD/MM/YYYY HH:MM - ` header:
//!
//! ```text
//! 24/07/2025 11:20 - Ana criou o grupo
//! 24/07/2025 11:22 - Mavi – Mosaic: Olá!
//! Tudo bem?
//! 24/07/2025 11:23 - Ana: Oi, tudo bem?
//! ```
//!
//! Lines without a header continue the previous message. Headers without a
//! `Name: ` prefix are system messages.
//!
//! ## Quick Start
//!
//! ```rust
//! use chatctx::prelude::*;
//!
//! let transcript = TranscriptParser::new().parse_str(
//!     "24/07/2025 11:22 - Mavi – Mosaic: Olá!\n24/07/2025 11:23 - Ana: Oi, tudo bem?",
//! )?;
//!
//! let context = RoleMap::default().to_context(&transcript.messages);
//! assert_eq!(context[0], ContextRecord::assistant("Olá!"));
//! assert_eq!(context[1], ContextRecord::user("Oi, tudo bem?"));
//!
//! let csv = to_context_csv(&context)?;
//! assert!(csv.starts_with("role,content\n"));
//! # Ok::<(), ChatctxError>(())
//! ```
//!
//! ## Module Structure
//!
//! - [`parsing`] - header tokenizer and sender/message decomposer
//! - [`parsers`] - [`TranscriptParser`](parsers::TranscriptParser), the file entry point
//! - [`core`] - [`RoleMap`](core::RoleMap) and the table writers/readers
//! - [`format`] - [`OutputFormat`](format::OutputFormat) (CSV or JSON tables)
//! - [`client`] - Claude and GPT completion clients (`api` feature)
//! - [`batch`] - directory drivers for `convert` and `send`
//! - [`config`] - configuration types
//! - [`error`] - [`ChatctxError`], [`Result`]
//! - [`prelude`] - convenient re-exports
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `full` (default) | `api` + `cli` |
//! | `api` | Blocking HTTP clients (reqwest) |
//! | `cli` | Binary support (clap, tracing-subscriber) |

pub mod batch;
#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "api")]
pub mod client;
pub mod config;
pub mod core;
pub mod error;
pub mod format;
#[cfg(feature = "cli")]
pub mod logging;
pub mod message;
pub mod parsers;
pub mod parsing;

// Re-export the main types at the crate root for convenience
pub use error::{ChatctxError, Result};
pub use message::{ContextRecord, ParsedMessage, Role};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chatctx::prelude::*;
/// ```
pub mod prelude {
    // Records
    pub use crate::message::{ContextRecord, ParsedMessage, Role};

    // Error types
    pub use crate::error::{ChatctxError, Result};

    // Parsing
    pub use crate::parsers::{ParsedTranscript, TranscriptParser};

    // Configuration
    pub use crate::config::{CompletionConfig, ProviderConfig, SendConfig, TranscriptConfig};

    // Roles and output
    pub use crate::core::output::{
        read_context_csv, read_messages_csv, to_context_csv, to_messages_csv, write_context_csv,
        write_messages_csv,
    };
    pub use crate::core::{DEFAULT_ASSISTANT, RoleMap};
    pub use crate::format::{OutputFormat, write_to_format};

    // Completion clients
    #[cfg(feature = "api")]
    pub use crate::client::{
        ClaudeClient, Completion, CompletionClient, CompletionRequest, GptClient,
    };
}
