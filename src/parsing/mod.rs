//! Building blocks of the transcript parser.
//!
//! - [`tokenizer`] finds header lines and carves the text into [`RawBlock`]s
//! - [`decomposer`] turns each block into a [`ParsedMessage`](crate::ParsedMessage)
//!
//! Most callers want [`TranscriptParser`](crate::parsers::TranscriptParser),
//! which runs both steps over a file or string.

pub mod decomposer;
pub mod tokenizer;

pub use decomposer::{SENDER_DELIMITER, decompose, normalize_line_endings, split_sender_and_text};
pub use tokenizer::{HEADER_PATTERN, RawBlock, preamble, tokenize};
