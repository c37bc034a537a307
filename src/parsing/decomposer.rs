//! Sender/message recovery for a single header block.

use crate::message::ParsedMessage;

use super::tokenizer::RawBlock;

/// Separator between the sender's display name and the message text.
///
/// Display names may contain `-` or `–` (e.g. `Mavi - Mosaic`), so the split
/// anchors on colon-space only.
pub const SENDER_DELIMITER: &str = ": ";

/// Turns one block into a [`ParsedMessage`].
///
/// # Example
///
/// ```rust
/// use chatctx::parsing::{decompose, tokenize};
///
/// let blocks = tokenize("24/07/2025 11:22 - Mavi - Mosaic: Olá!\nTudo bem?");
/// let msg = decompose(&blocks[0]);
///
/// assert_eq!(msg.sender(), Some("Mavi - Mosaic"));
/// assert_eq!(msg.message(), "Olá!\nTudo bem?");
/// ```
pub fn decompose(block: &RawBlock<'_>) -> ParsedMessage {
    let full = join_block(block.header_remainder, block.body);
    let (sender, message) = split_sender_and_text(&full);

    ParsedMessage {
        date: block.date.to_string(),
        time: block.time.to_string(),
        sender: sender.map(str::to_string),
        message: message.to_string(),
    }
}

/// Rebuilds the block text from the header remainder and the body.
///
/// The body normally starts with the header line's own line break; one is
/// inserted only when it doesn't. Line endings are normalized to `\n` and
/// the single trailing line break that frames the block is dropped.
fn join_block(remainder: &str, body: &str) -> String {
    let mut full = String::with_capacity(remainder.len() + body.len() + 1);
    full.push_str(remainder);
    if !body.is_empty() && !body.starts_with(['\n', '\r']) {
        full.push('\n');
    }
    full.push_str(body);

    let mut full = normalize_line_endings(&full);
    if full.ends_with('\n') {
        full.pop();
    }
    full
}

/// Converts `\r\n` and lone `\r` to `\n`.
pub fn normalize_line_endings(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Splits block text into `(sender, message)` on the first `": "`.
///
/// - No delimiter: system message, the whole text is the message.
/// - Empty name: no identity to recover, yields `(None, message)`. A header
///   with nothing after it therefore yields `(None, "")`.
///
/// Both parts are trimmed at the ends only; internal newlines are untouched.
///
/// ```rust
/// use chatctx::parsing::split_sender_and_text;
///
/// assert_eq!(split_sender_and_text("Ana: a: b"), (Some("Ana"), "a: b"));
/// assert_eq!(split_sender_and_text("Ana left"), (None, "Ana left"));
/// assert_eq!(split_sender_and_text(" : "), (None, ""));
/// assert_eq!(split_sender_and_text(": hello"), (None, "hello"));
/// ```
pub fn split_sender_and_text(text: &str) -> (Option<&str>, &str) {
    match text.split_once(SENDER_DELIMITER) {
        Some((name, message)) => {
            let name = name.trim();
            let message = message.trim();
            if name.is_empty() {
                (None, message)
            } else {
                (Some(name), message)
            }
        }
        None => (None, text.trim()),
    }
}
