//! Header scanning for transcript exports.
//!
//! A transcript is a sequence of blocks, each anchored at a line of the form
//! `DD/MM/YYYY HH:MM - rest of line`. Everything after that line up to the
//! next header belongs to the same block, so a block's extent is only known
//! once the *next* header has been found. [`tokenize`] therefore collects all
//! header positions first and carves bodies from adjacent boundaries second.

use std::sync::LazyLock;

use regex::Regex;

/// Header pattern, applied per line.
///
/// Groups: 1 = date, 2 = time, 3 = remainder after the dash. Horizontal
/// whitespace only (`\t` and Unicode space separators such as NBSP) may
/// separate the parts, so a header never spans lines. The dash may be a
/// hyphen or an en dash. CRLF mode keeps `\r` out of the remainder.
pub const HEADER_PATTERN: &str =
    r"(?mR)^(\d{2}/\d{2}/\d{4})[\t\p{Zs}]+(\d{2}:\d{2})[\t\p{Zs}]+[-\x{2013}](?:[\t\p{Zs}]|$)(.*)";

static HEADER: LazyLock<Regex> = LazyLock::new(|| Regex::new(HEADER_PATTERN).unwrap());

/// The text span owned by one header.
///
/// All fields borrow from the transcript passed to [`tokenize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawBlock<'a> {
    /// Header date, `DD/MM/YYYY`.
    pub date: &'a str,
    /// Header time, `HH:MM`.
    pub time: &'a str,
    /// Rest of the header line after the dash (usually `Sender: first line`).
    pub header_remainder: &'a str,
    /// Everything after the header line up to the next header or end of input.
    /// Starts with the header line's own line break when there is one.
    pub body: &'a str,
    /// Header line plus body, exactly as in the input.
    pub raw: &'a str,
    /// Byte offset of `raw` in the input.
    pub offset: usize,
}

/// Splits a transcript into header-anchored blocks.
///
/// Blocks are returned in input order. Their `raw` spans are contiguous and
/// together cover the input from the first header to the end; text before
/// the first header is returned by [`preamble`].
///
/// # Example
///
/// ```rust
/// use chatctx::parsing::tokenize;
///
/// let text = "24/07/2025 11:22 - Ana: Oi\nainda aqui\n24/07/2025 11:23 - Bia: Olá";
/// let blocks = tokenize(text);
///
/// assert_eq!(blocks.len(), 2);
/// assert_eq!(blocks[0].header_remainder, "Ana: Oi");
/// assert_eq!(blocks[0].body, "\nainda aqui\n");
/// assert_eq!(blocks[1].body, "");
/// ```
pub fn tokenize(text: &str) -> Vec<RawBlock<'_>> {
    let headers: Vec<regex::Captures<'_>> = HEADER.captures_iter(text).collect();

    let starts: Vec<usize> = headers
        .iter()
        .filter_map(|caps| caps.get(0))
        .map(|m| m.start())
        .collect();

    let mut blocks = Vec::with_capacity(headers.len());

    for (i, caps) in headers.iter().enumerate() {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let end = starts.get(i + 1).copied().unwrap_or(text.len());

        blocks.push(RawBlock {
            date: caps.get(1).map_or("", |m| m.as_str()),
            time: caps.get(2).map_or("", |m| m.as_str()),
            header_remainder: caps.get(3).map_or("", |m| m.as_str()),
            body: &text[whole.end()..end],
            raw: &text[whole.start()..end],
            offset: whole.start(),
        });
    }

    blocks
}

/// Returns the text before the first header (the whole input if none).
pub fn preamble<'a>(text: &'a str, blocks: &[RawBlock<'a>]) -> &'a str {
    match blocks.first() {
        Some(first) => &text[..first.offset],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_header() {
        let blocks = tokenize("24/07/2025 11:22 - Ana: Oi");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].date, "24/07/2025");
        assert_eq!(blocks[0].time, "11:22");
        assert_eq!(blocks[0].header_remainder, "Ana: Oi");
        assert_eq!(blocks[0].body, "");
    }

    #[test]
    fn test_body_runs_to_next_header() {
        let text = "24/07/2025 11:22 - Ana: one\ntwo\n\nthree\n24/07/2025 11:30 - Bia: four\n";
        let blocks = tokenize(text);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].body, "\ntwo\n\nthree\n");
        assert_eq!(blocks[1].body, "\n");
    }

    #[test]
    fn test_blocks_partition_input() {
        let text = "24/07/2025 11:22 - Ana: one\ntwo\n24/07/2025 11:23 - \n24/07/2025 11:24 - Bia: x\n";
        let blocks = tokenize(text);
        let joined: String = blocks.iter().map(|b| b.raw).collect();
        assert_eq!(joined, text);

        for pair in blocks.windows(2) {
            assert_eq!(pair[0].offset + pair[0].raw.len(), pair[1].offset);
        }
    }

    #[test]
    fn test_preamble_excluded() {
        let text = "exported chat\n24/07/2025 11:22 - Ana: Oi";
        let blocks = tokenize(text);
        assert_eq!(preamble(text, &blocks), "exported chat\n");
        assert_eq!(blocks[0].offset, "exported chat\n".len());
    }

    #[test]
    fn test_no_headers() {
        let text = "just some text\nwithout headers";
        let blocks = tokenize(text);
        assert!(blocks.is_empty());
        assert_eq!(preamble(text, &blocks), text);
    }

    #[test]
    fn test_header_mid_line_is_not_a_header() {
        let text = "24/07/2025 11:22 - Ana: see 24/07/2025 11:23 - this";
        let blocks = tokenize(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].header_remainder, "Ana: see 24/07/2025 11:23 - this");
    }

    #[test]
    fn test_partial_header_line_stays_in_body() {
        let text = "24/07/2025 11:22 - Ana: first\n24/07/2025 said something\n";
        let blocks = tokenize(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].body, "\n24/07/2025 said something\n");
    }

    #[test]
    fn test_empty_remainder_header() {
        let text = "24/07/2025 11:22 - \n24/07/2025 11:23 - Ana: Oi";
        let blocks = tokenize(text);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].header_remainder, "");
        assert_eq!(blocks[0].body, "\n");
    }

    #[test]
    fn test_header_without_trailing_space() {
        let blocks = tokenize("24/07/2025 11:22 -\n24/07/2025 11:23 - Ana: Oi");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].header_remainder, "");
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = "24/07/2025 11:22 - Ana: one\r\ntwo\r\n24/07/2025 11:23 - Bia: x\r\n";
        let blocks = tokenize(text);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].header_remainder, "Ana: one");
        assert_eq!(blocks[0].body, "\r\ntwo\r\n");
    }

    #[test]
    fn test_narrow_no_break_space() {
        let blocks = tokenize("24/07/2025\u{202f}11:22 - Ana: Oi");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].time, "11:22");
    }

    #[test]
    fn test_en_dash_separator() {
        let blocks = tokenize("24/07/2025 11:22 \u{2013} Ana: Oi");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].header_remainder, "Ana: Oi");
    }
}
