//! Markdown stripper – turns Markdown source into plain, paragraph-separated
//! text.
//!
//! This is not a Markdown parser. Each rule is a single regex pass with no
//! awareness of nesting, so malformed input is passed through best-effort.
//!
//! ## Rule order
//!
//! 1. Normalise line endings (CRLF / CR → LF)
//! 2. Remove fenced code blocks, fences included
//! 3. Unwrap inline code spans to their inner text
//! 4. Drop heading markers (`#` … `######`) at line start
//! 5. Replace list markers (`-`, `*`, `+`) at line start with `• `
//! 6. Collapse 3+ consecutive newlines to exactly 2
//!
//! Fences go before inline code so a ```` ``` ```` pair is never read as
//! three inline spans.

use once_cell::sync::Lazy;
use regex::Regex;

/// Literal bullet substituted for list markers.
pub const BULLET: &str = "\u{2022} ";

/// Strip Markdown syntax from `md`, leaving paragraphs separated by exactly
/// one blank line.
pub fn strip_markdown(md: &str) -> String {
    let s = normalise_line_endings(md);
    let s = remove_fenced_code(&s);
    let s = unwrap_inline_code(&s);
    let s = remove_heading_markers(&s);
    let s = replace_list_markers(&s);
    collapse_blank_lines(&s)
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 2: Fenced code blocks ───────────────────────────────────────────────

static RE_FENCED_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```.*?```").unwrap());

fn remove_fenced_code(input: &str) -> String {
    RE_FENCED_CODE.replace_all(input, "").into_owned()
}

// ── Rule 3: Inline code ──────────────────────────────────────────────────────

static RE_INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]*)`").unwrap());

fn unwrap_inline_code(input: &str) -> String {
    RE_INLINE_CODE.replace_all(input, "$1").into_owned()
}

// ── Rule 4: Heading markers ──────────────────────────────────────────────────

static RE_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#{1,6}[ \t]*").unwrap());

fn remove_heading_markers(input: &str) -> String {
    RE_HEADING.replace_all(input, "").into_owned()
}

// ── Rule 5: List markers ─────────────────────────────────────────────────────

// Horizontal whitespace only: `\s` would swallow the blank line above a list.
static RE_LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*[-*+][ \t]+").unwrap());

fn replace_list_markers(input: &str) -> String {
    RE_LIST_MARKER.replace_all(input, BULLET).into_owned()
}

// ── Rule 6: Collapse blank lines ─────────────────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n").into_owned()
}
