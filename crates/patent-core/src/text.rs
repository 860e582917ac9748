//! Text normalization and paragraph splitting.
//!
//! `normalize` is the single canonicalization path used everywhere a patent
//! string (title, abstract, paragraph, claim text) enters the system. It is
//! total, pure, and idempotent: `normalize(normalize(s)) == normalize(s)`.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static SOFT_HYPHEN_WRAP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)(\w)-\s*\n\s*(\w)").unwrap());

const SOFT_HYPHEN: char = '\u{00ad}';

/// Canonicalize a patent text field.
///
/// Pipeline: NFKC normalize -> unescape HTML entities -> join hyphen-wrapped
/// words across a line break -> drop soft hyphens -> collapse whitespace runs
/// to a single space -> trim.
#[must_use]
pub fn normalize(input: &str) -> String {
    let nfkc: String = input.nfkc().collect();
    let unescaped = html_escape::decode_html_entities(&nfkc);
    let dehyphenated = SOFT_HYPHEN_WRAP_RE.replace_all(&unescaped, "$1$2");
    let stripped: String = dehyphenated.chars().filter(|&c| c != SOFT_HYPHEN).collect();
    let collapsed = WHITESPACE_RE.replace_all(&stripped, " ");
    collapsed.trim().to_string()
}

/// Split `text` into pieces of at most `max_chars` characters, each
/// subsequent piece overlapping the previous one by `overlap` characters.
///
/// `text` is normalized first. Returns `[]` for an empty (post-normalization)
/// input, `[normalized]` when it already fits within `max_chars`. When a
/// split point falls in the back half of a window, the window is pulled back
/// to the nearest preceding space so pieces don't end mid-word. All returned
/// pieces are trimmed.
#[must_use]
pub fn split_with_overlap(text: &str, max_chars: usize, overlap: usize) -> Vec<String> {
    let clean = normalize(text);
    if clean.is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = clean.chars().collect();
    if chars.len() <= max_chars {
        return vec![clean];
    }

    let mut pieces = Vec::new();
    let mut start = 0usize;
    while start < chars.len() {
        let mut end = (start + max_chars).min(chars.len());
        if end < chars.len() {
            if let Some(split) = rfind_space(&chars, start + 1, end) {
                if split > start + max_chars / 2 {
                    end = split;
                }
            }
        }
        let piece: String = chars[start..end].iter().collect();
        let trimmed = piece.trim();
        if !trimmed.is_empty() {
            pieces.push(trimmed.to_string());
        }
        if end == chars.len() {
            break;
        }
        start = end.saturating_sub(overlap).max(0);
    }
    pieces
}

/// Find the last space character in `chars[from..to)`, mirroring Python's
/// `str.rfind(" ", from, to)`.
fn rfind_space(chars: &[char], from: usize, to: usize) -> Option<usize> {
    chars[from..to].iter().rposition(|&c| c == ' ').map(|i| from + i)
}
