//! Minimal text-scanning primitives shared by the detectors.
//!
//! These work on raw bytes and know nothing about strings or comments;
//! a bracket inside a literal will miscount. That imprecision is
//! accepted: the callers treat every `None` as "stop looking".

/// Find the balanced closer for the opening delimiter at `open`.
///
/// Supports `(`, `{` and `[`. Returns `None` when `open` is not an
/// opening delimiter or the input ends before balance is restored.
pub fn matching_close(bytes: &[u8], open: usize) -> Option<usize> {
    let (open_ch, close_ch) = match bytes.get(open)? {
        b'(' => (b'(', b')'),
        b'{' => (b'{', b'}'),
        b'[' => (b'[', b']'),
        _ => return None,
    };

    let mut depth: usize = 0;
    for (offset, &byte) in bytes[open..].iter().enumerate() {
        if byte == open_ch {
            depth += 1;
        } else if byte == close_ch {
            depth -= 1;
            if depth == 0 {
                return Some(open + offset);
            }
        }
    }
    None
}

/// First index at or after `from` that is not ASCII whitespace.
/// May return `bytes.len()` when only whitespace remains.
pub fn skip_whitespace(bytes: &[u8], from: usize) -> usize {
    let mut i = from;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

/// Index of the last byte of the statement starting at `from`.
///
/// Brace-delimited statements run to their balanced closing brace.
/// Otherwise scan to an explicit `;`, falling back to end-of-line,
/// falling back to end-of-input.
pub fn statement_end(bytes: &[u8], from: usize) -> Option<usize> {
    let start = skip_whitespace(bytes, from);
    if start >= bytes.len() {
        return None;
    }
    if bytes[start] == b'{' {
        return matching_close(bytes, start);
    }
    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if byte == b';' || byte == b'\n' {
            return Some(start + offset);
        }
    }
    Some(bytes.len() - 1)
}
