//! Priority comments that order sibling elements.
//!
//! Blocks carry a leading line holding only a numeric comment (`-- 3`);
//! instance names and generate conditions carry a trailing one
//! (`u_fifo -- 2`). Both `--` and `//` markers are recognized.

fn comment_number(comment: &str) -> Option<u32> {
    let comment = comment.trim();
    if comment.is_empty() || !comment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    comment.parse().ok()
}

/// Splits a trailing `-- N` / `// N` priority comment off `text`.
///
/// Returns the text without the comment and the priority, or `text`
/// unchanged (right-trimmed) when it carries none.
pub fn trailing_priority(text: &str) -> (&str, Option<u32>) {
    let text = text.trim_end();
    let marker = match (text.rfind("--"), text.rfind("//")) {
        (Some(a), Some(b)) => a.max(b),
        (Some(a), None) | (None, Some(a)) => a,
        (None, None) => return (text, None),
    };
    match comment_number(&text[marker + 2..]) {
        Some(priority) => (text[..marker].trim_end(), Some(priority)),
        None => (text, None),
    }
}

/// Splits a leading priority-only comment line off a block text.
///
/// Lines before it may only be blank.
pub fn leading_priority(text: &str) -> (&str, Option<u32>) {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            offset += line.len();
            continue;
        }
        let comment = trimmed
            .strip_prefix("--")
            .or_else(|| trimmed.strip_prefix("//"));
        return match comment.and_then(comment_number) {
            Some(priority) => (&text[offset + line.len()..], Some(priority)),
            None => (text, None),
        };
    }
    (text, None)
}
