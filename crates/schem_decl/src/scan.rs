//! Small string scanners shared by both grammars.

/// Finds `pattern` outside of double-quoted string literals.
pub(crate) fn find_unquoted(text: &str, pattern: &str) -> Option<usize> {
    let mut in_string = false;
    for (i, c) in text.char_indices() {
        if c == '"' {
            in_string = !in_string;
        } else if !in_string && text[i..].starts_with(pattern) {
            return Some(i);
        }
    }
    None
}

/// Returns the byte index of the bracket closing the one at `open_at`.
pub(crate) fn matching_close(text: &str, open_at: usize, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text[open_at..].char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(open_at + i);
            }
        }
    }
    None
}

/// Splits Verilog declaration text into words, keeping `[...]` groups whole.
pub(crate) fn verilog_words(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '[' => {
                if depth == 0 && !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
                depth += 1;
                current.push(c);
            }
            ']' => {
                current.push(c);
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    words.push(std::mem::take(&mut current));
                }
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_hide_patterns() {
        assert_eq!(find_unquoted(r#"x := "a--b" -- c"#, "--"), Some(12));
        assert_eq!(find_unquoted("plain", "--"), None);
    }

    #[test]
    fn nested_brackets() {
        let text = "(a(1) downto 0) rest";
        assert_eq!(matching_close(text, 0, '(', ')'), Some(14));
        assert_eq!(matching_close("(open", 0, '(', ')'), None);
    }

    #[test]
    fn words_group_ranges() {
        assert_eq!(
            verilog_words("logic[7 : 0] mem[0:3]"),
            vec!["logic", "[7 : 0]", "mem", "[0:3]"]
        );
        assert_eq!(verilog_words("  wire   a "), vec!["wire", "a"]);
    }
}
