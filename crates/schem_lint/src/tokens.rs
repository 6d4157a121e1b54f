//! A small HDL tokenizer for block text.
//!
//! Comments, string literals and character literals are dropped; what
//! remains is identifiers, numbers and punctuation, each tagged with the
//! byte range and relative line it came from.

use schem_common::Language;

/// Operators recognized as a single token, longest first.
const OPERATORS: [&str; 15] = [
    "===", "!==", "<=", ">=", "==", "!=", ":=", "=>", "/=", "&&", "||", "**", "<<", ">>", "->",
];

/// One token of block text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// Token text, lowercased for VHDL identifiers.
    pub text: String,
    /// Byte offset of the first character in the block.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
    /// Zero-based line within the block.
    pub line: u32,
}

impl Token {
    /// Whether the token is an identifier.
    pub fn is_identifier(&self) -> bool {
        self.text
            .chars()
            .next()
            .is_some_and(|c| c.is_alphabetic() || c == '_')
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Splits `text` into tokens.
pub fn tokenize(text: &str, language: Language) -> Vec<Token> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let offset_of = |i: usize| chars.get(i).map_or(text.len(), |&(o, _)| o);
    let mut tokens = Vec::new();
    let mut line = 0u32;
    let mut i = 0;

    while i < chars.len() {
        let (start, c) = chars[i];
        let next = chars.get(i + 1).map(|&(_, c)| c);

        if c == '\n' {
            line += 1;
            i += 1;
        } else if c.is_whitespace() {
            i += 1;
        } else if (c == '-' && next == Some('-') && !language.is_verilog())
            || (c == '/' && next == Some('/') && language.is_verilog())
        {
            while i < chars.len() && chars[i].1 != '\n' {
                i += 1;
            }
        } else if c == '/' && next == Some('*') && language.is_verilog() {
            i += 2;
            while i < chars.len()
                && !(chars[i].1 == '*' && chars.get(i + 1).map(|p| p.1) == Some('/'))
            {
                if chars[i].1 == '\n' {
                    line += 1;
                }
                i += 1;
            }
            i += 2;
        } else if c == '"' {
            i += 1;
            while i < chars.len() && chars[i].1 != '"' && chars[i].1 != '\n' {
                if chars[i].1 == '\\' && language.is_verilog() {
                    i += 1;
                }
                i += 1;
            }
            i += 1;
        } else if c == '\'' {
            if !language.is_verilog() && chars.get(i + 2).map(|p| p.1) == Some('\'') {
                // character literal
                i += 3;
            } else if language.is_verilog() {
                // based literal such as 'b1010 or 'hFF
                i += 1;
                while i < chars.len() && is_word_char(chars[i].1) {
                    i += 1;
                }
            } else {
                tokens.push(Token {
                    text: "'".to_string(),
                    start,
                    end: start + 1,
                    line,
                });
                i += 1;
            }
        } else if is_word_char(c) {
            while i < chars.len() && is_word_char(chars[i].1) {
                i += 1;
            }
            let word = &text[start..offset_of(i)];
            // bit-string prefix such as x"FF"
            if !language.is_verilog() && chars.get(i).map(|p| p.1) == Some('"') && word.len() <= 2 {
                continue;
            }
            let word = if language.is_verilog() {
                word.to_string()
            } else {
                word.to_lowercase()
            };
            tokens.push(Token {
                text: word,
                start,
                end: offset_of(i),
                line,
            });
        } else {
            let rest = &text[start..];
            let len = OPERATORS
                .iter()
                .find(|op| rest.starts_with(*op))
                .map_or(c.len_utf8(), |op| op.len());
            let end = start + len;
            tokens.push(Token {
                text: text[start..end].to_string(),
                start,
                end,
                line,
            });
            while i < chars.len() && chars[i].0 < end {
                i += 1;
            }
        }
    }
    tokens
}

/// Index of the token closing the group opened at `open`.
pub fn matching(tokens: &[Token], open: usize, open_text: &str, close_text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        if token.text == open_text {
            depth += 1;
        } else if token.text == close_text {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(text: &str, language: Language) -> Vec<String> {
        tokenize(text, language).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn vhdl_comments_strings_and_characters() {
        assert_eq!(
            texts("Y <= A when S = '1' else \"00\"; -- Y <= B", Language::Vhdl),
            vec!["y", "<=", "a", "when", "s", "=", "else", ";"]
        );
        assert_eq!(texts("q <= x\"FF\";", Language::Vhdl), vec!["q", "<=", ";"]);
        assert_eq!(
            texts("clk'event", Language::Vhdl),
            vec!["clk", "'", "event"]
        );
    }

    #[test]
    fn verilog_comments_and_literals() {
        assert_eq!(
            texts("a = 4'b1010; /* b = c;\n */ d <= e; // f", Language::Verilog),
            vec!["a", "=", "4", ";", "d", "<=", "e", ";"]
        );
        assert_eq!(texts("$display(\"x\")", Language::Verilog), vec!["$display", "(", ")"]);
    }

    #[test]
    fn lines_and_offsets() {
        let tokens = tokenize("a\n  b <= c;", Language::Vhdl);
        assert_eq!(tokens[1].line, 1);
        assert_eq!(tokens[1].start, 4);
        assert_eq!(tokens[2].text, "<=");
        assert_eq!(tokens[2].end, 8);
    }

    #[test]
    fn groups() {
        let tokens = tokenize("f(a(1), b) x", Language::Vhdl);
        assert_eq!(matching(&tokens, 1, "(", ")"), Some(8));
        assert_eq!(matching(&tokens, 3, "(", ")"), Some(5));
    }
}
