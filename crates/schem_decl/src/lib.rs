//! Signal and port declaration micro-grammar.
//!
//! A declaration is the one-line text attached to a wire or a symbol port,
//! e.g. `count_o : std_logic_vector(3 downto 0) -- counter` (VHDL) or
//! `wire [3:0] count_o // counter` (Verilog). [`parse`] splits it into a
//! [`SignalDeclaration`] and [`SignalDeclaration::recompose`] renders it back;
//! the two are inverse on the parsed fields.

#![warn(missing_docs)]

mod scan;
pub mod verilog;
pub mod vhdl;

use schem_common::{Direction, Language};
use serde::{Deserialize, Serialize};

/// A parsed signal or port declaration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignalDeclaration {
    /// The declared identifier.
    pub name: String,
    /// Used subrange without brackets, e.g. `3 downto 0` or `3:0`.
    pub subrange: String,
    /// The type clause (VHDL) or everything before the name (Verilog).
    pub type_spec: String,
    /// Trailing comment text without the comment marker.
    pub comment: String,
    /// VHDL initializer after `:=`.
    pub init: String,
    /// VHDL record element selected after the name, without the dot.
    pub record_slice: String,
    /// Verilog unpacked dimensions following the name.
    pub unpacked: String,
}

/// Parses a raw declaration in the given language.
pub fn parse(raw: &str, language: Language) -> SignalDeclaration {
    if language.is_verilog() {
        verilog::parse(raw)
    } else {
        vhdl::parse(raw)
    }
}

impl SignalDeclaration {
    /// Renders the declaration back into text.
    pub fn recompose(&self, language: Language) -> String {
        if language.is_verilog() {
            verilog::recompose(self)
        } else {
            vhdl::recompose(self)
        }
    }

    /// Returns the declaration text without its comment.
    pub fn without_comment(&self, language: Language) -> String {
        SignalDeclaration {
            comment: String::new(),
            ..self.clone()
        }
        .recompose(language)
    }

    /// Returns the signal reference as written at an instance port.
    ///
    /// VHDL: `name(subrange).slice`; Verilog: `name[subrange]`.
    pub fn connection_text(&self, language: Language) -> String {
        let mut text = self.name.clone();
        if language.is_verilog() {
            if !self.subrange.is_empty() {
                text.push('[');
                text.push_str(&self.subrange);
                text.push(']');
            }
        } else {
            if !self.subrange.is_empty() {
                text.push('(');
                text.push_str(&self.subrange);
                text.push(')');
            }
            if !self.record_slice.is_empty() {
                text.push('.');
                text.push_str(&self.record_slice);
            }
        }
        text
    }

    /// Returns the port direction named at the start of the type clause.
    pub fn direction(&self) -> Option<Direction> {
        self.type_spec
            .split_whitespace()
            .next()
            .and_then(Direction::from_keyword)
    }

    /// Returns the type clause with a leading direction keyword removed.
    pub fn type_without_direction(&self) -> &str {
        let trimmed = self.type_spec.trim_start();
        match trimmed.split_whitespace().next() {
            Some(word) if Direction::from_keyword(word).is_some() => {
                trimmed[word.len()..].trim_start()
            }
            _ => trimmed,
        }
    }
}

/// Splits `raw` at its first comment marker outside string literals.
///
/// Returns the code part and the comment text after the marker, if any.
pub fn split_comment(raw: &str, language: Language) -> (&str, Option<&str>) {
    let marker = language.comment_marker();
    match scan::find_unquoted(raw, marker) {
        Some(at) => (&raw[..at], Some(&raw[at + marker.len()..])),
        None => (raw, None),
    }
}

/// Verilog words that already name a net or variable kind.
const VERILOG_KINDS: &[&str] = &[
    "wire", "reg", "logic", "tri", "wand", "wor", "var", "bit", "integer",
];

/// Turns a wire declaration into a port declaration of `direction`.
///
/// The port carries the plain signal name; a used subrange or record slice on
/// the wire is dropped. Verilog outputs and inouts get an explicit `wire` kind
/// unless the type already names one.
pub fn insert_direction(raw: &str, direction: Direction, language: Language) -> String {
    let decl = parse(raw, language);
    let keyword = direction.keyword(language);
    let type_spec = if language.is_verilog() {
        let has_kind = decl
            .type_spec
            .split_whitespace()
            .next()
            .is_some_and(|w| VERILOG_KINDS.contains(&w));
        let prefix = if direction == Direction::Input || has_kind {
            keyword.to_string()
        } else {
            format!("{keyword} wire")
        };
        join_words(&prefix, &decl.type_spec)
    } else {
        join_words(keyword, &decl.type_spec)
    };
    SignalDeclaration {
        subrange: String::new(),
        record_slice: String::new(),
        type_spec,
        ..decl
    }
    .recompose(language)
}

fn join_words(first: &str, rest: &str) -> String {
    if rest.is_empty() {
        first.to_string()
    } else {
        format!("{first} {rest}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vhdl_direction_insertion() {
        let port = insert_direction(
            "clk_i : std_logic -- system clock",
            Direction::Input,
            Language::Vhdl,
        );
        assert_eq!(port, "clk_i : in std_logic -- system clock");
    }

    #[test]
    fn vhdl_port_drops_subrange() {
        let port = insert_direction(
            "data(7 downto 0) : std_logic_vector(15 downto 0)",
            Direction::Output,
            Language::Vhdl,
        );
        assert_eq!(port, "data : out std_logic_vector(15 downto 0)");
    }

    #[test]
    fn verilog_direction_insertion() {
        assert_eq!(
            insert_direction("[3:0] q", Direction::Output, Language::Verilog),
            "output wire [3:0] q"
        );
        assert_eq!(
            insert_direction("reg [3:0] q", Direction::Output, Language::Verilog),
            "output reg [3:0] q"
        );
        assert_eq!(
            insert_direction("clk", Direction::Input, Language::Verilog),
            "input clk"
        );
        assert_eq!(
            insert_direction("bus // shared", Direction::Inout, Language::SystemVerilog),
            "inout wire bus // shared"
        );
    }

    #[test]
    fn connection_text_per_language() {
        let vhdl = parse("r(3 downto 0).valid : t_rec", Language::Vhdl);
        assert_eq!(vhdl.connection_text(Language::Vhdl), "r(3 downto 0).valid");
        let verilog = parse("wire [7:0] d:[3:0]", Language::Verilog);
        assert_eq!(verilog.connection_text(Language::Verilog), "d[3:0]");
    }

    #[test]
    fn comment_split() {
        assert_eq!(
            split_comment("a : bit -- note", Language::Vhdl),
            ("a : bit ", Some(" note"))
        );
        assert_eq!(split_comment("wire a", Language::Verilog), ("wire a", None));
    }

    #[test]
    fn direction_of_port_declaration() {
        let decl = parse("a : inout std_logic", Language::Vhdl);
        assert_eq!(decl.direction(), Some(Direction::Inout));
        assert_eq!(decl.type_without_direction(), "std_logic");
        let decl = parse("output wire [1:0] y", Language::Verilog);
        assert_eq!(decl.direction(), Some(Direction::Output));
        assert_eq!(decl.type_without_direction(), "wire [1:0]");
        let decl = parse("s : std_logic", Language::Vhdl);
        assert_eq!(decl.direction(), None);
    }
}
