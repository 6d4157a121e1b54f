//! Signal directions of schematic connectors and entity ports.

use crate::language::Language;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a connector or port.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Read by the design.
    Input,
    /// Driven by the design.
    Output,
    /// Bidirectional.
    Inout,
}

impl Direction {
    /// Returns the direction keyword as written in a port declaration.
    ///
    /// VHDL uses `in`/`out`/`inout`; Verilog uses `input`/`output`/`inout`.
    pub fn keyword(self, language: Language) -> &'static str {
        match (self, language.is_verilog()) {
            (Direction::Input, false) => "in",
            (Direction::Output, false) => "out",
            (Direction::Input, true) => "input",
            (Direction::Output, true) => "output",
            (Direction::Inout, _) => "inout",
        }
    }

    /// Recognizes a direction keyword of either language (case-insensitive).
    ///
    /// VHDL `buffer` ports are treated as outputs.
    pub fn from_keyword(word: &str) -> Option<Direction> {
        match word.to_ascii_lowercase().as_str() {
            "in" | "input" => Some(Direction::Input),
            "out" | "output" | "buffer" => Some(Direction::Output),
            "inout" => Some(Direction::Inout),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Input => write!(f, "input"),
            Direction::Output => write!(f, "output"),
            Direction::Inout => write!(f, "inout"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_per_language() {
        assert_eq!(Direction::Input.keyword(Language::Vhdl), "in");
        assert_eq!(Direction::Output.keyword(Language::Vhdl), "out");
        assert_eq!(Direction::Input.keyword(Language::Verilog), "input");
        assert_eq!(Direction::Inout.keyword(Language::SystemVerilog), "inout");
    }

    #[test]
    fn keyword_recognition() {
        assert_eq!(Direction::from_keyword("IN"), Some(Direction::Input));
        assert_eq!(Direction::from_keyword("output"), Some(Direction::Output));
        assert_eq!(Direction::from_keyword("buffer"), Some(Direction::Output));
        assert_eq!(Direction::from_keyword("std_logic"), None);
    }
}
