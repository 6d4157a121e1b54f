//! HDL language selection with comment markers and file extensions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The hardware description language a design or symbol is written in.
///
/// Verilog and SystemVerilog share one declaration syntax; they differ only in
/// file extension and the default net kind of internal signals.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// VHDL-2008.
    #[default]
    Vhdl,
    /// Verilog-2005.
    Verilog,
    /// SystemVerilog-2017.
    #[serde(alias = "system_verilog")]
    SystemVerilog,
}

impl Language {
    /// Returns `true` for Verilog and SystemVerilog.
    pub fn is_verilog(self) -> bool {
        matches!(self, Language::Verilog | Language::SystemVerilog)
    }

    /// Returns the line-comment marker (`--` or `//`).
    pub fn comment_marker(self) -> &'static str {
        match self {
            Language::Vhdl => "--",
            Language::Verilog | Language::SystemVerilog => "//",
        }
    }

    /// Returns the file extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Language::Vhdl => "vhd",
            Language::Verilog => "v",
            Language::SystemVerilog => "sv",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Vhdl => write!(f, "VHDL"),
            Language::Verilog => write!(f, "Verilog"),
            Language::SystemVerilog => write!(f, "SystemVerilog"),
        }
    }
}

/// Error type for parsing language names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLanguageError {
    /// The input string that failed to parse.
    pub input: String,
}

impl fmt::Display for ParseLanguageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown HDL language: '{}'", self.input)
    }
}

impl std::error::Error for ParseLanguageError {}

impl FromStr for Language {
    type Err = ParseLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vhdl" => Ok(Language::Vhdl),
            "verilog" => Ok(Language::Verilog),
            "systemverilog" | "system_verilog" | "sv" => Ok(Language::SystemVerilog),
            _ => Err(ParseLanguageError {
                input: s.to_string(),
            }),
        }
    }
}
