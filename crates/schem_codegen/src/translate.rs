//! VHDL/Verilog translation of port declarations, generic maps and generic
//! definitions of instantiated symbols.

use schem_common::{Direction, Language};
use schem_decl::{parse, split_comment, SignalDeclaration};

/// Comment tag recording the direction of a range whose bounds are not numeric.
pub const RANGE_MARKER: &str = "HDL-SCHEM-Editor:";

/// Renders a port declaration written in `from` in the language `to`.
pub fn port(decl: &str, from: Language, to: Language) -> String {
    match (from.is_verilog(), to.is_verilog()) {
        (false, true) => port_to_verilog(decl),
        (true, false) => port_to_vhdl(decl),
        _ => decl.trim().to_string(),
    }
}

/// Splits `A downto B` / `A to B` into its bounds and direction.
fn vhdl_range(range: &str) -> Option<(&str, &str, bool)> {
    let lower = range.to_ascii_lowercase();
    if let Some(at) = lower.find(" downto ") {
        return Some((range[..at].trim(), range[at + 8..].trim(), true));
    }
    lower
        .find(" to ")
        .map(|at| (range[..at].trim(), range[at + 4..].trim(), false))
}

fn is_numeric(bound: &str) -> bool {
    !bound.is_empty() && bound.bytes().all(|b| b.is_ascii_digit())
}

fn join_non_empty(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Translates a VHDL port declaration into a Verilog one.
pub fn port_to_verilog(decl: &str) -> String {
    let d = parse(decl, Language::Vhdl);
    let direction = d.direction().unwrap_or(Direction::Input);
    let ty = d.type_without_direction();
    let (base, inner) = match ty.find('(') {
        Some(open) => {
            let close = ty.rfind(')').unwrap_or(ty.len());
            (ty[..open].trim(), ty.get(open + 1..close).unwrap_or("").trim())
        }
        None => (ty.trim(), ""),
    };

    let mut marker = None;
    let mut range = String::new();
    if let Some((left, right, downto)) = vhdl_range(inner) {
        range = format!("[{left}:{right}]");
        if !is_numeric(left) || !is_numeric(right) {
            marker = Some(if downto { "downto" } else { "to" });
        }
    }
    let (kind, is_net) = match base.to_ascii_lowercase().as_str() {
        "std_logic" | "std_ulogic" | "bit" | "std_logic_vector" | "std_ulogic_vector"
        | "bit_vector" | "unsigned" => ("", true),
        "signed" => ("signed", true),
        "integer" | "natural" | "positive" => ("integer", false),
        _ => (base, true),
    };
    let prefix = match direction {
        Direction::Input => "input",
        Direction::Output if is_net => "output wire",
        Direction::Inout if is_net => "inout wire",
        Direction::Output => "output",
        Direction::Inout => "inout",
    };

    let mut text = join_non_empty(&[prefix, kind, &range, &d.name]);
    if !d.comment.is_empty() {
        text.push_str(" // ");
        text.push_str(&d.comment);
    }
    if let Some(marker) = marker {
        text.push_str(" //");
        text.push_str(RANGE_MARKER);
        text.push_str(marker);
    }
    text
}

/// Removes a range marker from a Verilog comment, returning the remaining
/// comment and whether the marker asked for an ascending range.
fn take_range_marker(comment: &str) -> (String, bool) {
    match comment.find(RANGE_MARKER) {
        Some(at) => {
            let ascending = comment[at + RANGE_MARKER.len()..].trim_start().starts_with("to");
            let rest = comment[..at].trim_end().trim_end_matches("//").trim_end();
            (rest.to_string(), ascending)
        }
        None => (comment.to_string(), false),
    }
}

/// Translates a Verilog port declaration into a VHDL one.
pub fn port_to_vhdl(decl: &str) -> String {
    let d = parse(decl, Language::Verilog);
    let direction = d.direction().unwrap_or(Direction::Input);
    let ty = d.type_without_direction();
    let (comment, ascending) = take_range_marker(&d.comment);

    let signed = ty.split_whitespace().any(|w| w == "signed");
    let range = ty.find('[').and_then(|open| {
        let close = ty[open..].find(']')? + open;
        let (left, right) = ty[open + 1..close].split_once(':')?;
        Some((left.trim(), right.trim()))
    });
    let vhdl_type = match range {
        Some((left, right)) => {
            let downto = match (left.parse::<i64>(), right.parse::<i64>()) {
                (Ok(l), Ok(r)) => l >= r,
                _ => !ascending,
            };
            let base = if signed { "signed" } else { "std_logic_vector" };
            let dir = if downto { "downto" } else { "to" };
            format!("{base}({left} {dir} {right})")
        }
        None if ty.split_whitespace().any(|w| w == "integer") => "integer".to_string(),
        None => "std_logic".to_string(),
    };

    SignalDeclaration {
        name: d.name,
        type_spec: format!("{} {vhdl_type}", direction.keyword(Language::Vhdl)),
        comment,
        ..Default::default()
    }
    .recompose(Language::Vhdl)
}

/// Splits `text` at `sep` outside of parentheses and brackets.
fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            c if c == sep && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// One actual in an instance's generic map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenericMapping {
    /// Generic/parameter name.
    pub name: String,
    /// Actual value.
    pub value: String,
    /// Trailing comment, without marker.
    pub comment: Option<String>,
}

impl GenericMapping {
    /// Renders the association without separator or comment.
    pub fn association(&self, language: Language) -> String {
        if language.is_verilog() {
            format!(".{}({})", self.name, self.value)
        } else {
            format!("{} => {}", self.name, self.value)
        }
    }
}

fn parse_association(code: &str, language: Language) -> Option<(String, String)> {
    let code = code.trim();
    if language.is_verilog() {
        let rest = code.strip_prefix('.')?;
        let open = rest.find('(')?;
        let close = rest.rfind(')')?;
        if close < open {
            return None;
        }
        Some((rest[..open].trim().to_string(), rest[open + 1..close].trim().to_string()))
    } else {
        let (name, value) = code.split_once("=>")?;
        Some((name.trim().to_string(), value.trim().to_string()))
    }
}

/// Parses the generic-map text of an instance written in `language`.
///
/// Wrapper lines such as `generic map (`, `#(` or a lone `)` are skipped.
pub fn generic_mappings(block: &str, language: Language) -> Vec<GenericMapping> {
    let mut mappings = Vec::new();
    for line in block.lines() {
        let (code, comment) = split_comment(line, language);
        let code = code.trim();
        let lower = code.to_ascii_lowercase();
        let code = if lower.starts_with("generic map") {
            code.get(11..).unwrap_or("").trim_start().trim_start_matches('(')
        } else {
            code.strip_prefix("#(").unwrap_or(code)
        };
        let mut found: Vec<GenericMapping> = split_top_level(code, ',')
            .into_iter()
            .filter_map(|part| parse_association(part, language))
            .map(|(name, value)| GenericMapping {
                name,
                value,
                comment: None,
            })
            .collect();
        if let (Some(last), Some(comment)) = (found.last_mut(), comment) {
            let comment = comment.trim();
            if !comment.is_empty() {
                last.comment = Some(comment.to_string());
            }
        }
        mappings.append(&mut found);
    }
    mappings
}

/// Translates generic/parameter definitions of a symbol into `to`.
///
/// Returns one declaration per generic, without separators, comments kept.
pub fn generic_definitions(text: &str, from: Language, to: Language) -> Vec<String> {
    let mut out = Vec::new();
    for line in text.lines() {
        let (code, comment) = split_comment(line, from);
        let comment = comment.map(str::trim).filter(|c| !c.is_empty());
        let code = code.trim().trim_end_matches([';', ',']).trim_end();
        if code.is_empty() {
            continue;
        }
        let mut pieces: Vec<String> = if from.is_verilog() {
            split_top_level(code, ',')
                .into_iter()
                .filter(|p| !p.trim().is_empty())
                .map(|p| {
                    if to.is_verilog() {
                        p.trim().to_string()
                    } else {
                        parameter_to_generic(p)
                    }
                })
                .collect()
        } else if to.is_verilog() {
            vec![generic_to_parameter(code)]
        } else {
            vec![code.to_string()]
        };
        if let (Some(last), Some(comment)) = (pieces.last_mut(), comment) {
            last.push(' ');
            last.push_str(to.comment_marker());
            last.push(' ');
            last.push_str(comment);
        }
        out.append(&mut pieces);
    }
    out
}

/// `parameter [integer] N = V` to `N : integer := V`.
fn parameter_to_generic(piece: &str) -> String {
    let (left, value) = match piece.split_once('=') {
        Some((l, v)) => (l, v.trim()),
        None => (piece, ""),
    };
    let name = left.split_whitespace().last().unwrap_or("");
    SignalDeclaration {
        name: name.to_string(),
        type_spec: "integer".to_string(),
        init: value.to_string(),
        ..Default::default()
    }
    .recompose(Language::Vhdl)
}

/// `N : T := V` to `parameter N = V`.
fn generic_to_parameter(code: &str) -> String {
    let d = parse(code, Language::Vhdl);
    if d.init.is_empty() {
        format!("parameter {}", d.name)
    } else {
        format!("parameter {} = {}", d.name, d.init)
    }
}
