//! Verilog and SystemVerilog declarations: `type name [unpacked]:[used] // comment`.
//!
//! A `:[range]` suffix after the name selects the part of the declared range
//! that the wire actually carries; the declared range itself stays in the
//! type words before the name.

use crate::scan;
use crate::SignalDeclaration;

/// Parses a Verilog signal or port declaration.
pub fn parse(raw: &str) -> SignalDeclaration {
    let (code, comment) = match scan::find_unquoted(raw, "//") {
        Some(at) => (&raw[..at], raw[at + 2..].trim()),
        None => (raw, ""),
    };
    let code = code.trim().trim_end_matches([';', ',']).trim_end();
    let (code, subrange) = split_used_subrange(code);

    let words = scan::verilog_words(code);
    let mut decl = SignalDeclaration {
        comment: comment.to_string(),
        subrange: subrange.to_string(),
        ..Default::default()
    };
    match words.iter().rposition(|w| !w.starts_with('[')) {
        Some(at) => {
            decl.type_spec = words[..at].join(" ");
            decl.name = words[at].clone();
            decl.unpacked = words[at + 1..].join(" ");
        }
        None => decl.type_spec = words.join(" "),
    }
    decl
}

/// Splits a trailing `:[range]` from the declaration.
fn split_used_subrange(code: &str) -> (&str, &str) {
    if !code.ends_with(']') {
        return (code, "");
    }
    let Some(colon) = code.rfind(":[") else {
        return (code, "");
    };
    match scan::matching_close(code, colon + 1, '[', ']') {
        Some(close) if close == code.len() - 1 => {
            (code[..colon].trim_end(), code[colon + 2..close].trim())
        }
        _ => (code, ""),
    }
}

/// Renders a declaration as Verilog text.
pub fn recompose(decl: &SignalDeclaration) -> String {
    let mut text = decl.type_spec.clone();
    if !decl.name.is_empty() {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(&decl.name);
    }
    if !decl.unpacked.is_empty() {
        text.push(' ');
        text.push_str(&decl.unpacked);
    }
    if !decl.subrange.is_empty() {
        text.push_str(":[");
        text.push_str(&decl.subrange);
        text.push(']');
    }
    if !decl.comment.is_empty() {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str("// ");
        text.push_str(&decl.comment);
    }
    text
}
