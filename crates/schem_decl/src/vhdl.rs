//! VHDL declarations: `name(subrange).slice : type := init -- comment`.

use crate::scan;
use crate::SignalDeclaration;
use schem_common::Language;

/// Parses a VHDL signal or port declaration.
pub fn parse(raw: &str) -> SignalDeclaration {
    let (code, comment) = match scan::find_unquoted(raw, "--") {
        Some(at) => (&raw[..at], raw[at + 2..].trim()),
        None => (raw, ""),
    };
    let (code, init) = match scan::find_unquoted(code, ":=") {
        Some(at) => (&code[..at], code[at + 2..].trim()),
        None => (code, ""),
    };
    let (name_part, type_spec) = match code.find(':') {
        Some(at) => (code[..at].trim(), code[at + 1..].trim()),
        None => (code.trim(), ""),
    };

    let name_end = name_part
        .find(|c: char| c == '(' || c == '.' || c.is_whitespace())
        .unwrap_or(name_part.len());
    let name = &name_part[..name_end];
    let mut rest = name_part[name_end..].trim_start();

    let mut subrange = "";
    if rest.starts_with('(') {
        match scan::matching_close(rest, 0, '(', ')') {
            Some(close) => {
                subrange = rest[1..close].trim();
                rest = rest[close + 1..].trim_start();
            }
            None => {
                subrange = rest[1..].trim();
                rest = "";
            }
        }
    }
    let record_slice = rest.strip_prefix('.').map(str::trim).unwrap_or("");

    SignalDeclaration {
        name: name.to_string(),
        subrange: subrange.to_string(),
        type_spec: type_spec.to_string(),
        comment: comment.to_string(),
        init: init.to_string(),
        record_slice: record_slice.to_string(),
        unpacked: String::new(),
    }
}

/// Renders a declaration as VHDL text.
pub fn recompose(decl: &SignalDeclaration) -> String {
    let mut text = decl.connection_text(Language::Vhdl);
    if !decl.type_spec.is_empty() {
        text.push_str(" : ");
        text.push_str(&decl.type_spec);
    }
    if !decl.init.is_empty() {
        text.push_str(" := ");
        text.push_str(&decl.init);
    }
    if !decl.comment.is_empty() {
        text.push_str(" -- ");
        text.push_str(&decl.comment);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_declaration() {
        let d = parse("cnt(3 downto 0) : unsigned(7 downto 0) := (others => '0') -- counter");
        assert_eq!(d.name, "cnt");
        assert_eq!(d.subrange, "3 downto 0");
        assert_eq!(d.type_spec, "unsigned(7 downto 0)");
        assert_eq!(d.init, "(others => '0')");
        assert_eq!(d.comment, "counter");
        assert!(d.record_slice.is_empty());
    }

    #[test]
    fn record_slice() {
        let d = parse("bus.valid : std_logic");
        assert_eq!(d.name, "bus");
        assert_eq!(d.record_slice, "valid");
        assert_eq!(recompose(&d), "bus.valid : std_logic");
    }

    #[test]
    fn name_only() {
        let d = parse("  s_ready ");
        assert_eq!(d.name, "s_ready");
        assert!(d.type_spec.is_empty());
        assert_eq!(recompose(&d), "s_ready");
    }

    #[test]
    fn comment_inside_string_is_kept() {
        let d = parse(r#"msg : string := "a--b" -- text"#);
        assert_eq!(d.init, r#""a--b""#);
        assert_eq!(d.comment, "text");
    }

    #[test]
    fn recompose_normalizes_spacing() {
        let d = parse("a:std_logic:='0'--x");
        assert_eq!(recompose(&d), "a : std_logic := '0' -- x");
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn declaration_strategy() -> impl Strategy<Value = SignalDeclaration> {
        (
            "[a-z][a-z0-9_]{0,8}",
            prop::option::of("[0-9]{1,2} (downto|to) [0-9]{1,2}"),
            prop::option::of("[a-z]{1,6}"),
            "(std_logic|std_logic_vector\\([0-9] downto 0\\)|unsigned\\(7 downto 0\\)|integer|)",
            prop::option::of("([0-9]{1,3}|'0'|\\(others => '1'\\))"),
            prop::option::of("[a-z0-9][a-z0-9 ]{0,12}"),
        )
            .prop_map(|(name, subrange, slice, type_spec, init, comment)| {
                SignalDeclaration {
                    name,
                    subrange: subrange.unwrap_or_default(),
                    type_spec,
                    comment: comment.unwrap_or_default(),
                    init: init.unwrap_or_default(),
                    record_slice: slice.unwrap_or_default(),
                    unpacked: String::new(),
                }
            })
    }

    fn check_round_trip(decl: &SignalDeclaration) -> Result<(), TestCaseError> {
        let first = parse(&recompose(decl));
        let second = parse(&recompose(&first));
        prop_assert_eq!(first, second);
        Ok(())
    }

    proptest! {
        #[test]
        fn vhdl_round_trip(decl in declaration_strategy()) {
            check_round_trip(&decl)?;
        }
    }
}
