//! Column alignment and separator placement for declaration groups.

use schem_common::Language;
use schem_decl::{split_comment, SignalDeclaration};

/// One line of a declaration group: code plus an optional trailing comment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Row {
    pub code: String,
    pub comment: Option<String>,
}

impl Row {
    /// Splits user text into code and comment, dropping a trailing `;`/`,`.
    pub fn from_text(text: &str, language: Language) -> Row {
        let (code, comment) = split_comment(text, language);
        Row {
            code: code.trim().trim_end_matches([';', ',']).trim_end().to_string(),
            comment: comment
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        }
    }

    fn comment_of(decl: &SignalDeclaration) -> Option<String> {
        (!decl.comment.is_empty()).then(|| decl.comment.clone())
    }
}

/// Lays out VHDL declarations so that every `:` lines up.
///
/// Declarations without a name are kept as comment-only rows.
pub(crate) fn align_vhdl(decls: &[SignalDeclaration], prefix: &str) -> Vec<Row> {
    let width = decls.iter().map(|d| d.name.len()).max().unwrap_or(0);
    decls
        .iter()
        .map(|d| {
            if d.name.is_empty() {
                return Row {
                    code: String::new(),
                    comment: Row::comment_of(d),
                };
            }
            let mut code = if d.type_spec.is_empty() {
                format!("{prefix}{}", d.name)
            } else {
                format!("{prefix}{:<width$} : {}", d.name, d.type_spec)
            };
            if !d.init.is_empty() {
                code.push_str(" := ");
                code.push_str(&d.init);
            }
            Row {
                code,
                comment: Row::comment_of(d),
            }
        })
        .collect()
}

/// Lays out `left => right` associations so that every `=>` lines up.
pub(crate) fn align_associations(pairs: &[(String, String, Option<String>)]) -> Vec<Row> {
    let width = pairs.iter().map(|(l, _, _)| l.len()).max().unwrap_or(0);
    pairs
        .iter()
        .map(|(left, right, comment)| Row {
            code: format!("{left:<width$} => {right}"),
            comment: comment.clone(),
        })
        .collect()
}

/// Renders rows with `sep` after each code part, before its comment.
///
/// The last row carrying code gets no separator unless `terminate_last`.
pub(crate) fn separated(
    rows: &[Row],
    sep: &str,
    terminate_last: bool,
    language: Language,
) -> Vec<String> {
    let last = rows.iter().rposition(|r| !r.code.is_empty());
    let marker = language.comment_marker();
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let mut line = row.code.clone();
            if !row.code.is_empty() && (terminate_last || Some(i) != last) {
                line.push_str(sep);
            }
            if let Some(comment) = &row.comment {
                if !line.is_empty() {
                    line.push(' ');
                }
                line.push_str(marker);
                line.push(' ');
                line.push_str(comment);
            }
            line
        })
        .collect()
}
