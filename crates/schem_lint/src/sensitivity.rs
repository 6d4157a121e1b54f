//! Comparison of sensitivity lists against the signals a process reads.
//!
//! Only combinational processes are analyzed: VHDL processes with an
//! explicit list that is not `all` and that use no clock edge, and Verilog
//! `always @(...)` statements whose list has no `*` and no edge keyword.

use std::collections::HashSet;
use std::ops::Range;

use log::trace;
use schem_common::Language;
use schem_source::Span;

use crate::context::{BlockRegion, LintContext};
use crate::tokens::{matching, tokenize, Token};

/// Tokens after which an identifier begins a new statement.
const STATEMENT_STARTS: [&str; 8] = [";", "begin", "then", "else", "=>", ":", ")", "loop"];

/// How a signal disagrees with a sensitivity list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mismatch {
    /// Read in the body but absent from the list.
    Missing,
    /// Listed but never read.
    NotNeeded,
}

/// One signal whose presence in a list disagrees with the process body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SensitivityFinding {
    /// Signal name as declared.
    pub signal: String,
    /// Kind of disagreement.
    pub mismatch: Mismatch,
    /// The sensitivity list as written, whitespace collapsed.
    pub list: String,
    /// Line of the list in the generated file.
    pub line: u32,
    /// Span of the list.
    pub span: Span,
}

impl SensitivityFinding {
    /// The one-line warning reported to the user.
    pub fn message(&self, module: &str, file: &str) -> String {
        let verdict = match self.mismatch {
            Mismatch::Missing => "is missing in",
            Mismatch::NotNeeded => "is not needed in",
        };
        format!(
            "HDL Sensitivity  : Warning in module {module}: The signal {} {verdict} the sensitivity-list {} in line {} of file {file}.",
            self.signal, self.list, self.line
        )
    }
}

/// A combinational process: the token indices of its list parentheses and body.
struct Process {
    open: usize,
    close: usize,
    body: Range<usize>,
}

/// Analyzes every block of the context.
pub fn analyze(ctx: &LintContext<'_>) -> Vec<SensitivityFinding> {
    let mut findings = Vec::new();
    for block in ctx.blocks {
        if let Some((offset, text)) = ctx.block_text(block) {
            findings.extend(analyze_block(ctx, block, offset, text));
        }
    }
    findings
}

fn analyze_block(
    ctx: &LintContext<'_>,
    block: &BlockRegion,
    offset: u32,
    text: &str,
) -> Vec<SensitivityFinding> {
    let language = ctx.language;
    let tokens = tokenize(text, language);
    let processes = if language.is_verilog() {
        verilog_processes(&tokens)
    } else {
        vhdl_processes(&tokens)
    };
    let key = |name: &str| {
        if language.is_verilog() {
            name.to_string()
        } else {
            name.to_lowercase()
        }
    };

    let mut findings = Vec::new();
    for process in processes {
        let listed: HashSet<&str> = tokens[process.open + 1..process.close]
            .iter()
            .filter(|t| t.is_identifier())
            .map(|t| t.text.as_str())
            .collect();
        let reads = body_reads(&tokens, &process.body, language);
        let (open, close) = (&tokens[process.open], &tokens[process.close]);
        let list = text[open.start..close.end]
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        let line = block.first_line + open.line;
        let span = Span::new(ctx.file, offset + open.start as u32, offset + close.end as u32);
        trace!(line, list = list.as_str(); "checking sensitivity list");

        for signal in ctx.readable {
            let name = key(signal);
            let mismatch = match (listed.contains(name.as_str()), reads.contains(name.as_str())) {
                (false, true) => Mismatch::Missing,
                (true, false) => Mismatch::NotNeeded,
                _ => continue,
            };
            findings.push(SensitivityFinding {
                signal: signal.clone(),
                mismatch,
                list: list.clone(),
                line,
                span,
            });
        }
    }
    findings
}

fn vhdl_processes(tokens: &[Token]) -> Vec<Process> {
    let mut processes = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let starts_process =
            tokens[i].text == "process" && (i == 0 || tokens[i - 1].text != "end");
        if !starts_process {
            i += 1;
            continue;
        }
        let Some(end) = (i + 1..tokens.len().saturating_sub(1))
            .find(|&j| tokens[j].text == "end" && tokens[j + 1].text == "process")
        else {
            break;
        };
        let close = tokens
            .get(i + 1)
            .filter(|t| t.text == "(")
            .and_then(|_| matching(tokens, i + 1, "(", ")"))
            .filter(|&close| close < end);
        if let Some(close) = close {
            let body = close + 1..end;
            let all = tokens[i + 2..close].iter().any(|t| t.text == "all");
            let clocked = tokens[body.clone()]
                .iter()
                .any(|t| t.text == "rising_edge" || t.text == "falling_edge")
                || tokens[body.clone()]
                    .windows(2)
                    .any(|w| w[0].text == "'" && w[1].text == "event");
            if !all && !clocked {
                processes.push(Process {
                    open: i + 1,
                    close,
                    body,
                });
            }
        }
        i = end + 2;
    }
    processes
}

fn verilog_processes(tokens: &[Token]) -> Vec<Process> {
    let mut processes = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let listed = tokens[i].text == "always"
            && tokens.get(i + 1).is_some_and(|t| t.text == "@")
            && tokens.get(i + 2).is_some_and(|t| t.text == "(");
        if !listed {
            i += 1;
            continue;
        }
        let Some(close) = matching(tokens, i + 2, "(", ")") else {
            break;
        };
        let Some(end) = statement_end(tokens, close + 1) else {
            break;
        };
        let combinational = !tokens[i + 3..close]
            .iter()
            .any(|t| t.text == "*" || t.text == "posedge" || t.text == "negedge");
        if combinational {
            processes.push(Process {
                open: i + 2,
                close,
                body: close + 1..end,
            });
        }
        i = end;
    }
    processes
}

/// Index one past the Verilog statement starting at `i`.
fn statement_end(tokens: &[Token], i: usize) -> Option<usize> {
    match tokens.get(i)?.text.as_str() {
        "begin" => matching(tokens, i, "begin", "end").map(|e| e + 1),
        "case" | "casex" | "casez" => {
            let mut depth = 0usize;
            for (j, token) in tokens.iter().enumerate().skip(i) {
                match token.text.as_str() {
                    "case" | "casex" | "casez" => depth += 1,
                    "endcase" => {
                        depth -= 1;
                        if depth == 0 {
                            return Some(j + 1);
                        }
                    }
                    _ => {}
                }
            }
            None
        }
        "if" => {
            let close = matching(tokens, i + 1, "(", ")")?;
            let end = statement_end(tokens, close + 1)?;
            if tokens.get(end).is_some_and(|t| t.text == "else") {
                statement_end(tokens, end + 1)
            } else {
                Some(end)
            }
        }
        _ => tokens[i..]
            .iter()
            .position(|t| t.text == ";")
            .map(|p| i + p + 1),
    }
}

/// Index of the token opening the group closed at `close`.
fn matching_back(
    tokens: &[Token],
    close: usize,
    open_text: &str,
    close_text: &str,
) -> Option<usize> {
    let mut depth = 0usize;
    for j in (0..=close).rev() {
        if tokens[j].text == close_text {
            depth += 1;
        } else if tokens[j].text == open_text {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(j);
            }
        }
    }
    None
}

/// The identifier assigned by the operator at `op`, if it starts a statement.
fn assignment_target(tokens: &[Token], body: &Range<usize>, op: usize) -> Option<usize> {
    let mut k = op.checked_sub(1)?;
    loop {
        if k < body.start {
            return None;
        }
        match tokens[k].text.as_str() {
            ")" => k = matching_back(tokens, k, "(", ")")?.checked_sub(1)?,
            "]" => k = matching_back(tokens, k, "[", "]")?.checked_sub(1)?,
            _ if tokens[k].is_identifier() && k > body.start && tokens[k - 1].text == "." => {
                k = k.checked_sub(2)?;
            }
            _ => break,
        }
    }
    if !tokens[k].is_identifier() {
        return None;
    }
    let starts_statement =
        k == body.start || STATEMENT_STARTS.contains(&tokens[k - 1].text.as_str());
    starts_statement.then_some(k)
}

/// Identifiers read in a process body, assignment targets excluded.
fn body_reads<'t>(
    tokens: &'t [Token],
    body: &Range<usize>,
    language: Language,
) -> HashSet<&'t str> {
    let targets: HashSet<usize> = body
        .clone()
        .filter(|&j| {
            let op = tokens[j].text.as_str();
            op == "<=" || (language.is_verilog() && op == "=")
        })
        .filter_map(|j| assignment_target(tokens, body, j))
        .collect();
    body.clone()
        .filter(|j| !targets.contains(j))
        .filter(|&j| tokens[j].is_identifier())
        .filter(|&j| j == 0 || (tokens[j - 1].text != "." && tokens[j - 1].text != "'"))
        .map(|j| tokens[j].text.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use schem_source::SourceDb;

    fn findings(language: Language, text: &str, readable: &[&str]) -> Vec<(String, Mismatch)> {
        let mut db = SourceDb::new();
        let file = db.add_source("top.vhd", text.to_string());
        let readable: Vec<String> = readable.iter().map(|s| s.to_string()).collect();
        let blocks = [BlockRegion {
            first_line: 1,
            line_count: text.lines().count() as u32,
        }];
        let ctx = LintContext {
            sources: &db,
            file,
            module: "top",
            language,
            readable: &readable,
            blocks: &blocks,
        };
        analyze(&ctx)
            .into_iter()
            .map(|f| (f.signal, f.mismatch))
            .collect()
    }

    #[test]
    fn vhdl_missing_and_superfluous() {
        let text = "p_mux: process (sel, a, unused)\nbegin\n    if sel = '1' then\n        y <= a;\n    else\n        y <= b;\n    end if;\nend process;";
        assert_eq!(
            findings(Language::Vhdl, text, &["a", "b", "sel", "unused", "y"]),
            vec![
                ("b".to_string(), Mismatch::Missing),
                ("unused".to_string(), Mismatch::NotNeeded),
            ]
        );
    }

    #[test]
    fn vhdl_is_case_insensitive() {
        let text = "process (A)\nbegin\n    Y <= a and B;\nend process;";
        assert_eq!(
            findings(Language::Vhdl, text, &["A", "B", "Y"]),
            vec![("B".to_string(), Mismatch::Missing)]
        );
    }

    #[test]
    fn vhdl_clocked_and_all_are_skipped() {
        let clocked = "process (clk)\nbegin\n    if rising_edge(clk) then\n        q <= d;\n    end if;\nend process;";
        assert!(findings(Language::Vhdl, clocked, &["clk", "d", "q"]).is_empty());
        let event = "process (clk)\nbegin\n    if clk'event and clk = '1' then\n        q <= d;\n    end if;\nend process;";
        assert!(findings(Language::Vhdl, event, &["clk", "d", "q"]).is_empty());
        let all = "process (all)\nbegin\n    y <= a;\nend process;";
        assert!(findings(Language::Vhdl, all, &["a", "y"]).is_empty());
        let no_list = "process\nbegin\n    y <= a;\n    wait on a;\nend process;";
        assert!(findings(Language::Vhdl, no_list, &["a", "y"]).is_empty());
    }

    #[test]
    fn targets_with_index_and_record_slice_are_masked() {
        let text = "process (idx, d)\nbegin\n    mem(idx) <= d;\n    rec.field <= d;\nend process;";
        assert!(findings(Language::Vhdl, text, &["d", "idx", "mem", "rec"]).is_empty());
        let read_back = "process (d)\nbegin\n    y <= d;\n    z <= y;\nend process;";
        assert_eq!(
            findings(Language::Vhdl, read_back, &["d", "y", "z"]),
            vec![("y".to_string(), Mismatch::Missing)]
        );
    }

    #[test]
    fn comparison_is_not_a_target() {
        let text = "process (a)\nbegin\n    if a <= b then\n        y <= a;\n    end if;\nend process;";
        assert_eq!(
            findings(Language::Vhdl, text, &["a", "b", "y"]),
            vec![("b".to_string(), Mismatch::Missing)]
        );
    }

    #[test]
    fn verilog_always_blocks() {
        let text = "always @(a or b)\nbegin\n    y = a & c;\n    z[1] <= y;\nend";
        assert_eq!(
            findings(Language::Verilog, text, &["a", "b", "c", "y", "z"]),
            vec![
                ("b".to_string(), Mismatch::NotNeeded),
                ("c".to_string(), Mismatch::Missing),
                ("y".to_string(), Mismatch::Missing),
            ]
        );
        let single = "always @(a) if (s) y = a; else y = b;\nassign q = s;";
        assert_eq!(
            findings(Language::Verilog, single, &["a", "b", "q", "s", "y"]),
            vec![
                ("b".to_string(), Mismatch::Missing),
                ("s".to_string(), Mismatch::Missing),
            ]
        );
    }

    #[test]
    fn verilog_edges_and_star_are_skipped() {
        let clocked = "always @(posedge clk)\nbegin\n    q <= d;\nend";
        assert!(findings(Language::Verilog, clocked, &["clk", "d", "q"]).is_empty());
        let star = "always @(*) y = a;";
        assert!(findings(Language::Verilog, star, &["a", "y"]).is_empty());
        let case = "always @(s)\n    case (s)\n        1'b0: y = a;\n        default: y = 0;\n    endcase";
        assert_eq!(
            findings(Language::Verilog, case, &["a", "s", "y"]),
            vec![("a".to_string(), Mismatch::Missing)]
        );
    }

    #[test]
    fn message_text() {
        let finding = SensitivityFinding {
            signal: "b".to_string(),
            mismatch: Mismatch::Missing,
            list: "(sel, a)".to_string(),
            line: 12,
            span: Span::DUMMY,
        };
        assert_eq!(
            finding.message("mux", "mux.vhd"),
            "HDL Sensitivity  : Warning in module mux: The signal b is missing in the sensitivity-list (sel, a) in line 12 of file mux.vhd."
        );
    }
}
