//! Line-tracking text writer used by all emitters.

use crate::links::{LinkEntry, LinkKind, LinkObject};

const INDENT: &str = "    ";

/// Accumulates the text of one generated file together with its link entries.
///
/// The writer's current line always equals the number of newlines written
/// plus one, so an entry recorded before a line is written carries exactly
/// the line number the text ends up on.
#[derive(Debug)]
pub struct SourceWriter {
    file: String,
    text: String,
    line: u32,
    indent: usize,
    links: Vec<LinkEntry>,
}

impl SourceWriter {
    /// Creates a writer for the file `file`.
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            text: String::new(),
            line: 1,
            indent: 0,
            links: Vec::new(),
        }
    }

    /// The 1-based line the next written text lands on.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// The file name entries are recorded for.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Current indentation level.
    pub fn indent_level(&self) -> usize {
        self.indent
    }

    /// Increases the indentation by one level.
    pub fn indent(&mut self) {
        self.indent += 1;
    }

    /// Decreases the indentation by one level.
    pub fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// Writes `text` at the current indentation, one line per `\n`-separated part.
    pub fn line_text(&mut self, text: &str) {
        for part in text.split('\n') {
            self.write_line(part);
        }
    }

    fn write_line(&mut self, text: &str) {
        if !text.is_empty() {
            for _ in 0..self.indent {
                self.text.push_str(INDENT);
            }
            self.text.push_str(text);
        }
        self.text.push('\n');
        self.line += 1;
    }

    /// Writes an empty line.
    pub fn blank(&mut self) {
        self.write_line("");
    }

    /// Records a link for every line of `text`, then writes it.
    ///
    /// Lines after the first continue the sub-line count from `sub_line`.
    pub fn linked(&mut self, kind: LinkKind, object: &LinkObject, sub_line: u32, text: &str) {
        for (i, part) in text.split('\n').enumerate() {
            self.links.push(LinkEntry {
                file: self.file.clone(),
                line: self.line,
                kind,
                object: object.clone(),
                sub_line: sub_line + i as u32,
            });
            self.write_line(part);
        }
    }

    /// Writes every line of `lines`, linking each with an incrementing sub-line.
    pub fn linked_lines<S: AsRef<str>>(
        &mut self,
        kind: LinkKind,
        object: &LinkObject,
        lines: &[S],
    ) {
        for (i, line) in lines.iter().enumerate() {
            self.linked(kind, object, i as u32, line.as_ref());
        }
    }

    /// Consumes the writer, returning the text and its link entries.
    pub fn finish(self) -> (String, Vec<LinkEntry>) {
        (self.text, self.links)
    }
}

/// Removes the common leading whitespace of all non-blank lines.
///
/// Blank lines are kept as empty lines; trailing blank lines are dropped.
pub fn dedent_lines(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    let common = lines
        .iter()
        .filter(|l| !l.is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);
    let mut out: Vec<String> = lines
        .iter()
        .map(|l| l.get(common..).unwrap_or_else(|| l.trim_start()).to_string())
        .collect();
    while out.last().is_some_and(String::is_empty) {
        out.pop();
    }
    while out.first().is_some_and(String::is_empty) {
        out.remove(0);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_counter_tracks_newlines() {
        let mut w = SourceWriter::new("top.vhd");
        assert_eq!(w.line(), 1);
        w.line_text("entity top is");
        w.indent();
        w.linked(LinkKind::Entity, &LinkObject::Design, 0, "port (");
        w.dedent();
        w.blank();
        assert_eq!(w.line(), 4);
        let (text, links) = w.finish();
        assert_eq!(text, "entity top is\n    port (\n\n");
        assert_eq!(text.matches('\n').count() + 1, 4);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].line, 2);
        assert_eq!(links[0].file, "top.vhd");
    }

    #[test]
    fn linked_lines_number_sub_lines() {
        let mut w = SourceWriter::new("m.v");
        w.linked_lines(LinkKind::Block, &LinkObject::Design, &["a", "b", "c"]);
        let (_, links) = w.finish();
        let subs: Vec<u32> = links.iter().map(|l| l.sub_line).collect();
        assert_eq!(subs, vec![0, 1, 2]);
        assert_eq!(links[2].line, 3);
    }

    #[test]
    fn embedded_newlines_advance_the_line_counter() {
        let mut w = SourceWriter::new("top.vhd");
        w.indent();
        w.line_text("a\nb");
        w.linked(LinkKind::Generate, &LinkObject::Design, 3, "g: for i in 0 to 3\ngenerate");
        assert_eq!(w.line(), 5);
        let (text, links) = w.finish();
        assert_eq!(text, "    a\n    b\n    g: for i in 0 to 3\n    generate\n");
        let placed: Vec<(u32, u32)> = links.iter().map(|l| (l.line, l.sub_line)).collect();
        assert_eq!(placed, vec![(3, 3), (4, 4)]);
    }

    #[test]
    fn dedent_keeps_relative_indentation() {
        let text = "\n    if a then\n        b <= c;\n\n    end if;\n\n";
        assert_eq!(
            dedent_lines(text),
            vec!["if a then", "    b <= c;", "", "end if;"]
        );
    }

    #[test]
    fn dedent_of_blank_input() {
        assert!(dedent_lines("   \n").is_empty());
        assert_eq!(dedent_lines("x <= y;"), vec!["x <= y;"]);
    }
}
