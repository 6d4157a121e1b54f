//! What a lint pass gets to see of one generated file.

use schem_common::Language;
use schem_source::{FileId, SourceDb, SourceFile};

/// Lines of a generated file that hold the text of one schematic block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockRegion {
    /// 1-based first line.
    pub first_line: u32,
    /// Number of lines.
    pub line_count: u32,
}

/// A generated file plus the design facts the rules check it against.
#[derive(Clone, Copy)]
pub struct LintContext<'a> {
    /// Database holding the generated text.
    pub sources: &'a SourceDb,
    /// The file under inspection.
    pub file: FileId,
    /// Module or entity name, used in messages.
    pub module: &'a str,
    /// Language of the file.
    pub language: Language,
    /// Names of the signals a process may read: inputs, inouts and internal signals.
    pub readable: &'a [String],
    /// Where the block texts landed in the file.
    pub blocks: &'a [BlockRegion],
}

impl<'a> LintContext<'a> {
    /// The inspected file.
    pub fn source(&self) -> &'a SourceFile {
        self.sources.get_file(self.file)
    }

    /// The byte offset and text of a block, or `None` when the region
    /// falls outside the file.
    pub fn block_text(&self, block: &BlockRegion) -> Option<(u32, &'a str)> {
        let source = self.source();
        let (start, end) =
            source.line_range(block.first_line as usize, block.line_count as usize)?;
        Some((start, source.snippet(start, end)))
    }
}
