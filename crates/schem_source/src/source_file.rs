//! A registered text file with line-start indexing.

use crate::file_id::FileId;

/// A text file registered in the [`SourceDb`](crate::SourceDb).
///
/// Stores the content with precomputed line-start offsets so byte offsets
/// resolve to lines in `O(log n)` and whole lines can be sliced directly.
#[derive(Debug)]
pub struct SourceFile {
    /// The identifier of this file within the [`SourceDb`](crate::SourceDb).
    pub id: FileId,
    /// The name the file was registered under (e.g. `counter_struct.vhd`).
    pub name: String,
    /// The full text content of the file.
    pub content: String,
    /// Byte offsets of each line start (the first entry is always 0).
    line_starts: Vec<u32>,
}

impl SourceFile {
    /// Creates a new `SourceFile` with precomputed line starts.
    pub fn new(id: FileId, name: String, content: String) -> Self {
        let line_starts = compute_line_starts(&content);
        Self {
            id,
            name,
            content,
            line_starts,
        }
    }

    /// Converts a byte offset into 1-indexed (line, column) coordinates.
    pub fn line_col(&self, byte_offset: u32) -> (u32, u32) {
        let line_idx = match self.line_starts.binary_search(&byte_offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line = (line_idx as u32) + 1;
        let col = byte_offset - self.line_starts[line_idx] + 1;
        (line, col)
    }

    /// Returns the number of lines (a trailing newline opens an empty last line).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Returns the byte range `[start, end)` covering `count` lines starting
    /// at the 1-indexed `first_line`, or `None` if the range leaves the file.
    ///
    /// The range excludes the newline that terminates the last line.
    pub fn line_range(&self, first_line: usize, count: usize) -> Option<(u32, u32)> {
        if first_line == 0 || count == 0 {
            return None;
        }
        let first_idx = first_line - 1;
        let last_idx = first_idx + count - 1;
        if last_idx >= self.line_starts.len() {
            return None;
        }
        let start = self.line_starts[first_idx];
        let end = match self.line_starts.get(last_idx + 1) {
            Some(next) => next - 1,
            None => self.content.len() as u32,
        };
        Some((start, end))
    }

    /// Returns a substring of the file content between byte offsets.
    pub fn snippet(&self, start: u32, end: u32) -> &str {
        &self.content[start as usize..end as usize]
    }
}

/// Computes the byte offsets of each line start in the given content.
fn compute_line_starts(content: &str) -> Vec<u32> {
    let mut starts = vec![0u32];
    for (i, byte) in content.bytes().enumerate() {
        if byte == b'\n' {
            starts.push((i + 1) as u32);
        }
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_file(content: &str) -> SourceFile {
        SourceFile::new(
            FileId::from_raw(0),
            "test.vhd".to_string(),
            content.to_string(),
        )
    }

    #[test]
    fn line_col_resolution() {
        let f = make_file("abc\ndef\nghi");
        assert_eq!(f.line_starts, vec![0, 4, 8]);
        assert_eq!(f.line_col(0), (1, 1));
        assert_eq!(f.line_col(5), (2, 2));
        assert_eq!(f.line_col(8), (3, 1));
    }

    #[test]
    fn line_range_slices_whole_lines() {
        let f = make_file("abc\ndef\nghi\n");
        let (start, end) = f.line_range(2, 2).unwrap();
        assert_eq!(f.snippet(start, end), "def\nghi");
        let (start, end) = f.line_range(1, 1).unwrap();
        assert_eq!(f.snippet(start, end), "abc");
        assert!(f.line_range(4, 2).is_none());
        assert!(f.line_range(0, 1).is_none());
    }

    #[test]
    fn trailing_newline_counts_empty_line() {
        assert_eq!(make_file("a\nb\n").line_count(), 3);
        assert_eq!(make_file("").line_count(), 1);
    }
}
