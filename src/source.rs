/// Line-addressed view over source text.
///
/// Lines are split on `\n` only, so a `\r` before the newline stays part of
/// the line and columns match the byte offsets reported by the parser.

pub struct SourceLines<'a> {
    lines: Vec<&'a str>,
}

impl<'a> SourceLines<'a> {
    pub fn new(source: &'a str) -> Self {
        let lines = source
            .split_inclusive('\n')
            .map(|l| l.strip_suffix('\n').unwrap_or(l))
            .collect();
        SourceLines { lines }
    }

    /// 1-based line lookup.
    pub fn get(&self, line: usize) -> Option<&'a str> {
        line.checked_sub(1).and_then(|idx| self.lines.get(idx).copied())
    }

    /// Iterate as `(line_number, text)` pairs, numbering from 1.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &'a str)> + '_ {
        self.lines.iter().enumerate().map(|(idx, l)| (idx + 1, *l))
    }
}

/// Slice `line` up to a 1-based column, tolerating columns past the end.
pub fn before_column(line: &str, column: usize) -> &str {
    let end = column.saturating_sub(1).min(line.len());
    line.get(..end).unwrap_or(line)
}

/// The leading whitespace of a line.
pub fn leading_whitespace(line: &str) -> &str {
    let trimmed = line.trim_start();
    &line[..line.len() - trimmed.len()]
}
