// LogSieve - core/assembler.rs
//
// Brace-aware reconstruction of logical records from physical lines.
// Core layer: operates on in-memory lines, never touches the filesystem.
//
// A record ends at the first line where the running `{`/`}` balance is
// exactly zero. Lines without braces therefore form records on their own,
// while an embedded structured payload keeps the record open until its
// closing brace. Each source file gets a fresh assembler.

/// A completed logical record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledRecord {
    /// Trimmed physical lines concatenated without separators.
    pub text: String,

    /// 1-based number of the first physical line in the record.
    pub first_line: u64,
}

/// A buffer still open when the input ran out. Never emitted as a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unterminated {
    pub first_line: u64,
    pub depth: i64,
    pub len: usize,
}

/// Incremental assembler state for one source file.
#[derive(Debug, Default)]
pub struct RecordAssembler {
    buffer: String,
    /// Signed on purpose: a surplus of `}` drives it negative and is left
    /// uncorrected, which keeps the buffer open until balance returns to 0.
    depth: i64,
    first_line: u64,
    lines_seen: u64,
    went_negative: bool,
}

impl RecordAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one physical line. Returns a record when this line brings the
    /// brace balance back to zero with non-blank buffered text.
    pub fn push_line(&mut self, line: &str) -> Option<AssembledRecord> {
        self.lines_seen += 1;

        if self.buffer.is_empty() {
            self.first_line = self.lines_seen;
        }
        self.buffer.push_str(line.trim());

        let opens = line.matches('{').count() as i64;
        let closes = line.matches('}').count() as i64;
        self.depth += opens - closes;

        if self.depth < 0 && !self.went_negative {
            self.went_negative = true;
            tracing::debug!(
                line = self.lines_seen,
                depth = self.depth,
                "Brace depth went negative; record stays open until balance returns to zero"
            );
        }

        if self.depth == 0 && !self.buffer.trim().is_empty() {
            let text = std::mem::take(&mut self.buffer);
            return Some(AssembledRecord {
                text,
                first_line: self.first_line,
            });
        }

        None
    }

    /// Number of physical lines consumed so far.
    pub fn lines_seen(&self) -> u64 {
        self.lines_seen
    }

    /// The open buffer that would be discarded if the input ended now.
    pub fn unterminated(&self) -> Option<Unterminated> {
        if self.depth != 0 && !self.buffer.is_empty() {
            Some(Unterminated {
                first_line: self.first_line,
                depth: self.depth,
                len: self.buffer.len(),
            })
        } else {
            None
        }
    }
}

/// Lazy iterator adaptor: physical lines in, logical records out.
///
/// Created by [`assemble`]. After exhaustion, [`Assemble::unterminated`]
/// reports whether a trailing open buffer was dropped.
#[derive(Debug)]
pub struct Assemble<I> {
    lines: I,
    state: RecordAssembler,
}

impl<I> Assemble<I> {
    pub fn unterminated(&self) -> Option<Unterminated> {
        self.state.unterminated()
    }

    pub fn lines_seen(&self) -> u64 {
        self.state.lines_seen()
    }
}

impl<I, S> Iterator for Assemble<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = AssembledRecord;

    fn next(&mut self) -> Option<Self::Item> {
        for line in self.lines.by_ref() {
            if let Some(record) = self.state.push_line(line.as_ref()) {
                return Some(record);
            }
        }
        None
    }
}

/// Assemble the lines of one source file into logical records.
pub fn assemble<I, S>(lines: I) -> Assemble<I::IntoIter>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Assemble {
        lines: lines.into_iter(),
        state: RecordAssembler::new(),
    }
}

/// Split text into physical lines on `\r\n`, `\n` or a lone `\r`.
///
/// Terminators are not included, and a trailing terminator does not
/// produce an empty final line.
pub fn physical_lines(text: &str) -> PhysicalLines<'_> {
    PhysicalLines { rest: text }
}

/// Iterator returned by [`physical_lines`].
#[derive(Debug, Clone)]
pub struct PhysicalLines<'a> {
    rest: &'a str,
}

impl<'a> Iterator for PhysicalLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }

        match self.rest.find(|c| c == '\r' || c == '\n') {
            Some(idx) => {
                let line = &self.rest[..idx];
                let skip = if self.rest[idx..].starts_with("\r\n") { 2 } else { 1 };
                self.rest = &self.rest[idx + skip..];
                Some(line)
            }
            None => {
                let line = self.rest;
                self.rest = "";
                Some(line)
            }
        }
    }
}
