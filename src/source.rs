//! Character sources feeding the scanner.
//!
//! The scanner only needs "pull the next character", the position of the
//! character it just pulled, and the text of that character's line for
//! diagnostics.  [`CharSource`] captures exactly that; [`SourceBuffer`] is
//! the in-memory implementation used by the driver and the tests.

use std::fs;
use std::io;
use std::path::Path;

use log::info;
use memchr::memchr;

use crate::error::{CompileError, Result};

/// Pull-based character stream with position tracking.
pub trait CharSource {
    /// Next character, or `None` once the input is exhausted.
    fn next_char(&mut self) -> io::Result<Option<char>>;

    /// 1‑based line of the last character returned (or of end of file).
    fn line(&self) -> usize;

    /// 1‑based column of the last character returned (or of end of file).
    fn column(&self) -> usize;

    /// Text of the current line, without the line terminator.
    fn line_text(&self) -> String;
}

/// A whole compilation unit held in memory.
#[derive(Debug, Clone)]
pub struct SourceBuffer {
    text: String,
    pos: usize,             // byte offset of the next character
    line: usize,            // position of the last character handed out
    column: usize,
    line_start: usize,      // byte offset where `line` begins
    next_line: usize,       // position the next character will get
    next_column: usize,
    next_line_start: usize,
}

impl SourceBuffer {
    pub fn new<S: Into<String>>(text: S) -> Self {
        let text: String = text.into();

        info!("SourceBuffer created over {} bytes", text.len());

        Self {
            text,
            pos: 0,
            line: 1,
            column: 0,
            line_start: 0,
            next_line: 1,
            next_column: 1,
            next_line_start: 0,
        }
    }

    /// Read a whole file, telling a missing file apart from other I/O errors.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        info!("Reading file: {:?}", path);

        let bytes = fs::read(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => CompileError::FileNotFound(path.to_path_buf()),
            _ => CompileError::Io(e),
        })?;

        Ok(Self::new(String::from_utf8(bytes)?))
    }
}

impl CharSource for SourceBuffer {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        self.line = self.next_line;
        self.column = self.next_column;
        self.line_start = self.next_line_start;

        let Some(c) = self.text[self.pos..].chars().next() else {
            return Ok(None);
        };

        self.pos += c.len_utf8();

        if c == '\n' {
            self.next_line += 1;
            self.next_column = 1;
            self.next_line_start = self.pos;
        } else {
            self.next_column += 1;
        }

        Ok(Some(c))
    }

    #[inline(always)]
    fn line(&self) -> usize {
        self.line
    }

    #[inline(always)]
    fn column(&self) -> usize {
        self.column
    }

    fn line_text(&self) -> String {
        let rest = &self.text.as_bytes()[self.line_start..];
        let end = memchr(b'\n', rest).unwrap_or(rest.len());

        // `line_start` always sits on a char boundary, and so does a '\n'.
        let line = &self.text[self.line_start..self.line_start + end];

        line.strip_suffix('\r').unwrap_or(line).to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(buffer: &mut SourceBuffer) -> Vec<(char, usize, usize)> {
        let mut out = Vec::new();

        while let Some(c) = buffer.next_char().unwrap() {
            out.push((c, buffer.line(), buffer.column()));
        }

        out
    }

    #[test]
    fn positions_follow_newlines() {
        let mut buffer = SourceBuffer::new("ab\nc");

        assert_eq!(
            drain(&mut buffer),
            vec![('a', 1, 1), ('b', 1, 2), ('\n', 1, 3), ('c', 2, 1)]
        );
        assert_eq!((buffer.line(), buffer.column()), (2, 2));
    }

    #[test]
    fn line_text_is_the_line_of_the_last_char() {
        let mut buffer = SourceBuffer::new("first\r\nsecond line\n");

        buffer.next_char().unwrap();
        assert_eq!(buffer.line_text(), "first");

        for _ in 0..7 {
            buffer.next_char().unwrap();
        }
        assert_eq!(buffer.line(), 2);
        assert_eq!(buffer.line_text(), "second line");
    }

    #[test]
    fn missing_file_is_reported_as_not_found() {
        let err = SourceBuffer::from_path("definitely/not/here.java").unwrap_err();

        assert!(matches!(err, CompileError::FileNotFound(_)));
    }
}
