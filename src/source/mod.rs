//! Character streams feeding the lexer.
//!
//! A [`Source`] yields one character at a time and keeps track of the current
//! line, column, and byte offset. Past the end of the input it produces the
//! [`ETX`] sentinel forever. Two flavours exist: an in-memory stream built
//! from a string, and a lazy file-backed stream reading chunk by chunk.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use log::warn;

/// Sentinel character produced past end-of-input.
pub const ETX: char = '\u{0003}';

const FILE_CHUNK_SIZE: usize = 4096;

pub struct Source {
    chars: Box<dyn Iterator<Item = char>>,
    current_char: char,
    line: usize,
    column: usize,
    offset: usize,
}

impl Source {
    fn new(mut chars: Box<dyn Iterator<Item = char>>) -> Self {
        let current_char = chars.next().unwrap_or(ETX);

        Self {
            chars,
            current_char,
            // start indexing from 1, so positions read naturally
            line: 1,
            column: 1,
            offset: 0,
        }
    }

    pub fn from_string(text: &str) -> Self {
        Self::new(Box::new(text.chars().collect::<Vec<_>>().into_iter()))
    }

    pub fn from_file(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(Box::new(FileChars::new(file))))
    }

    pub fn current_char(&self) -> char {
        self.current_char
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Steps to the next character. When a newline is observed, the line
    /// counter advances and the column resets, so the first character of the
    /// new line ends up at column 1. Past end-of-input the current character
    /// stays [`ETX`].
    pub fn advance(&mut self) {
        let Some(next) = self.chars.next() else {
            self.current_char = ETX;
            return;
        };

        self.current_char = next;
        self.column += 1;
        self.offset += 1;

        if next == '\n' {
            self.line += 1;
            self.column = 0;
        }
    }
}

/// Lazily decoded character stream over a file, read in fixed-size chunks.
/// The file handle lives as long as the iterator and is released on drop.
struct FileChars {
    reader: BufReader<File>,
    decoded: VecDeque<char>,
    carry: Vec<u8>,
    done: bool,
}

impl FileChars {
    fn new(file: File) -> Self {
        Self {
            reader: BufReader::new(file),
            decoded: VecDeque::new(),
            carry: Vec::new(),
            done: false,
        }
    }

    fn refill(&mut self) {
        while self.decoded.is_empty() && !self.done {
            let mut buf = [0u8; FILE_CHUNK_SIZE];
            let read = match self.reader.read(&mut buf) {
                Ok(read) => read,
                Err(error) => {
                    warn!("failed to read source file: {error}");
                    0
                }
            };

            if read == 0 {
                self.done = true;
                if !self.carry.is_empty() {
                    warn!("source file ends with an incomplete UTF-8 sequence");
                    self.carry.clear();
                }
                return;
            }

            self.carry.extend_from_slice(&buf[..read]);
            self.decode_carry();
        }
    }

    fn decode_carry(&mut self) {
        loop {
            match std::str::from_utf8(&self.carry) {
                Ok(text) => {
                    let chars = text.chars().collect::<Vec<_>>();
                    self.decoded.extend(chars);
                    self.carry.clear();
                    return;
                }
                Err(error) => {
                    let valid_up_to = error.valid_up_to();
                    let text = String::from_utf8_lossy(&self.carry[..valid_up_to]).into_owned();
                    self.decoded.extend(text.chars());

                    match error.error_len() {
                        Some(invalid) => {
                            warn!("skipping invalid UTF-8 in source file");
                            self.decoded.push_back(char::REPLACEMENT_CHARACTER);
                            self.carry.drain(..valid_up_to + invalid);
                        }
                        None => {
                            // incomplete trailing sequence, wait for the next chunk
                            self.carry.drain(..valid_up_to);
                            return;
                        }
                    }
                }
            }
        }
    }
}

impl Iterator for FileChars {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        if self.decoded.is_empty() && !self.done {
            self.refill();
        }

        self.decoded.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_source_is_etx() {
        let source = Source::from_string("");
        assert_eq!(source.current_char(), ETX);
    }

    #[test]
    fn test_advance_past_end_stays_etx() {
        let mut source = Source::from_string("a");
        assert_eq!(source.current_char(), 'a');

        source.advance();
        assert_eq!(source.current_char(), ETX);

        source.advance();
        assert_eq!(source.current_char(), ETX);
    }

    #[test]
    fn test_position_tracking() {
        let mut source = Source::from_string("a\nb");
        assert_eq!((source.line(), source.column(), source.offset()), (1, 1, 0));

        source.advance();
        assert_eq!(source.current_char(), '\n');
        assert_eq!((source.line(), source.column(), source.offset()), (2, 0, 1));

        source.advance();
        assert_eq!(source.current_char(), 'b');
        assert_eq!((source.line(), source.column(), source.offset()), (2, 1, 2));
    }

    #[test]
    fn test_offset_is_monotonic() {
        let mut source = Source::from_string("let x = 1;");
        let mut previous = source.offset();

        while source.current_char() != ETX {
            source.advance();
            assert!(source.offset() >= previous);
            previous = source.offset();
        }
    }
}
