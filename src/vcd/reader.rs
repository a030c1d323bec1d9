// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use std::io;
use std::io::prelude::*;

use super::error::{Diagnostic, Location};

/// Splits a byte stream into whitespace separated words, remembering where
/// each word started. Bytes are pulled from the buffer a chunk at a time, so
/// only the current word is ever held, however long its line is.
pub(super) struct WordReader<R: Read> {
    reader: io::BufReader<R>,
    // where the next unread character sits
    next: Location,
    word: String,
}

impl<R: Read> WordReader<R> {
    pub(super) fn new(reader: R) -> WordReader<R> {
        WordReader {
            reader: io::BufReader::new(reader),
            next: Location::new(1, 1),
            word: String::new(),
        }
    }

    /// Where the next word would start, or the end of input once reached.
    pub(super) fn location(&self) -> Location {
        self.next
    }

    /// Consumes bytes while `keep` holds for them, copying them to `out` if
    /// given. Stops at the first other byte or at end of input.
    fn take_bytes(
        &mut self,
        keep: fn(u8) -> bool,
        mut out: Option<&mut Vec<u8>>,
    ) -> Result<(), Diagnostic> {
        loop {
            let buf = match self.reader.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    let err = format!("failed to read line {}: {e}", self.next.line);
                    return Err(Diagnostic::io(err));
                }
            };
            if buf.is_empty() {
                return Ok(());
            }

            let len = buf.iter().position(|byte| !keep(*byte)).unwrap_or(buf.len());
            let done = len < buf.len();
            advance(&mut self.next, &buf[..len]);
            if let Some(out) = out.as_deref_mut() {
                out.extend_from_slice(&buf[..len]);
            }
            self.reader.consume(len);

            if done {
                return Ok(());
            }
        }
    }

    pub(super) fn next_word(&mut self) -> Result<Option<(&str, Location)>, Diagnostic> {
        self.take_bytes(is_space, None)?;
        let location = self.next;

        // reuse the last word's allocation
        let mut bytes = std::mem::take(&mut self.word).into_bytes();
        bytes.clear();
        self.take_bytes(is_word, Some(&mut bytes))?;
        if bytes.is_empty() {
            return Ok(None);
        }

        self.word = decode(bytes, location)?;
        Ok(Some((self.word.as_str(), location)))
    }

    /// Collects the raw text up to the next `$end`, which is consumed.
    /// Line breaks and spacing inside the body are kept; only the
    /// surrounding whitespace is trimmed.
    pub(super) fn text_until_end(
        &mut self,
        opened_at: Location,
        command: &str,
    ) -> Result<String, Diagnostic> {
        let mut text = vec![];
        let mut gap = vec![];
        let mut word = vec![];

        loop {
            gap.clear();
            word.clear();
            self.take_bytes(is_space, Some(&mut gap))?;
            self.take_bytes(is_word, Some(&mut word))?;

            if word.is_empty() {
                let err = format!(
                    "unterminated `{command}` command: reached end of input before `$end`"
                );
                return Err(Diagnostic::lexical(opened_at, err));
            }
            if word == b"$end" {
                break;
            }
            text.extend_from_slice(&gap);
            text.extend_from_slice(&word);
        }

        let text = decode(text, opened_at)?;
        Ok(text.trim().to_string())
    }
}

fn decode(bytes: Vec<u8>, location: Location) -> Result<String, Diagnostic> {
    String::from_utf8(bytes).map_err(|_| {
        Diagnostic::io(format!(
            "failed to read text at {location}: stream did not contain valid UTF-8"
        ))
    })
}

fn is_space(byte: u8) -> bool {
    byte.is_ascii_whitespace()
}

fn is_word(byte: u8) -> bool {
    !byte.is_ascii_whitespace()
}

// Columns count characters, so UTF-8 continuation bytes do not move them.
fn advance(location: &mut Location, bytes: &[u8]) {
    for &byte in bytes {
        if byte == b'\n' {
            location.line += 1;
            location.column = 1;
        } else if byte & 0xC0 != 0x80 {
            location.column += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(src: &str) -> Vec<(String, Location)> {
        let mut reader = WordReader::new(src.as_bytes());
        let mut words = vec![];
        while let Some((word, location)) = reader.next_word().unwrap() {
            words.push((word.to_string(), location));
        }
        words
    }

    #[test]
    fn words_carry_line_and_column() {
        let found = words("$scope module top $end\n\n   #10\n\t1!");
        let expected = [
            ("$scope", 1, 1),
            ("module", 1, 8),
            ("top", 1, 15),
            ("$end", 1, 19),
            ("#10", 3, 4),
            ("1!", 4, 2),
        ];
        assert_eq!(found.len(), expected.len());
        for ((word, location), (exp_word, line, column)) in found.iter().zip(expected) {
            assert_eq!(word, exp_word);
            assert_eq!(*location, Location::new(line, column));
        }
    }

    #[test]
    fn empty_stream_has_no_words() {
        assert!(words("").is_empty());
        assert!(words(" \n\t\n").is_empty());
    }

    #[test]
    fn body_text_is_kept_verbatim() {
        let mut reader = WordReader::new("$comment  first line\n  second $ending $end #0".as_bytes());
        let (_, opened_at) = reader.next_word().unwrap().unwrap();
        let body = reader.text_until_end(opened_at, "$comment").unwrap();
        assert_eq!(body, "first line\n  second $ending");

        let (next, _) = reader.next_word().unwrap().unwrap();
        assert_eq!(next, "#0");
    }

    #[test]
    fn end_right_after_command() {
        let mut reader = WordReader::new("$comment $end".as_bytes());
        let (_, opened_at) = reader.next_word().unwrap().unwrap();
        assert_eq!(reader.text_until_end(opened_at, "$comment").unwrap(), "");
        assert!(reader.next_word().unwrap().is_none());
    }

    #[test]
    fn unterminated_body() {
        let mut reader = WordReader::new("$comment never closed\n".as_bytes());
        let (_, opened_at) = reader.next_word().unwrap().unwrap();
        let err = reader.text_until_end(opened_at, "$comment").unwrap_err();
        assert_eq!(err.location(), Some(Location::new(1, 1)));
        assert!(err.message().contains("unterminated `$comment`"));
    }

    #[test]
    fn invalid_utf8_is_an_io_error() {
        let bytes: &[u8] = b"$var \xff\xfe $end";
        let mut reader = WordReader::new(bytes);
        assert_eq!(reader.next_word().unwrap().unwrap().0, "$var");
        let err = reader.next_word().unwrap_err();
        assert!(matches!(err, Diagnostic::Io { .. }));
        assert!(err.message().contains("1.6"));

        let mut reader = WordReader::new(&b"$date \xff\xfe $end"[..]);
        let (_, opened_at) = reader.next_word().unwrap().unwrap();
        let err = reader.text_until_end(opened_at, "$date").unwrap_err();
        assert!(matches!(err, Diagnostic::Io { .. }));
    }

    #[test]
    fn columns_count_characters() {
        let mut reader = WordReader::new("$comment d\u{e9}j\u{e0} vu $end x\n\u{3bb} y".as_bytes());
        let (_, opened_at) = reader.next_word().unwrap().unwrap();
        assert_eq!(reader.text_until_end(opened_at, "$comment").unwrap(), "d\u{e9}j\u{e0} vu");
        assert_eq!(reader.next_word().unwrap(), Some(("x", Location::new(1, 23))));
        assert_eq!(reader.next_word().unwrap(), Some(("\u{3bb}", Location::new(2, 1))));
        assert_eq!(reader.next_word().unwrap(), Some(("y", Location::new(2, 3))));
    }

    #[test]
    fn words_span_buffer_refills() {
        // BufReader hands out 8 KiB at a time
        let long = "a".repeat(20_000);
        let src = format!("{long} \u{e9}{long} $end");
        let found = words(&src);
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].0.len(), 20_000);
        assert_eq!(found[1].0.chars().count(), 20_001);
        assert_eq!(found[2], ("$end".to_string(), Location::new(1, 40_004)));
    }
}
