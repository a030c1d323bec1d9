// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

//! Tokenizer for VCD text.
//!
//! The scanner starts in header mode, where the input is a sequence of
//! `$command ... $end` declarations. Once it has handed out
//! `$enddefinitions` followed by `$end` it switches, for good, to value
//! change mode, where every word is a timestamp, a value change or a dump
//! control command.
use std::fmt;
use std::io::Read;

use tracing::trace;

use super::error::{Diagnostic, Location};
use super::reader::WordReader;
use super::signal::{Bit, Value};
use super::utilities::{parse_bit_string, BitStringErr};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(super) enum Mode {
    Header,
    ValueChange,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(super) enum Command {
    Timescale,
    Scope,
    Var,
    Upscope,
    EndDefinitions,
    DumpVars,
    DumpAll,
    DumpOn,
    DumpOff,
}

impl Command {
    fn from_keyword(word: &str) -> Option<Command> {
        let command = match word {
            "$timescale" => Command::Timescale,
            "$scope" => Command::Scope,
            "$var" => Command::Var,
            "$upscope" => Command::Upscope,
            "$enddefinitions" => Command::EndDefinitions,
            "$dumpvars" => Command::DumpVars,
            "$dumpall" => Command::DumpAll,
            "$dumpon" => Command::DumpOn,
            "$dumpoff" => Command::DumpOff,
            _ => return None,
        };
        Some(command)
    }

    pub(super) fn keyword(&self) -> &'static str {
        match self {
            Command::Timescale => "$timescale",
            Command::Scope => "$scope",
            Command::Var => "$var",
            Command::Upscope => "$upscope",
            Command::EndDefinitions => "$enddefinitions",
            Command::DumpVars => "$dumpvars",
            Command::DumpAll => "$dumpall",
            Command::DumpOn => "$dumpon",
            Command::DumpOff => "$dumpoff",
        }
    }

    pub(super) fn is_dump_control(&self) -> bool {
        matches!(
            self,
            Command::DumpVars | Command::DumpAll | Command::DumpOn | Command::DumpOff
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(super) enum TokenKind {
    Command(Command),
    End,
    /// Bare argument word of a header command.
    Word(String),
    Comment(String),
    Date(String),
    Version(String),
    /// A header command this parser has no use for; its body was skipped.
    Unknown(String),
    Timestamp(u64),
    Change { code: String, value: Value },
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Command(command) => f.write_str(command.keyword()),
            TokenKind::End => f.write_str("$end"),
            TokenKind::Word(word) => f.write_str(word),
            TokenKind::Comment(_) => f.write_str("$comment"),
            TokenKind::Date(_) => f.write_str("$date"),
            TokenKind::Version(_) => f.write_str("$version"),
            TokenKind::Unknown(name) => f.write_str(name),
            TokenKind::Timestamp(time) => write!(f, "#{time}"),
            TokenKind::Change {
                code,
                value: value @ Value::Scalar(_),
            } => write!(f, "{value}{code}"),
            TokenKind::Change { code, value } => write!(f, "{value} {code}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(super) struct Token {
    pub(super) kind: TokenKind,
    pub(super) location: Location,
}

enum Body {
    Comment,
    Date,
    Version,
    /// A header command this parser has no use for.
    Unknown(String),
}

impl Body {
    fn keyword(&self) -> &str {
        match self {
            Body::Comment => "$comment",
            Body::Date => "$date",
            Body::Version => "$version",
            Body::Unknown(name) => name,
        }
    }
}

// What a word turned out to be, before any further words are pulled.
enum Lexeme {
    Ready(TokenKind),
    /// Commands whose bodies are read verbatim.
    Body(Body),
    /// `b...` and `r...` values, still missing their identifier code.
    NeedsCode(Value),
}

pub(super) struct Scanner<R: Read> {
    reader: WordReader<R>,
    mode: Mode,
    // set after `$enddefinitions`, the next `$end` switches mode
    pending_switch: bool,
    open_command: Option<(Command, Location)>,
}

impl<R: Read> Scanner<R> {
    pub(super) fn new(reader: R) -> Scanner<R> {
        Scanner {
            reader: WordReader::new(reader),
            mode: Mode::Header,
            pending_switch: false,
            open_command: None,
        }
    }

    #[cfg(test)]
    pub(super) fn mode(&self) -> Mode {
        self.mode
    }

    pub(super) fn location(&self) -> Location {
        self.reader.location()
    }

    pub(super) fn next_token(&mut self) -> Result<Option<Token>, Diagnostic> {
        let mode = self.mode;
        let (word, location) = match self.reader.next_word()? {
            Some(word) => word,
            None => return self.end_of_input(),
        };

        check_characters(word, location)?;
        let lexeme = match mode {
            Mode::Header => header_lexeme(word, self.open_command.is_some()),
            Mode::ValueChange => value_change_lexeme(word, location)?,
        };

        let kind = match lexeme {
            Lexeme::Ready(kind) => kind,
            Lexeme::Body(body) => {
                let text = self.reader.text_until_end(location, body.keyword())?;
                match body {
                    Body::Comment => TokenKind::Comment(text),
                    Body::Date => TokenKind::Date(text),
                    Body::Version => TokenKind::Version(text),
                    Body::Unknown(name) => {
                        trace!("skipped `{name}` at {location}");
                        TokenKind::Unknown(name)
                    }
                }
            }
            Lexeme::NeedsCode(value) => {
                let code = self.identifier_code(&value, location)?;
                TokenKind::Change { code, value }
            }
        };

        self.track_commands(&kind, location);
        Ok(Some(Token { kind, location }))
    }

    fn end_of_input(&mut self) -> Result<Option<Token>, Diagnostic> {
        match self.open_command.take() {
            Some((command, opened_at)) => {
                let keyword = command.keyword();
                let err = format!(
                    "unterminated `{keyword}` command: reached end of input before `$end`"
                );
                Err(Diagnostic::lexical(opened_at, err))
            }
            None => Ok(None),
        }
    }

    // vector and real values carry their identifier code in the next word
    fn identifier_code(&mut self, value: &Value, location: Location) -> Result<String, Diagnostic> {
        match self.reader.next_word()? {
            Some((code, code_location)) => {
                check_characters(code, code_location)?;
                if is_keyword(code) {
                    let err = format!(
                        "value change `{value}` has no identifier code, found `{code}`"
                    );
                    return Err(Diagnostic::lexical(location, err));
                }
                Ok(code.to_string())
            }
            None => {
                let err = format!("value change `{value}` has no identifier code");
                Err(Diagnostic::lexical(location, err))
            }
        }
    }

    fn track_commands(&mut self, kind: &TokenKind, location: Location) {
        match kind {
            TokenKind::Command(command) => {
                self.pending_switch = *command == Command::EndDefinitions;
                self.open_command = Some((*command, location));
            }
            TokenKind::End => {
                self.open_command = None;
                if self.pending_switch {
                    self.pending_switch = false;
                    self.mode = Mode::ValueChange;
                    trace!("switched to value change mode at {location}");
                }
            }
            _ => {}
        }
    }
}

// `$` alone or followed by other characters is a legal code; keywords are not
fn is_keyword(word: &str) -> bool {
    matches!(word, "$end" | "$comment" | "$date" | "$version")
        || Command::from_keyword(word).is_some()
}

fn check_characters(word: &str, location: Location) -> Result<(), Diagnostic> {
    match word.chars().enumerate().find(|(_, chr)| chr.is_control()) {
        Some((idx, chr)) => {
            let location = Location::new(location.line, location.column + idx);
            let err = format!("invalid character {chr:?} in `{}`", word.escape_debug());
            Err(Diagnostic::lexical(location, err))
        }
        None => Ok(()),
    }
}

// Identifier codes may start with `$`, so inside an open command only the
// known keywords are commands.
fn header_lexeme(word: &str, in_command: bool) -> Lexeme {
    if word == "$end" {
        return Lexeme::Ready(TokenKind::End);
    }
    if let Some(command) = Command::from_keyword(word) {
        return Lexeme::Ready(TokenKind::Command(command));
    }

    match word {
        "$comment" => Lexeme::Body(Body::Comment),
        "$date" => Lexeme::Body(Body::Date),
        "$version" => Lexeme::Body(Body::Version),
        other if other.starts_with('$') && !in_command => {
            Lexeme::Body(Body::Unknown(other.to_string()))
        }
        other => Lexeme::Ready(TokenKind::Word(other.to_string())),
    }
}

fn value_change_lexeme(word: &str, location: Location) -> Result<Lexeme, Diagnostic> {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return Err(Diagnostic::lexical(location, "empty word"));
    };
    let rest = chars.as_str();

    if let Some(bit) = Bit::from_char(first) {
        if rest.is_empty() {
            let err = format!("value change `{word}` has no identifier code");
            return Err(Diagnostic::lexical(location, err));
        }
        return Ok(Lexeme::Ready(TokenKind::Change {
            code: rest.to_string(),
            value: Value::Scalar(bit),
        }));
    }

    let lexeme = match first {
        '#' => {
            let time = rest.parse::<u64>().map_err(|_| {
                Diagnostic::lexical(location, format!("malformed timestamp `{word}`"))
            })?;
            Lexeme::Ready(TokenKind::Timestamp(time))
        }
        'b' | 'B' => match parse_bit_string(rest) {
            Ok(bits) => Lexeme::NeedsCode(Value::Vector(bits)),
            Err(BitStringErr::Empty) => {
                let err = format!("malformed vector value `{word}`: no bits");
                return Err(Diagnostic::lexical(location, err));
            }
            Err(BitStringErr::OtherValue(chr)) => {
                let err = format!(
                    "malformed vector value `{word}`: `{chr}` is not one of 0, 1, x, z"
                );
                return Err(Diagnostic::lexical(location, err));
            }
        },
        'r' | 'R' => {
            let value = rest.parse::<f64>().map_err(|_| {
                Diagnostic::lexical(location, format!("malformed real value `{word}`"))
            })?;
            Lexeme::NeedsCode(Value::Real(value))
        }
        '$' => match word {
            "$end" => Lexeme::Ready(TokenKind::End),
            "$comment" => Lexeme::Body(Body::Comment),
            _ => match Command::from_keyword(word) {
                Some(command) => Lexeme::Ready(TokenKind::Command(command)),
                None => {
                    let err = format!("unknown command `{word}` in value change section");
                    return Err(Diagnostic::lexical(location, err));
                }
            },
        },
        other => {
            let err = format!("invalid character `{other}` at start of value change `{word}`");
            return Err(Diagnostic::lexical(location, err));
        }
    };

    Ok(lexeme)
}
