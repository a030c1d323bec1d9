// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

//! Diagnostics produced while parsing a VCD stream.
//!
//! Every problem the parser runs into becomes a [`Diagnostic`]. I/O,
//! lexical and syntax diagnostics always stop the parse. Semantic
//! diagnostics are recorded and the parse carries on, unless the
//! [`ParseOptions`](super::options::ParseOptions) in effect escalate their
//! [`SemanticKind`] to fatal.

use std::fmt;

use thiserror::Error;

/// 1-based position of a token in the source text.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Location {
        Location { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.line, self.column)
    }
}

/// The logical inconsistencies the parser tolerates by default.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SemanticKind {
    DuplicateTimescale,
    /// `$upscope` with no open scope.
    UnbalancedUpscope,
    /// Scopes still open at `$enddefinitions`.
    UnclosedScope,
    UnknownIdentifier,
    NonMonotonicTime,
    WidthMismatch,
    /// Value changes seen before the first `#<time>` marker.
    MissingTimestamp,
}

impl SemanticKind {
    pub const ALL: [SemanticKind; 7] = [
        SemanticKind::DuplicateTimescale,
        SemanticKind::UnbalancedUpscope,
        SemanticKind::UnclosedScope,
        SemanticKind::UnknownIdentifier,
        SemanticKind::NonMonotonicTime,
        SemanticKind::WidthMismatch,
        SemanticKind::MissingTimestamp,
    ];
}

impl fmt::Display for SemanticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SemanticKind::DuplicateTimescale => "duplicate timescale",
            SemanticKind::UnbalancedUpscope | SemanticKind::UnclosedScope => "unbalanced scope",
            SemanticKind::UnknownIdentifier => "unknown identifier",
            SemanticKind::NonMonotonicTime => "non-monotonic time",
            SemanticKind::WidthMismatch => "width mismatch",
            SemanticKind::MissingTimestamp => "missing timestamp",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Diagnostic {
    /// The source could not be opened or read.
    #[error("ERROR : \"{message}\"")]
    Io { message: String },

    #[error("ERROR : {location} : \"{message}\"")]
    Lexical { location: Location, message: String },

    #[error("ERROR : {location} : \"{message}\"")]
    Syntax { location: Location, message: String },

    #[error("ERROR : {location} : \"{message}\"")]
    Semantic {
        location: Location,
        kind: SemanticKind,
        message: String,
    },
}

impl Diagnostic {
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn lexical(location: Location, message: impl Into<String>) -> Self {
        Self::Lexical {
            location,
            message: message.into(),
        }
    }

    pub fn syntax(location: Location, message: impl Into<String>) -> Self {
        Self::Syntax {
            location,
            message: message.into(),
        }
    }

    /// The message always starts with the kind's name, so that a reader
    /// can grep for e.g. "unbalanced scope".
    pub fn semantic(location: Location, kind: SemanticKind, detail: impl fmt::Display) -> Self {
        Self::Semantic {
            location,
            kind,
            message: format!("{kind}: {detail}"),
        }
    }

    pub fn location(&self) -> Option<Location> {
        match self {
            Diagnostic::Io { .. } => None,
            Diagnostic::Lexical { location, .. }
            | Diagnostic::Syntax { location, .. }
            | Diagnostic::Semantic { location, .. } => Some(*location),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Diagnostic::Io { message }
            | Diagnostic::Lexical { message, .. }
            | Diagnostic::Syntax { message, .. }
            | Diagnostic::Semantic { message, .. } => message,
        }
    }

    pub fn semantic_kind(&self) -> Option<SemanticKind> {
        match self {
            Diagnostic::Semantic { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Formats the diagnostic the way it is shown to a human, prefixing the
    /// location with the stream name when one is known.
    pub fn render(&self, stream_name: Option<&str>) -> String {
        match (self.location(), stream_name) {
            (Some(location), Some(name)) => {
                format!("ERROR : {name}:{location} : \"{}\"", self.message())
            }
            _ => self.to_string(),
        }
    }
}

/// All diagnostics from one parse, in the order they were raised. When a
/// parse fails, the fatal diagnostic is the last entry.
#[derive(Debug, Clone, Default, PartialEq, Error)]
#[error("{}", render_all(.0, None))]
pub struct Diagnostics(pub Vec<Diagnostic>);

impl Diagnostics {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    /// The diagnostic that stopped the parse, if any.
    pub fn fatal(&self) -> Option<&Diagnostic> {
        self.0.last()
    }

    pub fn render(&self, stream_name: Option<&str>) -> String {
        render_all(&self.0, stream_name)
    }
}

fn render_all(diagnostics: &[Diagnostic], stream_name: Option<&str>) -> String {
    diagnostics
        .iter()
        .map(|diagnostic| diagnostic.render(stream_name))
        .collect::<Vec<_>>()
        .join("\n")
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positioned_format() {
        let err = Diagnostic::syntax(Location::new(3, 1), "unexpected `#0`");
        assert_eq!(err.to_string(), "ERROR : 3.1 : \"unexpected `#0`\"");
        assert_eq!(
            err.render(Some("dump.vcd")),
            "ERROR : dump.vcd:3.1 : \"unexpected `#0`\""
        );
    }

    #[test]
    fn unpositioned_format() {
        let err = Diagnostic::io("cannot open missing.vcd: No such file or directory");
        assert_eq!(
            err.render(Some("missing.vcd")),
            "ERROR : \"cannot open missing.vcd: No such file or directory\""
        );
        assert_eq!(err.location(), None);
    }

    #[test]
    fn diagnostics_display_one_per_line() {
        let diagnostics = Diagnostics(vec![
            Diagnostic::semantic(
                Location::new(1, 1),
                SemanticKind::UnbalancedUpscope,
                "`$upscope` without a matching `$scope`",
            ),
            Diagnostic::lexical(Location::new(4, 1), "malformed vector value `b2`: no bits"),
        ]);
        let expected = format!(
            "ERROR : 1.1 : \"{}\"\nERROR : 4.1 : \"malformed vector value `b2`: no bits\"",
            diagnostics.0[0].message()
        );
        assert_eq!(diagnostics.to_string(), expected);
        assert_eq!(diagnostics.render(None), expected);

        let boxed: Box<dyn std::error::Error> = Box::new(diagnostics);
        assert_eq!(boxed.to_string(), expected);
    }

    #[test]
    fn semantic_message_names_kind() {
        let err = Diagnostic::semantic(
            Location::new(7, 2),
            SemanticKind::UnbalancedUpscope,
            "`$upscope` without a matching `$scope`",
        );
        assert!(err.message().starts_with("unbalanced scope"));
        assert_eq!(err.semantic_kind(), Some(SemanticKind::UnbalancedUpscope));
    }
}
