// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use super::error::{Diagnostic, Diagnostics};
use super::options::ParseOptions;
use super::parse::Parser;
use super::scanner::Scanner;
use super::signal::ValueChange;
use super::types::{Document, Header};

/// Entry point for parsing. A `Driver` only carries configuration, so one
/// instance may be reused for any number of independent parses.
#[derive(Debug, Clone, Default)]
pub struct Driver {
    options: ParseOptions,
}

impl Driver {
    pub fn new(options: ParseOptions) -> Driver {
        Driver { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parses a whole VCD stream into memory.
    ///
    /// On success the returned [`Document`] carries the non-fatal
    /// diagnostics. On failure every diagnostic raised so far is returned,
    /// the fatal one last.
    pub fn parse<R: Read>(&self, reader: R) -> Result<Document, Diagnostics> {
        let mut changes = self.stream(reader)?;

        let mut value_changes = vec![];
        let mut fatal = None;
        for change in changes.by_ref() {
            match change {
                Ok(change) => value_changes.push(change),
                Err(err) => {
                    fatal = Some(err);
                    break;
                }
            }
        }

        let (header, mut diagnostics) = changes.parser.into_parts();
        if let Some(fatal) = fatal {
            diagnostics.push(fatal);
            return Err(Diagnostics(diagnostics));
        }

        info!(
            "parsed {} scope(s), {} variable(s), {} value change(s), {} diagnostic(s)",
            header.scopes().len() - 1,
            header.variables().len(),
            value_changes.len(),
            diagnostics.len()
        );
        Ok(Document {
            header,
            value_changes,
            diagnostics,
        })
    }

    /// Opens `path` and parses it. The file is closed before this returns,
    /// whatever the outcome.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Document, Diagnostics> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| {
            let err = Diagnostic::io(format!("cannot open {}: {err}", path.display()));
            Diagnostics(vec![err])
        })?;
        info!("parsing {}", path.display());
        self.parse(file)
    }

    /// Parses the declarations up front and hands back an iterator over
    /// the value changes, which are read lazily from `reader`.
    pub fn stream<R: Read>(&self, reader: R) -> Result<ValueChanges<R>, Diagnostics> {
        let mut parser = Parser::new(Scanner::new(reader), self.options.clone());
        if let Err(fatal) = parser.parse_declarations() {
            let (_, mut diagnostics) = parser.into_parts();
            diagnostics.push(fatal);
            return Err(Diagnostics(diagnostics));
        }
        debug!("streaming value changes");
        Ok(ValueChanges {
            parser,
            done: false,
        })
    }
}

/// Shorthand for `Driver::default().parse(reader)`.
pub fn parse_vcd<R: Read>(reader: R) -> Result<Document, Diagnostics> {
    Driver::default().parse(reader)
}

/// Forward-only iterator over the value changes of a VCD stream.
///
/// Yields `Err` at most once, for the diagnostic that stopped the parse,
/// and nothing after it. Non-fatal diagnostics accumulate in
/// [`ValueChanges::diagnostics`].
pub struct ValueChanges<R: Read> {
    parser: Parser<R>,
    done: bool,
}

impl<R: Read> ValueChanges<R> {
    pub fn header(&self) -> &Header {
        self.parser.header()
    }

    /// Non-fatal diagnostics raised so far, declarations included.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.parser.diagnostics()
    }
}

impl<R: Read> Iterator for ValueChanges<R> {
    type Item = Result<ValueChange, Diagnostic>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.parser.next_change() {
            Ok(Some(change)) => Some(Ok(change)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
