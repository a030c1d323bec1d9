// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

//! The grammar engine. A [`Parser`] pulls tokens from its [`Scanner`] one at
//! a time and runs in two states: declarations (see `scopes.rs` and
//! `metadata.rs`) and value changes (see `events.rs`).
use std::io::Read;

use tracing::warn;

use super::error::{Diagnostic, Location, SemanticKind};
use super::options::ParseOptions;
use super::scanner::{Scanner, Token, TokenKind};
use super::types::{Header, ScopeIdx};

mod combinator_atoms;
mod events;
mod metadata;
mod scopes;

pub(super) struct Parser<R: Read> {
    scanner: Scanner<R>,
    options: ParseOptions,
    header: Header,
    scope_stack: Vec<ScopeIdx>,
    diagnostics: Vec<Diagnostic>,
    // time of the dump block currently being read
    current_time: Option<u64>,
    open_dump: Option<Location>,
}

impl<R: Read> Parser<R> {
    pub(super) fn new(scanner: Scanner<R>, options: ParseOptions) -> Parser<R> {
        Parser {
            scanner,
            options,
            header: Header::default(),
            scope_stack: vec![],
            diagnostics: vec![],
            current_time: None,
            open_dump: None,
        }
    }

    pub(super) fn header(&self) -> &Header {
        &self.header
    }

    pub(super) fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub(super) fn into_parts(self) -> (Header, Vec<Diagnostic>) {
        (self.header, self.diagnostics)
    }

    /// Records a semantic diagnostic, or hands it back as fatal if the
    /// options escalate its kind.
    fn report(
        &mut self,
        location: Location,
        kind: SemanticKind,
        detail: impl std::fmt::Display,
    ) -> Result<(), Diagnostic> {
        let diagnostic = Diagnostic::semantic(location, kind, detail);
        if self.options.is_fatal(kind) {
            return Err(diagnostic);
        }
        warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
        Ok(())
    }

    fn next_token(&mut self) -> Result<Option<Token>, Diagnostic> {
        self.scanner.next_token()
    }

    fn expect_token(&mut self, expecting: &str) -> Result<Token, Diagnostic> {
        match self.next_token()? {
            Some(token) => Ok(token),
            None => {
                let err = format!("syntax error, unexpected end of input, expecting {expecting}");
                Err(Diagnostic::syntax(self.scanner.location(), err))
            }
        }
    }

    fn expect_word(&mut self, expecting: &str) -> Result<(String, Location), Diagnostic> {
        let token = self.expect_token(expecting)?;
        match token.kind {
            TokenKind::Word(word) => Ok((word, token.location)),
            other => Err(unexpected(&other, token.location, expecting)),
        }
    }

    fn expect_end(&mut self, command: &str) -> Result<(), Diagnostic> {
        let expecting = format!("`$end` to close `{command}`");
        let token = self.expect_token(&expecting)?;
        match token.kind {
            TokenKind::End => Ok(()),
            other => Err(unexpected(&other, token.location, &expecting)),
        }
    }
}

fn unexpected(found: &TokenKind, location: Location, expecting: &str) -> Diagnostic {
    let err = format!("syntax error, unexpected `{found}`, expecting {expecting}");
    Diagnostic::syntax(location, err)
}
