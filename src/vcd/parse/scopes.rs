// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

//! part of the vcd parser that handles parsing the signal tree and
//! building the resulting signal tree
use std::io::Read;

use tracing::{debug, trace};

use super::super::error::{Diagnostic, Location, SemanticKind};
use super::super::scanner::{Command, TokenKind};
use super::super::signal::VarType;
use super::super::types::{
    BitRange, Header, Scope, ScopeIdx, ScopeItem, ScopeKind, VarIdx, Variable,
};
use super::combinator_atoms::{tag, take_until, ParseResult};
use super::{unexpected, Parser};

const EXPECTED_DECLARATION: &str =
    "one of `$timescale`, `$scope`, `$var`, `$upscope`, `$comment`, `$date`, `$version` \
     or `$enddefinitions`";

impl<R: Read> Parser<R> {
    /// Runs the declarations state until `$enddefinitions $end` has been
    /// consumed.
    pub(crate) fn parse_declarations(&mut self) -> Result<(), Diagnostic> {
        loop {
            let token = self.expect_token("`$enddefinitions`")?;
            let location = token.location;

            match token.kind {
                TokenKind::Command(Command::Timescale) => self.parse_timescale(location)?,
                TokenKind::Command(Command::Scope) => self.parse_scope()?,
                TokenKind::Command(Command::Var) => self.parse_var()?,
                TokenKind::Command(Command::Upscope) => self.parse_upscope(location)?,
                TokenKind::Command(Command::EndDefinitions) => {
                    self.expect_end("$enddefinitions")?;
                    self.close_declarations(location)?;
                    return Ok(());
                }
                kind @ (TokenKind::Comment(_) | TokenKind::Date(_) | TokenKind::Version(_)) => {
                    self.record_metadata(kind)
                }
                TokenKind::Unknown(name) => debug!("ignoring `{name}` at {location}"),
                other => return Err(unexpected(&other, location, EXPECTED_DECLARATION)),
            }
        }
    }

    // registers `item` under the innermost open scope, or the root
    fn attach(&mut self, item: ScopeItem) -> ScopeIdx {
        let parent_idx = self.scope_stack.last().copied().unwrap_or(Header::ROOT);
        let ScopeIdx(idx) = parent_idx;
        self.header.all_scopes[idx].items.push(item);
        parent_idx
    }

    // $scope module reg_mag_i $end
    fn parse_scope(&mut self) -> Result<(), Diagnostic> {
        let (keyword, location) = self.expect_word("a scope type")?;
        let kind = ScopeKind::from_keyword(&keyword).ok_or_else(|| {
            let err = format!(
                "syntax error, unknown scope type `{keyword}`, \
                 expecting one of module, task, function, fork, begin"
            );
            Diagnostic::syntax(location, err)
        })?;

        //               ^^^^^^^^^ - scope name
        let name_token = self.expect_token("a scope name")?;
        let name = match name_token.kind {
            TokenKind::Word(name) => name,
            TokenKind::End => {
                let err = "syntax error, `$scope` is missing a name";
                return Err(Diagnostic::syntax(name_token.location, err));
            }
            other => return Err(unexpected(&other, name_token.location, "a scope name")),
        };

        self.expect_end("$scope")?;

        let self_idx = ScopeIdx(self.header.all_scopes.len());
        let parent_idx = self.attach(ScopeItem::Scope(self_idx));
        self.header.all_scopes.push(Scope {
            name,
            kind,
            parent_idx: Some(parent_idx),
            self_idx,
            items: vec![],
        });
        self.scope_stack.push(self_idx);
        trace!("entered scope {}", self.header.scope_path(self_idx));

        Ok(())
    }

    fn parse_upscope(&mut self, location: Location) -> Result<(), Diagnostic> {
        self.expect_end("$upscope")?;
        match self.scope_stack.pop() {
            Some(_) => Ok(()),
            None => self.report(
                location,
                SemanticKind::UnbalancedUpscope,
                "`$upscope` without a matching `$scope`",
            ),
        }
    }

    // $var parameter 3 a IDLE $end
    fn parse_var(&mut self) -> Result<(), Diagnostic> {
        //      ^^^^^^^^^ - var_type
        let (keyword, location) = self.expect_word("a variable type")?;
        let var_type = VarType::from_keyword(&keyword).ok_or_else(|| {
            let err = format!(
                "syntax error, unknown variable type `{keyword}`, expecting one of {:?}",
                VarType::KEYWORDS
            );
            Diagnostic::syntax(location, err)
        })?;

        //                ^ - width
        let (word, location) = self.expect_word("a variable width")?;
        let width = word.parse::<u32>().map_err(|_| {
            let err = format!("syntax error, invalid variable width `{word}`");
            Diagnostic::syntax(location, err)
        })?;

        //                  ^ - identifier code
        let (identifier_code, _) = self.expect_word("an identifier code")?;

        //                    ^^^^ - reference, which can extend until $end
        let (first_name, name_location) = self.expect_word("a reference name")?;
        let mut names = vec![first_name];
        let mut bit_range = None;
        loop {
            let token = self.expect_token("`$end` to close `$var`")?;
            match token.kind {
                TokenKind::End => break,
                TokenKind::Word(word) if word.starts_with('[') => {
                    bit_range = Some(parse_bit_range(&word, token.location)?);
                }
                TokenKind::Word(word) => names.push(word),
                other => {
                    return Err(unexpected(&other, token.location, "`$end` to close `$var`"))
                }
            }
        }
        let mut reference_name = names.join(" ");

        // `data[7:0]` carries its range on the reference itself
        if bit_range.is_none() {
            if let Some(open) = reference_name.rfind('[') {
                if open > 0 && reference_name.ends_with(']') {
                    let range = parse_bit_range(&reference_name[open..], name_location)?;
                    bit_range = Some(range);
                    reference_name.truncate(open);
                }
            }
        }

        // Aliasing: a code seen before simply gains another variable.
        let var_idx = VarIdx(self.header.all_variables.len());
        let scope = self.attach(ScopeItem::Variable(var_idx));
        self.header
            .variables_by_code
            .entry(identifier_code.clone())
            .or_default()
            .push(var_idx);
        self.header.all_variables.push(Variable {
            identifier_code,
            var_type,
            width,
            reference_name,
            bit_range,
            scope,
        });

        Ok(())
    }

    fn close_declarations(&mut self, location: Location) -> Result<(), Diagnostic> {
        if let Some(&innermost) = self.scope_stack.last() {
            let open = self.scope_stack.len();
            let path = self.header.scope_path(innermost);
            self.report(
                location,
                SemanticKind::UnclosedScope,
                format!("{open} scope(s) still open at `$enddefinitions`, innermost is `{path}`"),
            )?;
            self.scope_stack.clear();
        }

        debug!(
            "declarations done: {} scopes, {} variables, {} identifier codes",
            self.header.all_scopes.len(),
            self.header.all_variables.len(),
            self.header.variables_by_code.len()
        );
        Ok(())
    }
}

/// Reads `[msb:lsb]` or `[index]`.
fn parse_bit_range(word: &str, location: Location) -> Result<BitRange, Diagnostic> {
    let malformed = || {
        let err = format!("syntax error, malformed bit range `{word}`");
        Diagnostic::syntax(location, err)
    };

    let ParseResult { matched, residual } = tag(word, "[");
    if matched.is_empty() {
        return Err(malformed());
    }
    let inner = residual.strip_suffix(']').ok_or_else(malformed)?;

    let ParseResult { matched, residual } = take_until(inner, b':');
    let msb = matched.trim().parse::<i64>().map_err(|_| malformed())?;
    let lsb = match residual.strip_prefix(':') {
        Some(lsb) => lsb.trim().parse::<i64>().map_err(|_| malformed())?,
        None => msb,
    };

    Ok(BitRange { msb, lsb })
}
